//! Construction of environments by id.

use std::collections::BTreeMap;

use gymrs_protocol::Options;
use serde_json::Value;
use tracing::debug;

use crate::env::Env;
use crate::envs;
use crate::error::{Error, Result};
use crate::wrappers::{OrderEnforcing, TimeLimit};

/// Option key consumed by [`Registry::make`] rather than the environment.
pub const MAX_EPISODE_STEPS: &str = "max_episode_steps";

/// Constructor receiving the registered id and the environment-specific
/// options.
pub type EntryPoint = fn(&'static str, &Options) -> Result<Box<dyn Env>>;

/// Registration metadata for one environment id.
#[derive(Debug, Clone)]
pub struct EnvSpec {
	/// Unique identifier like `CartPole-v1`.
	pub id: &'static str,
	pub entry_point: EntryPoint,
	/// Step budget applied when the caller does not pass one.
	pub max_episode_steps: Option<u32>,
}

impl EnvSpec {
	pub const fn new(id: &'static str, entry_point: EntryPoint) -> Self {
		Self {
			id,
			entry_point,
			max_episode_steps: None,
		}
	}

	pub const fn with_max_episode_steps(mut self, steps: u32) -> Self {
		self.max_episode_steps = Some(steps);
		self
	}
}

/// Table of constructible environments.
///
/// Unlike Gymnasium's process-wide registry this is a plain value: callers
/// own it and share it as they see fit.
#[derive(Debug, Clone, Default)]
pub struct Registry {
	specs: BTreeMap<&'static str, EnvSpec>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry holding every built-in environment.
	pub fn builtin() -> Self {
		let mut registry = Self::new();
		let specs = [
			EnvSpec::new(envs::walk::ID, envs::walk::make),
			EnvSpec::new(envs::frozen_lake::ID, envs::frozen_lake::make).with_max_episode_steps(100),
			EnvSpec::new("CliffWalking-v0", envs::cliff_walking::make),
			EnvSpec::new(envs::cliff_walking::ID, envs::cliff_walking::make),
			EnvSpec::new(envs::taxi::ID, envs::taxi::make).with_max_episode_steps(200),
			EnvSpec::new("CartPole-v0", envs::cart_pole::make).with_max_episode_steps(200),
			EnvSpec::new(envs::cart_pole::ID, envs::cart_pole::make).with_max_episode_steps(500),
			EnvSpec::new(envs::mountain_car::ID, envs::mountain_car::make).with_max_episode_steps(200),
			EnvSpec::new(envs::pendulum::ID, envs::pendulum::make).with_max_episode_steps(200),
			EnvSpec::new(envs::acrobot::ID, envs::acrobot::make).with_max_episode_steps(500),
			EnvSpec::new(envs::blackjack::ID, envs::blackjack::make),
		];
		registry.specs.extend(specs.map(|spec| (spec.id, spec)));
		registry
	}

	pub fn register(&mut self, spec: EnvSpec) -> Result<()> {
		if self.specs.contains_key(spec.id) {
			return Err(Error::AlreadyRegistered(spec.id.to_string()));
		}
		self.specs.insert(spec.id, spec);
		Ok(())
	}

	pub fn spec(&self, id: &str) -> Option<&EnvSpec> {
		self.specs.get(id)
	}

	pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.specs.keys().copied()
	}

	/// Constructs `id` with `options`.
	///
	/// `max_episode_steps` is consumed here (a JSON `null` disables the
	/// limit); every other key goes to the environment, which rejects keys
	/// it does not know.
	pub fn make(&self, id: &str, options: &Options) -> Result<Box<dyn Env>> {
		let spec = self.spec(id).ok_or_else(|| Error::UnknownEnv(id.to_string()))?;

		let mut options = options.clone();
		let max_episode_steps = match options.remove(MAX_EPISODE_STEPS) {
			None => spec.max_episode_steps,
			Some(Value::Null) => None,
			Some(value) => Some(parse_step_budget(id, &value)?),
		};

		let env = (spec.entry_point)(spec.id, &options)?;
		debug!(target = "gym.registry", id, ?max_episode_steps, "constructed environment");

		let env = OrderEnforcing::new(env);
		let env: Box<dyn Env> = match max_episode_steps {
			Some(steps) => Box::new(TimeLimit::new(env, steps)),
			None => Box::new(env),
		};
		Ok(env)
	}
}

fn parse_step_budget(id: &str, value: &Value) -> Result<u32> {
	value
		.as_u64()
		.filter(|steps| *steps > 0)
		.and_then(|steps| u32::try_from(steps).ok())
		.ok_or_else(|| Error::invalid_option(id, format!("{MAX_EPISODE_STEPS} must be a positive integer, got {value}")))
}

#[cfg(test)]
mod tests {
	use gymrs_protocol::{Action, Observation};

	use super::*;

	fn options(pairs: &[(&str, Value)]) -> Options {
		pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
	}

	#[test]
	fn builtin_ids() {
		let registry = Registry::builtin();
		let ids: Vec<_> = registry.ids().collect();
		assert!(ids.contains(&"GymWalkEnv-v1"));
		assert!(ids.contains(&"Pendulum-v1"));
		assert!(ids.contains(&"Taxi-v3"));
		assert!(ids.contains(&"Acrobot-v1"));
		assert!(ids.contains(&"Blackjack-v1"));
	}

	#[test]
	fn older_versions_report_their_own_id() {
		let registry = Registry::builtin();
		for id in ["CliffWalking-v0", "CartPole-v0", "CliffWalking-v1", "CartPole-v1"] {
			assert_eq!(registry.make(id, &Options::new()).unwrap().id(), id);
		}

		let err = registry
			.make("CartPole-v0", &options(&[("gravity", Value::from(1.0))]))
			.err()
			.unwrap();
		assert!(err.to_string().contains("CartPole-v0"), "{err}");
	}

	#[test]
	fn unknown_id_fails() {
		let err = Registry::builtin().make("Nope-v9", &Options::new()).err().unwrap();
		assert!(matches!(err, Error::UnknownEnv(id) if id == "Nope-v9"));
	}

	#[test]
	fn duplicate_registration_fails() {
		let mut registry = Registry::builtin();
		let err = registry.register(EnvSpec::new(envs::walk::ID, envs::walk::make)).unwrap_err();
		assert!(matches!(err, Error::AlreadyRegistered(_)));
	}

	#[test]
	fn made_envs_enforce_reset_before_step() {
		let mut env = Registry::builtin().make("GymWalkEnv-v1", &Options::new()).unwrap();
		assert!(matches!(env.step(&Action::Discrete(0)), Err(Error::ResetNeeded(_))));
		let reset = env.reset(Some(42), &Options::new()).unwrap();
		assert_eq!(reset.observation, Observation::Discrete(4));
	}

	#[test]
	fn max_episode_steps_truncates() {
		let registry = Registry::builtin();
		let mut env = registry
			.make("CliffWalking-v1", &options(&[(MAX_EPISODE_STEPS, Value::from(2))]))
			.unwrap();
		env.reset(Some(0), &Options::new()).unwrap();
		assert!(!env.step(&Action::Discrete(0)).unwrap().truncated);
		assert!(env.step(&Action::Discrete(0)).unwrap().truncated);
	}

	#[test]
	fn invalid_step_budget_is_rejected() {
		let registry = Registry::builtin();
		for bad in [Value::from(0), Value::from(-3), Value::from("ten")] {
			let result = registry.make("Taxi-v3", &options(&[(MAX_EPISODE_STEPS, bad)]));
			assert!(matches!(result, Err(Error::InvalidOption { .. })));
		}
	}

	#[test]
	fn walk_options_flow_through() {
		let registry = Registry::builtin();
		let env = registry
			.make(
				"GymWalkEnv-v1",
				&options(&[
					("n_states", Value::from(5)),
					("p_stay", Value::from(0.0)),
					("p_backward", Value::from(0.0)),
				]),
			)
			.unwrap();
		assert_eq!(env.dynamics().unwrap().n_states(), 7);
	}
}
