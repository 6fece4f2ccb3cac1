//! Swing a frictionless pendulum upright and keep it there.
//!
//! The action is the torque applied at the free end, in `[-2, 2]`.

use std::f64::consts::PI;

use gymrs_protocol::{Action, Info, Observation, Options, ResetOutcome, Space, StepOutcome};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Deserialize;

use crate::env::{Env, parse_options, seeded_rng};
use crate::error::{Error, Result};

pub const ID: &str = "Pendulum-v1";

const MAX_SPEED: f64 = 8.0;
const MAX_TORQUE: f64 = 2.0;
const DT: f64 = 0.05;
const MASS: f64 = 1.0;
const LENGTH: f64 = 1.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PendulumConfig {
	/// Gravitational acceleration.
	pub g: f64,
}

impl Default for PendulumConfig {
	fn default() -> Self {
		Self { g: 10.0 }
	}
}

pub fn make(id: &'static str, options: &Options) -> Result<Box<dyn Env>> {
	let config: PendulumConfig = parse_options(id, options)?;
	if !config.g.is_finite() || config.g < 0.0 {
		return Err(Error::invalid_option(id, format!("g must be a non-negative number, got {}", config.g)));
	}
	Ok(Box::new(Pendulum::new(config)))
}

pub struct Pendulum {
	config: PendulumConfig,
	theta: f64,
	theta_dot: f64,
	rng: StdRng,
}

impl Pendulum {
	pub fn new(config: PendulumConfig) -> Self {
		Self {
			config,
			theta: 0.0,
			theta_dot: 0.0,
			rng: seeded_rng(None),
		}
	}

	fn observation(&self) -> Observation {
		Observation::Vector(vec![self.theta.cos(), self.theta.sin(), self.theta_dot])
	}
}

/// Wraps an angle into `[-pi, pi)`.
fn angle_normalize(x: f64) -> f64 {
	(x + PI).rem_euclid(2.0 * PI) - PI
}

impl Env for Pendulum {
	fn id(&self) -> &str {
		ID
	}

	fn action_space(&self) -> Space {
		Space::bounded(vec![-MAX_TORQUE], vec![MAX_TORQUE])
	}

	fn observation_space(&self) -> Space {
		Space::bounded(vec![-1.0, -1.0, -MAX_SPEED], vec![1.0, 1.0, MAX_SPEED])
	}

	fn reset(&mut self, seed: Option<u64>, _options: &Options) -> Result<ResetOutcome> {
		if seed.is_some() {
			self.rng = seeded_rng(seed);
		}
		self.theta = self.rng.gen_range(-PI..PI);
		self.theta_dot = self.rng.gen_range(-1.0..1.0);
		Ok(ResetOutcome {
			observation: self.observation(),
			info: Info::new(),
		})
	}

	fn step(&mut self, action: &Action) -> Result<StepOutcome> {
		let space = self.action_space();
		if !space.contains(action) {
			return Err(Error::InvalidAction { action: *action, space });
		}
		let u = action.as_f64().clamp(-MAX_TORQUE, MAX_TORQUE);
		let (th, th_dot) = (self.theta, self.theta_dot);
		let g = self.config.g;

		let cost = angle_normalize(th).powi(2) + 0.1 * th_dot.powi(2) + 0.001 * u.powi(2);

		let new_th_dot = (th_dot + (3.0 * g / (2.0 * LENGTH) * th.sin() + 3.0 / (MASS * LENGTH * LENGTH) * u) * DT)
			.clamp(-MAX_SPEED, MAX_SPEED);
		self.theta = th + new_th_dot * DT;
		self.theta_dot = new_th_dot;

		Ok(StepOutcome {
			observation: self.observation(),
			reward: -cost,
			terminated: false,
			truncated: false,
			info: Info::new(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn angle_normalize_wraps() {
		assert!((angle_normalize(3.0 * PI) - (-PI)).abs() < 1e-9);
		assert!((angle_normalize(0.5) - 0.5).abs() < 1e-12);
	}

	#[test]
	fn upright_and_still_costs_nothing() {
		let mut env = Pendulum::new(PendulumConfig::default());
		env.reset(Some(1), &Options::new()).unwrap();
		env.theta = 0.0;
		env.theta_dot = 0.0;
		let step = env.step(&Action::Continuous(0.0)).unwrap();
		assert_eq!(step.reward, 0.0);
		assert!(!step.terminated);
	}

	#[test]
	fn torque_outside_bounds_is_rejected() {
		let mut env = Pendulum::new(PendulumConfig::default());
		env.reset(Some(1), &Options::new()).unwrap();
		assert!(matches!(env.step(&Action::Continuous(2.5)), Err(Error::InvalidAction { .. })));
	}

	#[test]
	fn negative_gravity_is_rejected() {
		let mut options = Options::new();
		options.insert("g".into(), (-1.0).into());
		assert!(make(ID, &options).is_err());
	}
}
