//! The uniform environment contract.

use std::sync::Arc;

use gymrs_protocol::{Action, Info, Options, ResetOutcome, Space, StepOutcome, TransitionTable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// A stateful simulation following the Gymnasium `reset`/`step`/`close`
/// contract.
///
/// Instances are exclusively owned by one caller at a time; implementations
/// need `Send` but never `Sync`.
pub trait Env: Send {
	/// Registered id, e.g. `CartPole-v1`.
	fn id(&self) -> &str;

	fn action_space(&self) -> Space;

	fn observation_space(&self) -> Space;

	/// Starts a new episode. A `seed` reseeds the instance RNG.
	fn reset(&mut self, seed: Option<u64>, options: &Options) -> Result<ResetOutcome>;

	/// Advances the episode by one action.
	fn step(&mut self, action: &Action) -> Result<StepOutcome>;

	/// Releases resources held by the instance.
	fn close(&mut self) -> Result<()> {
		Ok(())
	}

	/// Shared transition table, for tabular environments only.
	fn dynamics(&self) -> Option<Arc<TransitionTable>> {
		None
	}
}

impl<E: Env + ?Sized> Env for Box<E> {
	fn id(&self) -> &str {
		(**self).id()
	}

	fn action_space(&self) -> Space {
		(**self).action_space()
	}

	fn observation_space(&self) -> Space {
		(**self).observation_space()
	}

	fn reset(&mut self, seed: Option<u64>, options: &Options) -> Result<ResetOutcome> {
		(**self).reset(seed, options)
	}

	fn step(&mut self, action: &Action) -> Result<StepOutcome> {
		(**self).step(action)
	}

	fn close(&mut self) -> Result<()> {
		(**self).close()
	}

	fn dynamics(&self) -> Option<Arc<TransitionTable>> {
		(**self).dynamics()
	}
}

/// Deserializes an options object into an environment's config struct.
pub fn parse_options<T: DeserializeOwned>(env: &str, options: &Options) -> Result<T> {
	serde_json::from_value(Value::Object(options.clone()))
		.map_err(|err| Error::invalid_option(env, err.to_string()))
}

/// Creates an RNG from `seed`, or from OS entropy when absent.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
	match seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_entropy(),
	}
}

/// Draws an index from a categorical distribution.
///
/// Zero-probability entries are never selected; rounding slack falls to the
/// last entry with positive mass.
pub(crate) fn categorical_sample<R: Rng + ?Sized>(probs: &[f64], rng: &mut R) -> usize {
	let draw: f64 = rng.r#gen();
	let mut cumulative = 0.0;
	let mut fallback = 0;
	for (idx, prob) in probs.iter().enumerate() {
		if *prob <= 0.0 {
			continue;
		}
		cumulative += prob;
		fallback = idx;
		if draw < cumulative {
			return idx;
		}
	}
	fallback
}

/// Checks an action against a discrete space of `n` members.
pub(crate) fn discrete_action(action: &Action, n: u32) -> Result<usize> {
	match action.as_discrete() {
		Some(value) if (0..i64::from(n)).contains(&value) => Ok(value as usize),
		_ => Err(Error::InvalidAction {
			action: *action,
			space: Space::discrete(n),
		}),
	}
}

/// `info` payload carrying the probability of the sampled transition.
pub(crate) fn prob_info(prob: f64) -> Info {
	let mut info = Info::new();
	info.insert("prob".to_string(), Value::from(prob));
	info
}
