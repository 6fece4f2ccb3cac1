//! Episode wrappers applied by [`Registry::make`](crate::Registry::make).

use std::sync::Arc;

use gymrs_protocol::{Action, Options, ResetOutcome, Space, StepOutcome, TransitionTable};

use crate::env::Env;
use crate::error::{Error, Result};

/// Rejects `step` before the first `reset` and every call after `close`.
pub struct OrderEnforcing<E> {
	inner: E,
	has_reset: bool,
	closed: bool,
}

impl<E: Env> OrderEnforcing<E> {
	pub fn new(inner: E) -> Self {
		Self {
			inner,
			has_reset: false,
			closed: false,
		}
	}

	fn ensure_open(&self) -> Result<()> {
		if self.closed {
			return Err(Error::Closed(self.inner.id().to_string()));
		}
		Ok(())
	}
}

impl<E: Env> Env for OrderEnforcing<E> {
	fn id(&self) -> &str {
		self.inner.id()
	}

	fn action_space(&self) -> Space {
		self.inner.action_space()
	}

	fn observation_space(&self) -> Space {
		self.inner.observation_space()
	}

	fn reset(&mut self, seed: Option<u64>, options: &Options) -> Result<ResetOutcome> {
		self.ensure_open()?;
		let outcome = self.inner.reset(seed, options)?;
		self.has_reset = true;
		Ok(outcome)
	}

	fn step(&mut self, action: &Action) -> Result<StepOutcome> {
		self.ensure_open()?;
		if !self.has_reset {
			return Err(Error::ResetNeeded(self.inner.id().to_string()));
		}
		self.inner.step(action)
	}

	fn close(&mut self) -> Result<()> {
		if self.closed {
			return Ok(());
		}
		self.closed = true;
		self.inner.close()
	}

	fn dynamics(&self) -> Option<Arc<TransitionTable>> {
		self.inner.dynamics()
	}
}

/// Truncates episodes after `max_episode_steps` steps.
pub struct TimeLimit<E> {
	inner: E,
	max_episode_steps: u32,
	elapsed: u32,
}

impl<E: Env> TimeLimit<E> {
	pub fn new(inner: E, max_episode_steps: u32) -> Self {
		Self {
			inner,
			max_episode_steps,
			elapsed: 0,
		}
	}

	pub fn elapsed(&self) -> u32 {
		self.elapsed
	}
}

impl<E: Env> Env for TimeLimit<E> {
	fn id(&self) -> &str {
		self.inner.id()
	}

	fn action_space(&self) -> Space {
		self.inner.action_space()
	}

	fn observation_space(&self) -> Space {
		self.inner.observation_space()
	}

	fn reset(&mut self, seed: Option<u64>, options: &Options) -> Result<ResetOutcome> {
		let outcome = self.inner.reset(seed, options)?;
		self.elapsed = 0;
		Ok(outcome)
	}

	fn step(&mut self, action: &Action) -> Result<StepOutcome> {
		let mut outcome = self.inner.step(action)?;
		self.elapsed = self.elapsed.saturating_add(1);
		if self.elapsed >= self.max_episode_steps {
			outcome.truncated = true;
		}
		Ok(outcome)
	}

	fn close(&mut self) -> Result<()> {
		self.inner.close()
	}

	fn dynamics(&self) -> Option<Arc<TransitionTable>> {
		self.inner.dynamics()
	}
}
