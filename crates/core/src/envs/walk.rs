//! One-dimensional random walk between two terminal cells.
//!
//! Cells `0` and `n_states + 1` are terminal; the walk starts in the middle.
//! Reaching the right end pays `1.0`. Each action moves in its intended
//! direction with probability `1 - p_stay - p_backward`.

use gymrs_protocol::{Options, Transition, TransitionTable};
use serde::Deserialize;

use crate::env::{Env, parse_options};
use crate::error::{Error, Result};
use crate::tabular::{MAX_STATES, TabularEnv, point_mass};

pub const ID: &str = "GymWalkEnv-v1";

pub const WEST: usize = 0;
pub const EAST: usize = 1;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkConfig {
	/// Non-terminal cells.
	pub n_states: usize,
	pub p_stay: f64,
	pub p_backward: f64,
}

impl Default for WalkConfig {
	fn default() -> Self {
		Self {
			n_states: 7,
			p_stay: 0.0,
			p_backward: 0.5,
		}
	}
}

impl WalkConfig {
	/// Total cells including both terminals.
	fn cells(&self, id: &str) -> Result<usize> {
		if self.n_states == 0 {
			return Err(Error::invalid_option(id, "n_states must be at least 1"));
		}
		let cells = self
			.n_states
			.checked_add(2)
			.filter(|cells| *cells <= MAX_STATES)
			.ok_or_else(|| {
				Error::invalid_option(id, format!("n_states must be at most {}, got {}", MAX_STATES - 2, self.n_states))
			})?;
		for (name, p) in [("p_stay", self.p_stay), ("p_backward", self.p_backward)] {
			if !(0.0..=1.0).contains(&p) {
				return Err(Error::invalid_option(id, format!("{name} must lie in [0, 1], got {p}")));
			}
		}
		if self.p_stay + self.p_backward > 1.0 + f64::EPSILON {
			return Err(Error::invalid_option(id, "p_stay + p_backward must not exceed 1"));
		}
		Ok(cells)
	}
}

pub fn make(id: &'static str, options: &Options) -> Result<Box<dyn Env>> {
	let config: WalkConfig = parse_options(id, options)?;
	Ok(Box::new(walk_as(id, &config)?))
}

pub fn walk(config: &WalkConfig) -> Result<TabularEnv> {
	walk_as(ID, config)
}

fn walk_as(id: &'static str, config: &WalkConfig) -> Result<TabularEnv> {
	let n = config.cells(id)?;
	let last = n - 1;
	let p_forward = (1.0 - config.p_stay - config.p_backward).max(0.0);
	let is_terminal = |s: usize| s == 0 || s == last;

	let states = (0..n)
		.map(|s| {
			[WEST, EAST]
				.into_iter()
				.map(|a| {
					let (forward, backward) = if is_terminal(s) {
						(s, s)
					} else if a == WEST {
						(s - 1, s + 1)
					} else {
						(s + 1, s - 1)
					};
					let outcome = |prob: f64, next: usize| {
						let reward = if s == last - 1 && next == last { 1.0 } else { 0.0 };
						let done = (s >= last - 1 && next == last) || (s <= 1 && next == 0);
						Transition::new(prob, next, reward, done)
					};
					vec![
						outcome(p_forward, forward),
						Transition::new(config.p_stay, s, 0.0, is_terminal(s)),
						outcome(config.p_backward, backward),
					]
				})
				.collect()
		})
		.collect();

	Ok(TabularEnv::new(id, TransitionTable::new(states), point_mass(n, n / 2)))
}
