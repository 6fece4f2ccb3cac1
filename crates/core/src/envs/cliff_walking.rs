//! 4x12 grid with a cliff along the bottom edge.
//!
//! Each move costs `-1`. Stepping into the cliff costs `-100` and sends the
//! agent back to the start without ending the episode.

use gymrs_protocol::{Options, Transition, TransitionTable};
use serde::Deserialize;

use crate::env::{Env, parse_options};
use crate::error::Result;
use crate::tabular::{TabularEnv, point_mass};

pub const ID: &str = "CliffWalking-v1";

pub const UP: usize = 0;
pub const RIGHT: usize = 1;
pub const DOWN: usize = 2;
pub const LEFT: usize = 3;

const ROWS: usize = 4;
const COLS: usize = 12;
const START: usize = (ROWS - 1) * COLS;
const GOAL: usize = ROWS * COLS - 1;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliffWalkingConfig {}

pub fn make(id: &'static str, options: &Options) -> Result<Box<dyn Env>> {
	let _: CliffWalkingConfig = parse_options(id, options)?;
	Ok(Box::new(cliff_walking().with_id(id)))
}

fn is_cliff(row: usize, col: usize) -> bool {
	row == ROWS - 1 && (1..COLS - 1).contains(&col)
}

pub fn cliff_walking() -> TabularEnv {
	let states = (0..ROWS * COLS)
		.map(|state| {
			let (row, col) = (state / COLS, state % COLS);
			(0..4)
				.map(|action| {
					let (r, c) = match action {
						UP => (row.saturating_sub(1), col),
						RIGHT => (row, (col + 1).min(COLS - 1)),
						DOWN => ((row + 1).min(ROWS - 1), col),
						_ => (row, col.saturating_sub(1)),
					};
					if is_cliff(r, c) {
						return vec![Transition::new(1.0, START, -100.0, false)];
					}
					let next = r * COLS + c;
					vec![Transition::new(1.0, next, -1.0, next == GOAL)]
				})
				.collect()
		})
		.collect();

	TabularEnv::new(ID, TransitionTable::new(states), point_mass(ROWS * COLS, START))
}

#[cfg(test)]
mod tests {
	use gymrs_protocol::{Action, Observation};

	use super::*;

	#[test]
	fn falling_off_returns_to_start() {
		let mut env = cliff_walking();
		env.reset(Some(42), &Options::new()).unwrap();
		let step = env.step(&Action::Discrete(RIGHT as i64)).unwrap();
		assert_eq!(step.observation, Observation::Discrete(START as i64));
		assert_eq!(step.reward, -100.0);
		assert!(!step.terminated);
	}

	#[test]
	fn safe_path_reaches_goal() {
		let mut env = cliff_walking();
		env.reset(Some(42), &Options::new()).unwrap();
		let mut actions = vec![UP];
		actions.extend(std::iter::repeat_n(RIGHT, COLS - 1));
		actions.push(DOWN);

		let mut total = 0.0;
		let mut last = None;
		for action in actions {
			let step = env.step(&Action::Discrete(action as i64)).unwrap();
			total += step.reward;
			last = Some(step);
		}
		let last = last.unwrap();
		assert!(last.terminated);
		assert_eq!(last.observation, Observation::Discrete(GOAL as i64));
		assert_eq!(total, -13.0);
	}

	#[test]
	fn rejects_unknown_options() {
		let mut options = Options::new();
		options.insert("is_slippery".into(), true.into());
		assert!(make(ID, &options).is_err());
	}
}
