//! Grid world crossing a frozen lake from `S` to `G` while avoiding holes.
//!
//! On a slippery lake the agent moves in the intended direction or one of
//! the two perpendicular directions, each with probability 1/3.

use gymrs_protocol::{Options, Transition, TransitionTable};
use serde::Deserialize;

use crate::env::{Env, parse_options};
use crate::error::{Error, Result};
use crate::tabular::{MAX_STATES, TabularEnv};

pub const ID: &str = "FrozenLake-v1";

pub const LEFT: usize = 0;
pub const DOWN: usize = 1;
pub const RIGHT: usize = 2;
pub const UP: usize = 3;

const MAP_4X4: [&str; 4] = ["SFFF", "FHFH", "FFFH", "HFFG"];

const MAP_8X8: [&str; 8] = [
	"SFFFFFFF", "FFFFFFFF", "FFFHFFFF", "FFFFFHFF", "FFFHFFFF", "FHHFFFHF", "FHFFHFHF", "FFFHFFFG",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrozenLakeConfig {
	/// Custom map rows; takes precedence over `map_name`.
	pub desc: Option<Vec<String>>,
	pub map_name: String,
	pub is_slippery: bool,
}

impl Default for FrozenLakeConfig {
	fn default() -> Self {
		Self {
			desc: None,
			map_name: "4x4".to_string(),
			is_slippery: true,
		}
	}
}

impl FrozenLakeConfig {
	fn grid(&self, id: &str) -> Result<Vec<Vec<u8>>> {
		if let Some(desc) = &self.desc {
			let tiles = desc.iter().try_fold(0usize, |total, row| total.checked_add(row.len()));
			if tiles.is_none_or(|tiles| tiles > MAX_STATES) {
				return Err(Error::invalid_option(id, format!("desc must have at most {MAX_STATES} tiles")));
			}
		}
		let rows: Vec<Vec<u8>> = match (&self.desc, self.map_name.as_str()) {
			(Some(desc), _) => desc.iter().map(|row| row.as_bytes().to_vec()).collect(),
			(None, "4x4") => MAP_4X4.iter().map(|row| row.as_bytes().to_vec()).collect(),
			(None, "8x8") => MAP_8X8.iter().map(|row| row.as_bytes().to_vec()).collect(),
			(None, other) => {
				return Err(Error::invalid_option(id, format!("unknown map_name {other:?}, expected 4x4 or 8x8")));
			}
		};

		let ncol = rows.first().map_or(0, Vec::len);
		if ncol == 0 || rows.iter().any(|row| row.len() != ncol) {
			return Err(Error::invalid_option(id, "desc must be a non-empty rectangle"));
		}
		if let Some(bad) = rows.iter().flatten().find(|c| !b"SFHG".contains(c)) {
			return Err(Error::invalid_option(id, format!("unexpected tile {:?} in desc", *bad as char)));
		}
		if !rows.iter().flatten().any(|c| *c == b'S') {
			return Err(Error::invalid_option(id, "desc needs a start tile S"));
		}
		Ok(rows)
	}
}

pub fn make(id: &'static str, options: &Options) -> Result<Box<dyn Env>> {
	let config: FrozenLakeConfig = parse_options(id, options)?;
	Ok(Box::new(frozen_lake_as(id, &config)?))
}

pub fn frozen_lake(config: &FrozenLakeConfig) -> Result<TabularEnv> {
	frozen_lake_as(ID, config)
}

fn frozen_lake_as(id: &'static str, config: &FrozenLakeConfig) -> Result<TabularEnv> {
	let grid = config.grid(id)?;
	let nrow = grid.len();
	let ncol = grid[0].len();
	let to_state = |row: usize, col: usize| row * ncol + col;

	let moved = |row: usize, col: usize, action: usize| match action {
		LEFT => (row, col.saturating_sub(1)),
		DOWN => ((row + 1).min(nrow - 1), col),
		RIGHT => (row, (col + 1).min(ncol - 1)),
		_ => (row.saturating_sub(1), col),
	};

	let mut states = Vec::with_capacity(nrow * ncol);
	for row in 0..nrow {
		for col in 0..ncol {
			let state = to_state(row, col);
			let tile = grid[row][col];
			let actions = (0..4)
				.map(|action| {
					if tile == b'G' || tile == b'H' {
						return vec![Transition::new(1.0, state, 0.0, true)];
					}
					let directions: Vec<(f64, usize)> = if config.is_slippery {
						[(action + 3) % 4, action, (action + 1) % 4]
							.into_iter()
							.map(|b| (1.0 / 3.0, b))
							.collect()
					} else {
						vec![(1.0, action)]
					};
					directions
						.into_iter()
						.map(|(prob, b)| {
							let (r, c) = moved(row, col, b);
							let next = grid[r][c];
							let reward = if next == b'G' { 1.0 } else { 0.0 };
							Transition::new(prob, to_state(r, c), reward, next == b'G' || next == b'H')
						})
						.collect()
				})
				.collect();
			states.push(actions);
		}
	}

	let starts = grid.iter().flatten().filter(|c| **c == b'S').count() as f64;
	let initial = grid
		.iter()
		.flatten()
		.map(|c| if *c == b'S' { 1.0 / starts } else { 0.0 })
		.collect();

	Ok(TabularEnv::new(id, TransitionTable::new(states), initial))
}

#[cfg(test)]
mod tests {
	use gymrs_protocol::{Action, Observation};

	use super::*;

	fn deterministic() -> FrozenLakeConfig {
		FrozenLakeConfig {
			is_slippery: false,
			..FrozenLakeConfig::default()
		}
	}

	#[test]
	fn slippery_lake_spreads_over_three_directions() {
		let env = frozen_lake(&FrozenLakeConfig::default()).unwrap();
		assert_eq!(env.table().n_states(), 16);
		let outcomes = env.table().get(0, DOWN).unwrap();
		assert_eq!(outcomes.len(), 3);
		assert!(outcomes.iter().all(|t| (t.prob - 1.0 / 3.0).abs() < 1e-12));
	}

	#[test]
	fn holes_and_goal_are_absorbing() {
		let env = frozen_lake(&deterministic()).unwrap();
		assert_eq!(env.table().get(5, RIGHT).unwrap(), &[Transition::new(1.0, 5, 0.0, true)]);
		assert_eq!(env.table().get(15, LEFT).unwrap(), &[Transition::new(1.0, 15, 0.0, true)]);
	}

	#[test]
	fn shortest_path_reaches_goal() {
		let mut env = frozen_lake(&deterministic()).unwrap();
		let reset = env.reset(Some(42), &Options::new()).unwrap();
		assert_eq!(reset.observation, Observation::Discrete(0));

		let path = [RIGHT, RIGHT, DOWN, DOWN, DOWN, RIGHT];
		let mut last = None;
		for action in path {
			last = Some(env.step(&Action::Discrete(action as i64)).unwrap());
		}
		let last = last.unwrap();
		assert_eq!(last.observation, Observation::Discrete(15));
		assert_eq!(last.reward, 1.0);
		assert!(last.terminated);
	}

	#[test]
	fn eight_by_eight_map() {
		let config = FrozenLakeConfig {
			map_name: "8x8".to_string(),
			..FrozenLakeConfig::default()
		};
		assert_eq!(frozen_lake(&config).unwrap().table().n_states(), 64);
	}

	#[test]
	fn rejects_unknown_map_and_bad_desc() {
		let config = FrozenLakeConfig {
			map_name: "5x5".to_string(),
			..FrozenLakeConfig::default()
		};
		assert!(frozen_lake(&config).is_err());

		let config = FrozenLakeConfig {
			desc: Some(vec!["SFX".to_string(), "FFG".to_string()]),
			..FrozenLakeConfig::default()
		};
		assert!(frozen_lake(&config).is_err());
	}

	#[test]
	fn oversized_desc_is_rejected() {
		let row = "F".repeat(1001);
		let mut desc = vec![row; 1000];
		desc[0].replace_range(0..1, "S");
		let config = FrozenLakeConfig {
			desc: Some(desc),
			..FrozenLakeConfig::default()
		};
		let err = frozen_lake(&config).err().unwrap();
		assert!(err.to_string().contains("at most"), "{err}");
	}
}
