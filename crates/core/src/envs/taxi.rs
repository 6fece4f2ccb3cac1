//! 5x5 taxi domain: pick a passenger up at one of four stands and drop them
//! at their destination.
//!
//! States encode `((row * 5 + col) * 5 + passenger) * 4 + destination`, where
//! passenger `4` means "in the taxi".

use gymrs_protocol::{Options, Transition, TransitionTable};
use serde::Deserialize;

use crate::env::{Env, parse_options};
use crate::error::Result;
use crate::tabular::TabularEnv;

pub const ID: &str = "Taxi-v3";

pub const SOUTH: usize = 0;
pub const NORTH: usize = 1;
pub const EAST: usize = 2;
pub const WEST: usize = 3;
pub const PICKUP: usize = 4;
pub const DROPOFF: usize = 5;

const MAP: [&[u8]; 7] = [
	b"+---------+",
	b"|R: | : :G|",
	b"| : | : : |",
	b"| : : : : |",
	b"| | : | : |",
	b"|Y| : |B: |",
	b"+---------+",
];

const SIZE: usize = 5;
const STANDS: [(usize, usize); 4] = [(0, 0), (0, 4), (4, 0), (4, 3)];
const IN_TAXI: usize = 4;
const N_STATES: usize = SIZE * SIZE * 5 * 4;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxiConfig {}

pub fn make(id: &'static str, options: &Options) -> Result<Box<dyn Env>> {
	let _: TaxiConfig = parse_options(id, options)?;
	Ok(Box::new(taxi().with_id(id)))
}

pub fn encode(row: usize, col: usize, passenger: usize, destination: usize) -> usize {
	((row * SIZE + col) * 5 + passenger) * 4 + destination
}

pub fn decode(state: usize) -> (usize, usize, usize, usize) {
	let destination = state % 4;
	let state = state / 4;
	let passenger = state % 5;
	let state = state / 5;
	(state / SIZE, state % SIZE, passenger, destination)
}

fn transition(row: usize, col: usize, passenger: usize, destination: usize, action: usize) -> Transition {
	let (mut new_row, mut new_col, mut new_passenger) = (row, col, passenger);
	let mut reward = -1.0;
	let mut terminated = false;
	let taxi = (row, col);

	match action {
		SOUTH => new_row = (row + 1).min(SIZE - 1),
		NORTH => new_row = row.saturating_sub(1),
		EAST if MAP[1 + row][2 * col + 2] == b':' => new_col = (col + 1).min(SIZE - 1),
		WEST if MAP[1 + row][2 * col] == b':' => new_col = col.saturating_sub(1),
		PICKUP => {
			if passenger < IN_TAXI && taxi == STANDS[passenger] {
				new_passenger = IN_TAXI;
			} else {
				reward = -10.0;
			}
		}
		DROPOFF => {
			if taxi == STANDS[destination] && passenger == IN_TAXI {
				new_passenger = destination;
				terminated = true;
				reward = 20.0;
			} else if let (Some(stand), IN_TAXI) = (STANDS.iter().position(|s| *s == taxi), passenger) {
				new_passenger = stand;
			} else {
				reward = -10.0;
			}
		}
		_ => {}
	}

	Transition::new(1.0, encode(new_row, new_col, new_passenger, destination), reward, terminated)
}

pub fn taxi() -> TabularEnv {
	let mut initial = vec![0.0; N_STATES];
	let states = (0..N_STATES)
		.map(|state| {
			let (row, col, passenger, destination) = decode(state);
			if passenger < IN_TAXI && passenger != destination {
				initial[state] = 1.0;
			}
			(0..6)
				.map(|action| vec![transition(row, col, passenger, destination, action)])
				.collect()
		})
		.collect();

	let total: f64 = initial.iter().sum();
	initial.iter_mut().for_each(|w| *w /= total);

	TabularEnv::new(ID, TransitionTable::new(states), initial)
}
