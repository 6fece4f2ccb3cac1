//! Drive an underpowered car up a hill by building momentum.

use gymrs_protocol::{Action, Info, Observation, Options, ResetOutcome, Space, StepOutcome};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Deserialize;

use crate::env::{Env, discrete_action, parse_options, seeded_rng};
use crate::error::Result;

pub const ID: &str = "MountainCar-v0";

const MIN_POSITION: f64 = -1.2;
const MAX_POSITION: f64 = 0.6;
const MAX_SPEED: f64 = 0.07;
const GOAL_POSITION: f64 = 0.5;
const FORCE: f64 = 0.001;
const GRAVITY: f64 = 0.0025;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MountainCarConfig {
	pub goal_velocity: f64,
}

pub fn make(id: &'static str, options: &Options) -> Result<Box<dyn Env>> {
	let config: MountainCarConfig = parse_options(id, options)?;
	Ok(Box::new(MountainCar::new(config)))
}

pub struct MountainCar {
	config: MountainCarConfig,
	position: f64,
	velocity: f64,
	rng: StdRng,
}

impl MountainCar {
	pub fn new(config: MountainCarConfig) -> Self {
		Self {
			config,
			position: -0.5,
			velocity: 0.0,
			rng: seeded_rng(None),
		}
	}

	fn observation(&self) -> Observation {
		Observation::Vector(vec![self.position, self.velocity])
	}
}

impl Env for MountainCar {
	fn id(&self) -> &str {
		ID
	}

	fn action_space(&self) -> Space {
		Space::discrete(3)
	}

	fn observation_space(&self) -> Space {
		Space::bounded(vec![MIN_POSITION, -MAX_SPEED], vec![MAX_POSITION, MAX_SPEED])
	}

	fn reset(&mut self, seed: Option<u64>, _options: &Options) -> Result<ResetOutcome> {
		if seed.is_some() {
			self.rng = seeded_rng(seed);
		}
		self.position = self.rng.gen_range(-0.6..-0.4);
		self.velocity = 0.0;
		Ok(ResetOutcome {
			observation: self.observation(),
			info: Info::new(),
		})
	}

	fn step(&mut self, action: &Action) -> Result<StepOutcome> {
		let action = discrete_action(action, 3)?;

		self.velocity += (action as f64 - 1.0) * FORCE - (3.0 * self.position).cos() * GRAVITY;
		self.velocity = self.velocity.clamp(-MAX_SPEED, MAX_SPEED);
		self.position = (self.position + self.velocity).clamp(MIN_POSITION, MAX_POSITION);
		if self.position == MIN_POSITION && self.velocity < 0.0 {
			self.velocity = 0.0;
		}

		let terminated = self.position >= GOAL_POSITION && self.velocity >= self.config.goal_velocity;
		Ok(StepOutcome {
			observation: self.observation(),
			reward: -1.0,
			terminated,
			truncated: false,
			info: Info::new(),
		})
	}
}
