//! Balance a pole on a cart by pushing the cart left or right.

use gymrs_protocol::{Action, Info, Observation, Options, ResetOutcome, Space, StepOutcome};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Deserialize;
use tracing::warn;

use crate::env::{Env, discrete_action, parse_options, seeded_rng};
use crate::error::Result;

pub const ID: &str = "CartPole-v1";

const GRAVITY: f64 = 9.8;
const MASS_CART: f64 = 1.0;
const MASS_POLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASS_CART + MASS_POLE;
const HALF_LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = MASS_POLE * HALF_LENGTH;
const FORCE_MAG: f64 = 10.0;
const TAU: f64 = 0.02;
const THETA_THRESHOLD: f64 = 12.0 * 2.0 * std::f64::consts::PI / 360.0;
const X_THRESHOLD: f64 = 2.4;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CartPoleConfig {}

pub fn make(id: &'static str, options: &Options) -> Result<Box<dyn Env>> {
	let _: CartPoleConfig = parse_options(id, options)?;
	Ok(Box::new(CartPole::new().with_id(id)))
}

pub struct CartPole {
	id: &'static str,
	/// `[x, x_dot, theta, theta_dot]`
	state: [f64; 4],
	steps_beyond_terminated: Option<u32>,
	rng: StdRng,
}

impl Default for CartPole {
	fn default() -> Self {
		Self::new()
	}
}

impl CartPole {
	pub fn new() -> Self {
		Self {
			id: ID,
			state: [0.0; 4],
			steps_beyond_terminated: None,
			rng: seeded_rng(None),
		}
	}

	pub fn with_id(mut self, id: &'static str) -> Self {
		self.id = id;
		self
	}

	fn observation(&self) -> Observation {
		Observation::Vector(self.state.to_vec())
	}
}

impl Env for CartPole {
	fn id(&self) -> &str {
		self.id
	}

	fn action_space(&self) -> Space {
		Space::discrete(2)
	}

	fn observation_space(&self) -> Space {
		let high = vec![X_THRESHOLD * 2.0, f64::MAX, THETA_THRESHOLD * 2.0, f64::MAX];
		Space::bounded(high.iter().map(|h| -h).collect(), high)
	}

	fn reset(&mut self, seed: Option<u64>, _options: &Options) -> Result<ResetOutcome> {
		if seed.is_some() {
			self.rng = seeded_rng(seed);
		}
		for value in &mut self.state {
			*value = self.rng.gen_range(-0.05..0.05);
		}
		self.steps_beyond_terminated = None;
		Ok(ResetOutcome {
			observation: self.observation(),
			info: Info::new(),
		})
	}

	fn step(&mut self, action: &Action) -> Result<StepOutcome> {
		let action = discrete_action(action, 2)?;
		let [x, x_dot, theta, theta_dot] = self.state;
		let force = if action == 1 { FORCE_MAG } else { -FORCE_MAG };
		let (sin, cos) = theta.sin_cos();

		let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin) / TOTAL_MASS;
		let theta_acc =
			(GRAVITY * sin - cos * temp) / (HALF_LENGTH * (4.0 / 3.0 - MASS_POLE * cos * cos / TOTAL_MASS));
		let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos / TOTAL_MASS;

		self.state = [
			x + TAU * x_dot,
			x_dot + TAU * x_acc,
			theta + TAU * theta_dot,
			theta_dot + TAU * theta_acc,
		];

		let [x, _, theta, _] = self.state;
		let terminated = !(-X_THRESHOLD..=X_THRESHOLD).contains(&x) || !(-THETA_THRESHOLD..=THETA_THRESHOLD).contains(&theta);

		let reward = if !terminated {
			1.0
		} else {
			match self.steps_beyond_terminated {
				None => {
					self.steps_beyond_terminated = Some(0);
					1.0
				}
				Some(n) => {
					if n == 0 {
						warn!(target = "gym.cart_pole", "step() called after the episode terminated; call reset()");
					}
					self.steps_beyond_terminated = Some(n + 1);
					0.0
				}
			}
		};

		Ok(StepOutcome {
			observation: self.observation(),
			reward,
			terminated,
			truncated: false,
			info: Info::new(),
		})
	}
}
