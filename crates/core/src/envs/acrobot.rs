//! Two-link pendulum actuated at the middle joint; swing the tip above the
//! bar.
//!
//! The state is `[theta1, theta2, dtheta1, dtheta2]`. Dynamics follow the
//! book formulation and are integrated with one fourth-order Runge-Kutta step
//! per action.

use std::f64::consts::PI;

use gymrs_protocol::{Action, Info, Observation, Options, ResetOutcome, Space, StepOutcome};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Deserialize;

use crate::env::{Env, discrete_action, parse_options, seeded_rng};
use crate::error::Result;

pub const ID: &str = "Acrobot-v1";

const DT: f64 = 0.2;
const GRAVITY: f64 = 9.8;
const LINK_LENGTH_1: f64 = 1.0;
const LINK_MASS_1: f64 = 1.0;
const LINK_MASS_2: f64 = 1.0;
const LINK_COM_POS_1: f64 = 0.5;
const LINK_COM_POS_2: f64 = 0.5;
const LINK_MOI: f64 = 1.0;
const MAX_VEL_1: f64 = 4.0 * PI;
const MAX_VEL_2: f64 = 9.0 * PI;
const AVAIL_TORQUE: [f64; 3] = [-1.0, 0.0, 1.0];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcrobotConfig {}

pub fn make(id: &'static str, options: &Options) -> Result<Box<dyn Env>> {
	let _: AcrobotConfig = parse_options(id, options)?;
	Ok(Box::new(Acrobot::new()))
}

pub struct Acrobot {
	state: [f64; 4],
	rng: StdRng,
}

impl Default for Acrobot {
	fn default() -> Self {
		Self::new()
	}
}

impl Acrobot {
	pub fn new() -> Self {
		Self {
			state: [0.0; 4],
			rng: seeded_rng(None),
		}
	}

	fn observation(&self) -> Observation {
		let [theta1, theta2, dtheta1, dtheta2] = self.state;
		Observation::Vector(vec![theta1.cos(), theta1.sin(), theta2.cos(), theta2.sin(), dtheta1, dtheta2])
	}

	/// Tip height above the pivot, in link lengths, is above one.
	fn tip_above_bar(&self) -> bool {
		let [theta1, theta2, ..] = self.state;
		-theta1.cos() - (theta2 + theta1).cos() > 1.0
	}
}

/// Time derivative of `[theta1, theta2, dtheta1, dtheta2]` under `torque`.
fn dsdt(s: [f64; 4], torque: f64) -> [f64; 4] {
	let (m1, m2) = (LINK_MASS_1, LINK_MASS_2);
	let (l1, lc1, lc2) = (LINK_LENGTH_1, LINK_COM_POS_1, LINK_COM_POS_2);
	let (i1, i2) = (LINK_MOI, LINK_MOI);
	let [theta1, theta2, dtheta1, dtheta2] = s;

	let d1 = m1 * lc1 * lc1 + m2 * (l1 * l1 + lc2 * lc2 + 2.0 * l1 * lc2 * theta2.cos()) + i1 + i2;
	let d2 = m2 * (lc2 * lc2 + l1 * lc2 * theta2.cos()) + i2;
	let phi2 = m2 * lc2 * GRAVITY * (theta1 + theta2 - PI / 2.0).cos();
	let phi1 = -m2 * l1 * lc2 * dtheta2 * dtheta2 * theta2.sin()
		- 2.0 * m2 * l1 * lc2 * dtheta2 * dtheta1 * theta2.sin()
		+ (m1 * lc1 + m2 * l1) * GRAVITY * (theta1 - PI / 2.0).cos()
		+ phi2;
	let ddtheta2 = (torque + d2 / d1 * phi1 - m2 * l1 * lc2 * dtheta1 * dtheta1 * theta2.sin() - phi2)
		/ (m2 * lc2 * lc2 + i2 - d2 * d2 / d1);
	let ddtheta1 = -(d2 * ddtheta2 + phi1) / d1;

	[dtheta1, dtheta2, ddtheta1, ddtheta2]
}

fn rk4(s: [f64; 4], torque: f64, dt: f64) -> [f64; 4] {
	let shifted = |k: [f64; 4], h: f64| -> [f64; 4] { std::array::from_fn(|i| s[i] + h * k[i]) };
	let k1 = dsdt(s, torque);
	let k2 = dsdt(shifted(k1, dt / 2.0), torque);
	let k3 = dsdt(shifted(k2, dt / 2.0), torque);
	let k4 = dsdt(shifted(k3, dt), torque);
	std::array::from_fn(|i| s[i] + dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]))
}

/// Wraps an angle into `[-pi, pi]`.
fn wrap(mut x: f64) -> f64 {
	while x > PI {
		x -= 2.0 * PI;
	}
	while x < -PI {
		x += 2.0 * PI;
	}
	x
}

impl Env for Acrobot {
	fn id(&self) -> &str {
		ID
	}

	fn action_space(&self) -> Space {
		Space::discrete(3)
	}

	fn observation_space(&self) -> Space {
		let high = vec![1.0, 1.0, 1.0, 1.0, MAX_VEL_1, MAX_VEL_2];
		Space::bounded(high.iter().map(|h| -h).collect(), high)
	}

	fn reset(&mut self, seed: Option<u64>, _options: &Options) -> Result<ResetOutcome> {
		if seed.is_some() {
			self.rng = seeded_rng(seed);
		}
		for value in &mut self.state {
			*value = self.rng.gen_range(-0.1..0.1);
		}
		Ok(ResetOutcome {
			observation: self.observation(),
			info: Info::new(),
		})
	}

	fn step(&mut self, action: &Action) -> Result<StepOutcome> {
		let action = discrete_action(action, 3)?;
		let [theta1, theta2, dtheta1, dtheta2] = rk4(self.state, AVAIL_TORQUE[action], DT);
		self.state = [
			wrap(theta1),
			wrap(theta2),
			dtheta1.clamp(-MAX_VEL_1, MAX_VEL_1),
			dtheta2.clamp(-MAX_VEL_2, MAX_VEL_2),
		];

		let terminated = self.tip_above_bar();
		Ok(StepOutcome {
			observation: self.observation(),
			reward: if terminated { 0.0 } else { -1.0 },
			terminated,
			truncated: false,
			info: Info::new(),
		})
	}
}
