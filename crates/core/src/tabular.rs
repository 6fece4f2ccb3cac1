//! Transition-table engine shared by the toy-text environments.
//!
//! A tabular environment is fully described by `P[state][action]` and an
//! initial-state distribution; stepping samples one outcome by probability.

use std::sync::Arc;

use gymrs_protocol::{
	Action, Observation, Options, ResetOutcome, Space, StepOutcome, Transition, TransitionTable,
};
use rand::rngs::StdRng;

use crate::env::{Env, categorical_sample, discrete_action, prob_info, seeded_rng};
use crate::error::Result;

/// Largest state count a tabular environment may be built with.
pub const MAX_STATES: usize = 1_000_000;

pub struct TabularEnv {
	id: &'static str,
	table: Arc<TransitionTable>,
	initial: Vec<f64>,
	state: usize,
	rng: StdRng,
}

impl TabularEnv {
	/// `initial` is the start-state distribution, one weight per state.
	pub fn new(id: &'static str, table: TransitionTable, initial: Vec<f64>) -> Self {
		debug_assert_eq!(table.n_states(), initial.len());
		let mut rng = seeded_rng(None);
		let state = categorical_sample(&initial, &mut rng);
		Self {
			id,
			table: Arc::new(table),
			initial,
			state,
			rng,
		}
	}

	/// Reports `id` instead of the id given at construction.
	pub fn with_id(mut self, id: &'static str) -> Self {
		self.id = id;
		self
	}

	pub fn state(&self) -> usize {
		self.state
	}

	pub fn table(&self) -> &TransitionTable {
		&self.table
	}
}

impl Env for TabularEnv {
	fn id(&self) -> &str {
		self.id
	}

	fn action_space(&self) -> Space {
		Space::discrete(self.table.n_actions() as u32)
	}

	fn observation_space(&self) -> Space {
		Space::discrete(self.table.n_states() as u32)
	}

	fn reset(&mut self, seed: Option<u64>, _options: &Options) -> Result<ResetOutcome> {
		if seed.is_some() {
			self.rng = seeded_rng(seed);
		}
		self.state = categorical_sample(&self.initial, &mut self.rng);
		Ok(ResetOutcome {
			observation: Observation::Discrete(self.state as i64),
			info: prob_info(1.0),
		})
	}

	fn step(&mut self, action: &Action) -> Result<StepOutcome> {
		let action = discrete_action(action, self.table.n_actions() as u32)?;
		let outcomes = self.table.get(self.state, action).unwrap_or_default();
		let probs: Vec<f64> = outcomes.iter().map(|t| t.prob).collect();
		let Transition {
			prob,
			next_state,
			reward,
			terminated,
		} = outcomes[categorical_sample(&probs, &mut self.rng)];

		self.state = next_state;
		Ok(StepOutcome {
			observation: Observation::Discrete(next_state as i64),
			reward,
			terminated,
			truncated: false,
			info: prob_info(prob),
		})
	}

	fn dynamics(&self) -> Option<Arc<TransitionTable>> {
		Some(Arc::clone(&self.table))
	}
}

/// Start distribution concentrated on a single state.
pub(crate) fn point_mass(n_states: usize, state: usize) -> Vec<f64> {
	let mut initial = vec![0.0; n_states];
	initial[state] = 1.0;
	initial
}
