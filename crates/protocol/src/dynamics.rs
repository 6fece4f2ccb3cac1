//! Transition-probability tables of tabular environments.

use serde::{Deserialize, Serialize};

/// One possible outcome of taking an action in a state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub prob: f64,
    pub next_state: usize,
    pub reward: f64,
    pub terminated: bool,
}

impl Transition {
    pub fn new(prob: f64, next_state: usize, reward: f64, terminated: bool) -> Self {
        Self {
            prob,
            next_state,
            reward,
            terminated,
        }
    }
}

/// `P[state][action] -> [Transition]` for an environment with finite
/// states and actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionTable {
    states: Vec<Vec<Vec<Transition>>>,
}

impl TransitionTable {
    /// Wraps a fully built table. Every state must list the same number of actions.
    pub fn new(states: Vec<Vec<Vec<Transition>>>) -> Self {
        debug_assert!(
            states.windows(2).all(|w| w[0].len() == w[1].len()),
            "ragged transition table"
        );
        Self { states }
    }

    pub fn n_states(&self) -> usize {
        self.states.len()
    }

    pub fn n_actions(&self) -> usize {
        self.states.first().map_or(0, Vec::len)
    }

    /// All actions' outcomes for `state`.
    pub fn state(&self, state: usize) -> Option<&[Vec<Transition>]> {
        self.states.get(state).map(Vec::as_slice)
    }

    /// Outcomes of `action` taken in `state`.
    pub fn get(&self, state: usize, action: usize) -> Option<&[Transition]> {
        self.states.get(state)?.get(action).map(Vec::as_slice)
    }
}
