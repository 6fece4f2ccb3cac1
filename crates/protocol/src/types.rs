//! Core value types used across the wire.
//!
//! Observations, actions and spaces are deliberately untyped beyond the two
//! shapes the built-in environments need: integer indices for tabular
//! environments and flat float vectors for physics environments.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Auxiliary per-transition payload (`info` in the Gymnasium contract).
pub type Info = Map<String, Value>;

/// Environment construction or reset options, as a JSON object.
pub type Options = Map<String, Value>;

/// Observation emitted by `reset` and `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Observation {
    /// Index of a discrete state.
    Discrete(i64),
    /// Flat vector of continuous features.
    Vector(Vec<f64>),
}

impl Observation {
    /// Returns the state index for discrete observations.
    pub fn as_discrete(&self) -> Option<i64> {
        match self {
            Observation::Discrete(state) => Some(*state),
            Observation::Vector(_) => None,
        }
    }

    /// Returns the feature vector for continuous observations.
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Observation::Discrete(_) => None,
            Observation::Vector(values) => Some(values),
        }
    }
}

/// Action submitted to `step`.
///
/// JSON integers decode as [`Action::Discrete`], any other number as
/// [`Action::Continuous`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Action {
    /// Member of a discrete action set.
    Discrete(i64),
    /// Scalar continuous control (e.g. torque).
    Continuous(f64),
}

impl Action {
    /// Returns the action index if the action is integral.
    pub fn as_discrete(&self) -> Option<i64> {
        match self {
            Action::Discrete(value) => Some(*value),
            Action::Continuous(_) => None,
        }
    }

    /// Returns the action as a float; integral actions are widened.
    pub fn as_f64(&self) -> f64 {
        match self {
            Action::Discrete(value) => *value as f64,
            Action::Continuous(value) => *value,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Discrete(value) => write!(f, "{value}"),
            Action::Continuous(value) => write!(f, "{value}"),
        }
    }
}

/// Declared action or observation space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Space {
    /// Integers `0..n`.
    Discrete {
        /// Number of members.
        n: u32,
    },
    /// Axis-aligned box with inclusive bounds per dimension.
    Box {
        /// Lower bound per dimension.
        low: Vec<f64>,
        /// Upper bound per dimension.
        high: Vec<f64>,
    },
}

impl Space {
    /// Creates a discrete space with `n` members.
    pub fn discrete(n: u32) -> Self {
        Space::Discrete { n }
    }

    /// Creates a box space from per-dimension bounds.
    pub fn bounded(low: Vec<f64>, high: Vec<f64>) -> Self {
        Space::Box { low, high }
    }

    /// Returns `true` if `action` lies inside this space.
    ///
    /// Discrete spaces accept integral actions in `0..n`. Box spaces accept
    /// any finite scalar inside the bounds of the first dimension.
    pub fn contains(&self, action: &Action) -> bool {
        match self {
            Space::Discrete { n } => action
                .as_discrete()
                .is_some_and(|value| (0..i64::from(*n)).contains(&value)),
            Space::Box { low, high } => {
                let value = action.as_f64();
                match (low.first(), high.first()) {
                    (Some(lo), Some(hi)) => value.is_finite() && *lo <= value && value <= *hi,
                    _ => false,
                }
            }
        }
    }

    /// Number of discrete members, if discrete.
    pub fn n(&self) -> Option<u32> {
        match self {
            Space::Discrete { n } => Some(*n),
            Space::Box { .. } => None,
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Space::Discrete { n } => {
                let members: Vec<String> = (0..*n).map(|i| i.to_string()).collect();
                write!(f, "[{}]", members.join(", "))
            }
            Space::Box { low, high } => match (low.first(), high.first()) {
                (Some(lo), Some(hi)) => write!(f, "[{lo:?}, {hi:?}]"),
                _ => write!(f, "[]"),
            },
        }
    }
}
