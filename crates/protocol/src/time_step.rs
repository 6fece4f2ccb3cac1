//! Transition payloads returned by `reset` and `step`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Info, Observation};

/// Result of resetting an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetOutcome {
    pub observation: Observation,
    #[serde(default)]
    pub info: Info,
}

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    /// Episode reached a terminal state.
    pub terminated: bool,
    /// Episode was cut short (e.g. by a step limit).
    pub truncated: bool,
    #[serde(default)]
    pub info: Info,
}

/// Position of a transition within its episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepType {
    /// First transition after a reset.
    First,
    /// Ongoing transition.
    Mid,
    /// Terminal transition.
    Last,
}

/// Client-facing transition record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStep {
    pub observation: Observation,
    pub reward: f64,
    pub step_type: StepType,
    #[serde(default)]
    pub info: Info,
    pub discount: f64,
}

impl TimeStep {
    /// Builds the `FIRST` transition of an episode: zero reward, unit discount.
    pub fn first(reset: ResetOutcome) -> Self {
        Self {
            observation: reset.observation,
            reward: 0.0,
            step_type: StepType::First,
            info: reset.info,
            discount: 1.0,
        }
    }

    /// Builds a `MID` or `LAST` transition from a step.
    ///
    /// Only `terminated` ends the episode; `truncated` is reported through
    /// `info.truncated`.
    pub fn transition(step: StepOutcome) -> Self {
        let step_type = if step.terminated { StepType::Last } else { StepType::Mid };
        let mut info = step.info;
        info.insert("truncated".to_string(), Value::Bool(step.truncated));
        Self {
            observation: step.observation,
            reward: step.reward,
            step_type,
            info,
            discount: 1.0,
        }
    }
}

impl From<ResetOutcome> for TimeStep {
    fn from(reset: ResetOutcome) -> Self {
        TimeStep::first(reset)
    }
}

impl From<StepOutcome> for TimeStep {
    fn from(step: StepOutcome) -> Self {
        TimeStep::transition(step)
    }
}
