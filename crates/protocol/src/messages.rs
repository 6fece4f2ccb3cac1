//! HTTP request and response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::time_step::TimeStep;
use crate::types::{Action, Options, Space};

/// Seed used by `reset` when the caller does not provide one.
pub const DEFAULT_RESET_SEED: u64 = 42;

/// Body of `POST .../make`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MakeEnvRequest {
    /// Environment version, e.g. `v1`. Falls back to the kind's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Overrides merged over the kind's default options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
}

/// Response of `POST .../make`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakeEnvResponse {
    /// Handle of the newly created environment.
    pub idx: String,
    pub message: String,
}

/// Body of `POST .../{idx}/reset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetRequest {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
}

impl Default for ResetRequest {
    fn default() -> Self {
        Self {
            seed: DEFAULT_RESET_SEED,
            options: None,
        }
    }
}

fn default_seed() -> u64 {
    DEFAULT_RESET_SEED
}

/// Body of `POST .../{idx}/step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRequest {
    pub action: Action,
}

/// Query of `GET .../{idx}/dynamics`.
///
/// A missing or negative `action_id` selects every action of the state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicsQuery {
    #[serde(alias = "stateId")]
    pub state_id: i64,
    #[serde(default, alias = "actionId")]
    pub action_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStepResponse {
    pub time_step: TimeStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self {
            message: "OK".to_string(),
        }
    }

    pub fn failed() -> Self {
        Self {
            message: "FAILED".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsAliveResponse {
    pub result: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopiesResponse {
    pub copies: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpaceResponse {
    pub action_space: Space,
    /// Human-readable meaning of each discrete action.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<u32, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicsResponse {
    pub dynamics: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvsResponse {
    pub envs: Vec<String>,
}

/// Structured error body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
