use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gymrs_protocol::ErrorBody;
use gymrs_runtime::SessionError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure of one HTTP request. Every variant is a client error.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error(transparent)]
	Session(#[from] SessionError),

	#[error("Environment {env} does not expose dynamics")]
	DynamicsUnavailable { env: &'static str },

	#[error("State {state} should be in [0, {n_states})")]
	StateOutOfRange { state: i64, n_states: usize },

	#[error("Action {action} should be in [0, {n_actions})")]
	ActionOutOfRange { action: i64, n_actions: usize },

	#[error("Malformed request body: {0}")]
	Body(#[from] serde_json::Error),

	#[error("Malformed query: {0}")]
	Query(String),
}

impl ApiError {
	pub fn code(&self) -> &'static str {
		match self {
			ApiError::Session(err) => err.code(),
			ApiError::DynamicsUnavailable { .. } => "dynamics_unavailable",
			ApiError::StateOutOfRange { .. } | ApiError::ActionOutOfRange { .. } => "out_of_range",
			ApiError::Body(_) | ApiError::Query(_) => "bad_request",
		}
	}

	pub fn to_error_body(&self) -> ErrorBody {
		let (message, details) = match self {
			ApiError::Session(SessionError::HandleNotFound(idx)) => (
				format!("Environment {idx} is NOT_ALIVE/NOT_CREATED. Call make/reset"),
				Some(json!({ "idx": idx })),
			),
			ApiError::Session(SessionError::InvalidAction { action, space }) => {
				(self.to_string(), Some(json!({ "action": action, "valid": space })))
			}
			ApiError::Session(SessionError::EnvironmentNotReady { handle, reason }) => (
				format!("Environment {handle} is not initialized. Have you called make()?"),
				Some(json!({ "idx": handle, "reason": reason })),
			),
			ApiError::Session(SessionError::InvalidConfiguration { env_type, .. }) => {
				(self.to_string(), Some(json!({ "env_type": env_type })))
			}
			ApiError::DynamicsUnavailable { env } => (self.to_string(), Some(json!({ "env": env }))),
			ApiError::StateOutOfRange { state, .. } => (self.to_string(), Some(json!({ "state_id": state }))),
			ApiError::ActionOutOfRange { action, .. } => (self.to_string(), Some(json!({ "action_id": action }))),
			ApiError::Body(_) | ApiError::Query(_) => (self.to_string(), None),
		};
		ErrorBody {
			code: self.code().to_string(),
			message,
			details,
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(StatusCode::BAD_REQUEST, Json(self.to_error_body())).into_response()
	}
}
