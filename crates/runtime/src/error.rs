//! Outcomes surfaced by the session manager.

use gymrs_protocol::{Action, Space};
use thiserror::Error;

use crate::handle::Handle;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Every failure a session operation can report.
///
/// None of these are retried by the runtime.
#[derive(Debug, Error)]
pub enum SessionError {
	/// The environment library rejected the construction parameters.
	#[error("Invalid configuration for {env_type}: {source}")]
	InvalidConfiguration {
		env_type: String,
		#[source]
		source: gym::Error,
	},

	/// The handle was never created or has been closed.
	#[error("Environment {0} is not alive or was never created")]
	HandleNotFound(String),

	/// Action outside the declared action space.
	#[error("Action {action} not in {space}")]
	InvalidAction { action: Action, space: Space },

	/// The instance exists but faulted during `reset` or `step`.
	#[error("Environment {handle} is not ready: {reason}")]
	EnvironmentNotReady { handle: String, reason: String },
}

impl SessionError {
	pub fn not_found(handle: &Handle) -> Self {
		SessionError::HandleNotFound(handle.to_string())
	}

	pub fn not_ready(handle: &Handle, reason: impl Into<String>) -> Self {
		SessionError::EnvironmentNotReady {
			handle: handle.to_string(),
			reason: reason.into(),
		}
	}

	/// Stable snake_case identifier for the error kind.
	pub fn code(&self) -> &'static str {
		match self {
			SessionError::InvalidConfiguration { .. } => "invalid_configuration",
			SessionError::HandleNotFound(_) => "handle_not_found",
			SessionError::InvalidAction { .. } => "invalid_action",
			SessionError::EnvironmentNotReady { .. } => "environment_not_ready",
		}
	}
}

/// Validates `action` against a declared action space.
///
/// Membership for discrete spaces, inclusive range for box spaces.
pub fn check_action(space: &Space, action: &Action) -> Result<()> {
	if space.contains(action) {
		Ok(())
	} else {
		Err(SessionError::InvalidAction {
			action: *action,
			space: space.clone(),
		})
	}
}
