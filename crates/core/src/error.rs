//! Error types for the environment library.

use gymrs_protocol::{Action, Space};
use thiserror::Error;

/// Result type alias for environment operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by environment constructors and instances.
#[derive(Debug, Error)]
pub enum Error {
	/// No environment is registered under the requested id.
	#[error("Unknown environment id: {0}")]
	UnknownEnv(String),

	/// An id was registered twice.
	#[error("Environment id already registered: {0}")]
	AlreadyRegistered(String),

	/// Construction options were rejected.
	#[error("Invalid option for {env}: {reason}")]
	InvalidOption { env: String, reason: String },

	/// Action outside the declared action space.
	#[error("Action {action} not in {space}")]
	InvalidAction { action: Action, space: Space },

	/// `step` was called before the first `reset`.
	#[error("Cannot call step() on {0} before reset()")]
	ResetNeeded(String),

	/// The instance was closed and its resources released.
	#[error("Environment {0} is closed")]
	Closed(String),
}

impl Error {
	pub fn invalid_option(env: &str, reason: impl Into<String>) -> Self {
		Error::InvalidOption {
			env: env.to_string(),
			reason: reason.into(),
		}
	}
}
