//! Server configuration: defaults, optional JSON file, CLI overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Effective settings of one server process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
	/// Name reported at startup.
	pub title: String,
	pub host: String,
	pub port: u16,
	/// Emit an info log for every served request.
	pub log_info: bool,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			title: "gymrs-rest-api".to_string(),
			host: "127.0.0.1".to_string(),
			port: 8001,
			log_info: true,
		}
	}
}

impl ServerConfig {
	/// Reads `path`, falling back to defaults for absent fields. With no
	/// path the defaults are returned unchanged.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let Some(path) = path else {
			return Ok(Self::default());
		};
		let raw = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		serde_json::from_str(&raw).with_context(|| format!("Invalid config file: {}", path.display()))
	}

	pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
		if let Some(host) = host {
			self.host = host;
		}
		if let Some(port) = port {
			self.port = port;
		}
		self
	}

	pub fn address(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}
}
