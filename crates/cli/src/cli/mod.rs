
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::ServerConfig;

/// Root CLI for the gymrs environment server.
#[derive(Parser, Debug)]
#[command(name = "gymrs")]
#[command(about = "Serve reinforcement-learning environments over HTTP")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run the HTTP server until interrupted.
	Serve(ServerArgs),
	/// Print the served environment ids as JSON.
	Envs,
	/// Print the effective server configuration as JSON.
	Config(ServerArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServerArgs {
	/// JSON configuration file; absent fields keep their defaults.
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Address to bind (overrides the config file).
	#[arg(long, value_name = "HOST")]
	pub host: Option<String>,

	/// Port to bind (overrides the config file).
	#[arg(short, long, value_name = "PORT")]
	pub port: Option<u16>,
}

impl ServerArgs {
	pub fn resolve(&self) -> Result<ServerConfig> {
		Ok(ServerConfig::load(self.config.as_deref())?.with_overrides(self.host.clone(), self.port))
	}
}
