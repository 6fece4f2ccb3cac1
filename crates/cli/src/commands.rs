use anyhow::{Context, Result};
use gymrs_protocol::EnvsResponse;

use crate::cli::{Cli, Commands};
use crate::server::{self, kinds};

pub async fn dispatch(cli: Cli) -> Result<()> {
	match cli.command {
		Commands::Serve(args) => server::serve(args.resolve()?).await,
		Commands::Envs => print_json(&EnvsResponse { envs: kinds::env_ids() }),
		Commands::Config(args) => print_json(&args.resolve()?),
	}
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
	println!("{text}");
	Ok(())
}
