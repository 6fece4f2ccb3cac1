use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Directives used when `RUST_LOG` is unset.
fn default_directives(verbosity: u8) -> &'static str {
	match verbosity {
		// lifecycle and request logs plus warnings
		0 => "warn,gymrs.server=info,gymrs.api=info",
		// adds session lifecycle
		1 => "info",
		_ => "debug",
	}
}

/// Installs the global subscriber writing compact lines to stderr.
pub fn init_logging(verbosity: u8) {
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));
	let ansi = std::io::stderr().is_terminal();

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr.with_max_level(tracing::Level::TRACE))
		.with_ansi(ansi)
		.with_target(true)
		.compact()
		.init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn directives_parse_at_every_level() {
		for verbosity in 0..=3 {
			let directives = default_directives(verbosity);
			assert!(EnvFilter::try_new(directives).is_ok(), "{directives}");
		}
	}
}
