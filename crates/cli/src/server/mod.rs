//! HTTP surface: one router per environment kind plus service routes.

pub mod kinds;
pub mod routes;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Json;
use axum::Router;
use axum::routing::get;
use gym::Registry;
use gymrs_protocol::EnvsResponse;
use gymrs_runtime::{EnvMaker, SessionManager};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;
use kinds::{EnvKind, KINDS};

/// Session managers for every served kind, one each.
pub struct Services {
	managers: Vec<(&'static EnvKind, Arc<SessionManager>)>,
}

impl Services {
	pub fn new(maker: Arc<dyn EnvMaker>) -> Self {
		let managers = KINDS
			.iter()
			.map(|kind| (kind, Arc::new(SessionManager::with_maker(maker.clone()))))
			.collect();
		Self { managers }
	}

	pub fn builtin() -> Self {
		Self::new(Arc::new(Registry::builtin()))
	}

	pub fn router(&self, log_info: bool) -> Router {
		let master = Router::new().route("/envs", get(|| async { Json(EnvsResponse { envs: kinds::env_ids() }) }));

		self.managers.iter().fold(
			Router::new()
				.route("/health", get(|| async { "ok" }))
				.nest("/master-client", master),
			|app, (kind, manager)| app.nest(&kind.path(), routes::router(*kind, manager.clone(), log_info)),
		)
	}

	/// Closes every live session of every kind.
	pub async fn close_all(&self) -> usize {
		let mut closed = 0;
		for (kind, manager) in &self.managers {
			let n = manager.close_all().await;
			if n > 0 {
				info!(target = "gymrs.server", env = kind.name, closed = n, "closed sessions");
			}
			closed += n;
		}
		closed
	}
}

/// Serves until Ctrl+C or SIGTERM, then closes every session.
pub async fn serve(config: ServerConfig) -> Result<()> {
	let services = Services::builtin();
	let app = services.router(config.log_info);

	let addr = config.address();
	let listener = TcpListener::bind(&addr)
		.await
		.with_context(|| format!("Failed to bind {addr}"))?;
	info!(
		target = "gymrs.server",
		title = %config.title,
		addr = %listener.local_addr().context("Failed to read bound address")?,
		"listening"
	);

	axum::serve(listener, app.into_make_service())
		.with_graceful_shutdown(shutdown_signal())
		.await
		.context("HTTP server failed")?;

	let closed = services.close_all().await;
	info!(target = "gymrs.server", closed, "shutdown complete");
	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			warn!(target = "gymrs.server", error = %err, "failed to listen for Ctrl+C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		use tokio::signal::unix::{SignalKind, signal};
		match signal(SignalKind::terminate()) {
			Ok(mut sigterm) => {
				sigterm.recv().await;
			}
			Err(err) => {
				warn!(target = "gymrs.server", error = %err, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			}
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => info!(target = "gymrs.server", "received SIGINT"),
		_ = terminate => info!(target = "gymrs.server", "received SIGTERM"),
	}
}
