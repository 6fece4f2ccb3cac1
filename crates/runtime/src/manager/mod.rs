//! Per-handle serialized access to environment sessions.
//!
//! Operations on the same handle run one at a time in lock-acquisition
//! order; operations on different handles never block each other. Every
//! locked operation re-checks the slot after acquiring the lock, so a
//! `close` that won the race makes later operations report
//! [`SessionError::HandleNotFound`] instead of touching a released instance.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use gym::Env;
use gymrs_protocol::{Action, Options, ResetOutcome, Space, StepOutcome, TransitionTable};
use tracing::{debug, error, info, warn};

use crate::error::{Result, SessionError};
use crate::handle::Handle;
use crate::maker::EnvMaker;
use crate::table::HandleTable;


/// Owns the handle table for one family of environments.
pub struct SessionManager {
	table: HandleTable,
	maker: Arc<dyn EnvMaker>,
}

impl SessionManager {
	pub fn new(maker: impl EnvMaker + 'static) -> Self {
		Self::with_maker(Arc::new(maker))
	}

	/// Manager sharing `maker` with other managers.
	pub fn with_maker(maker: Arc<dyn EnvMaker>) -> Self {
		Self {
			table: HandleTable::new(),
			maker,
		}
	}

	/// Constructs an environment and registers it under a fresh handle.
	///
	/// Construction happens outside any lock; a failed construction leaves
	/// the table untouched.
	pub fn create(&self, env_type: &str, options: &Options) -> Result<Handle> {
		let made = catch_unwind(AssertUnwindSafe(|| self.maker.make(env_type, options)));
		let instance = match made {
			Ok(Ok(instance)) => instance,
			Ok(Err(source)) => {
				return Err(SessionError::InvalidConfiguration {
					env_type: env_type.to_string(),
					source,
				});
			}
			Err(payload) => {
				let reason = panic_message(payload.as_ref());
				error!(target = "gymrs.session", env_type, %reason, "environment constructor panicked");
				return Err(SessionError::InvalidConfiguration {
					env_type: env_type.to_string(),
					source: gym::Error::invalid_option(env_type, reason),
				});
			}
		};

		let handle = self.table.allocate(instance);
		info!(target = "gymrs.session", %handle, env_type, "created environment");
		Ok(handle)
	}

	pub async fn reset(&self, handle: &Handle, seed: Option<u64>, options: &Options) -> Result<ResetOutcome> {
		self.with_instance(handle, "reset", |env| env.reset(seed, options)).await
	}

	pub async fn step(&self, handle: &Handle, action: &Action) -> Result<StepOutcome> {
		self.with_instance(handle, "step", |env| env.step(action)).await
	}

	/// Closes and unregisters `handle`.
	///
	/// Waits for any in-flight operation on the handle. Returns `true` only
	/// for the call that actually released the instance; failures inside
	/// the instance's own `close` are logged and still count as closed.
	pub async fn close(&self, handle: &Handle) -> bool {
		let Some(lock) = self.table.lookup_lock(handle) else {
			return false;
		};
		let mut slot = lock.lock().await;
		let Some(mut instance) = slot.take() else {
			return false;
		};

		match catch_unwind(AssertUnwindSafe(|| instance.close())) {
			Ok(Ok(())) => {}
			Ok(Err(err)) => warn!(target = "gymrs.session", %handle, error = %err, "close failed"),
			Err(payload) => {
				error!(target = "gymrs.session", %handle, reason = %panic_message(payload.as_ref()), "close panicked")
			}
		}

		self.table.remove(handle);
		info!(target = "gymrs.session", %handle, "closed environment");
		true
	}

	/// Lock-free liveness check; may be stale by the time it is read.
	pub fn is_alive(&self, handle: &Handle) -> bool {
		self.table.contains(handle)
	}

	pub fn count(&self) -> usize {
		self.table.count()
	}

	pub fn handles(&self) -> Vec<Handle> {
		self.table.handles()
	}

	/// Action space captured when the instance was created.
	pub fn action_space(&self, handle: &Handle) -> Result<Space> {
		self.table
			.lookup(handle)
			.map(|session| session.action_space().clone())
			.ok_or_else(|| SessionError::not_found(handle))
	}

	/// Shared transition table, if the environment is tabular.
	///
	/// Read without the session lock; the table never changes after
	/// construction.
	pub fn dynamics(&self, handle: &Handle) -> Result<Option<Arc<TransitionTable>>> {
		self.table
			.lookup(handle)
			.map(|session| session.dynamics().cloned())
			.ok_or_else(|| SessionError::not_found(handle))
	}

	/// Closes every live session, returning how many were released.
	pub async fn close_all(&self) -> usize {
		let mut closed = 0;
		for handle in self.table.handles() {
			if self.close(&handle).await {
				closed += 1;
			}
		}
		debug!(target = "gymrs.session", closed, "closed all environments");
		closed
	}

	async fn with_instance<T>(
		&self,
		handle: &Handle,
		op: &'static str,
		f: impl FnOnce(&mut dyn Env) -> gym::Result<T>,
	) -> Result<T> {
		let lock = self.table.lookup_lock(handle).ok_or_else(|| SessionError::not_found(handle))?;
		let mut slot = lock.lock().await;
		let instance = slot.as_mut().ok_or_else(|| SessionError::not_found(handle))?;

		match catch_unwind(AssertUnwindSafe(|| f(&mut **instance))) {
			Ok(Ok(value)) => Ok(value),
			Ok(Err(gym::Error::InvalidAction { action, space })) => Err(SessionError::InvalidAction { action, space }),
			Ok(Err(err)) => {
				warn!(target = "gymrs.session", %handle, op, error = %err, "environment fault");
				Err(SessionError::not_ready(handle, err.to_string()))
			}
			Err(payload) => {
				let reason = panic_message(payload.as_ref());
				error!(target = "gymrs.session", %handle, op, %reason, "environment panicked");
				Err(SessionError::not_ready(handle, format!("{op} panicked: {reason}")))
			}
		}
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"unknown panic".to_string()
	}
}
