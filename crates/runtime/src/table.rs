//! Concurrent mapping from handles to live environment sessions.
//!
//! Uses [`DashMap`] so lookups on unrelated handles never contend. Each
//! entry carries its own [`tokio::sync::Mutex`], created together with the
//! handle, that serializes operations on that one instance.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use gym::Env;
use gymrs_protocol::{Space, TransitionTable};
use tokio::sync::Mutex;

use crate::handle::Handle;

/// Instance slot guarded by a session lock. `None` once closed.
pub type Slot = Option<Box<dyn Env>>;

/// Per-handle exclusion lock around the instance slot.
pub type SessionLock = Arc<Mutex<Slot>>;

/// One live session.
///
/// Metadata captured at creation is immutable and readable without taking
/// the lock.
pub struct Session {
	env_id: String,
	action_space: Space,
	dynamics: Option<Arc<TransitionTable>>,
	lock: SessionLock,
}

impl Session {
	fn new(instance: Box<dyn Env>) -> Self {
		Self {
			env_id: instance.id().to_string(),
			action_space: instance.action_space(),
			dynamics: instance.dynamics(),
			lock: Arc::new(Mutex::new(Some(instance))),
		}
	}

	pub fn env_id(&self) -> &str {
		&self.env_id
	}

	pub fn action_space(&self) -> &Space {
		&self.action_space
	}

	pub fn dynamics(&self) -> Option<&Arc<TransitionTable>> {
		self.dynamics.as_ref()
	}

	pub fn lock(&self) -> &SessionLock {
		&self.lock
	}
}

/// Thread-safe registry of live sessions by handle.
#[derive(Default)]
pub struct HandleTable {
	sessions: DashMap<Handle, Arc<Session>>,
}

impl HandleTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `instance` under a fresh handle and returns it.
	///
	/// The session lock is inserted in the same step, so no caller can ever
	/// observe the handle without it.
	pub fn allocate(&self, instance: Box<dyn Env>) -> Handle {
		let session = Arc::new(Session::new(instance));
		loop {
			match self.sessions.entry(Handle::generate()) {
				Entry::Vacant(slot) => {
					let handle = *slot.key();
					slot.insert(session);
					return handle;
				}
				Entry::Occupied(_) => continue,
			}
		}
	}

	pub fn lookup(&self, handle: &Handle) -> Option<Arc<Session>> {
		self.sessions.get(handle).map(|r| r.value().clone())
	}

	/// The session lock for `handle`, cloned out so no map guard is held
	/// while the caller awaits it.
	pub fn lookup_lock(&self, handle: &Handle) -> Option<SessionLock> {
		self.sessions.get(handle).map(|r| r.value().lock.clone())
	}

	pub fn remove(&self, handle: &Handle) -> Option<Arc<Session>> {
		self.sessions.remove(handle).map(|(_, session)| session)
	}

	pub fn contains(&self, handle: &Handle) -> bool {
		self.sessions.contains_key(handle)
	}

	/// Snapshot; may be stale under concurrent mutation.
	pub fn count(&self) -> usize {
		self.sessions.len()
	}

	pub fn handles(&self) -> Vec<Handle> {
		self.sessions.iter().map(|r| *r.key()).collect()
	}
}
