//! Session registry for environment instances.
//!
//! [`HandleTable`] maps opaque [`Handle`]s to live instances and
//! [`SessionManager`] serializes every operation on one handle while letting
//! distinct handles proceed in parallel.

pub mod error;
pub mod handle;
pub mod maker;
pub mod manager;
pub mod table;

pub use error::{Result, SessionError, check_action};
pub use handle::Handle;
pub use maker::EnvMaker;
pub use manager::SessionManager;
pub use table::{HandleTable, Session, SessionLock};
