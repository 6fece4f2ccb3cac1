//! Wire types for the gymrs environment service.
//!
//! This crate contains the serde-serializable types exchanged between
//! simulation environments, the session runtime, and HTTP clients. They
//! represent the "protocol layer": the shapes of data as they appear on
//! the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization and small accessors
//! - **Environment agnostic**: Observations, actions and spaces cover every
//!   built-in environment without per-environment types
//! - **Stable**: Changes only when the HTTP contract changes

pub mod dynamics;
pub mod messages;
pub mod time_step;
pub mod types;

pub use dynamics::*;
pub use messages::*;
pub use time_step::*;
pub use types::*;
