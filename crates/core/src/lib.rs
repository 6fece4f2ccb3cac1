//! gymrs environment library.
//!
//! Stateful simulation environments behind one uniform contract:
//!
//! - [`Registry::make`] constructs an environment from an id such as
//!   `CartPole-v1` and a JSON options object.
//! - [`Env::reset`] starts an episode, [`Env::step`] advances it and
//!   [`Env::close`] releases the instance.
//! - Tabular environments additionally expose their transition table through
//!   [`Env::dynamics`].
//!
//! # Example
//!
//! ```ignore
//! use gym::{Env, Registry};
//! use gymrs_protocol::{Action, Options};
//!
//! let registry = Registry::builtin();
//! let mut env = registry.make("GymWalkEnv-v1", &Options::new())?;
//! let reset = env.reset(Some(42), &Options::new())?;
//! let step = env.step(&Action::Discrete(1))?;
//! env.close()?;
//! ```

pub mod env;
pub mod envs;
pub mod error;
pub mod registry;
pub mod tabular;
pub mod wrappers;

pub use env::{Env, parse_options};
pub use error::{Error, Result};
pub use registry::{EnvSpec, MAX_EPISODE_STEPS, Registry};
pub use tabular::TabularEnv;
pub use wrappers::{OrderEnforcing, TimeLimit};
