use gym::{Env, Registry};
use gymrs_protocol::Options;

/// Constructs environment instances for the session manager.
///
/// This is the only path by which the runtime reaches the environment
/// library's constructors.
pub trait EnvMaker: Send + Sync {
	fn make(&self, env_type: &str, options: &Options) -> gym::Result<Box<dyn Env>>;
}

impl EnvMaker for Registry {
	fn make(&self, env_type: &str, options: &Options) -> gym::Result<Box<dyn Env>> {
		Registry::make(self, env_type, options)
	}
}
