use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Opaque identifier of one environment session.
///
/// Handles are 128-bit random values generated by the table; clients never
/// choose them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(Uuid);

impl Handle {
	pub(crate) fn generate() -> Self {
		Self(Uuid::new_v4())
	}
}

impl fmt::Display for Handle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.hyphenated())
	}
}

impl FromStr for Handle {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Uuid::parse_str(s).map(Self)
	}
}
