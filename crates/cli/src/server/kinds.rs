//! Catalog of the environment families served over HTTP.

use std::collections::BTreeMap;

use gymrs_protocol::{Options, Space};
use serde_json::{Value, json};

/// Describes one environment family and where it is mounted.
#[derive(Debug)]
pub struct EnvKind {
	/// Route group, e.g. `/gymnasium`.
	pub prefix: &'static str,
	/// Path segment under the prefix, e.g. `frozen-lake-env`.
	pub slug: &'static str,
	/// Id stem; `make` builds `<name>-<version>`.
	pub name: &'static str,
	pub default_version: &'static str,
	default_options: fn() -> Value,
	action_space: fn() -> Space,
	/// Human-readable action names indexed by action id.
	pub actions: &'static [&'static str],
}

impl EnvKind {
	pub fn path(&self) -> String {
		format!("{}/{}", self.prefix, self.slug)
	}

	pub fn env_id(&self, version: Option<&str>) -> String {
		format!("{}-{}", self.name, version.unwrap_or(self.default_version))
	}

	pub fn action_space(&self) -> Space {
		(self.action_space)()
	}

	pub fn action_labels(&self) -> BTreeMap<u32, String> {
		(0u32..).zip(self.actions.iter().map(|label| label.to_string())).collect()
	}

	/// Default options overlaid key by key with the caller's.
	pub fn options(&self, overrides: Option<Options>) -> Options {
		let mut options = match (self.default_options)() {
			Value::Object(map) => map,
			_ => Options::new(),
		};
		options.extend(overrides.unwrap_or_default());
		options
	}
}

fn discrete<const N: u32>() -> Space {
	Space::discrete(N)
}

fn torque() -> Space {
	Space::bounded(vec![-2.0], vec![2.0])
}

pub static KINDS: &[EnvKind] = &[
	EnvKind {
		prefix: "/gdrl",
		slug: "gym-walk-env",
		name: "GymWalkEnv",
		default_version: "v1",
		default_options: || json!({"n_states": 7, "p_stay": 0.0, "p_backward": 0.5}),
		action_space: discrete::<2>,
		actions: &["WEST", "EAST"],
	},
	EnvKind {
		prefix: "/gymnasium",
		slug: "frozen-lake-env",
		name: "FrozenLake",
		default_version: "v1",
		default_options: || json!({"map_name": "4x4", "is_slippery": true, "max_episode_steps": 500}),
		action_space: discrete::<4>,
		actions: &["LEFT", "DOWN", "RIGHT", "UP"],
	},
	EnvKind {
		prefix: "/gymnasium",
		slug: "cliff-walking-env",
		name: "CliffWalking",
		default_version: "v1",
		default_options: || json!({"max_episode_steps": 500}),
		action_space: discrete::<4>,
		actions: &["UP", "RIGHT", "DOWN", "LEFT"],
	},
	EnvKind {
		prefix: "/gymnasium",
		slug: "taxi-env",
		name: "Taxi",
		default_version: "v3",
		default_options: || json!({"max_episode_steps": 500}),
		action_space: discrete::<6>,
		actions: &["South", "North", "East", "West", "Pickup", "Dropoff"],
	},
	EnvKind {
		prefix: "/gymnasium",
		slug: "cart-pole-env",
		name: "CartPole",
		default_version: "v1",
		default_options: || json!({}),
		action_space: discrete::<2>,
		actions: &["Push cart to the left", "Push cart to the right"],
	},
	EnvKind {
		prefix: "/gymnasium",
		slug: "mountain-car-env",
		name: "MountainCar",
		default_version: "v0",
		default_options: || json!({"max_episode_steps": 200}),
		action_space: discrete::<3>,
		actions: &["Accelerate to the left", "Don't accelerate", "Accelerate to the right"],
	},
	EnvKind {
		prefix: "/gymnasium",
		slug: "pendulum-env",
		name: "Pendulum",
		default_version: "v1",
		default_options: || json!({"g": 10.0, "max_episode_steps": 200}),
		action_space: torque,
		actions: &[],
	},
	EnvKind {
		prefix: "/gymnasium",
		slug: "acrobot-env",
		name: "Acrobot",
		default_version: "v1",
		default_options: || json!({"max_episode_steps": 200}),
		action_space: discrete::<3>,
		actions: &[
			"apply -1 torque to the actuated joint",
			"apply 0 torque to the actuated joint",
			"apply 1 torque to the actuated joint",
		],
	},
	EnvKind {
		prefix: "/gymnasium",
		slug: "black-jack-env",
		name: "Blackjack",
		default_version: "v1",
		default_options: || json!({"natural": false, "sab": false}),
		action_space: discrete::<2>,
		actions: &["STICK", "HIT"],
	},
];

/// Default-version ids of every served kind.
pub fn env_ids() -> Vec<String> {
	KINDS.iter().map(|kind| kind.env_id(None)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn kind(slug: &str) -> &'static EnvKind {
		KINDS.iter().find(|kind| kind.slug == slug).unwrap()
	}

	#[test]
	fn caller_options_win_key_by_key() {
		let mut overrides = Options::new();
		overrides.insert("p_stay".into(), json!(0.25));
		overrides.insert("extra".into(), json!(true));

		let options = kind("gym-walk-env").options(Some(overrides));
		assert_eq!(options["n_states"], 7);
		assert_eq!(options["p_stay"], 0.25);
		assert_eq!(options["p_backward"], 0.5);
		assert_eq!(options["extra"], true);
	}

	#[test]
	fn env_id_uses_default_version() {
		let taxi = kind("taxi-env");
		assert_eq!(taxi.env_id(None), "Taxi-v3");
		assert_eq!(kind("cliff-walking-env").env_id(Some("v0")), "CliffWalking-v0");
		assert_eq!(taxi.path(), "/gymnasium/taxi-env");
	}

	#[test]
	fn labels_cover_discrete_space() {
		for kind in KINDS {
			if let Some(n) = kind.action_space().n() {
				assert_eq!(kind.actions.len(), n as usize, "{}", kind.slug);
			}
		}
		assert_eq!(kind("gym-walk-env").action_labels()[&1], "EAST");
	}

	#[test]
	fn default_ids_are_constructible() {
		let registry = gym::Registry::builtin();
		for kind in KINDS {
			let id = kind.env_id(None);
			assert!(registry.make(&id, &kind.options(None)).is_ok(), "{id}");
		}
	}
}
