//! Built-in environments.

pub mod acrobot;
pub mod blackjack;
pub mod cart_pole;
pub mod cliff_walking;
pub mod frozen_lake;
pub mod mountain_car;
pub mod pendulum;
pub mod taxi;
pub mod walk;

pub use acrobot::Acrobot;
pub use blackjack::Blackjack;
pub use cart_pole::CartPole;
pub use mountain_car::MountainCar;
pub use pendulum::Pendulum;
