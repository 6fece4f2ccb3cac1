//! Blackjack against a dealer who hits below 17, drawn from an infinite deck.
//!
//! Observations are `[player_sum, dealer_showing, usable_ace]`. Action `0`
//! sticks and ends the round; action `1` hits and ends it only on a bust.

use gymrs_protocol::{Action, Info, Observation, Options, ResetOutcome, Space, StepOutcome};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Deserialize;

use crate::env::{Env, discrete_action, parse_options, seeded_rng};
use crate::error::Result;

pub const ID: &str = "Blackjack-v1";

pub const STICK: usize = 0;
pub const HIT: usize = 1;

/// Ace counts as 1; face cards count as 10.
const DECK: [u32; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlackjackConfig {
	/// Pay 1.5 for winning with a natural.
	pub natural: bool,
	/// Sutton and Barto rules: a natural wins outright unless the dealer has
	/// one too. Takes precedence over `natural`.
	pub sab: bool,
}

pub fn make(id: &'static str, options: &Options) -> Result<Box<dyn Env>> {
	let config: BlackjackConfig = parse_options(id, options)?;
	Ok(Box::new(Blackjack::new(config)))
}

fn usable_ace(hand: &[u32]) -> bool {
	hand.contains(&1) && hand.iter().sum::<u32>() + 10 <= 21
}

fn sum_hand(hand: &[u32]) -> u32 {
	let sum = hand.iter().sum::<u32>();
	if usable_ace(hand) { sum + 10 } else { sum }
}

fn is_bust(hand: &[u32]) -> bool {
	sum_hand(hand) > 21
}

fn score(hand: &[u32]) -> u32 {
	if is_bust(hand) { 0 } else { sum_hand(hand) }
}

fn is_natural(hand: &[u32]) -> bool {
	hand.len() == 2 && hand.contains(&1) && hand.contains(&10)
}

pub struct Blackjack {
	config: BlackjackConfig,
	player: Vec<u32>,
	dealer: Vec<u32>,
	rng: StdRng,
}

impl Blackjack {
	pub fn new(config: BlackjackConfig) -> Self {
		Self {
			config,
			player: Vec::new(),
			dealer: Vec::new(),
			rng: seeded_rng(None),
		}
	}

	fn draw_card(&mut self) -> u32 {
		DECK[self.rng.gen_range(0..DECK.len())]
	}

	fn observation(&self) -> Observation {
		let showing = self.dealer.first().copied().unwrap_or_default();
		Observation::Vector(vec![
			f64::from(sum_hand(&self.player)),
			f64::from(showing),
			if usable_ace(&self.player) { 1.0 } else { 0.0 },
		])
	}

	/// Dealer plays out their hand; returns the player's payout.
	fn settle(&mut self) -> f64 {
		while sum_hand(&self.dealer) < 17 {
			let card = self.draw_card();
			self.dealer.push(card);
		}
		let (player, dealer) = (score(&self.player), score(&self.dealer));
		let reward = f64::from(u8::from(player > dealer)) - f64::from(u8::from(player < dealer));

		if self.config.sab {
			if is_natural(&self.player) && !is_natural(&self.dealer) {
				return 1.0;
			}
		} else if self.config.natural && is_natural(&self.player) && reward == 1.0 {
			return 1.5;
		}
		reward
	}
}

impl Env for Blackjack {
	fn id(&self) -> &str {
		ID
	}

	fn action_space(&self) -> Space {
		Space::discrete(2)
	}

	fn observation_space(&self) -> Space {
		Space::bounded(vec![0.0, 0.0, 0.0], vec![31.0, 10.0, 1.0])
	}

	fn reset(&mut self, seed: Option<u64>, _options: &Options) -> Result<ResetOutcome> {
		if seed.is_some() {
			self.rng = seeded_rng(seed);
		}
		self.dealer = vec![self.draw_card(), self.draw_card()];
		self.player = vec![self.draw_card(), self.draw_card()];
		Ok(ResetOutcome {
			observation: self.observation(),
			info: Info::new(),
		})
	}

	fn step(&mut self, action: &Action) -> Result<StepOutcome> {
		let (reward, terminated) = match discrete_action(action, 2)? {
			HIT => {
				let card = self.draw_card();
				self.player.push(card);
				if is_bust(&self.player) { (-1.0, true) } else { (0.0, false) }
			}
			_ => (self.settle(), true),
		};

		Ok(StepOutcome {
			observation: self.observation(),
			reward,
			terminated,
			truncated: false,
			info: Info::new(),
		})
	}
}
