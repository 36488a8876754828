use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::cards::{Card, CardOrigin};
use crate::error::GameError;

/// One seat at the table: a private hand, a face-up `visible` pool and a
/// face-down `hidden` pool. Pools unlock in that order — cards may only
/// leave `visible` once the hand is empty, and `hidden` once both are.
#[derive(Debug, Clone, Deserialize)]
pub struct Player {
	pub username: String,
	#[serde(default)]
	pub hand: Vec<Card>,
	#[serde(default)]
	pub visible: Vec<Card>,
	#[serde(default)]
	pub hidden: Vec<Card>,
}

impl Player {
	pub fn new(username: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			hand: Vec::new(),
			visible: Vec::new(),
			hidden: Vec::new(),
		}
	}

	/// A player is done once all three pools are empty.
	pub fn is_finished(&self) -> bool {
		self.hand.is_empty() && self.visible.is_empty() && self.hidden.is_empty()
	}

	/// Remove `cards` from the pool named by `origin`, enforcing pool-access
	/// precedence. Either every requested card is removed or nothing is: a
	/// missing card leaves the pool untouched.
	pub fn remove_cards(&mut self, cards: &[Card], origin: CardOrigin) -> Result<(), GameError> {
		let pool = match origin {
			CardOrigin::Hand => &mut self.hand,
			CardOrigin::Visible if self.hand.is_empty() => &mut self.visible,
			CardOrigin::Hidden if self.hand.is_empty() && self.visible.is_empty() => {
				&mut self.hidden
			}
			_ => return Err(GameError::InvalidOrigin(origin)),
		};

		let mut remaining = pool.clone();
		for card in cards {
			match remaining.iter().position(|c| c == card) {
				Some(index) => {
					remaining.remove(index);
				}
				None => return Err(GameError::CardNotFound(card.clone())),
			}
		}
		*pool = remaining;
		Ok(())
	}

	/// Refill the hand from the deck up to `target` cards. Does nothing when
	/// the deck is empty or the hand already holds `target` or more.
	pub fn draw_up_to(&mut self, deck: &mut Vec<Card>, target: usize) {
		while self.hand.len() < target {
			match deck.pop() {
				Some(card) => self.hand.push(card),
				None => break,
			}
		}
	}
}

// The wire contract sorts the hand ascending by rank; visible and hidden
// keep insertion order.
impl Serialize for Player {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut hand = self.hand.clone();
		hand.sort_by_key(|c| c.rank);

		let mut state = serializer.serialize_struct("Player", 4)?;
		state.serialize_field("username", &self.username)?;
		state.serialize_field("hand", &hand)?;
		state.serialize_field("visible", &self.visible)?;
		state.serialize_field("hidden", &self.hidden)?;
		state.end()
	}
}
