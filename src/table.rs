use serde::{Deserialize, Serialize};

use crate::cards::{self, Card, CardOrigin, Rank};
use crate::error::GameError;
use crate::player::Player;
use crate::rules;

/// Cards dealt into each of a player's three pools, and the hand refill target.
pub const CARDS_PER_PLAYER: usize = 4;

/// How `play_cards_or_take_played_cards` resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
	/// The play was legal and went through `play_cards`.
	Played,
	/// The play was illegal; the cards went onto the pile and the whole pile
	/// went into the player's hand.
	TookPile,
}

/// One game in progress. The table owns its players, the draw deck (popped
/// from the end) and the discard pile, and is itself the snapshot document
/// the storage collaborator persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
	pub players: Vec<Player>,
	pub started: bool,
	pub played_cards: Vec<Card>,
	pub deck: Vec<Card>,
	pub username_turn: Option<String>,
	pub clockwise: bool,
	pub finished_usernames: Vec<String>,
}

impl Default for Table {
	fn default() -> Self {
		Self::new()
	}
}

impl Table {
	pub fn new() -> Self {
		Self {
			players: Vec::new(),
			started: false,
			played_cards: Vec::new(),
			deck: Vec::new(),
			username_turn: None,
			clockwise: true,
			finished_usernames: Vec::new(),
		}
	}

	/// The game is decided once it has started and at most one player is
	/// still holding cards. The last player standing is the loser and never
	/// enters `finished_usernames`.
	pub fn is_over(&self) -> bool {
		self.started && self.players.len() <= 1
	}

	/// Seat a new player. Re-joining under an existing username is a no-op,
	/// even after the deal.
	pub fn add_player(&mut self, username: &str) -> Result<bool, GameError> {
		if self.players.iter().any(|p| p.username == username) {
			return Ok(false);
		}
		if self.started {
			return Err(GameError::GameAlreadyStarted);
		}
		self.players.push(Player::new(username));
		Ok(true)
	}

	/// Shuffle a fresh two-deck pack and deal 4 cards into each pool of each
	/// player; the rest becomes the draw deck and the first player opens.
	/// Returns `Ok(false)` without touching anything if already started.
	pub fn deal(&mut self) -> Result<bool, GameError> {
		self.deal_shuffled(cards::shuffled_deck())
	}

	pub fn deal_shuffled(&mut self, mut shuffled: Vec<Card>) -> Result<bool, GameError> {
		if self.started {
			return Ok(false);
		}
		if self.players.len() < 2 {
			return Err(GameError::TooFewPlayers);
		}
		if self.players.len() * CARDS_PER_PLAYER * 3 > shuffled.len() {
			return Err(GameError::TooManyPlayers(self.players.len()));
		}

		for player in &mut self.players {
			for _ in 0..CARDS_PER_PLAYER {
				player.hand.push(shuffled.pop().expect("deck sized for player count"));
				player.hidden.push(shuffled.pop().expect("deck sized for player count"));
				player.visible.push(shuffled.pop().expect("deck sized for player count"));
			}
		}

		self.played_cards.clear();
		self.deck = shuffled;
		self.started = true;
		self.username_turn = self.players.first().map(|p| p.username.clone());
		Ok(true)
	}

	/// The primary transition: validate the play, remove the cards from the
	/// player's pool, put them on the pile and advance the turn, handling
	/// direction reversal, finishing players and pile burns.
	///
	/// Validation precedes every mutation: a rejected play leaves the table
	/// exactly as it was.
	pub fn play_cards(
		&mut self,
		new_cards: &[Card],
		username: &str,
		origin: CardOrigin,
	) -> Result<(), GameError> {
		if self.is_over() {
			return Err(GameError::GameOver);
		}
		rules::validate_play(&self.played_cards, new_cards)?;

		// out of turn is only allowed when the play completes four of a kind
		if self.username_turn.as_deref() != Some(username)
			&& !rules::completes_four(&self.played_cards, new_cards)
		{
			return Err(GameError::NotYourTurn { username: username.to_string() });
		}

		let index = self.player_index(username)?;
		self.players[index].remove_cards(new_cards, origin)?;

		self.played_cards.extend_from_slice(new_cards);
		if new_cards[0].rank == Rank::Jack {
			self.clockwise = !self.clockwise;
		}

		self.players[index].draw_up_to(&mut self.deck, CARDS_PER_PLAYER);

		// the normal advance is computed while the acting player still holds
		// their seat; only then is a finished player taken out of rotation
		let next = self.next_index(index);
		self.username_turn = Some(self.players[next].username.clone());

		if self.players[index].is_finished() {
			let finished = self.players.remove(index);
			self.finished_usernames.push(finished.username);
		}

		if rules::should_burn(&self.played_cards) {
			self.played_cards.clear();
			// burning skips back: control lands one seat before the would-be
			// next player, resolved against the seats left after removal
			let would_be_next = self
				.players
				.iter()
				.position(|p| Some(p.username.as_str()) == self.username_turn.as_deref());
			if let Some(next_index) = would_be_next {
				let prev = self.prev_index(next_index);
				self.username_turn = Some(self.players[prev].username.clone());
			}
		}

		self.clear_turn_if_over();
		Ok(())
	}

	/// Attempt `play_cards`; on any rejection, commit the cards to the pile
	/// anyway and make the player pick the whole pile up. This is the blind
	/// play from the visible/hidden pools: the cards are committed before
	/// their legality is known.
	///
	/// Only a failure to remove the cards from the named pool (wrong pool,
	/// missing card, unknown player) propagates.
	pub fn play_cards_or_take_played_cards(
		&mut self,
		new_cards: &[Card],
		username: &str,
		origin: CardOrigin,
	) -> Result<PlayOutcome, GameError> {
		if self.is_over() {
			return Err(GameError::GameOver);
		}
		if self.play_cards(new_cards, username, origin).is_ok() {
			return Ok(PlayOutcome::Played);
		}

		let index = self.player_index(username)?;
		self.players[index].remove_cards(new_cards, origin)?;
		self.played_cards.extend_from_slice(new_cards);
		self.take_played_cards(username)?;
		Ok(PlayOutcome::TookPile)
	}

	/// Forced pickup: the whole discard pile goes into the player's hand and
	/// control passes to the seat before them, the same skip the burn rule
	/// applies.
	pub fn take_played_cards(&mut self, username: &str) -> Result<(), GameError> {
		if self.is_over() {
			return Err(GameError::GameOver);
		}
		let index = self.player_index(username)?;
		let pile = std::mem::take(&mut self.played_cards);
		self.players[index].hand.extend(pile);

		let prev = self.prev_index(index);
		self.username_turn = Some(self.players[prev].username.clone());
		Ok(())
	}

	fn player_index(&self, username: &str) -> Result<usize, GameError> {
		self.players
			.iter()
			.position(|p| p.username == username)
			.ok_or_else(|| GameError::UnknownPlayer(username.to_string()))
	}

	fn next_index(&self, from: usize) -> usize {
		let step: isize = if self.clockwise { 1 } else { -1 };
		(from as isize + step).rem_euclid(self.players.len() as isize) as usize
	}

	fn prev_index(&self, from: usize) -> usize {
		let step: isize = if self.clockwise { -1 } else { 1 };
		(from as isize + step).rem_euclid(self.players.len() as isize) as usize
	}

	fn clear_turn_if_over(&mut self) {
		if self.is_over() {
			self.username_turn = None;
		}
	}
}
