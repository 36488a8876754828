use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::player::Player;
use crate::table::Table;

/// What clients get to see: the full table state with the draw deck replaced
/// by its count, so nobody can peek at undrawn cards. Hands serialize sorted
/// ascending by rank through the `Player` wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableView {
	pub players: Vec<Player>,
	pub started: bool,
	pub played_cards: Vec<Card>,
	pub deck: usize,
	pub username_turn: Option<String>,
	pub clockwise: bool,
	pub finished_usernames: Vec<String>,
}

impl From<&Table> for TableView {
	fn from(table: &Table) -> Self {
		Self {
			players: table.players.clone(),
			started: table.started,
			played_cards: table.played_cards.clone(),
			deck: table.deck.len(),
			username_turn: table.username_turn.clone(),
			clockwise: table.clockwise,
			finished_usernames: table.finished_usernames.clone(),
		}
	}
}

impl TableView {
	pub fn player(&self, username: &str) -> Option<&Player> {
		self.players.iter().find(|p| p.username == username)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cards::{Rank, Suit};

	#[test]
	fn test_view_replaces_deck_with_count() {
		let mut table = Table::new();
		table.add_player("alice").unwrap();
		table.add_player("bob").unwrap();
		table.deal().unwrap();

		let view = TableView::from(&table);
		assert_eq!(view.deck, table.deck.len());

		let json = serde_json::to_value(&view).unwrap();
		assert_eq!(json["deck"], serde_json::json!(table.deck.len()));
		// no card object leaks through the deck field
		assert!(json["deck"].as_array().is_none());
	}

	#[test]
	fn test_view_carries_table_state() {
		let mut table = Table::new();
		table.add_player("alice").unwrap();
		table.add_player("bob").unwrap();
		table.played_cards = vec![Card::new(Rank::King, Suit::Spade)];
		table.finished_usernames = vec!["carol".to_string()];

		let view = TableView::from(&table);
		assert_eq!(view.players.len(), 2);
		assert_eq!(view.played_cards, table.played_cards);
		assert_eq!(view.finished_usernames, vec!["carol".to_string()]);
		assert!(!view.started);
		assert!(view.clockwise);
		assert!(view.player("alice").is_some());
		assert!(view.player("mallory").is_none());
	}

	#[test]
	fn test_view_hand_is_sorted_on_the_wire() {
		let mut table = Table::new();
		table.add_player("alice").unwrap();
		table.players[0].hand = vec![
			Card::new(Rank::King, Suit::Spade),
			Card::new(Rank::Two, Suit::Club),
		];

		let json = serde_json::to_value(TableView::from(&table)).unwrap();
		let ranks: Vec<&str> = json["players"][0]["hand"]
			.as_array()
			.unwrap()
			.iter()
			.map(|c| c["rank"].as_str().unwrap())
			.collect();
		assert_eq!(ranks, vec!["2", "K"]);
	}
}
