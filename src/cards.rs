use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Two 52-card decks plus four jokers.
pub const DECK_SIZE: usize = 108;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
	#[serde(rename = "Jkr")]
	Joker,
	#[serde(rename = "2")]
	Two,
	#[serde(rename = "3")]
	Three,
	#[serde(rename = "4")]
	Four,
	#[serde(rename = "5")]
	Five,
	#[serde(rename = "6")]
	Six,
	#[serde(rename = "7")]
	Seven,
	#[serde(rename = "8")]
	Eight,
	#[serde(rename = "9")]
	Nine,
	#[serde(rename = "10")]
	Ten,
	#[serde(rename = "J")]
	Jack,
	#[serde(rename = "Q")]
	Queen,
	#[serde(rename = "K")]
	King,
	#[serde(rename = "A")]
	Ace,
}

impl Rank {
	/// The thirteen suited ranks, lowest to highest. Jokers are added separately.
	pub const SUITED: [Rank; 13] = [
		Rank::Two,
		Rank::Three,
		Rank::Four,
		Rank::Five,
		Rank::Six,
		Rank::Seven,
		Rank::Eight,
		Rank::Nine,
		Rank::Ten,
		Rank::Jack,
		Rank::Queen,
		Rank::King,
		Rank::Ace,
	];

	pub fn value(&self) -> u8 {
		match self {
			Rank::Joker => 1,
			Rank::Two => 2,
			Rank::Three => 3,
			Rank::Four => 4,
			Rank::Five => 5,
			Rank::Six => 6,
			Rank::Seven => 7,
			Rank::Eight => 8,
			Rank::Nine => 9,
			Rank::Ten => 10,
			Rank::Jack => 11,
			Rank::Queen => 12,
			Rank::King => 13,
			Rank::Ace => 14,
		}
	}

	/// Wild ranks may be played onto any pile regardless of the climbing rule.
	pub fn is_wild(&self) -> bool {
		matches!(self, Rank::Two | Rank::Ten | Rank::Joker)
	}

	pub fn label(&self) -> &'static str {
		match self {
			Rank::Joker => "Jkr",
			Rank::Two => "2",
			Rank::Three => "3",
			Rank::Four => "4",
			Rank::Five => "5",
			Rank::Six => "6",
			Rank::Seven => "7",
			Rank::Eight => "8",
			Rank::Nine => "9",
			Rank::Ten => "10",
			Rank::Jack => "J",
			Rank::Queen => "Q",
			Rank::King => "K",
			Rank::Ace => "A",
		}
	}
}

impl std::fmt::Display for Rank {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.label())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
	Spade,
	Club,
	Heart,
	Diamond,
}

impl Suit {
	pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Club, Suit::Heart, Suit::Diamond];

	pub fn symbol(&self) -> &'static str {
		match self {
			Suit::Spade => "♠",
			Suit::Club => "♣",
			Suit::Heart => "♥",
			Suit::Diamond => "♦",
		}
	}
}

/// Which of a player's three pools a play is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardOrigin {
	Hand,
	Visible,
	Hidden,
}

impl std::fmt::Display for CardOrigin {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			CardOrigin::Hand => write!(f, "hand"),
			CardOrigin::Visible => write!(f, "visible"),
			CardOrigin::Hidden => write!(f, "hidden"),
		}
	}
}

/// One playing card. `amount > 1` only occurs on the synthetic card returned
/// by `rules::top_run`, standing for a run of equal-rank cards; cards in
/// pools and piles always carry `amount == 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
	pub rank: Rank,
	pub suit: Option<Suit>,
	#[serde(default = "default_amount", skip_serializing_if = "is_single")]
	pub amount: u8,
}

fn default_amount() -> u8 {
	1
}

fn is_single(amount: &u8) -> bool {
	*amount == 1
}

impl Card {
	pub fn new(rank: Rank, suit: Suit) -> Self {
		Self { rank, suit: Some(suit), amount: 1 }
	}

	pub fn joker() -> Self {
		Self { rank: Rank::Joker, suit: None, amount: 1 }
	}
}

impl std::fmt::Display for Card {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.amount != 1 {
			write!(f, "{}*", self.amount)?;
		}
		match self.suit {
			Some(suit) => write!(f, "{}{}", self.rank, suit.symbol()),
			None => write!(f, "{}", self.rank),
		}
	}
}

/// A freshly shuffled two-deck pack: 4 jokers plus two copies of every
/// suit/rank combination, 108 cards in all.
pub fn shuffled_deck() -> Vec<Card> {
	shuffled_deck_with(&mut StdRng::from_os_rng())
}

pub fn shuffled_deck_with<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
	let mut cards = Vec::with_capacity(DECK_SIZE);
	for _ in 0..4 {
		cards.push(Card::joker());
	}
	for suit in Suit::ALL {
		for rank in Rank::SUITED {
			cards.push(Card::new(rank, suit));
			cards.push(Card::new(rank, suit));
		}
	}
	cards.shuffle(rng);
	cards
}
