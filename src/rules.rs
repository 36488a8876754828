//! Pure legality rules for the discard pile. Nothing in here touches table
//! or player state; the table calls these and applies the consequences.

use crate::cards::{Card, Rank};
use crate::error::GameError;

/// A run caps at four cards of one rank, and completing it burns the pile.
pub const RUN_CAP: u8 = 4;

/// The top run of the pile: a synthetic card equal to the last card played,
/// with `amount` counting the consecutive equal-rank cards below it.
/// Returns `None` on an empty pile.
pub fn top_run(pile: &[Card]) -> Option<Card> {
	let (last, rest) = pile.split_last()?;
	let mut run = last.clone();
	for card in rest.iter().rev() {
		if card.rank != run.rank {
			break;
		}
		run.amount += 1;
	}
	Some(run)
}

/// Whether `new_cards` may legally be added to the pile.
///
/// A play is 1 to 4 cards of a single rank. On a non-empty pile, stacking
/// onto the top run must not push it past four of a kind; wild ranks
/// (2, 10, Joker) are otherwise always playable; a 7 on top caps the next
/// play at 7; every other rank must climb, i.e. meet or beat the top run.
pub fn validate_play(pile: &[Card], new_cards: &[Card]) -> Result<(), GameError> {
	if new_cards.is_empty() || new_cards.len() > RUN_CAP as usize {
		return Err(GameError::InvalidPlayCount(new_cards.len()));
	}
	let rank = new_cards[0].rank;
	if new_cards.iter().any(|c| c.rank != rank) {
		return Err(GameError::MixedRanks);
	}

	let Some(top) = top_run(pile) else {
		return Ok(());
	};

	if rank == top.rank && new_cards.len() as u8 + top.amount > RUN_CAP {
		return Err(GameError::RunOverflow);
	}
	if rank.is_wild() {
		return Ok(());
	}
	if top.rank == Rank::Seven {
		if rank > Rank::Seven {
			return Err(GameError::SevenCapExceeded);
		}
		return Ok(());
	}
	if rank < top.rank {
		return Err(GameError::RankTooLow { required: top.rank });
	}
	Ok(())
}

/// True iff appending `new_cards` turns the pile's top run into exactly four
/// of a kind. This is the one condition that authorizes an out-of-turn play.
pub fn completes_four(pile: &[Card], new_cards: &[Card]) -> bool {
	let (Some(top), Some(new_top)) = (top_run(pile), top_run(new_cards)) else {
		return false;
	};
	if top.rank != new_top.rank {
		return false;
	}
	let mut combined = pile.to_vec();
	combined.extend_from_slice(new_cards);
	top_run(&combined).is_some_and(|run| run.amount == RUN_CAP)
}

/// True iff the pile must be burned: the top run reached four of a kind, or
/// its rank is 10 (which burns regardless of run length).
pub fn should_burn(pile: &[Card]) -> bool {
	match top_run(pile) {
		Some(run) => run.amount == RUN_CAP || run.rank == Rank::Ten,
		None => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cards::Suit;

	fn card(rank: Rank, suit: Suit) -> Card {
		Card::new(rank, suit)
	}

	#[test]
	fn test_top_run_of_empty_pile() {
		assert_eq!(top_run(&[]), None);
	}

	#[test]
	fn test_top_run_counts_the_trailing_run_only() {
		let pile = vec![
			card(Rank::Seven, Suit::Spade),
			card(Rank::Nine, Suit::Club),
			card(Rank::Nine, Suit::Diamond),
		];
		let run = top_run(&pile).unwrap();
		assert_eq!(run.rank, Rank::Nine);
		assert_eq!(run.amount, 2);
		assert_eq!(run.suit, Some(Suit::Diamond));
	}

	#[test]
	fn test_top_run_stops_at_rank_change() {
		let pile = vec![
			card(Rank::Five, Suit::Club),
			card(Rank::Five, Suit::Diamond),
			card(Rank::Five, Suit::Spade),
			card(Rank::King, Suit::Heart),
		];
		let run = top_run(&pile).unwrap();
		assert_eq!(run.rank, Rank::King);
		assert_eq!(run.amount, 1);
	}

	#[test]
	fn test_play_count_bounds() {
		assert_eq!(validate_play(&[], &[]), Err(GameError::InvalidPlayCount(0)));

		let five = vec![card(Rank::Three, Suit::Club); 5];
		assert_eq!(validate_play(&[], &five), Err(GameError::InvalidPlayCount(5)));
	}

	#[test]
	fn test_mixed_ranks_rejected() {
		let play = vec![card(Rank::Three, Suit::Club), card(Rank::Four, Suit::Club)];
		assert_eq!(validate_play(&[], &play), Err(GameError::MixedRanks));
	}

	#[test]
	fn test_any_rank_opens_an_empty_pile() {
		for rank in [Rank::Two, Rank::Three, Rank::Ace, Rank::Joker] {
			let play = vec![Card { rank, suit: None, amount: 1 }];
			assert_eq!(validate_play(&[], &play), Ok(()));
		}
	}

	#[test]
	fn test_climbing_rule() {
		let pile = vec![card(Rank::Nine, Suit::Club)];

		assert_eq!(validate_play(&pile, &[card(Rank::Queen, Suit::Heart)]), Ok(()));
		assert_eq!(validate_play(&pile, &[card(Rank::Nine, Suit::Spade)]), Ok(()));
		assert_eq!(
			validate_play(&pile, &[card(Rank::Eight, Suit::Heart)]),
			Err(GameError::RankTooLow { required: Rank::Nine })
		);
	}

	#[test]
	fn test_wild_ranks_ignore_the_climb() {
		let pile = vec![card(Rank::Ace, Suit::Spade)];
		assert_eq!(validate_play(&pile, &[card(Rank::Two, Suit::Club)]), Ok(()));
		assert_eq!(validate_play(&pile, &[card(Rank::Ten, Suit::Club)]), Ok(()));
		assert_eq!(validate_play(&pile, &[Card::joker()]), Ok(()));
	}

	#[test]
	fn test_seven_caps_the_next_play() {
		let pile = vec![card(Rank::Seven, Suit::Club)];

		assert_eq!(
			validate_play(&pile, &[card(Rank::Eight, Suit::Heart)]),
			Err(GameError::SevenCapExceeded)
		);
		assert_eq!(validate_play(&pile, &[card(Rank::Three, Suit::Heart)]), Ok(()));
		assert_eq!(validate_play(&pile, &[card(Rank::Seven, Suit::Heart)]), Ok(()));
		// wild ranks go over the cap
		assert_eq!(validate_play(&pile, &[card(Rank::Ten, Suit::Heart)]), Ok(()));
	}

	#[test]
	fn test_run_overflow() {
		let pile = vec![
			card(Rank::Queen, Suit::Spade),
			card(Rank::Queen, Suit::Diamond),
			card(Rank::Queen, Suit::Heart),
		];
		let two_queens = vec![card(Rank::Queen, Suit::Club), card(Rank::Queen, Suit::Spade)];
		assert_eq!(validate_play(&pile, &two_queens), Err(GameError::RunOverflow));
		assert_eq!(validate_play(&pile, &[card(Rank::Queen, Suit::Club)]), Ok(()));
	}

	#[test]
	fn test_run_overflow_applies_to_wild_ranks_too() {
		let pile = vec![
			card(Rank::Two, Suit::Spade),
			card(Rank::Two, Suit::Diamond),
			card(Rank::Two, Suit::Heart),
		];
		let two_twos = vec![card(Rank::Two, Suit::Club), card(Rank::Two, Suit::Spade)];
		assert_eq!(validate_play(&pile, &two_twos), Err(GameError::RunOverflow));
	}

	#[test]
	fn test_completes_four() {
		let pile = vec![
			card(Rank::Queen, Suit::Spade),
			card(Rank::Queen, Suit::Diamond),
			card(Rank::Queen, Suit::Heart),
		];
		assert!(completes_four(&pile, &[card(Rank::Queen, Suit::Club)]));
		assert!(!completes_four(&pile, &[card(Rank::King, Suit::Club)]));
		assert!(!completes_four(&[], &[card(Rank::Queen, Suit::Club)]));
		assert!(!completes_four(&pile, &[]));

		// two on two also completes
		let pair = vec![card(Rank::Nine, Suit::Spade), card(Rank::Nine, Suit::Diamond)];
		let other_pair = vec![card(Rank::Nine, Suit::Heart), card(Rank::Nine, Suit::Club)];
		assert!(completes_four(&pair, &other_pair));
	}

	#[test]
	fn test_completes_four_needs_a_contiguous_run() {
		// a king splits the queens, so the pile's top run is the king
		let pile = vec![
			card(Rank::Queen, Suit::Spade),
			card(Rank::Queen, Suit::Diamond),
			card(Rank::Queen, Suit::Heart),
			card(Rank::King, Suit::Heart),
		];
		assert!(!completes_four(&pile, &[card(Rank::Queen, Suit::Club)]));
	}

	#[test]
	fn test_burn_on_four_of_a_kind() {
		let pile = vec![
			card(Rank::Queen, Suit::Spade),
			card(Rank::Queen, Suit::Diamond),
			card(Rank::Queen, Suit::Heart),
			card(Rank::Queen, Suit::Club),
		];
		assert!(should_burn(&pile));
	}

	#[test]
	fn test_burn_on_ten() {
		let pile = vec![card(Rank::Three, Suit::Spade), card(Rank::Ten, Suit::Heart)];
		assert!(should_burn(&pile));
	}

	#[test]
	fn test_no_burn_otherwise() {
		assert!(!should_burn(&[]));
		assert!(!should_burn(&[card(Rank::Ace, Suit::Spade)]));
		let three = vec![
			card(Rank::Five, Suit::Spade),
			card(Rank::Five, Suit::Diamond),
			card(Rank::Five, Suit::Heart),
		];
		assert!(!should_burn(&three));
	}
}
