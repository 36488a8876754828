use crate::cards::{Card, CardOrigin, Rank};

/// Every rule violation the engine can reject a request with. The request
/// layer surfaces these as their `Display` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
	InvalidPlayCount(usize),
	MixedRanks,
	RunOverflow,
	SevenCapExceeded,
	RankTooLow { required: Rank },
	NotYourTurn { username: String },
	InvalidOrigin(CardOrigin),
	CardNotFound(Card),
	GameAlreadyStarted,
	GameOver,
	TooManyPlayers(usize),
	TooFewPlayers,
	UnknownPlayer(String),
}

impl std::fmt::Display for GameError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			GameError::InvalidPlayCount(count) => {
				write!(f, "a play must contain between 1 and 4 cards, got {}", count)
			}
			GameError::MixedRanks => {
				write!(f, "all cards in a play must share one rank")
			}
			GameError::RunOverflow => {
				write!(f, "at most 4 cards of one rank may be stacked on the pile")
			}
			GameError::SevenCapExceeded => {
				write!(f, "the pile is capped at 7, play a 7 or lower")
			}
			GameError::RankTooLow { required } => {
				write!(f, "the play must be {} or higher", required)
			}
			GameError::NotYourTurn { username } => {
				write!(f, "it is not {}'s turn", username)
			}
			GameError::InvalidOrigin(origin) => {
				write!(f, "cards cannot be played from the {} pool yet", origin)
			}
			GameError::CardNotFound(card) => {
				write!(f, "{} is not in the chosen pool", card)
			}
			GameError::GameAlreadyStarted => {
				write!(f, "the game has already started")
			}
			GameError::GameOver => {
				write!(f, "the game is over")
			}
			GameError::TooManyPlayers(count) => {
				write!(f, "{} players is too many for a 108 card deck", count)
			}
			GameError::TooFewPlayers => {
				write!(f, "at least 2 players are needed to deal")
			}
			GameError::UnknownPlayer(username) => {
				write!(f, "no player named {} at this table", username)
			}
		}
	}
}

impl std::error::Error for GameError {}
