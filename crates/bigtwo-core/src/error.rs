use crate::model::card::Card;
use thiserror::Error;

/// A submitted card group was rejected. Always recoverable: the same player
/// is asked again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCombination {
    #[error("0, 1, 2, 3 or 5 cards must be selected. {0} cards were selected.")]
    WrongSize(usize),
    #[error("Cards in a {0} must have the same rank.")]
    RankMismatch(&'static str),
    #[error("The cards do not form a poker hand.")]
    NotPokerHand,
    #[error("The {0} was selected more than once.")]
    DuplicateCard(Card),
    #[error("You must play the same number of cards as the cards on the table.")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("You must have a {0} in your combination.")]
    MissingForcedCard(Card),
    #[error("The cards selected are of less value than the previously played cards.")]
    TooWeak,
    #[error("You cannot pass on a new trick.")]
    PassOnLead,
    #[error("No cards were selected.")]
    NothingSelected,
    #[error("The selection covers {actual} cards but the hand holds {expected}.")]
    SelectionLength { expected: usize, actual: usize },
    #[error("The {0} is not in your hand.")]
    NotInHand(Card),
}
