use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};

/// A playing card. The face-up flag is display state only: equality,
/// hashing and ordering look at rank and suit alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    #[serde(default = "face_up_default")]
    face_up: bool,
}

fn face_up_default() -> bool {
    true
}

impl Card {
    pub const THREE_OF_DIAMONDS: Card = Card::new(Rank::Three, Suit::Diamonds);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            face_up: true,
        }
    }

    /// Decodes an ordinal in `[0, 51]`.
    ///
    /// # Panics
    ///
    /// Panics when `ordinal` is 52 or greater.
    pub fn from_ordinal(ordinal: u8) -> Self {
        match Self::try_from_ordinal(ordinal) {
            Some(card) => card,
            None => panic!("card ordinal {ordinal} is outside [0, 51]"),
        }
    }

    pub const fn try_from_ordinal(ordinal: u8) -> Option<Self> {
        match (Rank::from_index(ordinal / 4), Suit::from_index(ordinal % 4)) {
            (Some(rank), Some(suit)) => Some(Self::new(rank, suit)),
            _ => None,
        }
    }

    /// `rank * 4 + suit`; the unit all combination values are built from.
    pub const fn ordinal(self) -> u8 {
        self.rank.index() * 4 + self.suit.index()
    }

    pub const fn is_face_up(self) -> bool {
        self.face_up
    }

    pub fn set_face_up(&mut self, face_up: bool) {
        self.face_up = face_up;
    }

    pub fn flip(&mut self) {
        self.face_up = !self.face_up;
    }

    pub const fn face_down(mut self) -> Self {
        self.face_up = false;
        self
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordinal().hash(state);
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}
