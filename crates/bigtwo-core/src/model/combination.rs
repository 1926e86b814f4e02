use crate::error::InvalidCombination;
use crate::model::card::Card;
use core::cmp::Ordering;
use core::fmt;
use serde::{Deserialize, Serialize};

const SINGLE_VALUES: i32 = 52;
const DOUBLE_VALUES: i32 = 39;
const TRIPLE_VALUES: i32 = 13;
const POKER_HAND_BASE: i32 = SINGLE_VALUES + DOUBLE_VALUES + TRIPLE_VALUES;

const STRAIGHT_VALUES: i32 = 36;
const FLUSH_VALUES: i32 = 32;
const FULL_HOUSE_VALUES: i32 = 13;
const FOUR_OF_A_KIND_VALUES: i32 = 13;
const STRAIGHT_FLUSH_VALUES: i32 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PokerHandKind {
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl PokerHandKind {
    pub const fn name(self) -> &'static str {
        match self {
            PokerHandKind::Straight => "Straight",
            PokerHandKind::Flush => "Flush",
            PokerHandKind::FullHouse => "Full House",
            PokerHandKind::FourOfAKind => "Four of a Kind",
            PokerHandKind::StraightFlush => "Straight Flush",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombinationKind {
    Pass,
    Single,
    Double,
    Triple,
    PokerHand(PokerHandKind),
}

impl CombinationKind {
    pub const fn card_count(self) -> usize {
        match self {
            CombinationKind::Pass => 0,
            CombinationKind::Single => 1,
            CombinationKind::Double => 2,
            CombinationKind::Triple => 3,
            CombinationKind::PokerHand(_) => 5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CombinationKind::Pass => "Pass",
            CombinationKind::Single => "Single",
            CombinationKind::Double => "Double",
            CombinationKind::Triple => "Triple",
            CombinationKind::PokerHand(kind) => kind.name(),
        }
    }
}

/// A legal group of 0, 1, 2, 3 or 5 cards, sorted ascending.
///
/// Construction is the validation step: a value of this type always holds
/// distinct cards that agree with its kind. Equality is structural, so
/// `Combination::pass()` compares equal to every other pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct Combination {
    kind: CombinationKind,
    cards: Vec<Card>,
}

impl Combination {
    pub const fn pass() -> Self {
        Self {
            kind: CombinationKind::Pass,
            cards: Vec::new(),
        }
    }

    pub fn single(card: Card) -> Self {
        Self {
            kind: CombinationKind::Single,
            cards: vec![card],
        }
    }

    /// Classifies an arbitrary card group.
    pub fn classify(cards: &[Card]) -> Result<Self, InvalidCombination> {
        let mut sorted = cards.to_vec();
        sorted.sort();
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(InvalidCombination::DuplicateCard(pair[0]));
        }

        let kind = match sorted.len() {
            0 => CombinationKind::Pass,
            1 => CombinationKind::Single,
            2 if same_rank(&sorted) => CombinationKind::Double,
            2 => return Err(InvalidCombination::RankMismatch("double")),
            3 if same_rank(&sorted) => CombinationKind::Triple,
            3 => return Err(InvalidCombination::RankMismatch("triple")),
            5 => CombinationKind::PokerHand(
                poker_hand_kind(&sorted).ok_or(InvalidCombination::NotPokerHand)?,
            ),
            other => return Err(InvalidCombination::WrongSize(other)),
        };

        Ok(Self {
            kind,
            cards: sorted,
        })
    }

    pub fn is_valid(cards: &[Card]) -> bool {
        Self::classify(cards).is_ok()
    }

    pub fn kind(&self) -> CombinationKind {
        self.kind
    }

    pub fn poker_hand_kind(&self) -> Option<PokerHandKind> {
        match self.kind {
            CombinationKind::PokerHand(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Only a pass holds no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_pass(&self) -> bool {
        self.kind == CombinationKind::Pass
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn sum_of_ordinals(&self) -> u32 {
        self.cards.iter().map(|card| u32::from(card.ordinal())).sum()
    }

    /// Linear strength. Values of different sizes never overlap, and within
    /// the five-card band every sub-kind strictly dominates the ones below it.
    pub fn value(&self) -> i32 {
        match self.kind {
            CombinationKind::Pass => -1,
            CombinationKind::Single => ordinal(self.cards[0]),
            CombinationKind::Double => {
                // Two distinct suits: the higher one is never Diamonds.
                let max_suit = self.cards[0].suit.max(self.cards[1].suit).index() as i32 - 1;
                let rank = self.cards[0].rank.index() as i32;
                SINGLE_VALUES + rank * 3 + max_suit
            }
            CombinationKind::Triple => {
                SINGLE_VALUES + DOUBLE_VALUES + self.cards[0].rank.index() as i32
            }
            CombinationKind::PokerHand(kind) => self.poker_hand_value(kind),
        }
    }

    fn poker_hand_value(&self, kind: PokerHandKind) -> i32 {
        let high = ordinal(self.cards[4]);
        match kind {
            PokerHandKind::Straight => POKER_HAND_BASE + high - (52 - STRAIGHT_VALUES),
            PokerHandKind::Flush => {
                POKER_HAND_BASE + STRAIGHT_VALUES + high - (52 - FLUSH_VALUES)
            }
            PokerHandKind::FullHouse => {
                let triple_first = self.cards[0].rank == self.cards[2].rank;
                let rank = if triple_first {
                    self.cards[0].rank
                } else {
                    self.cards[4].rank
                };
                POKER_HAND_BASE + STRAIGHT_VALUES + FLUSH_VALUES + rank.index() as i32
            }
            PokerHandKind::FourOfAKind => {
                let quad_first = self.cards[0].rank == self.cards[3].rank;
                let rank = if quad_first {
                    self.cards[0].rank
                } else {
                    self.cards[4].rank
                };
                POKER_HAND_BASE
                    + STRAIGHT_VALUES
                    + FLUSH_VALUES
                    + FULL_HOUSE_VALUES
                    + rank.index() as i32
            }
            PokerHandKind::StraightFlush => {
                POKER_HAND_BASE
                    + STRAIGHT_VALUES
                    + FLUSH_VALUES
                    + FULL_HOUSE_VALUES
                    + FOUR_OF_A_KIND_VALUES
                    + high
                    - (52 - STRAIGHT_FLUSH_VALUES)
            }
        }
    }

    /// Strength comparison; `None` when the sizes differ.
    pub fn compare_strength(&self, other: &Combination) -> Option<Ordering> {
        (self.len() == other.len()).then(|| self.value().cmp(&other.value()))
    }

    /// Same size and strictly stronger.
    pub fn beats(&self, other: &Combination) -> bool {
        self.compare_strength(other) == Some(Ordering::Greater)
    }
}

impl Default for Combination {
    fn default() -> Self {
        Self::pass()
    }
}

impl TryFrom<Vec<Card>> for Combination {
    type Error = InvalidCombination;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        Self::classify(&cards)
    }
}

impl From<Combination> for Vec<Card> {
    fn from(combination: Combination) -> Self {
        combination.cards
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())?;
        for (i, card) in self.cards.iter().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{sep}{card}")?;
        }
        Ok(())
    }
}

fn ordinal(card: Card) -> i32 {
    i32::from(card.ordinal())
}

fn same_rank(cards: &[Card]) -> bool {
    cards.iter().all(|card| card.rank == cards[0].rank)
}

fn consecutive_ranks(cards: &[Card]) -> bool {
    cards.windows(2).all(|pair| pair[1].rank.follows(pair[0].rank))
}

fn one_suit(cards: &[Card]) -> bool {
    cards.iter().all(|card| card.suit == cards[0].suit)
}

/// Expects five cards sorted by ordinal.
fn poker_hand_kind(cards: &[Card]) -> Option<PokerHandKind> {
    let straight = consecutive_ranks(cards);
    let flush = one_suit(cards);

    if straight && flush {
        Some(PokerHandKind::StraightFlush)
    } else if straight {
        Some(PokerHandKind::Straight)
    } else if flush {
        Some(PokerHandKind::Flush)
    } else if is_full_house(cards) {
        Some(PokerHandKind::FullHouse)
    } else if is_four_of_a_kind(cards) {
        Some(PokerHandKind::FourOfAKind)
    } else {
        None
    }
}

fn is_full_house(cards: &[Card]) -> bool {
    (same_rank(&cards[0..3]) && same_rank(&cards[3..5]))
        || (same_rank(&cards[2..5]) && same_rank(&cards[0..2]))
}

fn is_four_of_a_kind(cards: &[Card]) -> bool {
    same_rank(&cards[0..4]) || same_rank(&cards[1..5])
}
