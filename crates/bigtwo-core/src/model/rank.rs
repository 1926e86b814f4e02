use core::fmt;
use serde::{Deserialize, Serialize};

/// Card rank in Big Two order: Three is the lowest rank and Two the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Three = 0,
    Four = 1,
    Five = 2,
    Six = 3,
    Seven = 4,
    Eight = 5,
    Nine = 6,
    Ten = 7,
    Jack = 8,
    Queen = 9,
    King = 10,
    Ace = 11,
    Two = 12,
}

impl Rank {
    pub const ORDERED: [Rank; 13] = [
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
        Rank::Two,
    ];

    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Rank::Three),
            1 => Some(Rank::Four),
            2 => Some(Rank::Five),
            3 => Some(Rank::Six),
            4 => Some(Rank::Seven),
            5 => Some(Rank::Eight),
            6 => Some(Rank::Nine),
            7 => Some(Rank::Ten),
            8 => Some(Rank::Jack),
            9 => Some(Rank::Queen),
            10 => Some(Rank::King),
            11 => Some(Rank::Ace),
            12 => Some(Rank::Two),
            _ => None,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// One-character identifier used for asset lookup.
    pub const fn identifier(self) -> char {
        match self {
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 't',
            Rank::Jack => 'j',
            Rank::Queen => 'q',
            Rank::King => 'k',
            Rank::Ace => 'a',
            Rank::Two => '2',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
            Rank::Ace => "Ace",
            Rank::Two => "2",
        }
    }

    /// Position in conventional poker order (Two low, Ace high).
    pub const fn poker_order(self) -> u8 {
        match self {
            Rank::Two => 0,
            other => other as u8 + 1,
        }
    }

    /// True when `self` sits directly above `other` in Big Two order.
    pub const fn follows(self, other: Rank) -> bool {
        self.index() == other.index() + 1
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Rank;

    #[test]
    fn two_outranks_ace() {
        assert!(Rank::Two > Rank::Ace);
        assert!(Rank::Ace > Rank::King);
        assert!(Rank::Three < Rank::Four);
    }

    #[test]
    fn from_index_maps() {
        assert_eq!(Rank::from_index(0), Some(Rank::Three));
        assert_eq!(Rank::from_index(12), Some(Rank::Two));
        assert_eq!(Rank::from_index(13), None);
        for (i, rank) in Rank::ORDERED.iter().enumerate() {
            assert_eq!(rank.index() as usize, i);
        }
    }

    #[test]
    fn poker_order_puts_two_first() {
        assert_eq!(Rank::Two.poker_order(), 0);
        assert_eq!(Rank::Three.poker_order(), 1);
        assert_eq!(Rank::Ace.poker_order(), 12);
    }

    #[test]
    fn display_matches_names() {
        assert_eq!(Rank::Ten.to_string(), "10");
        assert_eq!(Rank::Queen.to_string(), "Queen");
        assert_eq!(Rank::Two.identifier(), '2');
        assert_eq!(Rank::Ten.identifier(), 't');
    }

    #[test]
    fn ace_and_two_are_adjacent() {
        assert!(Rank::Two.follows(Rank::Ace));
        assert!(!Rank::Three.follows(Rank::Two));
    }
}
