use crate::model::card::Card;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// An ordered, mutable run of cards: a shuffling buffer or a player's hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub const FULL_SIZE: usize = 52;

    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// All 52 cards once each, in ordinal order.
    pub fn full() -> Self {
        let mut deck = Self {
            cards: Vec::with_capacity(Self::FULL_SIZE),
        };
        deck.add_full_deck();
        deck
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::full();
        deck.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn add_full_deck(&mut self) {
        self.cards
            .extend((0..Self::FULL_SIZE as u8).map(Card::from_ordinal));
    }

    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn shuffle_times<R: rand::Rng + ?Sized>(&mut self, rng: &mut R, iterations: usize) {
        for _ in 0..iterations {
            self.shuffle(rng);
        }
    }

    /// Removes and returns the front card.
    pub fn deal(&mut self) -> Option<Card> {
        self.deal_at(0)
    }

    pub fn deal_at(&mut self, index: usize) -> Option<Card> {
        (index < self.cards.len()).then(|| self.cards.remove(index))
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.search(card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    /// Removes every card in `cards`, or nothing if any one is missing.
    pub fn remove_all(&mut self, cards: &[Card]) -> bool {
        let mut remaining = self.cards.clone();
        for card in cards {
            match remaining.iter().position(|c| c == card) {
                Some(index) => {
                    remaining.remove(index);
                }
                None => return false,
            }
        }
        self.cards = remaining;
        true
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    /// Indices of every card equal to `card`. With `consider_face_up` the
    /// face state must match too. `limit` caps the number of hits.
    pub fn search_all(
        &self,
        card: Card,
        consider_face_up: bool,
        limit: Option<usize>,
    ) -> Vec<usize> {
        let matches = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == card && (!consider_face_up || c.is_face_up() == card.is_face_up()))
            .map(|(index, _)| index);
        match limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        }
    }

    pub fn search(&self, card: Card) -> Option<usize> {
        self.cards.iter().position(|c| *c == card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Big Two total order (ordinal).
    pub fn sort(&mut self) {
        self.cards.sort();
    }

    /// Conventional rank order (Two low, Ace high); suits keep their relative order.
    pub fn sort_by_rank(&mut self) {
        self.cards.sort_by_key(|card| card.rank.poker_order());
    }

    /// Spades, Hearts, Clubs, Diamonds, each in conventional rank order.
    pub fn sort_by_suit(&mut self) {
        self.cards
            .sort_by_key(|card| (3 - card.suit.index(), card.rank.poker_order()));
    }
}
