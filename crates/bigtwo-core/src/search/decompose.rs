use crate::model::card::Card;
use crate::model::combination::Combination;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

const POKER_HAND_SIZE: usize = 5;

/// Whether matched cards are claimed before the next pattern scan runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Every scan claims the cards it matched; later scans only see what is left.
    Commit,
    /// Nothing is claimed; every scan sees the whole hand.
    Probe,
}

/// Everything a hand can form, grouped by size and sorted weakest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposition {
    poker_hands: Vec<Combination>,
    triples: Vec<Combination>,
    doubles: Vec<Combination>,
    singles: Vec<Combination>,
    partition: Vec<Vec<Card>>,
}

impl Decomposition {
    pub fn poker_hands(&self) -> &[Combination] {
        &self.poker_hands
    }

    pub fn triples(&self) -> &[Combination] {
        &self.triples
    }

    pub fn doubles(&self) -> &[Combination] {
        &self.doubles
    }

    pub fn singles(&self) -> &[Combination] {
        &self.singles
    }

    /// The card groups claimed in commit mode, in claim order. Groups are
    /// pairwise disjoint and together hold every card of the hand exactly once.
    /// Empty in probe mode.
    pub fn partition(&self) -> &[Vec<Card>] {
        &self.partition
    }

    /// The list whose entries have `len` cards; empty for any other size.
    pub fn candidates_for(&self, len: usize) -> &[Combination] {
        match len {
            1 => &self.singles,
            2 => &self.doubles,
            3 => &self.triples,
            POKER_HAND_SIZE => &self.poker_hands,
            _ => &[],
        }
    }

    /// Drops every candidate that does not include `card`.
    pub fn retain_containing(&mut self, card: Card) {
        for list in [
            &mut self.poker_hands,
            &mut self.triples,
            &mut self.doubles,
            &mut self.singles,
        ] {
            list.retain(|combination| combination.contains(card));
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.poker_hands.len() + self.triples.len() + self.doubles.len() + self.singles.len()
    }
}

/// Greedy pattern search over a hand.
///
/// Scans run in a fixed priority order (straight flush, four of a kind,
/// full house, flush, straight, triple, double, single) so stronger poker
/// hands claim their cards before weaker scans can split them. The result
/// is individually legal combinations, not an optimal partition.
///
/// Alternatives reported inside the poker hand list may share cards: every
/// kicker of a quad, every triple/double pairing of a full house and every
/// window of a long run or flush is listed. In commit mode a card otherwise
/// shows up in one list only; a quad kicker stays live for later scans.
pub fn decompose(hand: &[Card], mode: SearchMode) -> Decomposition {
    let mut search = Search::new(hand, mode);

    let mut poker_hands = search.straight_flushes();
    poker_hands.extend(search.four_of_a_kinds());
    poker_hands.extend(search.full_houses());
    poker_hands.extend(search.flushes());
    poker_hands.extend(search.straights());
    let triples = search.same_rank(3);
    let doubles = search.same_rank(2);
    let singles = search.singles();

    Decomposition {
        poker_hands: weakest_first(poker_hands),
        triples: weakest_first(triples),
        doubles: weakest_first(doubles),
        singles: weakest_first(singles),
        partition: search.partition,
    }
}

fn weakest_first(mut combinations: Vec<Combination>) -> Vec<Combination> {
    combinations.sort_by_key(Combination::value);
    combinations
}

/// Index set over the sorted, de-duplicated hand. Claimed cards stay in
/// `cards`; only their live flag drops.
#[derive(Debug, Clone)]
struct CardPool {
    cards: Vec<Card>,
    live: Vec<bool>,
}

impl CardPool {
    fn new(hand: &[Card]) -> Self {
        let mut cards = hand.to_vec();
        cards.sort();
        cards.dedup();
        let live = vec![true; cards.len()];
        Self { cards, live }
    }

    fn live(&self) -> Vec<usize> {
        (0..self.cards.len()).filter(|&i| self.live[i]).collect()
    }

    fn claim(&mut self, indices: &[usize]) {
        for &i in indices {
            debug_assert!(self.live[i], "card {} claimed twice", self.cards[i]);
            self.live[i] = false;
        }
    }
}

struct Search {
    pool: CardPool,
    mode: SearchMode,
    partition: Vec<Vec<Card>>,
}

impl Search {
    fn new(hand: &[Card], mode: SearchMode) -> Self {
        Self {
            pool: CardPool::new(hand),
            mode,
            partition: Vec::new(),
        }
    }

    fn card(&self, index: usize) -> Card {
        self.pool.cards[index]
    }

    fn cards(&self, indices: &[usize]) -> Vec<Card> {
        indices.iter().map(|&i| self.card(i)).collect()
    }

    fn commit(&mut self, indices: &[usize]) {
        if self.mode == SearchMode::Commit {
            self.pool.claim(indices);
            self.partition.push(self.cards(indices));
        }
    }

    fn form(&self, indices: &[usize]) -> Combination {
        let cards = self.cards(indices);
        match Combination::classify(&cards) {
            Ok(combination) => combination,
            Err(err) => panic!("hand search formed an illegal group {cards:?}: {err}"),
        }
    }

    fn live_of_suit(&self, suit: Suit) -> Vec<usize> {
        self.pool
            .live()
            .into_iter()
            .filter(|&i| self.card(i).suit == suit)
            .collect()
    }

    /// Maximal runs of five or more consecutive ranks. `indices` must hold at
    /// most one card per rank, in ascending rank order.
    fn rank_runs(&self, indices: &[usize]) -> Vec<Vec<usize>> {
        let mut runs = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        for &index in indices {
            let extends = current
                .last()
                .is_some_and(|&last| self.card(index).rank.follows(self.card(last).rank));
            if !extends {
                if current.len() >= POKER_HAND_SIZE {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
            current.push(index);
        }
        if current.len() >= POKER_HAND_SIZE {
            runs.push(current);
        }
        runs
    }

    fn run_windows(&self, run: &[usize]) -> Vec<Combination> {
        run.windows(POKER_HAND_SIZE)
            .map(|window| self.form(window))
            .collect()
    }

    fn straight_flushes(&mut self) -> Vec<Combination> {
        let mut found = Vec::new();
        for suit in Suit::ALL {
            let suited = self.live_of_suit(suit);
            for run in self.rank_runs(&suited) {
                found.extend(self.run_windows(&run));
                self.commit(&run);
            }
        }
        found
    }

    /// One hand per kicker; only the four matching cards are claimed, and
    /// only when a kicker exists.
    fn four_of_a_kinds(&mut self) -> Vec<Combination> {
        let mut found = Vec::new();
        for rank in Rank::ORDERED {
            let live = self.pool.live();
            let (quad, kickers): (Vec<usize>, Vec<usize>) =
                live.into_iter().partition(|&i| self.card(i).rank == rank);
            if quad.len() != 4 || kickers.is_empty() {
                continue;
            }
            for kicker in kickers {
                let mut indices = quad.clone();
                indices.push(kicker);
                found.push(self.form(&indices));
            }
            self.commit(&quad);
        }
        found
    }

    /// Triples then doubles are found on a scratch copy so the scan never
    /// consumes cards itself; every triple is paired with every double. When
    /// at least one pairing exists the real pool claims all of them.
    fn full_houses(&mut self) -> Vec<Combination> {
        let mut scratch = Search {
            pool: self.pool.clone(),
            mode: SearchMode::Commit,
            partition: Vec::new(),
        };
        let triples = scratch.same_rank_groups(3);
        let doubles = scratch.same_rank_groups(2);

        let mut found = Vec::new();
        for triple in &triples {
            for double in &doubles {
                found.push(self.form(&[triple.as_slice(), double.as_slice()].concat()));
            }
        }
        if !found.is_empty() {
            for group in triples.iter().chain(&doubles) {
                self.commit(group);
            }
        }
        found
    }

    /// Every five-card window of each suit holding five or more cards. All
    /// of the suit's live cards are claimed, since every one sits in a window.
    fn flushes(&mut self) -> Vec<Combination> {
        let mut found = Vec::new();
        for suit in Suit::ALL {
            let suited = self.live_of_suit(suit);
            if suited.len() < POKER_HAND_SIZE {
                continue;
            }
            found.extend(
                suited
                    .windows(POKER_HAND_SIZE)
                    .map(|window| self.form(window)),
            );
            self.commit(&suited);
        }
        found
    }

    /// Runs are built from the lowest live card of each rank.
    fn straights(&mut self) -> Vec<Combination> {
        let mut lowest: Vec<usize> = Vec::new();
        for index in self.pool.live() {
            let new_rank = lowest
                .last()
                .is_none_or(|&last| self.card(last).rank != self.card(index).rank);
            if new_rank {
                lowest.push(index);
            }
        }

        let mut found = Vec::new();
        for run in self.rank_runs(&lowest) {
            found.extend(self.run_windows(&run));
            self.commit(&run);
        }
        found
    }

    /// Left-to-right scan for `size` adjacent live cards of one rank. In
    /// commit mode the scan resumes after a match.
    fn same_rank_groups(&mut self, size: usize) -> Vec<Vec<usize>> {
        let live = self.pool.live();
        let mut groups = Vec::new();
        let mut i = 0;
        while i + size <= live.len() {
            let window = &live[i..i + size];
            let rank = self.card(window[0]).rank;
            if window.iter().all(|&j| self.card(j).rank == rank) {
                groups.push(window.to_vec());
                if self.mode == SearchMode::Commit {
                    i += size;
                    continue;
                }
            }
            i += 1;
        }
        for group in &groups {
            self.commit(group);
        }
        groups
    }

    fn same_rank(&mut self, size: usize) -> Vec<Combination> {
        self.same_rank_groups(size)
            .iter()
            .map(|group| self.form(group))
            .collect()
    }

    fn singles(&mut self) -> Vec<Combination> {
        let live = self.pool.live();
        let singles = live.iter().map(|&i| Combination::single(self.card(i))).collect();
        for index in live {
            self.commit(&[index]);
        }
        singles
    }
}
