use crate::game::serialization::GameSnapshot;
use crate::model::card::Card;
use crate::model::combination::Combination;
use crate::model::deck::Deck;
use crate::model::seat::{PLAYER_COUNT, Seat};

/// Name and hand of one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    name: String,
    hand: Deck,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: Deck::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &Deck {
        &self.hand
    }

    pub fn is_done(&self) -> bool {
        self.hand.is_empty()
    }
}

/// One game in progress. Readable by anyone; only the turn engine mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    players: [PlayerRecord; PLAYER_COUNT],
    previous_play: Combination,
    current: Seat,
    passed: [bool; PLAYER_COUNT],
    last_played: Seat,
    forced_card: Option<Card>,
    consecutive_passes: usize,
    win_order: Vec<Seat>,
}

impl GameState {
    pub fn new(names: [String; PLAYER_COUNT]) -> Self {
        Self {
            players: names.map(PlayerRecord::new),
            previous_play: Combination::pass(),
            current: Seat::North,
            passed: [false; PLAYER_COUNT],
            last_played: Seat::North,
            forced_card: None,
            consecutive_passes: 0,
            win_order: Vec::with_capacity(PLAYER_COUNT),
        }
    }

    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        let mut players = snapshot.names.clone().map(PlayerRecord::new);
        for (player, cards) in players.iter_mut().zip(&snapshot.hands) {
            player.hand = Deck::with_cards(cards.clone());
        }
        Self {
            players,
            previous_play: snapshot.previous_play.clone(),
            current: snapshot.current,
            passed: snapshot.passed,
            last_played: snapshot.last_played,
            forced_card: snapshot.forced_card,
            consecutive_passes: snapshot.consecutive_passes,
            win_order: snapshot.win_order.clone(),
        }
    }

    pub fn player(&self, seat: Seat) -> &PlayerRecord {
        &self.players[seat.index()]
    }

    pub fn name(&self, seat: Seat) -> &str {
        self.player(seat).name()
    }

    pub fn hand(&self, seat: Seat) -> &Deck {
        self.player(seat).hand()
    }

    /// `Pass` means the current seat leads and may play anything.
    pub fn previous_play(&self) -> &Combination {
        &self.previous_play
    }

    pub fn current(&self) -> Seat {
        self.current
    }

    pub fn has_passed(&self, seat: Seat) -> bool {
        self.passed[seat.index()]
    }

    pub fn passed(&self) -> [bool; PLAYER_COUNT] {
        self.passed
    }

    pub fn last_played(&self) -> Seat {
        self.last_played
    }

    pub fn forced_card(&self) -> Option<Card> {
        self.forced_card
    }

    pub fn consecutive_passes(&self) -> usize {
        self.consecutive_passes
    }

    /// Seats in the order they emptied their hands.
    pub fn win_order(&self) -> &[Seat] {
        &self.win_order
    }

    pub fn is_leading(&self) -> bool {
        self.previous_play.is_pass()
    }

    pub fn holders(&self) -> impl Iterator<Item = Seat> + '_ {
        Seat::LOOP
            .into_iter()
            .filter(|seat| !self.player(*seat).is_done())
    }

    pub fn holder_of(&self, card: Card) -> Option<Seat> {
        Seat::LOOP
            .into_iter()
            .find(|seat| self.hand(*seat).contains(card))
    }

    /// Over once at most one seat still holds cards.
    pub fn is_game_over(&self) -> bool {
        self.holders().count() <= 1
    }

    /// Deals `deck` round-robin from North and starts a fresh game.
    pub(crate) fn deal(&mut self, deck: &Deck) {
        let mut hands: [Deck; PLAYER_COUNT] = Default::default();
        for (i, card) in deck.iter().enumerate() {
            hands[i % PLAYER_COUNT].add(*card);
        }
        self.start(hands);
    }

    /// Installs `hands` and resets every mutable field. The Three of
    /// Diamonds holder leads; North leads if nobody holds it.
    pub(crate) fn start(&mut self, hands: [Deck; PLAYER_COUNT]) {
        for (player, mut hand) in self.players.iter_mut().zip(hands) {
            hand.sort();
            player.hand = hand;
        }
        let leader = self.holder_of(Card::THREE_OF_DIAMONDS).unwrap_or(Seat::North);
        self.previous_play = Combination::pass();
        self.current = leader;
        self.passed = [false; PLAYER_COUNT];
        self.last_played = leader;
        self.forced_card = None;
        self.consecutive_passes = 0;
        self.win_order.clear();
    }

    pub(crate) fn rename(&mut self, seat: Seat, name: impl Into<String>) {
        self.players[seat.index()].name = name.into();
    }

    pub(crate) fn set_forced_card(&mut self, card: Option<Card>) {
        self.forced_card = card;
    }

    /// Removes the played cards; false (and nothing removed) when any is missing.
    pub(crate) fn take_cards(&mut self, seat: Seat, cards: &[Card]) -> bool {
        self.players[seat.index()].hand.remove_all(cards)
    }

    pub(crate) fn mark_passed(&mut self, seat: Seat) {
        self.passed[seat.index()] = true;
        self.consecutive_passes += 1;
    }

    pub(crate) fn record_play(&mut self, seat: Seat, play: Combination) {
        self.previous_play = play;
        self.consecutive_passes = 0;
        self.last_played = seat;
    }

    /// Clears the table so `leader` may lead anything.
    pub(crate) fn reset_round(&mut self, leader: Seat) {
        self.previous_play = Combination::pass();
        self.consecutive_passes = 0;
        self.passed = [false; PLAYER_COUNT];
        self.current = leader;
    }

    pub(crate) fn advance(&mut self) {
        self.current = self.current.next();
    }

    /// Appends `seat` to the win order unless it is already there.
    pub(crate) fn record_finisher(&mut self, seat: Seat) -> bool {
        if self.win_order.contains(&seat) {
            return false;
        }
        self.win_order.push(seat);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;

    fn names() -> [String; 4] {
        ["N", "E", "S", "W"].map(String::from)
    }

    #[test]
    fn deal_gives_thirteen_sorted_cards_each() {
        let mut state = GameState::new(names());
        state.deal(&Deck::shuffled_with_seed(11));
        for seat in Seat::LOOP {
            let hand = state.hand(seat);
            assert_eq!(hand.len(), 13);
            assert!(hand.cards().windows(2).all(|pair| pair[0] < pair[1]));
        }
        assert!(state.is_leading());
        assert!(!state.is_game_over());
    }

    #[test]
    fn three_of_diamonds_holder_leads() {
        let mut state = GameState::new(names());
        state.deal(&Deck::shuffled_with_seed(5));
        let holder = state.holder_of(Card::THREE_OF_DIAMONDS);
        assert_eq!(holder, Some(state.current()));
        assert_eq!(state.last_played(), state.current());
    }

    #[test]
    fn unshuffled_deal_starts_with_north() {
        let mut state = GameState::new(names());
        state.deal(&Deck::full());
        assert_eq!(state.current(), Seat::North);
        assert_eq!(
            state.hand(Seat::East).get(0),
            Some(Card::new(Rank::Three, Suit::Clubs))
        );
    }

    #[test]
    fn game_over_once_three_hands_are_empty() {
        let mut state = GameState::new(names());
        state.start([
            Deck::with_cards(vec![Card::THREE_OF_DIAMONDS]),
            Deck::new(),
            Deck::new(),
            Deck::new(),
        ]);
        assert!(state.is_game_over());
        assert_eq!(state.holders().collect::<Vec<_>>(), vec![Seat::North]);
    }

    #[test]
    fn finisher_is_recorded_once() {
        let mut state = GameState::new(names());
        assert!(state.record_finisher(Seat::South));
        assert!(!state.record_finisher(Seat::South));
        assert_eq!(state.win_order(), &[Seat::South]);
    }

    #[test]
    fn round_reset_clears_passes() {
        let mut state = GameState::new(names());
        state.deal(&Deck::shuffled_with_seed(3));
        state.mark_passed(Seat::East);
        state.mark_passed(Seat::South);
        assert_eq!(state.consecutive_passes(), 2);
        state.reset_round(Seat::West);
        assert_eq!(state.passed(), [false; 4]);
        assert_eq!(state.consecutive_passes(), 0);
        assert_eq!(state.current(), Seat::West);
    }
}
