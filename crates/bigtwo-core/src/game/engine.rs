use crate::game::agent::{AgentKind, PlayerAgent, TurnRequest};
use crate::game::observer::{GameObserver, ObserverId, ObserverRegistry};
use crate::game::state::GameState;
use crate::model::card::Card;
use crate::model::combination::Combination;
use crate::model::deck::Deck;
use crate::model::seat::{PLAYER_COUNT, Seat};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{Level, event};

/// Optional pacing so a watcher can follow automated play. Both default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub automated_turn_delay_ms: u64,
    pub round_end_delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Played,
    Passed,
    /// Everyone else passed; `leader` may lead anything.
    RoundReset { leader: Seat },
    /// The seat emptied its hand; the next seat leads.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub seat: Seat,
    pub play: Combination,
    /// False when the seat was skipped (empty hand or already passed).
    pub consulted: bool,
    pub transition: Transition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub win_order: Vec<Seat>,
    pub turns: usize,
}

/// Drives one game: asks agents for plays, applies them and notifies
/// observers. Runs on a dedicated thread because agents may block.
pub struct TurnEngine {
    state: GameState,
    agents: [Box<dyn PlayerAgent>; PLAYER_COUNT],
    observers: ObserverRegistry,
    options: EngineOptions,
    rng: StdRng,
    seed: u64,
    turns: usize,
}

impl TurnEngine {
    pub fn new(agents: [Box<dyn PlayerAgent>; PLAYER_COUNT], seed: u64) -> Self {
        Self::with_options(agents, seed, EngineOptions::default())
    }

    pub fn with_options(
        agents: [Box<dyn PlayerAgent>; PLAYER_COUNT],
        seed: u64,
        options: EngineOptions,
    ) -> Self {
        let mut engine = Self::idle(agents, seed, options);
        engine.new_game();
        engine
    }

    /// Fixed deal instead of a shuffle. Hands are sorted; the Three of
    /// Diamonds holder leads.
    pub fn from_hands(
        agents: [Box<dyn PlayerAgent>; PLAYER_COUNT],
        hands: [Vec<Card>; PLAYER_COUNT],
    ) -> Self {
        let mut engine = Self::idle(agents, 0, EngineOptions::default());
        engine.state.start(hands.map(Deck::with_cards));
        log_new_game(&engine.state, None);
        engine
    }

    fn idle(
        agents: [Box<dyn PlayerAgent>; PLAYER_COUNT],
        seed: u64,
        options: EngineOptions,
    ) -> Self {
        let names = agents.each_ref().map(|agent| agent.name().to_string());
        Self {
            state: GameState::new(names),
            agents,
            observers: ObserverRegistry::default(),
            options,
            rng: StdRng::seed_from_u64(seed),
            seed,
            turns: 0,
        }
    }

    /// Reshuffles from the engine's RNG, redeals and resets everything,
    /// including the win order.
    pub fn new_game(&mut self) {
        let deck = Deck::shuffled(&mut self.rng);
        self.state.deal(&deck);
        self.turns = 0;
        log_new_game(&self.state, Some(self.seed));
        self.observers.notify(&self.state);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn agent(&self, seat: Seat) -> &dyn PlayerAgent {
        self.agents[seat.index()].as_ref()
    }

    /// Registers `observer` and immediately shows it the current state.
    pub fn add_observer(&mut self, mut observer: impl GameObserver + 'static) -> ObserverId {
        observer.game_state_changed(&self.state);
        self.observers.add(Box::new(observer))
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Swaps the agent for `seat` between turns, returning the old one. The
    /// seat takes the new agent's name and observers are notified.
    pub fn replace_agent(
        &mut self,
        seat: Seat,
        agent: Box<dyn PlayerAgent>,
    ) -> Box<dyn PlayerAgent> {
        event!(
            target: "bigtwo_core::engine",
            Level::INFO,
            seat = %seat,
            old = %self.agents[seat.index()].name(),
            new = %agent.name(),
            "agent replaced"
        );
        self.state.rename(seat, agent.name());
        let old = std::mem::replace(&mut self.agents[seat.index()], agent);
        self.observers.notify(&self.state);
        old
    }

    /// Appends `seat` to the win order; repeat calls are ignored.
    pub fn record_finisher(&mut self, seat: Seat) -> bool {
        let recorded = self.state.record_finisher(seat);
        if recorded {
            event!(
                target: "bigtwo_core::engine",
                Level::INFO,
                seat = %seat,
                place = self.state.win_order().len(),
                "seat finished"
            );
        }
        recorded
    }

    /// Runs one turn; `None` once the game is over.
    pub fn step(&mut self) -> Option<TurnRecord> {
        if self.state.is_game_over() {
            self.complete_win_order();
            return None;
        }

        let seat = self.state.current();
        let consulted = !self.state.player(seat).is_done() && !self.state.has_passed(seat);
        let play = if consulted {
            let forced = self
                .state
                .hand(seat)
                .contains(Card::THREE_OF_DIAMONDS)
                .then_some(Card::THREE_OF_DIAMONDS);
            self.state.set_forced_card(forced);
            self.pace(seat);
            let play = self.agents[seat.index()].do_turn(seat, &self.state);
            self.accept(seat, &play);
            play
        } else {
            self.state.set_forced_card(None);
            Combination::pass()
        };

        let previous = self.state.previous_play().clone();
        let transition = if play.is_pass() {
            self.apply_pass(seat)
        } else {
            self.apply_play(seat, play.clone())
        };
        self.turns += 1;

        let record = TurnRecord {
            seat,
            play,
            consulted,
            transition,
        };
        log_turn(&record, &previous, &self.state, self.turns);
        self.observers.notify(&self.state);

        if self.state.is_game_over() {
            self.complete_win_order();
        }
        Some(record)
    }

    /// Plays until at most one seat holds cards.
    pub fn run(&mut self) -> GameOutcome {
        while self.step().is_some() {}
        GameOutcome {
            win_order: self.state.win_order().to_vec(),
            turns: self.turns,
        }
    }

    /// Agents are trusted to submit legal plays; a breach is a bug in the agent.
    fn accept(&mut self, seat: Seat, play: &Combination) {
        let request = TurnRequest::from_state(seat, &self.state);
        if let Err(err) = request.validate(play) {
            panic!(
                "agent `{}` at {seat} returned an illegal play ({play}): {err}",
                self.agents[seat.index()].name()
            );
        }
        if !play.is_pass() && !self.state.take_cards(seat, play.cards()) {
            panic!("agent at {seat} played cards it does not hold: {play}");
        }
    }

    fn apply_pass(&mut self, seat: Seat) -> Transition {
        self.state.mark_passed(seat);
        if self.state.consecutive_passes() >= PLAYER_COUNT - 1 {
            let leader = self.state.last_played();
            self.state.reset_round(leader);
            self.pause(self.options.round_end_delay_ms);
            Transition::RoundReset { leader }
        } else {
            self.state.advance();
            Transition::Passed
        }
    }

    fn apply_play(&mut self, seat: Seat, play: Combination) -> Transition {
        self.state.record_play(seat, play);
        if self.state.player(seat).is_done() {
            self.record_finisher(seat);
            self.state.reset_round(seat.next());
            self.pause(self.options.round_end_delay_ms);
            Transition::Finished
        } else {
            self.state.advance();
            Transition::Played
        }
    }

    fn complete_win_order(&mut self) {
        let holders: Vec<Seat> = self.state.holders().collect();
        let mut changed = false;
        for seat in holders {
            changed |= self.record_finisher(seat);
        }
        if changed {
            event!(
                target: "bigtwo_core::engine",
                Level::INFO,
                turns = self.turns,
                win_order = ?self.state.win_order(),
                "game over"
            );
        }
    }

    fn pace(&self, seat: Seat) {
        if self.agents[seat.index()].kind() == AgentKind::Automated {
            self.pause(self.options.automated_turn_delay_ms);
        }
    }

    fn pause(&self, millis: u64) {
        if millis > 0 {
            thread::sleep(Duration::from_millis(millis));
        }
    }
}

fn log_new_game(state: &GameState, seed: Option<u64>) {
    event!(
        target: "bigtwo_core::engine",
        Level::INFO,
        seed = ?seed,
        leader = %state.current(),
        "new game dealt"
    );
}

fn log_turn(record: &TurnRecord, previous: &Combination, state: &GameState, turn: usize) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    event!(
        target: "bigtwo_core::engine",
        Level::DEBUG,
        turn,
        seat = %record.seat,
        consulted = record.consulted,
        play = %record.play,
        previous = %previous,
        transition = ?record.transition,
        consecutive_passes = state.consecutive_passes(),
        cards_left = state.hand(record.seat).len(),
        next = %state.current(),
    );
}

#[cfg(test)]
mod tests {
    use super::{EngineOptions, Transition, TurnEngine};
    use crate::game::agent::{AgentKind, PlayerAgent, TurnRequest};
    use crate::game::state::GameState;
    use crate::model::card::Card;
    use crate::model::combination::Combination;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Plays its script in order, then the safe default.
    struct Scripted {
        plays: VecDeque<Combination>,
    }

    impl Scripted {
        fn boxed(plays: Vec<Combination>) -> Box<dyn PlayerAgent> {
            Box::new(Self {
                plays: plays.into(),
            })
        }
    }

    impl PlayerAgent for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn kind(&self) -> AgentKind {
            AgentKind::Automated
        }

        fn do_turn(&mut self, seat: Seat, state: &GameState) -> Combination {
            self.plays
                .pop_front()
                .unwrap_or_else(|| TurnRequest::from_state(seat, state).fallback_play())
        }
    }

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn single(rank: Rank, suit: Suit) -> Combination {
        Combination::single(c(rank, suit))
    }

    fn defaults() -> [Box<dyn PlayerAgent>; 4] {
        [
            Scripted::boxed(vec![]),
            Scripted::boxed(vec![]),
            Scripted::boxed(vec![]),
            Scripted::boxed(vec![]),
        ]
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let a = TurnEngine::new(defaults(), 9);
        let b = TurnEngine::new(defaults(), 9);
        assert_eq!(a.state(), b.state());
        assert_eq!(a.seed(), 9);
        assert_eq!(a.options(), EngineOptions::default());
    }

    #[test]
    fn all_pass_resets_round_to_last_player() {
        let hands = [
            vec![Card::THREE_OF_DIAMONDS, c(Rank::Nine, Suit::Clubs)],
            vec![c(Rank::Four, Suit::Clubs), c(Rank::Ten, Suit::Clubs)],
            vec![c(Rank::Five, Suit::Clubs), c(Rank::Jack, Suit::Clubs)],
            vec![c(Rank::Six, Suit::Clubs), c(Rank::Queen, Suit::Clubs)],
        ];
        let agents = [
            Scripted::boxed(vec![Combination::single(Card::THREE_OF_DIAMONDS)]),
            Scripted::boxed(vec![Combination::pass()]),
            Scripted::boxed(vec![Combination::pass()]),
            Scripted::boxed(vec![Combination::pass()]),
        ];
        let mut engine = TurnEngine::from_hands(agents, hands);

        assert_eq!(engine.step().map(|r| r.transition), Some(Transition::Played));
        assert_eq!(engine.step().map(|r| r.transition), Some(Transition::Passed));
        assert_eq!(engine.step().map(|r| r.transition), Some(Transition::Passed));
        assert_eq!(
            engine.step().map(|r| r.transition),
            Some(Transition::RoundReset {
                leader: Seat::North
            })
        );
        let state = engine.state();
        assert!(state.is_leading());
        assert_eq!(state.passed(), [false; 4]);
        assert_eq!(state.current(), Seat::North);
        assert_eq!(state.consecutive_passes(), 0);
    }

    #[test]
    fn finishing_grants_next_seat_a_free_lead() {
        let hands = [
            vec![Card::THREE_OF_DIAMONDS],
            vec![c(Rank::Four, Suit::Clubs), c(Rank::Ten, Suit::Clubs)],
            vec![c(Rank::Five, Suit::Clubs), c(Rank::Jack, Suit::Clubs)],
            vec![c(Rank::Six, Suit::Clubs), c(Rank::Queen, Suit::Clubs)],
        ];
        let mut engine = TurnEngine::from_hands(defaults(), hands);

        let record = engine.step().unwrap();
        assert_eq!(record.seat, Seat::North);
        assert_eq!(record.transition, Transition::Finished);
        assert_eq!(engine.state().current(), Seat::East);
        assert!(engine.state().is_leading());
        assert_eq!(engine.state().win_order(), &[Seat::North]);

        // North is skipped from now on without being asked.
        let record = engine.step().unwrap();
        assert_eq!(record.seat, Seat::East);
        assert_eq!(record.play, single(Rank::Four, Suit::Clubs));
    }

    #[test]
    fn forced_card_is_set_for_the_opening_turn() {
        let hands = [
            vec![Card::THREE_OF_DIAMONDS, c(Rank::Nine, Suit::Clubs)],
            vec![c(Rank::Four, Suit::Clubs), c(Rank::Ten, Suit::Clubs)],
            vec![c(Rank::Five, Suit::Clubs), c(Rank::Jack, Suit::Clubs)],
            vec![c(Rank::Six, Suit::Clubs), c(Rank::Queen, Suit::Clubs)],
        ];
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut engine = TurnEngine::from_hands(defaults(), hands);
        let sink = Arc::clone(&seen);
        engine.add_observer(move |state: &GameState| {
            sink.lock().unwrap().push(state.forced_card());
        });
        assert_eq!(seen.lock().unwrap().len(), 1);

        engine.step();
        engine.step();
        let forced = seen.lock().unwrap().clone();
        assert_eq!(forced, vec![None, Some(Card::THREE_OF_DIAMONDS), None]);
    }

    #[test]
    #[should_panic(expected = "illegal play")]
    fn opening_without_three_of_diamonds_is_fatal() {
        let hands = [
            vec![Card::THREE_OF_DIAMONDS, c(Rank::Nine, Suit::Clubs)],
            vec![c(Rank::Four, Suit::Clubs)],
            vec![c(Rank::Five, Suit::Clubs)],
            vec![c(Rank::Six, Suit::Clubs)],
        ];
        let agents = [
            Scripted::boxed(vec![single(Rank::Nine, Suit::Clubs)]),
            Scripted::boxed(vec![]),
            Scripted::boxed(vec![]),
            Scripted::boxed(vec![]),
        ];
        let mut engine = TurnEngine::from_hands(agents, hands);
        engine.step();
    }

    #[test]
    fn run_records_full_win_order() {
        let mut engine = TurnEngine::new(defaults(), 2024);
        let outcome = engine.run();
        assert_eq!(outcome.win_order.len(), 4);
        let mut seats = outcome.win_order.clone();
        seats.sort_by_key(|seat| seat.index());
        assert_eq!(seats, Seat::LOOP.to_vec());
        assert!(engine.is_game_over());
        assert_eq!(engine.step(), None);
        assert_eq!(engine.state().win_order().len(), 4);
    }

    /// Scripted play under a different name.
    struct Renamed(&'static str);

    impl PlayerAgent for Renamed {
        fn name(&self) -> &str {
            self.0
        }

        fn kind(&self) -> AgentKind {
            AgentKind::Automated
        }

        fn do_turn(&mut self, seat: Seat, state: &GameState) -> Combination {
            TurnRequest::from_state(seat, state).fallback_play()
        }
    }

    #[test]
    fn replacing_an_agent_renames_the_seat_and_notifies() {
        let mut engine = TurnEngine::new(defaults(), 5);
        let names = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&names);
        engine.add_observer(move |state: &GameState| {
            sink.lock().unwrap().push(state.name(Seat::West).to_string());
        });

        engine.replace_agent(Seat::West, Box::new(Renamed("stand-in")));
        assert_eq!(engine.state().name(Seat::West), "stand-in");
        assert_eq!(engine.agent(Seat::West).name(), "stand-in");
        assert_eq!(
            names.lock().unwrap().as_slice(),
            &["scripted".to_string(), "stand-in".to_string()]
        );
    }

    #[test]
    fn replaced_agent_plays_next_turn() {
        let hands = [
            vec![Card::THREE_OF_DIAMONDS, c(Rank::Nine, Suit::Clubs)],
            vec![c(Rank::Four, Suit::Clubs), c(Rank::Ten, Suit::Clubs)],
            vec![c(Rank::Five, Suit::Clubs), c(Rank::Jack, Suit::Clubs)],
            vec![c(Rank::Six, Suit::Clubs), c(Rank::Queen, Suit::Clubs)],
        ];
        let mut engine = TurnEngine::from_hands(defaults(), hands);
        engine.step();
        let old = engine.replace_agent(
            Seat::East,
            Scripted::boxed(vec![single(Rank::Ten, Suit::Clubs)]),
        );
        assert_eq!(old.name(), "scripted");
        let record = engine.step().unwrap();
        assert_eq!(record.play, single(Rank::Ten, Suit::Clubs));
    }
}
