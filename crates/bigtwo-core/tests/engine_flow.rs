use bigtwo_core::game::agent::{AgentKind, PlayerAgent, TurnRequest};
use bigtwo_core::game::engine::{Transition, TurnEngine};
use bigtwo_core::game::interactive::{InputStatus, LocalAgent, TurnInput};
use bigtwo_core::game::serialization::GameSnapshot;
use bigtwo_core::game::state::GameState;
use bigtwo_core::model::card::Card;
use bigtwo_core::model::combination::Combination;
use bigtwo_core::model::rank::Rank;
use bigtwo_core::model::seat::Seat;
use bigtwo_core::model::suit::Suit;
use bigtwo_core::InvalidCombination;
use std::thread;
use std::time::Duration;

/// Leads its lowest card and passes otherwise.
struct Cautious;

impl PlayerAgent for Cautious {
    fn name(&self) -> &str {
        "cautious"
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Automated
    }

    fn do_turn(&mut self, seat: Seat, state: &GameState) -> Combination {
        TurnRequest::from_state(seat, state).fallback_play()
    }
}

fn c(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn await_turn(input: &TurnInput) -> TurnRequest {
    loop {
        if let Some(request) = input.pending() {
            return request;
        }
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn human_seat_drives_a_threaded_game() {
    let (human, input) = LocalAgent::new("human");
    let agents: [Box<dyn PlayerAgent>; 4] = [
        Box::new(human),
        Box::new(Cautious),
        Box::new(Cautious),
        Box::new(Cautious),
    ];
    let hands = [
        vec![Card::THREE_OF_DIAMONDS, c(Rank::Five, Suit::Hearts)],
        vec![c(Rank::Four, Suit::Clubs)],
        vec![c(Rank::Six, Suit::Clubs)],
        vec![c(Rank::Seven, Suit::Clubs)],
    ];
    let mut engine = TurnEngine::from_hands(agents, hands);
    let game = thread::spawn(move || engine.run());

    let opening = await_turn(&input);
    assert_eq!(opening.seat, Seat::North);
    assert_eq!(opening.forced_card, Some(Card::THREE_OF_DIAMONDS));
    assert_eq!(
        input.receive_combination(Combination::single(c(Rank::Five, Suit::Hearts))),
        Err(InvalidCombination::MissingForcedCard(Card::THREE_OF_DIAMONDS))
    );
    assert_eq!(
        input.receive_selection(Some(&[true, false])),
        Ok(InputStatus::Accepted)
    );

    // Everyone else passes, so the table comes back to North.
    let lead = loop {
        let request = await_turn(&input);
        if request.hand.len() == 1 {
            break request;
        }
    };
    assert!(lead.is_lead());
    assert_eq!(lead.forced_card, None);
    assert_eq!(
        input.receive_selection(None),
        Err(InvalidCombination::PassOnLead)
    );
    assert_eq!(
        input.receive_combination(Combination::single(c(Rank::Five, Suit::Hearts))),
        Ok(InputStatus::Accepted)
    );

    let outcome = game.join().expect("engine thread");
    assert_eq!(
        outcome.win_order,
        vec![Seat::North, Seat::East, Seat::South, Seat::West]
    );
}

#[test]
fn trace_of_a_small_game_follows_the_rules() {
    let agents: [Box<dyn PlayerAgent>; 4] = [
        Box::new(Cautious),
        Box::new(Cautious),
        Box::new(Cautious),
        Box::new(Cautious),
    ];
    let hands = [
        vec![c(Rank::Four, Suit::Diamonds), c(Rank::Nine, Suit::Spades)],
        vec![Card::THREE_OF_DIAMONDS, c(Rank::King, Suit::Clubs)],
        vec![c(Rank::Five, Suit::Clubs), c(Rank::Ace, Suit::Hearts)],
        vec![c(Rank::Six, Suit::Clubs), c(Rank::Two, Suit::Spades)],
    ];
    let mut engine = TurnEngine::from_hands(agents, hands);
    assert_eq!(engine.state().current(), Seat::East);

    let mut records = Vec::new();
    while let Some(record) = engine.step() {
        let state = engine.state();
        match record.transition {
            Transition::RoundReset { leader } => {
                assert!(state.is_leading());
                assert_eq!(state.passed(), [false; 4]);
                assert_eq!(state.current(), leader);
            }
            Transition::Finished => {
                assert!(state.is_leading());
                assert!(state.hand(record.seat).is_empty());
                assert_eq!(state.current(), record.seat.next());
            }
            Transition::Played | Transition::Passed => {}
        }
        records.push(record);
    }

    assert_eq!(records[0].play, Combination::single(Card::THREE_OF_DIAMONDS));
    assert!(records.iter().all(|r| r.consulted || r.play.is_pass()));
    assert_eq!(engine.state().win_order().len(), 4);
    assert_eq!(engine.state().win_order()[0], Seat::East);
}

#[test]
fn snapshot_of_a_running_game_restores() {
    let agents: [Box<dyn PlayerAgent>; 4] = [
        Box::new(Cautious),
        Box::new(Cautious),
        Box::new(Cautious),
        Box::new(Cautious),
    ];
    let mut engine = TurnEngine::new(agents, 77);
    for _ in 0..6 {
        engine.step();
    }
    let json = GameSnapshot::to_json(engine.state()).unwrap();
    let restored = GameSnapshot::from_json(&json).unwrap().restore();
    assert_eq!(&restored, engine.state());
}
