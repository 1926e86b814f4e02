pub mod error;
pub mod game;
pub mod model;
pub mod search;

pub use error::InvalidCombination;
pub use game::agent::{AgentKind, PlayerAgent, TurnRequest};
pub use game::engine::{EngineOptions, GameOutcome, Transition, TurnEngine, TurnRecord};
pub use game::state::GameState;
pub use model::card::Card;
pub use model::combination::{Combination, CombinationKind, PokerHandKind};
pub use model::seat::Seat;
