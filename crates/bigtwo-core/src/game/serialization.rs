use super::state::GameState;
use crate::model::card::Card;
use crate::model::combination::Combination;
use crate::model::seat::{PLAYER_COUNT, Seat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub names: [String; PLAYER_COUNT],
    pub hands: [Vec<Card>; PLAYER_COUNT],
    pub previous_play: Combination,
    pub current: Seat,
    pub passed: [bool; PLAYER_COUNT],
    pub last_played: Seat,
    #[serde(default)]
    pub forced_card: Option<Card>,
    pub consecutive_passes: usize,
    #[serde(default)]
    pub win_order: Vec<Seat>,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        GameSnapshot {
            names: Seat::LOOP.map(|seat| state.name(seat).to_string()),
            hands: Seat::LOOP.map(|seat| state.hand(seat).cards().to_vec()),
            previous_play: state.previous_play().clone(),
            current: state.current(),
            passed: state.passed(),
            last_played: state.last_played(),
            forced_card: state.forced_card(),
            consecutive_passes: state.consecutive_passes(),
            win_order: state.win_order().to_vec(),
        }
    }

    pub fn restore(&self) -> GameState {
        GameState::from_snapshot(self)
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
