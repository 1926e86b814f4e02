use crate::error::InvalidCombination;
use crate::game::state::GameState;
use crate::model::card::Card;
use crate::model::combination::Combination;
use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Automated,
    Local,
    Remote,
}

/// Something that decides a seat's play.
///
/// `do_turn` is called exactly once per turn, on the engine thread, and may
/// block until a decision arrives. The returned combination must already
/// satisfy [`TurnRequest::validate`]; the engine treats anything else as a
/// collaborator bug and panics.
pub trait PlayerAgent: Send {
    fn name(&self) -> &str;

    fn kind(&self) -> AgentKind;

    fn do_turn(&mut self, seat: Seat, state: &GameState) -> Combination;
}

/// Plain-data view of a pending decision, handed to input sources that
/// cannot read the game state directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub seat: Seat,
    pub previous_play: Combination,
    pub forced_card: Option<Card>,
    pub hand: Vec<Card>,
}

impl TurnRequest {
    pub fn from_state(seat: Seat, state: &GameState) -> Self {
        Self {
            seat,
            previous_play: state.previous_play().clone(),
            forced_card: state.forced_card(),
            hand: state.hand(seat).cards().to_vec(),
        }
    }

    pub fn is_lead(&self) -> bool {
        self.previous_play.is_pass()
    }

    /// Submission rules shared by every input source.
    pub fn validate(&self, play: &Combination) -> Result<(), InvalidCombination> {
        if play.is_pass() {
            return if self.is_lead() {
                Err(InvalidCombination::PassOnLead)
            } else {
                Ok(())
            };
        }
        if let Some(card) = play.cards().iter().find(|card| !self.hand.contains(card)) {
            return Err(InvalidCombination::NotInHand(*card));
        }
        if !self.is_lead() && play.len() != self.previous_play.len() {
            return Err(InvalidCombination::SizeMismatch {
                expected: self.previous_play.len(),
                actual: play.len(),
            });
        }
        if let Some(forced) = self.forced_card {
            if !play.contains(forced) {
                return Err(InvalidCombination::MissingForcedCard(forced));
            }
        }
        // Equal value is allowed; Pass sits at -1 so any lead clears this.
        if play.value() < self.previous_play.value() {
            return Err(InvalidCombination::TooWeak);
        }
        Ok(())
    }

    /// Turns a selection bitmap over `hand` into a validated play. `None`
    /// means pass.
    pub fn select(&self, selection: Option<&[bool]>) -> Result<Combination, InvalidCombination> {
        let play = match selection {
            None => Combination::pass(),
            Some(selected) => {
                if selected.len() != self.hand.len() {
                    return Err(InvalidCombination::SelectionLength {
                        expected: self.hand.len(),
                        actual: selected.len(),
                    });
                }
                let cards: Vec<Card> = self
                    .hand
                    .iter()
                    .zip(selected)
                    .filter(|(_, chosen)| **chosen)
                    .map(|(card, _)| *card)
                    .collect();
                if cards.is_empty() {
                    return Err(InvalidCombination::NothingSelected);
                }
                if !self.is_lead() && cards.len() != self.previous_play.len() {
                    return Err(InvalidCombination::SizeMismatch {
                        expected: self.previous_play.len(),
                        actual: cards.len(),
                    });
                }
                Combination::classify(&cards)?
            }
        };
        self.validate(&play)?;
        Ok(play)
    }

    /// Always legal: the lowest card when leading, otherwise a pass. The
    /// lowest card is the Three of Diamonds whenever that card is forced.
    pub fn fallback_play(&self) -> Combination {
        match self.hand.iter().min() {
            Some(card) if self.is_lead() => Combination::single(*card),
            _ => Combination::pass(),
        }
    }
}
