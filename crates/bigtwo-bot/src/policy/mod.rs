mod greedy;

pub use greedy::GreedyPolicy;

use bigtwo_core::game::state::GameState;
use bigtwo_core::model::card::Card;
use bigtwo_core::model::combination::Combination;
use bigtwo_core::model::seat::Seat;

/// What a policy may look at when choosing a play
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub hand: &'a [Card],
    pub previous_play: &'a Combination,
    pub forced_card: Option<Card>,
}

impl<'a> PolicyContext<'a> {
    pub fn from_state(seat: Seat, state: &'a GameState) -> Self {
        Self {
            seat,
            hand: state.hand(seat).cards(),
            previous_play: state.previous_play(),
            forced_card: state.forced_card(),
        }
    }

    pub fn is_lead(&self) -> bool {
        self.previous_play.is_pass()
    }
}

/// Decision interface for automated seats
pub trait Policy: Send {
    /// Choose the combination to play; `Combination::pass()` to pass
    fn choose_play(&mut self, ctx: &PolicyContext) -> Combination;
}
