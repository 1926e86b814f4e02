use crate::policy::{GreedyPolicy, Policy, PolicyContext};
use bigtwo_core::game::agent::{AgentKind, PlayerAgent};
use bigtwo_core::game::state::GameState;
use bigtwo_core::model::combination::Combination;
use bigtwo_core::model::seat::Seat;

/// Automated seat: runs its policy synchronously on the engine thread.
pub struct CpuAgent<P = GreedyPolicy> {
    name: String,
    policy: P,
}

impl CpuAgent<GreedyPolicy> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_policy(name, GreedyPolicy::new())
    }
}

impl Default for CpuAgent<GreedyPolicy> {
    fn default() -> Self {
        Self::new("CPU")
    }
}

impl<P: Policy> CpuAgent<P> {
    pub fn with_policy(name: impl Into<String>, policy: P) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<P: Policy> PlayerAgent for CpuAgent<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Automated
    }

    fn do_turn(&mut self, seat: Seat, state: &GameState) -> Combination {
        let ctx = PolicyContext::from_state(seat, state);
        self.policy.choose_play(&ctx)
    }
}
