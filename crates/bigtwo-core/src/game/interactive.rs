use crate::error::InvalidCombination;
use crate::game::agent::{AgentKind, PlayerAgent, TurnRequest};
use crate::game::rendezvous::{Delivery, Rendezvous};
use crate::game::state::GameState;
use crate::model::combination::Combination;
use crate::model::seat::Seat;
use std::sync::Arc;
use std::time::Duration;

type TurnChannel = Rendezvous<TurnRequest, Combination>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStatus {
    Accepted,
    /// No turn is waiting on this input; the submission was dropped.
    NoPendingTurn,
}

impl InputStatus {
    fn from_answered(answered: bool) -> Self {
        if answered {
            InputStatus::Accepted
        } else {
            InputStatus::NoPendingTurn
        }
    }
}

/// Producer side of a human or remote seat. Cloneable and usable from any
/// thread; a rejected submission leaves the turn waiting.
#[derive(Debug, Clone)]
pub struct TurnInput {
    channel: Arc<TurnChannel>,
}

impl TurnInput {
    /// The decision the engine is currently waiting on.
    pub fn pending(&self) -> Option<TurnRequest> {
        self.channel.pending()
    }

    pub fn is_waiting(&self) -> bool {
        self.channel.is_pending()
    }

    /// Selection bitmap over the pending hand; `None` passes.
    pub fn receive_selection(
        &self,
        selection: Option<&[bool]>,
    ) -> Result<InputStatus, InvalidCombination> {
        self.channel
            .respond_with(|request| request.select(selection))
            .map(InputStatus::from_answered)
    }

    pub fn receive_combination(
        &self,
        combination: Combination,
    ) -> Result<InputStatus, InvalidCombination> {
        self.channel
            .respond_with(|request| request.validate(&combination).map(|()| combination.clone()))
            .map(InputStatus::from_answered)
    }

    /// Stops waiting for this seat; the agent falls back for this and every
    /// later turn.
    pub fn close(&self) {
        self.channel.close();
    }
}

/// A seat driven by local input.
pub struct LocalAgent {
    name: String,
    channel: Arc<TurnChannel>,
    patience: Option<Duration>,
    fallback: Option<Box<dyn PlayerAgent>>,
}

impl LocalAgent {
    pub fn new(name: impl Into<String>) -> (Self, TurnInput) {
        let channel = Arc::new(TurnChannel::new());
        let agent = Self {
            name: name.into(),
            channel: Arc::clone(&channel),
            patience: None,
            fallback: None,
        };
        (agent, TurnInput { channel })
    }

    /// Hands the turn to `fallback` when no input arrives within `patience`
    /// or the input is closed.
    pub fn with_fallback(mut self, fallback: Box<dyn PlayerAgent>, patience: Duration) -> Self {
        self.fallback = Some(fallback);
        self.patience = Some(patience);
        self
    }
}

impl PlayerAgent for LocalAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Local
    }

    fn do_turn(&mut self, seat: Seat, state: &GameState) -> Combination {
        let request = TurnRequest::from_state(seat, state);
        let delivery = match self.patience {
            Some(patience) => self.channel.request_timeout(request.clone(), patience),
            None => self.channel.request(request.clone()),
        };
        match delivery {
            Delivery::Answered(play) => play,
            Delivery::Closed | Delivery::TimedOut => match self.fallback.as_mut() {
                Some(fallback) => fallback.do_turn(seat, state),
                None => request.fallback_play(),
            },
        }
    }
}

/// Forwards turns to a remote peer. The peer's answer comes back through the
/// paired [`TurnInput`].
pub trait RemoteLink: Send {
    /// Announces a pending turn; false once the link is gone.
    fn request_turn(&mut self, request: &TurnRequest) -> bool;
}

/// A seat played over a link. Once the link fails or the input is closed,
/// `fallback` plays this and every later turn.
pub struct RemoteAgent<L> {
    name: String,
    link: L,
    channel: Arc<TurnChannel>,
    fallback: Box<dyn PlayerAgent>,
    disconnected: bool,
}

impl<L: RemoteLink> RemoteAgent<L> {
    pub fn new(
        name: impl Into<String>,
        link: L,
        fallback: Box<dyn PlayerAgent>,
    ) -> (Self, TurnInput) {
        let channel = Arc::new(TurnChannel::new());
        let agent = Self {
            name: name.into(),
            link,
            channel: Arc::clone(&channel),
            fallback,
            disconnected: false,
        };
        (agent, TurnInput { channel })
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    fn disconnect(&mut self, seat: Seat) {
        if !self.disconnected {
            tracing::warn!(
                target: "bigtwo_core::engine",
                seat = %seat,
                name = %self.name,
                fallback = %self.fallback.name(),
                "remote seat lost; fallback agent takes over"
            );
        }
        self.disconnected = true;
    }
}

impl<L: RemoteLink> PlayerAgent for RemoteAgent<L> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Remote
    }

    fn do_turn(&mut self, seat: Seat, state: &GameState) -> Combination {
        if !self.disconnected {
            let request = TurnRequest::from_state(seat, state);
            if self.link.request_turn(&request) {
                match self.channel.request(request) {
                    Delivery::Answered(play) => return play,
                    Delivery::Closed | Delivery::TimedOut => self.disconnect(seat),
                }
            } else {
                self.disconnect(seat);
            }
        }
        self.fallback.do_turn(seat, state)
    }
}
