use crate::game::state::GameState;

/// Called after every state change. Observers only get a shared reference.
pub trait GameObserver: Send {
    fn game_state_changed(&mut self, state: &GameState);
}

impl<F> GameObserver for F
where
    F: FnMut(&GameState) + Send,
{
    fn game_state_changed(&mut self, state: &GameState) {
        self(state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    entries: Vec<(ObserverId, Box<dyn GameObserver>)>,
}

impl ObserverRegistry {
    pub(crate) fn add(&mut self, observer: Box<dyn GameObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, state: &GameState) {
        for (_, observer) in &mut self.entries {
            observer.game_state_changed(state);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
