use std::{cell::RefCell, rc::Rc};

use tracing::trace;

use crate::table::errors::ObserverError;
use crate::table::game_state::GameState;

use super::{CommittedState, StateObserver};

/// Keeps every committed state in a shared vector.
#[derive(Debug, Clone, Default)]
pub struct VecObserver {
    storage: Rc<RefCell<Vec<CommittedState>>>,
}

impl VecObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_storage(storage: Rc<RefCell<Vec<CommittedState>>>) -> Self {
        Self { storage }
    }

    /// Access the underlying storage to inspect what was committed.
    pub fn get_storage(&self) -> Rc<RefCell<Vec<CommittedState>>> {
        self.storage.clone()
    }
}

impl StateObserver for VecObserver {
    fn on_commit(&mut self, version: u64, state: &GameState) -> Result<(), ObserverError> {
        let mut storage = self.storage.try_borrow_mut()?;
        storage.push(CommittedState {
            version,
            state: state.clone(),
        });
        trace!(version, recorded = storage.len(), "Recorded committed state");
        Ok(())
    }
}
