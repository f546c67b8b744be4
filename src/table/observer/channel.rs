use std::sync::mpsc::Sender;

use crate::table::errors::ObserverError;
use crate::table::game_state::GameState;

use super::{CommittedState, StateObserver};

/// Forwards committed states into an mpsc channel. Once the receiver is
/// dropped the observer errors and is removed.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<CommittedState>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<CommittedState>) -> Self {
        Self { sender }
    }
}

impl StateObserver for ChannelObserver {
    fn on_commit(&mut self, version: u64, state: &GameState) -> Result<(), ObserverError> {
        self.sender
            .send(CommittedState {
                version,
                state: state.clone(),
            })
            .map_err(|_| ObserverError::StreamClosed)
    }
}
