use tracing::warn;

use crate::table::errors::ObserverError;
use crate::table::game_state::GameState;

use super::StateObserver;

/// An observer that always fails to record a state.
///
/// Useful for testing how the engine treats misbehaving observers.
pub struct FailingObserver;

impl StateObserver for FailingObserver {
    fn on_commit(&mut self, _version: u64, _state: &GameState) -> Result<(), ObserverError> {
        warn!("FailingObserver intentionally returning error");
        Err(ObserverError::UnableToRecordState)
    }
}
