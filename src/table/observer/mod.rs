//! Observers are told about every state the engine commits, local or
//! received from another device.
//!
//! An observer that returns an error is dropped from the engine (or the
//! engine panics when configured with `panic_on_observer_error`).
mod channel;
mod failing;
mod vec;

pub use channel::ChannelObserver;
pub use failing::FailingObserver;
pub use vec::VecObserver;

use super::errors::ObserverError;
use super::game_state::GameState;

/// A state as it was committed, with the version it was committed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedState {
    pub version: u64,
    pub state: GameState,
}

pub trait StateObserver {
    /// Called after each commit.
    ///
    /// # Arguments
    ///
    /// * `version` - Version of the committed state. Starts at 1 and grows by
    ///   one with every commit.
    /// * `state` - The state that was committed.
    fn on_commit(&mut self, version: u64, state: &GameState) -> Result<(), ObserverError>;
}
