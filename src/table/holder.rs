use tracing::{event, trace, Level};

use super::game_state::GameState;
use super::observer::StateObserver;

/// Holds the current [`GameState`] and the observers that want to hear
/// about new ones.
///
/// The state is only ever replaced as a whole through [`commit`]. Every
/// commit bumps the version and notifies the observers.
///
/// [`commit`]: StateHolder::commit
pub struct StateHolder {
    state: GameState,
    version: u64,
    observers: Vec<Box<dyn StateObserver>>,
    panic_on_observer_error: bool,
}

impl StateHolder {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            version: 0,
            observers: vec![],
            panic_on_observer_error: false,
        }
    }

    /// Panic instead of dropping an observer that errors.
    pub fn set_panic_on_observer_error(&mut self, panic_on_observer_error: bool) {
        self.panic_on_observer_error = panic_on_observer_error;
    }

    pub fn current(&self) -> &GameState {
        &self.state
    }

    /// Number of commits so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn observe(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    pub fn num_observers(&self) -> usize {
        self.observers.len()
    }

    /// Replace the state and notify the observers. Returns the new version.
    pub fn commit(&mut self, state: GameState) -> u64 {
        self.version += 1;
        self.state = state;
        let version = self.version;
        let current = &self.state;
        let panic_on_observer_error = self.panic_on_observer_error;

        self.observers.retain_mut(|observer| match observer.on_commit(version, current) {
            Ok(()) => true,
            Err(error) => {
                if panic_on_observer_error {
                    panic!("Observer failed to record state {version}: {error}");
                }
                event!(Level::WARN, ?error, version, "Observer error, removing observer");
                false
            }
        });

        trace!(version, observers = self.observers.len(), "Committed state");
        version
    }
}

impl Default for StateHolder {
    fn default() -> Self {
        Self::new(GameState::default())
    }
}
