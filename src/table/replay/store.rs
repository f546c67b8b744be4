use std::{cell::RefCell, rc::Rc};

use crate::table::errors::ReplayStoreError;

use super::HandReplay;

/// Durable storage for saved hand replays.
///
/// The whole list is loaded and saved at once, newest first.
pub trait ReplayStore {
    fn load(&self) -> Result<Vec<HandReplay>, ReplayStoreError>;
    fn save(&mut self, replays: &[HandReplay]) -> Result<(), ReplayStoreError>;
}

/// Keeps replays in memory. The storage can be shared with the caller to
/// inspect what was saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryReplayStore {
    storage: Rc<RefCell<Vec<HandReplay>>>,
}

impl MemoryReplayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_storage(storage: Rc<RefCell<Vec<HandReplay>>>) -> Self {
        Self { storage }
    }

    pub fn get_storage(&self) -> Rc<RefCell<Vec<HandReplay>>> {
        self.storage.clone()
    }
}

impl ReplayStore for MemoryReplayStore {
    fn load(&self) -> Result<Vec<HandReplay>, ReplayStoreError> {
        let storage = self
            .storage
            .try_borrow()
            .map_err(|_| ReplayStoreError::Unavailable)?;
        Ok(storage.clone())
    }

    fn save(&mut self, replays: &[HandReplay]) -> Result<(), ReplayStoreError> {
        let mut storage = self
            .storage
            .try_borrow_mut()
            .map_err(|_| ReplayStoreError::Unavailable)?;
        *storage = replays.to_vec();
        Ok(())
    }
}

/// Discards everything and never has anything to load.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReplayStore;

impl ReplayStore for NullReplayStore {
    fn load(&self) -> Result<Vec<HandReplay>, ReplayStoreError> {
        Ok(vec![])
    }

    fn save(&mut self, _replays: &[HandReplay]) -> Result<(), ReplayStoreError> {
        Ok(())
    }
}

/// A store that can never be reached.
#[cfg(test)]
pub(crate) struct FailingReplayStore;

#[cfg(test)]
impl ReplayStore for FailingReplayStore {
    fn load(&self) -> Result<Vec<HandReplay>, ReplayStoreError> {
        Err(ReplayStoreError::Unavailable)
    }

    fn save(&mut self, _replays: &[HandReplay]) -> Result<(), ReplayStoreError> {
        tracing::warn!("FailingReplayStore intentionally returning error");
        Err(ReplayStoreError::Unavailable)
    }
}
