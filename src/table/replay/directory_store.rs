use std::{fs::File, io::ErrorKind, path::PathBuf};

use tracing::{debug, instrument};

use crate::table::errors::ReplayStoreError;

use super::{HandReplay, ReplayStore};

const REPLAYS_FILE: &str = "saved_hands.json";

/// Stores replays as a JSON file in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryReplayStore {
    base_path: PathBuf,
}

impl DirectoryReplayStore {
    /// Creates a new `DirectoryReplayStore`.
    ///
    /// # Arguments
    ///
    /// * `base_path` - The directory the replays file is kept in. It is
    ///   created on the first save if it doesn't exist.
    pub fn new(base_path: PathBuf) -> Self {
        debug!(?base_path, "Creating DirectoryReplayStore");
        Self { base_path }
    }

    pub fn replays_path(&self) -> PathBuf {
        self.base_path.join(REPLAYS_FILE)
    }
}

impl ReplayStore for DirectoryReplayStore {
    /// Loads the saved replays. A store that was never written to holds no
    /// replays.
    #[instrument(level = "trace", skip(self), fields(base_path = ?self.base_path))]
    fn load(&self) -> Result<Vec<HandReplay>, ReplayStoreError> {
        let path = self.replays_path();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(?path, "No saved replays yet");
                return Ok(vec![]);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Rewrites the whole list every time.
    #[instrument(level = "trace", skip(self, replays), fields(base_path = ?self.base_path))]
    fn save(&mut self, replays: &[HandReplay]) -> Result<(), ReplayStoreError> {
        if !self.base_path.exists() {
            debug!(?self.base_path, "Creating directory for saved replays");
            std::fs::create_dir_all(&self.base_path)?;
        }

        let path = self.replays_path();
        let file = File::create(&path)?;
        debug!(?path, replay_count = replays.len(), "Writing saved replays");
        Ok(serde_json::to_writer_pretty(&file, replays)?)
    }
}
