//! # Room sync
//!
//! A game can be shared with other devices through a room. The engine that
//! hosts the room publishes a [`Snapshot`] of the state after every change;
//! everyone subscribed to the room receives it and replaces their state with
//! it. Snapshots travel as the JSON form of the state.
//!
//! The transport is behind the [`SyncChannel`] trait and the list of live
//! rooms behind [`RoomDirectory`]. [`MemorySyncHub`] implements both inside
//! one process.
use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::Receiver;

use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use super::errors::SyncError;
use super::game_state::GameState;

mod memory;

pub use memory::MemorySyncHub;

/// Length of a generated room code.
pub const ROOM_ID_LEN: usize = 6;

/// A short code players type in to join a room.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// A fresh room code of upper case letters and digits.
    pub fn random() -> Self {
        Self::random_with_rng(&mut rand::thread_rng())
    }

    pub fn random_with_rng<R: Rng>(rng: &mut R) -> Self {
        let code = rng
            .sample_iter(&Alphanumeric)
            .take(ROOM_ID_LEN)
            .map(|b| char::from(b).to_ascii_uppercase())
            .collect();
        Self(code)
    }

    /// A room code as typed by a user. Surrounding whitespace is ignored and
    /// letters are upper cased.
    pub fn parse(code: &str) -> Self {
        Self(code.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(code: &str) -> Self {
        Self::parse(code)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies the engine that published a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct WriterId(Uuid);

impl WriterId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for WriterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WriterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A published state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub room: RoomId,
    pub writer: WriterId,
    /// The writer's state version when it published.
    pub version: u64,
    pub state: GameState,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Whether enabling sync starts a new room or joins an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncMode {
    /// Push the local state to the room right away.
    Host,
    /// Drop the local state and wait for the room's state to arrive.
    Join,
}

/// Transport for snapshots, keyed by room.
pub trait SyncChannel {
    fn publish(&mut self, snapshot: &Snapshot) -> Result<(), SyncError>;

    /// Start receiving the room's snapshots. The latest snapshot, if the
    /// room has one, is delivered first.
    fn subscribe(&mut self, room: &RoomId) -> Result<Receiver<Snapshot>, SyncError>;
}

/// A room and the latest state published to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub room: RoomId,
    pub state: GameState,
}

impl RoomSummary {
    /// Players still in the game.
    pub fn num_active_players(&self) -> usize {
        self.state
            .players
            .iter()
            .filter(|p| !p.is_eliminated)
            .count()
    }
}

/// Lists the rooms that have a published state.
pub trait RoomDirectory {
    fn list_rooms(&self) -> Result<Vec<RoomSummary>, SyncError>;
}

/// An engine's connection to a room.
pub(crate) struct SyncSession {
    pub(crate) room: RoomId,
    pub(crate) channel: Box<dyn SyncChannel>,
    pub(crate) updates: Receiver<Snapshot>,
    /// Newest version seen from each remote writer.
    pub(crate) last_seen: HashMap<WriterId, u64>,
}

/// A channel whose transport is always down.
#[cfg(test)]
pub(crate) struct FailingSyncChannel {
    pub(crate) updates: Option<Receiver<Snapshot>>,
}

#[cfg(test)]
impl SyncChannel for FailingSyncChannel {
    fn publish(&mut self, _snapshot: &Snapshot) -> Result<(), SyncError> {
        Err(SyncError::Rejected("transport is down".to_string()))
    }

    fn subscribe(&mut self, room: &RoomId) -> Result<Receiver<Snapshot>, SyncError> {
        self.updates
            .take()
            .ok_or_else(|| SyncError::UnknownRoom(room.to_string()))
    }
}
