use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, RwLock};

use tracing::{debug, instrument, trace, warn};

use crate::table::errors::SyncError;

use super::{RoomDirectory, RoomId, RoomSummary, Snapshot, SyncChannel};

#[derive(Debug, Default)]
struct RoomEntry {
    /// JSON of the latest snapshot published to the room.
    latest: Option<String>,
    subscribers: Vec<Sender<Snapshot>>,
}

/// Rooms shared by every engine in this process.
///
/// Cloning the hub gives another handle to the same rooms, so each engine
/// can own its handle as its [`SyncChannel`]. Snapshots are stored and
/// delivered in their JSON form, the same way a remote store would hold
/// them.
#[derive(Debug, Clone, Default)]
pub struct MemorySyncHub {
    rooms: Arc<RwLock<HashMap<RoomId, RoomEntry>>>,
}

impl MemorySyncHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest snapshot published to a room.
    pub fn latest(&self, room: &RoomId) -> Result<Option<Snapshot>, SyncError> {
        let rooms = self.rooms.read().map_err(|_| SyncError::Poisoned)?;
        match rooms.get(room).and_then(|entry| entry.latest.as_deref()) {
            Some(json) => Ok(Some(Snapshot::from_json(json)?)),
            None => Ok(None),
        }
    }

    /// Forget a room. Its subscribers stop receiving updates.
    pub fn close_room(&self, room: &RoomId) -> Result<(), SyncError> {
        let mut rooms = self.rooms.write().map_err(|_| SyncError::Poisoned)?;
        rooms
            .remove(room)
            .map(|_| ())
            .ok_or_else(|| SyncError::UnknownRoom(room.to_string()))
    }
}

impl SyncChannel for MemorySyncHub {
    #[instrument(
        level = "trace",
        skip(self, snapshot),
        fields(room = %snapshot.room, version = snapshot.version)
    )]
    fn publish(&mut self, snapshot: &Snapshot) -> Result<(), SyncError> {
        let json = snapshot.to_json()?;
        let mut rooms = self.rooms.write().map_err(|_| SyncError::Poisoned)?;
        let entry = rooms.entry(snapshot.room.clone()).or_default();

        entry.subscribers.retain(|subscriber| {
            // Every subscriber gets its own copy decoded from the stored form.
            match Snapshot::from_json(&json) {
                Ok(decoded) => subscriber.send(decoded).is_ok(),
                Err(error) => {
                    warn!(?error, "Unable to decode published snapshot");
                    true
                }
            }
        });
        trace!(subscribers = entry.subscribers.len(), "Published snapshot");
        entry.latest = Some(json);
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    fn subscribe(&mut self, room: &RoomId) -> Result<Receiver<Snapshot>, SyncError> {
        let (sender, receiver) = mpsc::channel();
        let mut rooms = self.rooms.write().map_err(|_| SyncError::Poisoned)?;
        let entry = rooms.entry(room.clone()).or_default();

        if let Some(json) = entry.latest.as_deref() {
            // The receiver is still in scope so this send can't fail.
            let _ = sender.send(Snapshot::from_json(json)?);
        }
        entry.subscribers.push(sender);
        debug!(subscribers = entry.subscribers.len(), "Subscribed to room");
        Ok(receiver)
    }
}

impl RoomDirectory for MemorySyncHub {
    fn list_rooms(&self) -> Result<Vec<RoomSummary>, SyncError> {
        let rooms = self.rooms.read().map_err(|_| SyncError::Poisoned)?;
        let mut summaries = rooms
            .iter()
            .filter_map(|(room, entry)| entry.latest.as_deref().map(|json| (room, json)))
            .map(|(room, json)| {
                Ok(RoomSummary {
                    room: room.clone(),
                    state: Snapshot::from_json(json)?.state,
                })
            })
            .collect::<Result<Vec<_>, SyncError>>()?;
        summaries.sort_by(|a, b| a.room.cmp(&b.room));
        Ok(summaries)
    }
}
