//! # Table
//!
//! Everything the dealer tracks at a live table: seats and stacks, blinds and
//! the button, whose turn it is, the pot and how it is paid out, and the
//! statistics of every player.
//!
//! The [`HandEngine`] is the entry point. It owns the [`GameState`] through a
//! [`StateHolder`], turns operator commands into state transitions, tells
//! [`StateObserver`]s about every new state and, with the `serde` feature,
//! keeps other devices in sync through a room.
//!
//! Cards are never dealt or evaluated here. The operator says who won and the
//! engine pays them.
mod action;
mod config;
mod engine;
mod errors;
mod game_state;
mod holder;
mod player;
mod transitions;

pub mod observer;
pub mod replay;
#[cfg(feature = "serde")]
pub mod sync;
#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use action::{ActionKind, ActionLabel, ActionRecord};
pub use config::{
    ConflictPolicy, EngineConfig, Role, TableConfig, TableConfigBuilder, MAX_PLAYERS,
};
pub use engine::{HandEngine, HandEngineBuilder};
#[cfg(feature = "serde")]
pub use errors::{SyncError, TableConfigLoadError};
pub use errors::{ObserverError, ReplayError, ReplayStoreError, TableConfigError};
pub use game_state::{GameState, Phase, DEFAULT_BIG_BLIND, DEFAULT_SMALL_BLIND};
pub use holder::StateHolder;
pub use observer::{CommittedState, StateObserver};
pub use player::{Player, PlayerId, PlayerStats};
#[cfg(feature = "serde")]
pub use replay::DirectoryReplayStore;
pub use replay::{
    HandReplay, MemoryReplayStore, NullReplayStore, ReplayDraft, ReplayPlayer, ReplayStore,
};
#[cfg(feature = "serde")]
pub use sync::{
    MemorySyncHub, RoomDirectory, RoomId, RoomSummary, Snapshot, SyncChannel, SyncMode, WriterId,
};
