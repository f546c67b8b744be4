use std::sync::mpsc::{self, Receiver};

use chrono::Utc;
use tracing::{debug, instrument, trace, warn};

#[cfg(feature = "serde")]
use std::collections::HashMap;
#[cfg(feature = "serde")]
use std::sync::mpsc::TryRecvError;

#[cfg(feature = "serde")]
use super::errors::SyncError;
#[cfg(feature = "serde")]
use super::sync::{RoomId, Snapshot, SyncChannel, SyncMode, SyncSession, WriterId};

use super::action::ActionKind;
use super::config::{ConflictPolicy, EngineConfig, Role, TableConfig};
use super::game_state::GameState;
use super::holder::StateHolder;
use super::observer::{ChannelObserver, CommittedState, StateObserver};
use super::player::PlayerId;
use super::replay::{HandReplay, MemoryReplayStore, ReplayDraft, ReplayStore};

/// Builder for [`HandEngine`].
///
/// ```
/// use poker_dealer::table::{HandEngineBuilder, MemoryReplayStore, Role};
///
/// let engine = HandEngineBuilder::default()
///     .role(Role::Spectator)
///     .replay_store(Box::new(MemoryReplayStore::new()))
///     .build();
/// assert_eq!(Role::Spectator, engine.role());
/// ```
#[derive(Default)]
pub struct HandEngineBuilder {
    config: EngineConfig,
    replay_store: Option<Box<dyn ReplayStore>>,
    observers: Vec<Box<dyn StateObserver>>,
}

impl HandEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.config.role = role;
        self
    }

    pub fn conflict_policy(mut self, conflict_policy: ConflictPolicy) -> Self {
        self.config.conflict_policy = conflict_policy;
        self
    }

    /// Should the engine panic if an observer errors. Default is false,
    /// which drops the observer and carries on.
    pub fn panic_on_observer_error(mut self, panic_on_observer_error: bool) -> Self {
        self.config.panic_on_observer_error = panic_on_observer_error;
        self
    }

    /// Where saved replays are kept. Defaults to memory.
    pub fn replay_store(mut self, replay_store: Box<dyn ReplayStore>) -> Self {
        self.replay_store = Some(replay_store);
        self
    }

    pub fn observers(mut self, observers: Vec<Box<dyn StateObserver>>) -> Self {
        self.observers = observers;
        self
    }

    /// Build the engine. Replays already in the store are loaded into the
    /// initial state.
    pub fn build(self) -> HandEngine {
        let replay_store = self
            .replay_store
            .unwrap_or_else(|| Box::new(MemoryReplayStore::new()));

        let mut state = GameState::default();
        match replay_store.load() {
            Ok(saved_hands) => state.saved_hands = saved_hands,
            Err(error) => warn!(?error, "Unable to load saved replays"),
        }

        let mut holder = StateHolder::new(state);
        holder.set_panic_on_observer_error(self.config.panic_on_observer_error);
        for observer in self.observers {
            holder.observe(observer);
        }

        HandEngine {
            holder,
            config: self.config,
            replay_store,
            #[cfg(feature = "serde")]
            writer: WriterId::new(),
            #[cfg(feature = "serde")]
            sync: None,
        }
    }
}

/// The dealer's assistant for one table.
///
/// Each operator command computes the next state from the current one and
/// commits it once, so observers and synced devices see one new state per
/// command. Commands that don't apply change nothing and return `false` (or
/// `None`). A spectator's engine ignores every command.
pub struct HandEngine {
    holder: StateHolder,
    config: EngineConfig,
    replay_store: Box<dyn ReplayStore>,
    #[cfg(feature = "serde")]
    writer: WriterId,
    #[cfg(feature = "serde")]
    sync: Option<SyncSession>,
}

impl Default for HandEngine {
    fn default() -> Self {
        HandEngineBuilder::default().build()
    }
}

impl HandEngine {
    pub fn state(&self) -> &GameState {
        self.holder.current()
    }

    /// Number of states committed so far.
    pub fn version(&self) -> u64 {
        self.holder.version()
    }

    pub fn role(&self) -> Role {
        self.config.role
    }

    pub fn set_role(&mut self, role: Role) {
        debug!(?role, "Changing role");
        self.config.role = role;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn observe(&mut self, observer: Box<dyn StateObserver>) {
        self.holder.observe(observer);
    }

    /// A stream of every state committed from now on.
    pub fn subscribe(&mut self) -> Receiver<CommittedState> {
        let (sender, receiver) = mpsc::channel();
        self.holder.observe(Box::new(ChannelObserver::new(sender)));
        receiver
    }

    /// Seat the configured table and deal the first hand. Saved replays are
    /// kept and any room sync is stopped.
    #[instrument(level = "trace", skip(self, config))]
    pub fn setup_game(&mut self, config: &TableConfig) -> bool {
        if !self.is_dealer("setup_game") {
            return false;
        }
        #[cfg(feature = "serde")]
        self.disable_sync();

        self.apply("setup_game", |state| {
            let saved_hands = std::mem::take(&mut state.saved_hands);
            *state = GameState::from_config(config);
            state.saved_hands = saved_hands;
            true
        })
    }

    /// Seat a new player. See [`GameState::add_player`].
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        chips: u64,
        insert_index: Option<usize>,
    ) -> Option<PlayerId> {
        let mut added = None;
        self.apply("add_player", |state| {
            added = Some(state.add_player(name, chips, insert_index));
            true
        });
        added
    }

    pub fn rebuy(&mut self, player_id: PlayerId, amount: u64) -> bool {
        self.apply("rebuy", |state| state.rebuy(player_id, amount))
    }

    pub fn eliminate_player(
        &mut self,
        player_id: PlayerId,
        eliminated_by: Option<PlayerId>,
    ) -> bool {
        self.apply("eliminate_player", |state| {
            state.eliminate_player(player_id, eliminated_by)
        })
    }

    /// Record a player's action, stamped with the current time.
    pub fn record_action(&mut self, player_id: PlayerId, kind: ActionKind, amount: u64) -> bool {
        let timestamp = Utc::now();
        self.apply("record_action", |state| {
            state.record_action(player_id, kind, amount, timestamp)
        })
    }

    pub fn advance_phase(&mut self) -> bool {
        self.apply("advance_phase", GameState::advance_phase)
    }

    pub fn resolve_hand(&mut self, winner_ids: &[PlayerId]) -> bool {
        self.apply("resolve_hand", |state| state.resolve_hand(winner_ids))
    }

    pub fn set_blinds(&mut self, small_blind: u64, big_blind: u64) -> bool {
        self.apply("set_blinds", |state| state.set_blinds(small_blind, big_blind))
    }

    /// Throw everything away, saved replays included.
    pub fn reset_game(&mut self) -> bool {
        self.apply("reset_game", |state| {
            *state = GameState::default();
            true
        })
    }

    /// A draft replay of the current hand for the operator to fill in.
    pub fn replay_draft(&self) -> ReplayDraft {
        ReplayDraft::from_state(self.state())
    }

    /// Save a replay as the newest one and persist the list. A failure to
    /// persist is logged and the replay is still kept in the state.
    #[instrument(level = "trace", skip(self, replay), fields(replay_id = %replay.id))]
    pub fn save_hand_replay(&mut self, replay: HandReplay) -> bool {
        let saved = self.apply("save_hand_replay", |state| {
            state.saved_hands.insert(0, replay);
            true
        });
        if saved {
            let saved_hands = &self.holder.current().saved_hands;
            if let Err(error) = self.replay_store.save(saved_hands) {
                warn!(?error, "Unable to persist saved replays");
            }
        }
        saved
    }

    fn is_dealer(&self, op: &'static str) -> bool {
        if self.config.role == Role::Spectator {
            debug!(op, "Spectators can't change the game");
            return false;
        }
        true
    }

    /// Run a transition on a copy of the state and commit the copy if the
    /// transition did anything.
    fn apply<F>(&mut self, op: &'static str, transition: F) -> bool
    where
        F: FnOnce(&mut GameState) -> bool,
    {
        if !self.is_dealer(op) {
            return false;
        }
        let mut next = self.holder.current().clone();
        if !transition(&mut next) {
            trace!(op, "Nothing to do");
            return false;
        }
        let version = self.holder.commit(next);
        trace!(op, version, "Committed");
        #[cfg(feature = "serde")]
        self.publish();
        true
    }
}

#[cfg(feature = "serde")]
impl HandEngine {
    /// Identifies this engine's snapshots in a room.
    pub fn writer_id(&self) -> WriterId {
        self.writer
    }

    pub fn sync_room(&self) -> Option<&RoomId> {
        self.sync.as_ref().map(|session| &session.room)
    }

    /// Connect to a room.
    ///
    /// Hosting publishes the current state straight away. Joining clears the
    /// local state until the room's state arrives through
    /// [`poll_remote`](Self::poll_remote).
    #[instrument(level = "trace", skip(self, channel))]
    pub fn enable_sync(
        &mut self,
        room: RoomId,
        mut channel: Box<dyn SyncChannel>,
        mode: SyncMode,
    ) -> Result<(), SyncError> {
        let updates = channel.subscribe(&room)?;
        let already_in_room = self.sync_room() == Some(&room);
        self.sync = Some(SyncSession {
            room,
            channel,
            updates,
            last_seen: HashMap::new(),
        });

        match mode {
            SyncMode::Host => self.publish(),
            SyncMode::Join if !already_in_room => {
                self.holder.commit(GameState::default());
            }
            SyncMode::Join => {}
        }
        debug!(?mode, "Sync enabled");
        Ok(())
    }

    /// Leave the room. The engine goes back to being the dealer console.
    pub fn disable_sync(&mut self) {
        if let Some(session) = self.sync.take() {
            debug!(room = %session.room, "Sync disabled");
        }
        self.config.role = Role::Dealer;
    }

    /// Apply the snapshots received from the room since the last poll.
    /// Returns how many replaced the local state.
    pub fn poll_remote(&mut self) -> usize {
        let Some(session) = self.sync.as_mut() else {
            return 0;
        };

        let mut applied = 0;
        loop {
            let snapshot = match session.updates.try_recv() {
                Ok(snapshot) => snapshot,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!(room = %session.room, "Room updates disconnected");
                    break;
                }
            };

            if snapshot.writer == self.writer || snapshot.room != session.room {
                continue;
            }

            let last_seen = session.last_seen.get(&snapshot.writer).copied();
            let differs = snapshot.state != *self.holder.current();
            let accepted = self
                .config
                .conflict_policy
                .accepts(last_seen, snapshot.version, differs);
            if last_seen.map_or(true, |seen| snapshot.version > seen) {
                session.last_seen.insert(snapshot.writer, snapshot.version);
            }

            if accepted {
                trace!(
                    writer = %snapshot.writer,
                    version = snapshot.version,
                    "Applying remote state"
                );
                self.holder.commit(snapshot.state);
                applied += 1;
            }
        }
        applied
    }

    /// Push the current state to the room, if there is one. Failures are
    /// logged and otherwise ignored.
    fn publish(&mut self) {
        let Some(session) = self.sync.as_mut() else {
            return;
        };
        let snapshot = Snapshot {
            room: session.room.clone(),
            writer: self.writer,
            version: self.holder.version(),
            state: self.holder.current().clone(),
        };
        if let Err(error) = session.channel.publish(&snapshot) {
            warn!(?error, room = %session.room, "Unable to sync game state");
        }
    }
}
