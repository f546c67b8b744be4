use thiserror::Error;

use crate::core::Card;

use super::config::MAX_PLAYERS;
use super::player::PlayerId;

/// Errors from validating a table before the first hand is dealt.
#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum TableConfigError {
    #[error("At least two players are needed, got {0}")]
    NotEnoughPlayers(usize),

    #[error("At most {max} players can be seated, got {0}", max = MAX_PLAYERS)]
    TooManyPlayers(usize),

    #[error("Player name at seat {0} is blank")]
    BlankPlayerName(usize),

    #[error("initial_chips must be positive")]
    InvalidInitialChips,

    #[error("big_blind must be positive")]
    InvalidBigBlind,

    #[error("small_blind must be positive")]
    InvalidSmallBlind,

    #[error("small_blind {small_blind} can't be larger than big_blind {big_blind}")]
    SmallBlindAboveBigBlind { small_blind: u64, big_blind: u64 },

    #[error("dealer_index {dealer_index} must be less than the number of players {num_players}")]
    InvalidDealerIndex {
        dealer_index: usize,
        num_players: usize,
    },
}

/// Errors reading a table configuration from JSON.
#[cfg(feature = "serde")]
#[derive(Error, Debug)]
pub enum TableConfigLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse table config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid table config: {0}")]
    Invalid(#[from] TableConfigError),
}

/// Errors an observer can return when it fails to record a committed state.
#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("Unable to record committed state")]
    UnableToRecordState,

    #[error("Storage is already borrowed")]
    BorrowMutError(#[from] std::cell::BorrowMutError),

    #[error("Observer stream has been closed")]
    StreamClosed,
}

/// Errors from filling in a replay draft.
#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum ReplayError {
    #[error("Card {0} has already been placed")]
    DuplicateCard(Card),

    #[error("Board slot {0} is out of range, the board has 5 cards")]
    InvalidBoardSlot(usize),

    #[error("Hole card slot {0} is out of range, players hold 2 cards")]
    InvalidHoleSlot(usize),

    #[error("Player {0} is not part of this replay")]
    UnknownPlayer(PlayerId),

    #[error("Player {0} folded so their cards are not recorded")]
    FoldedPlayer(PlayerId),
}

/// Errors from the durable replay store.
#[derive(Error, Debug)]
pub enum ReplayStoreError {
    #[error("Error storing replays caused by IO error")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("Unable to (de)serialize replays")]
    Serde(#[from] serde_json::Error),

    #[error("Replay store is unavailable")]
    Unavailable,
}

/// Errors from the room sync channel and room directory.
#[cfg(feature = "serde")]
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Unable to (de)serialize game state: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Room {0} does not exist")]
    UnknownRoom(String),

    #[error("The shared room store lock was poisoned")]
    Poisoned,

    #[error("Sync channel rejected the update: {0}")]
    Rejected(String),
}
