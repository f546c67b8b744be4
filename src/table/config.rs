//! # Table configuration
//!
//! A table is described by the seated players, the starting stack, the blinds
//! and where the button starts. [`TableConfigBuilder`] validates all of it
//! before the first hand so the engine itself never has to reject input.
//!
//! Configurations can also be read from JSON, either inline or from a file:
//!
//! ```json
//! {
//!   "player_names": ["Alice", "Bob", "Carol"],
//!   "initial_chips": 1000,
//!   "small_blind": 5,
//!   "big_blind": 10,
//!   "dealer_index": 2
//! }
//! ```
//!
//! `small_blind` defaults to half the big blind and `dealer_index` to 0.
//!
//! [`EngineConfig`] holds the knobs of the engine itself: the operator's role,
//! how remote updates are merged, and whether a failing observer is fatal.
#[cfg(feature = "serde")]
use std::{io::ErrorKind, path::Path};

#[cfg(feature = "serde")]
use super::errors::TableConfigLoadError;
use super::errors::TableConfigError;

/// The most players a 52 card deck can deal hole cards to with a full board.
pub const MAX_PLAYERS: usize = 23;

/// A validated table. Use [`TableConfigBuilder`] to create one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableConfig {
    player_names: Vec<String>,
    initial_chips: u64,
    small_blind: u64,
    big_blind: u64,
    dealer_index: usize,
}

impl TableConfig {
    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    pub fn initial_chips(&self) -> u64 {
        self.initial_chips
    }

    pub fn small_blind(&self) -> u64 {
        self.small_blind
    }

    pub fn big_blind(&self) -> u64 {
        self.big_blind
    }

    pub fn dealer_index(&self) -> usize {
        self.dealer_index
    }

    /// Parse and validate a config from a JSON string.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, TableConfigLoadError> {
        let raw: RawTableConfig = serde_json::from_str(json)?;
        Ok(raw.into_builder().build()?)
    }

    /// Read, parse and validate a config from a JSON file.
    #[cfg(feature = "serde")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TableConfigLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Treat the input as a file path if such a file exists, otherwise as
    /// inline JSON.
    #[cfg(feature = "serde")]
    pub fn from_str_or_file(input: &str) -> Result<Self, TableConfigLoadError> {
        match std::fs::read_to_string(input) {
            Ok(contents) => Self::from_json(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_json(input),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTableConfig {
    player_names: Vec<String>,
    initial_chips: u64,
    #[serde(default)]
    small_blind: Option<u64>,
    big_blind: u64,
    #[serde(default)]
    dealer_index: Option<usize>,
}

#[cfg(feature = "serde")]
impl RawTableConfig {
    fn into_builder(self) -> TableConfigBuilder {
        let mut builder = TableConfigBuilder::new()
            .player_names(self.player_names)
            .initial_chips(self.initial_chips)
            .big_blind(self.big_blind);
        if let Some(small_blind) = self.small_blind {
            builder = builder.small_blind(small_blind);
        }
        if let Some(dealer_index) = self.dealer_index {
            builder = builder.dealer_index(dealer_index);
        }
        builder
    }
}

/// Builder for [`TableConfig`].
///
/// ```
/// use poker_dealer::table::TableConfigBuilder;
///
/// let config = TableConfigBuilder::new()
///     .player_names(["Alice", "Bob"])
///     .initial_chips(500)
///     .big_blind(20)
///     .build()
///     .unwrap();
///
/// assert_eq!(10, config.small_blind()); // defaults to half the big blind
/// assert_eq!(0, config.dealer_index());
/// ```
#[derive(Debug, Default, Clone)]
pub struct TableConfigBuilder {
    player_names: Vec<String>,
    initial_chips: Option<u64>,
    small_blind: Option<u64>,
    big_blind: Option<u64>,
    dealer_index: Option<usize>,
}

impl TableConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the seated players in seating order. Required.
    pub fn player_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.player_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Starting stack of every player. Required.
    pub fn initial_chips(mut self, chips: u64) -> Self {
        self.initial_chips = Some(chips);
        self
    }

    /// Big blind. Required.
    pub fn big_blind(mut self, big_blind: u64) -> Self {
        self.big_blind = Some(big_blind);
        self
    }

    /// Small blind. Defaults to half the big blind.
    pub fn small_blind(mut self, small_blind: u64) -> Self {
        self.small_blind = Some(small_blind);
        self
    }

    /// Set both blinds at once.
    pub fn blinds(mut self, big: u64, small: u64) -> Self {
        self.big_blind = Some(big);
        self.small_blind = Some(small);
        self
    }

    /// Seat of the dealer button for the first hand. Defaults to 0.
    pub fn dealer_index(mut self, idx: usize) -> Self {
        self.dealer_index = Some(idx);
        self
    }

    pub fn build(self) -> Result<TableConfig, TableConfigError> {
        let num_players = self.player_names.len();
        if num_players < 2 {
            return Err(TableConfigError::NotEnoughPlayers(num_players));
        }
        if num_players > MAX_PLAYERS {
            return Err(TableConfigError::TooManyPlayers(num_players));
        }

        let mut player_names = Vec::with_capacity(num_players);
        for (idx, name) in self.player_names.into_iter().enumerate() {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(TableConfigError::BlankPlayerName(idx));
            }
            player_names.push(trimmed.to_string());
        }

        let initial_chips = self.initial_chips.unwrap_or(0);
        if initial_chips == 0 {
            return Err(TableConfigError::InvalidInitialChips);
        }

        let big_blind = self.big_blind.unwrap_or(0);
        if big_blind == 0 {
            return Err(TableConfigError::InvalidBigBlind);
        }

        let small_blind = self.small_blind.unwrap_or(big_blind / 2);
        if small_blind == 0 {
            return Err(TableConfigError::InvalidSmallBlind);
        }
        if small_blind > big_blind {
            return Err(TableConfigError::SmallBlindAboveBigBlind {
                small_blind,
                big_blind,
            });
        }

        let dealer_index = self.dealer_index.unwrap_or(0);
        if dealer_index >= num_players {
            return Err(TableConfigError::InvalidDealerIndex {
                dealer_index,
                num_players,
            });
        }

        Ok(TableConfig {
            player_names,
            initial_chips,
            small_blind,
            big_blind,
            dealer_index,
        })
    }
}

/// Who is sitting at this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Role {
    /// Runs the game. Every command is applied.
    #[default]
    Dealer,
    /// Watches a synced room. Commands are ignored.
    Spectator,
}

/// How a snapshot received from another writer is merged into local state.
///
/// Neither policy merges: an accepted snapshot replaces the local state
/// wholesale, so two dealers editing the same room can overwrite each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConflictPolicy {
    /// Any remote state that differs from the local one replaces it.
    #[default]
    LastObservedWins,
    /// Like `LastObservedWins`, but a snapshot is dropped unless its version
    /// is newer than the last one seen from the same writer.
    MonotonicPerWriter,
}

impl ConflictPolicy {
    /// Decide whether a remote snapshot is applied.
    ///
    /// * `last_seen` - the newest version already seen from the snapshot's
    ///   writer.
    /// * `version` - the snapshot's version.
    /// * `differs` - whether the remote state differs from the local one.
    pub fn accepts(&self, last_seen: Option<u64>, version: u64, differs: bool) -> bool {
        match self {
            ConflictPolicy::LastObservedWins => differs,
            ConflictPolicy::MonotonicPerWriter => {
                differs && last_seen.map_or(true, |seen| version > seen)
            }
        }
    }
}

/// Settings of a [`HandEngine`](crate::table::HandEngine).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub role: Role,
    pub conflict_policy: ConflictPolicy,
    /// Panic instead of dropping an observer that returns an error.
    pub panic_on_observer_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_builder() -> TableConfigBuilder {
        TableConfigBuilder::new()
            .player_names(["Alice", "Bob", "Carol"])
            .initial_chips(1000)
            .blinds(10, 5)
    }

    #[test]
    fn test_valid_config() {
        let config = valid_builder().dealer_index(2).build().unwrap();
        assert_eq!(3, config.player_names().len());
        assert_eq!(1000, config.initial_chips());
        assert_eq!(5, config.small_blind());
        assert_eq!(10, config.big_blind());
        assert_eq!(2, config.dealer_index());
    }

    #[test]
    fn test_names_are_trimmed() {
        let config = valid_builder()
            .player_names(["  Alice ", "Bob"])
            .build()
            .unwrap();
        assert_eq!("Alice", config.player_names()[0]);
    }

    #[test]
    fn test_not_enough_players() {
        let err = valid_builder().player_names(["Solo"]).build().unwrap_err();
        assert_eq!(TableConfigError::NotEnoughPlayers(1), err);
    }

    #[test]
    fn test_too_many_players() {
        let names: Vec<String> = (0..24).map(|i| format!("P{i}")).collect();
        let err = valid_builder().player_names(names).build().unwrap_err();
        assert_eq!(TableConfigError::TooManyPlayers(24), err);
    }

    #[test]
    fn test_blank_name() {
        let err = valid_builder()
            .player_names(["Alice", "   "])
            .build()
            .unwrap_err();
        assert_eq!(TableConfigError::BlankPlayerName(1), err);
    }

    #[test]
    fn test_invalid_amounts() {
        assert_eq!(
            TableConfigError::InvalidInitialChips,
            valid_builder().initial_chips(0).build().unwrap_err()
        );
        assert_eq!(
            TableConfigError::InvalidBigBlind,
            valid_builder().big_blind(0).build().unwrap_err()
        );
        assert_eq!(
            TableConfigError::InvalidSmallBlind,
            valid_builder().small_blind(0).build().unwrap_err()
        );
        assert_eq!(
            TableConfigError::SmallBlindAboveBigBlind {
                small_blind: 20,
                big_blind: 10
            },
            valid_builder().small_blind(20).build().unwrap_err()
        );
    }

    #[test]
    fn test_small_blind_of_one_chip_big_blind() {
        // Half of a one chip big blind rounds down to nothing.
        let err = TableConfigBuilder::new()
            .player_names(["Alice", "Bob"])
            .initial_chips(100)
            .big_blind(1)
            .build()
            .unwrap_err();
        assert_eq!(TableConfigError::InvalidSmallBlind, err);
    }

    #[test]
    fn test_dealer_out_of_range() {
        let err = valid_builder().dealer_index(3).build().unwrap_err();
        assert_eq!(
            TableConfigError::InvalidDealerIndex {
                dealer_index: 3,
                num_players: 3
            },
            err
        );
    }

    #[test]
    fn test_conflict_policies() {
        let lww = ConflictPolicy::LastObservedWins;
        assert!(lww.accepts(Some(10), 3, true));
        assert!(!lww.accepts(None, 3, false));

        let monotonic = ConflictPolicy::MonotonicPerWriter;
        assert!(monotonic.accepts(None, 1, true));
        assert!(monotonic.accepts(Some(3), 4, true));
        assert!(!monotonic.accepts(Some(3), 3, true));
        assert!(!monotonic.accepts(Some(3), 2, true));
        assert!(!monotonic.accepts(Some(3), 4, false));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let config = TableConfig::from_json(
            r#"{"player_names": ["Alice", "Bob", "Carol"], "initial_chips": 200, "big_blind": 4, "dealer_index": 1}"#,
        )
        .unwrap();
        assert_eq!(2, config.small_blind());
        assert_eq!(4, config.big_blind());
        assert_eq!(1, config.dealer_index());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_validates() {
        let err = TableConfig::from_json(
            r#"{"player_names": ["Alice"], "initial_chips": 200, "big_blind": 4}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TableConfigLoadError::Invalid(TableConfigError::NotEnoughPlayers(1))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_parse_error() {
        let err = TableConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, TableConfigLoadError::Parse(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_str_or_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("table.json");
        std::fs::write(
            &path,
            r#"{"player_names": ["Alice", "Bob"], "initial_chips": 100, "small_blind": 1, "big_blind": 2}"#,
        )
        .unwrap();

        let from_file = TableConfig::from_str_or_file(path.to_str().unwrap()).unwrap();
        assert_eq!(1, from_file.small_blind());

        let inline = TableConfig::from_str_or_file(
            r#"{"player_names": ["Alice", "Bob"], "initial_chips": 100, "big_blind": 2}"#,
        )
        .unwrap();
        assert_eq!(inline.player_names(), from_file.player_names());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_engine_config_defaults_from_json() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"conflict_policy": "monotonic_per_writer"}"#).unwrap();
        assert_eq!(Role::Dealer, config.role);
        assert_eq!(ConflictPolicy::MonotonicPerWriter, config.conflict_policy);
        assert!(!config.panic_on_observer_error);
    }
}
