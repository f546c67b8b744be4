use std::fmt;

use chrono::{DateTime, Utc};

use super::game_state::Phase;
use super::player::PlayerId;

/// What the operator saw a player do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum ActionKind {
    /// Gives up the hand.
    Fold,
    /// Puts nothing in when nothing is owed.
    Check,
    /// Matches the current bet.
    Call,
    /// Puts in more than the current bet.
    Raise,
    /// Puts in the whole stack.
    AllIn,
}

impl ActionKind {
    /// Kinds that count as voluntarily putting money in pre-flop.
    pub fn is_voluntary(&self) -> bool {
        matches!(self, ActionKind::Call | ActionKind::Raise | ActionKind::AllIn)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Fold => write!(f, "fold"),
            ActionKind::Check => write!(f, "check"),
            ActionKind::Call => write!(f, "call"),
            ActionKind::Raise => write!(f, "raise"),
            ActionKind::AllIn => write!(f, "all-in"),
        }
    }
}

/// The badge shown next to a player.
///
/// Besides the player's last action there are a few sentinels the engine
/// writes itself: the winner of a pot, an eliminated player, and a new
/// player posting their arrival blind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionLabel {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
    Winner,
    Out,
    PostBigBlind,
}

impl ActionLabel {
    /// Whether the label shows the player already acted on this street.
    /// Folded and eliminated players don't count.
    pub fn has_acted(&self) -> bool {
        !matches!(self, ActionLabel::Fold | ActionLabel::Out)
    }
}

impl From<ActionKind> for ActionLabel {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Fold => ActionLabel::Fold,
            ActionKind::Check => ActionLabel::Check,
            ActionKind::Call => ActionLabel::Call,
            ActionKind::Raise => ActionLabel::Raise,
            ActionKind::AllIn => ActionLabel::AllIn,
        }
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionLabel::Fold => write!(f, "FOLD"),
            ActionLabel::Check => write!(f, "CHECK"),
            ActionLabel::Call => write!(f, "CALL"),
            ActionLabel::Raise => write!(f, "RAISE"),
            ActionLabel::AllIn => write!(f, "ALL-IN"),
            ActionLabel::Winner => write!(f, "WINNER"),
            ActionLabel::Out => write!(f, "OUT"),
            ActionLabel::PostBigBlind => write!(f, "POST BB"),
        }
    }
}

/// One entry in the action log of the current hand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRecord {
    pub player_id: PlayerId,
    pub player_name: String,
    /// `AllIn` whenever the action emptied the player's stack, whatever the
    /// operator pressed.
    pub action: ActionKind,
    /// Chips actually committed, after clamping to the stack.
    pub amount: u64,
    pub phase: Phase,
    pub timestamp: DateTime<Utc>,
}
