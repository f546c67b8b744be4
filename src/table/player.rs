use std::fmt;

use uuid::Uuid;

use super::action::ActionLabel;
use super::game_state::Phase;

/// Stable identity of a seated player. Seat indexes move when players are
/// inserted so everything outside the engine refers to players by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PlayerId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Running counters kept for every player over the whole game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerStats {
    pub pre_flop_folds: u32,
    pub flop_folds: u32,
    pub turn_folds: u32,
    pub river_folds: u32,
    pub raises: u32,
    pub all_ins: u32,
    pub hands_won: u32,
    /// Hands the player was dealt into.
    pub total_hands: u32,
    /// Pre-flop raises made when nobody had raised yet.
    pub hands_opened: u32,
    /// Pre-flop raises made over an earlier raise.
    pub three_bets: u32,
    /// Hands where the player put money in pre-flop by choice (VPIP).
    pub voluntarily_played: u32,
    /// Players this player knocked out.
    pub eliminations: u32,
}

impl PlayerStats {
    /// Count a fold on the given street. Folds at showdown aren't tracked.
    pub(crate) fn record_fold(&mut self, phase: Phase) {
        match phase {
            Phase::PreFlop => self.pre_flop_folds += 1,
            Phase::Flop => self.flop_folds += 1,
            Phase::Turn => self.turn_folds += 1,
            Phase::River => self.river_folds += 1,
            Phase::Showdown => {}
        }
    }

    pub fn total_folds(&self) -> u32 {
        self.pre_flop_folds + self.flop_folds + self.turn_folds + self.river_folds
    }

    /// VPIP as a whole percentage of hands dealt, rounded to nearest.
    pub fn vpip_percent(&self) -> u32 {
        if self.total_hands == 0 {
            0
        } else {
            let scaled = u64::from(self.voluntarily_played) * 100;
            let hands = u64::from(self.total_hands);
            ((scaled + hands / 2) / hands) as u32
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Chips in front of the player, not counting anything already bet.
    pub chips: u64,
    pub rebuy_count: u32,
    /// Stack the player sat down with.
    pub initial_chips: u64,
    /// Stack at the start of this hand, before any blind was posted.
    pub initial_chips_for_hand: u64,
    /// Chips put in the pot this hand that haven't been paid out yet.
    pub hand_contribution: u64,
    /// Chips put in on the current street.
    pub current_bet: u64,
    pub position: usize,
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
    pub is_folded: bool,
    pub is_all_in: bool,
    pub is_eliminated: bool,
    /// Set for players seated mid-game; cleared once their arrival blind is
    /// posted.
    pub needs_to_post_dead_blind: bool,
    pub rebought_this_hand: bool,
    pub last_action: Option<ActionLabel>,
    pub stats: PlayerStats,
}

impl Player {
    pub fn new(name: impl Into<String>, chips: u64, position: usize) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.into(),
            chips,
            rebuy_count: 0,
            initial_chips: chips,
            initial_chips_for_hand: chips,
            hand_contribution: 0,
            current_bet: 0,
            position,
            is_dealer: false,
            is_small_blind: false,
            is_big_blind: false,
            is_folded: false,
            is_all_in: false,
            is_eliminated: false,
            needs_to_post_dead_blind: false,
            rebought_this_hand: false,
            last_action: None,
            stats: PlayerStats::default(),
        }
    }

    /// Still holding cards with chips behind, so able to act.
    pub fn can_act(&self) -> bool {
        !self.is_folded && !self.is_eliminated && !self.is_all_in
    }

    /// Still holding cards, all-in or not.
    pub fn is_in_hand(&self) -> bool {
        !self.is_folded && !self.is_eliminated
    }

    pub fn is_active(&self) -> bool {
        self.can_act()
    }

    /// Out of chips but not yet rebought or eliminated by the operator.
    pub fn is_pending_bust(&self) -> bool {
        self.chips == 0 && !self.is_eliminated
    }

    /// Whether the player's badge shows they already acted this street.
    pub fn has_acted(&self) -> bool {
        self.last_action.is_some_and(|label| label.has_acted())
    }
}
