use std::fmt::{self, Display};

use super::action::ActionRecord;
use super::player::{Player, PlayerId};
use super::replay::HandReplay;

/// Small blind of a table that hasn't been set up.
pub const DEFAULT_SMALL_BLIND: u64 = 5;
/// Big blind of a table that hasn't been set up.
pub const DEFAULT_BIG_BLIND: u64 = 10;

/// The betting street of the current hand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Phase {
    #[default]
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::PreFlop => write!(f, "pre-flop"),
            Phase::Flop => write!(f, "flop"),
            Phase::Turn => write!(f, "turn"),
            Phase::River => write!(f, "river"),
            Phase::Showdown => write!(f, "showdown"),
        }
    }
}

impl Phase {
    /// The street that follows this one. Showdown wraps around to the next
    /// hand's pre-flop.
    pub fn next(&self) -> Self {
        match *self {
            Phase::PreFlop => Phase::Flop,
            Phase::Flop => Phase::Turn,
            Phase::Turn => Phase::River,
            Phase::River => Phase::Showdown,
            Phase::Showdown => Phase::PreFlop,
        }
    }

    /// Whether players bet on this street.
    pub fn is_betting_street(&self) -> bool {
        !matches!(self, Phase::Showdown)
    }
}

/// Everything the dealer's screen shows about the table.
///
/// The state is a plain value. Transitions are methods taking `&mut self`
/// (see the `transitions` modules) and the
/// [`HandEngine`](crate::table::HandEngine) is what clones, mutates and
/// commits it.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Players in seating order. Turn order and the button follow this order.
    pub players: Vec<Player>,
    /// Seat of the dealer button.
    pub dealer_index: usize,
    pub small_blind: u64,
    pub big_blind: u64,
    /// The raise size offered to the operator by default.
    pub min_raise: u64,
    /// Chips in the middle that haven't been paid out yet.
    pub pot: u64,
    pub current_phase: Phase,
    /// Seat that is expected to act next.
    pub current_player_index: usize,
    /// Seat of the last player to raise on this street.
    pub last_aggressor_index: Option<usize>,
    /// Action log of the current hand.
    pub history: Vec<ActionRecord>,
    /// Saved hand replays, newest first.
    pub saved_hands: Vec<HandReplay>,
    pub is_hand_over: bool,
    /// A street finished and the operator has to deal the next cards.
    pub waiting_for_phase_advancement: bool,
    /// Everything put in the pot this hand, blinds included. Unlike `pot` this
    /// doesn't shrink as pots are paid out.
    pub hand_pot_total: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            players: vec![],
            dealer_index: 0,
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            min_raise: 0,
            pot: 0,
            current_phase: Phase::PreFlop,
            current_player_index: 0,
            last_aggressor_index: None,
            history: vec![],
            saved_hands: vec![],
            is_hand_over: false,
            waiting_for_phase_advancement: false,
            hand_pot_total: 0,
        }
    }
}

impl GameState {
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn find_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn find_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The player expected to act, if the table has any players.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// The largest bet on the current street.
    pub fn max_bet(&self) -> u64 {
        self.players.iter().map(|p| p.current_bet).max().unwrap_or(0)
    }

    /// How much the player to act has to put in to call.
    pub fn call_amount(&self) -> u64 {
        self.current_player()
            .map(|p| self.max_bet().saturating_sub(p.current_bet))
            .unwrap_or(0)
    }

    /// Players still holding cards: not folded and not eliminated.
    pub fn num_in_hand(&self) -> usize {
        self.players.iter().filter(|p| p.is_in_hand()).count()
    }

    /// Players that can still put chips in on this street.
    pub fn num_can_act(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    /// Whether everyone still in has either matched the largest bet or has
    /// nothing left to put in.
    pub fn all_bets_settled(&self) -> bool {
        let max_bet = self.max_bet();
        self.players.iter().all(|p| {
            p.is_folded
                || p.is_eliminated
                || p.current_bet == max_bet
                || (p.is_all_in && p.chips == 0)
        })
    }

    /// The first player that ran out of chips and is waiting for the operator
    /// to rebuy or eliminate them.
    pub fn pending_bust_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_pending_bust())
    }

    pub fn has_pending_bust(&self) -> bool {
        self.pending_bust_player().is_some()
    }

    /// Players the operator can pick as winners of the pot layer still open.
    pub fn showdown_candidates(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.is_in_hand() && p.hand_contribution > 0)
            .collect()
    }

    /// Players ordered for the standings table: still playing first, then by
    /// chip count.
    pub fn leaderboard(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        players.sort_by(|a, b| {
            a.is_eliminated
                .cmp(&b.is_eliminated)
                .then_with(|| b.chips.cmp(&a.chips))
        });
        players
    }

    /// All chips on the table: every stack plus the unresolved pot.
    pub fn chips_in_play(&self) -> u64 {
        self.players.iter().map(|p| p.chips).sum::<u64>() + self.pot
    }

    /// The next seat after `from`, wrapping around the table.
    pub(crate) fn next_seat(&self, from: usize) -> usize {
        (from + 1) % self.players.len()
    }
}
