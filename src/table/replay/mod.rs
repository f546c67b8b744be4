//! # Hand replays
//!
//! After a hand the operator can save a replay of it: who played, how their
//! stacks changed and, if they fill them in, the cards. A [`ReplayDraft`] is
//! built from the finished state, the operator adds the board and whatever
//! hole cards were shown, and [`ReplayDraft::finish`] freezes it into a
//! [`HandReplay`].
//!
//! Replays are persisted through a [`ReplayStore`].
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::Card;

use super::action::ActionLabel;
use super::errors::ReplayError;
use super::game_state::{GameState, Phase};
use super::player::PlayerId;

#[cfg(feature = "serde")]
mod directory_store;
pub(crate) mod store;

#[cfg(feature = "serde")]
pub use directory_store::DirectoryReplayStore;
pub use store::{MemoryReplayStore, NullReplayStore, ReplayStore};

/// Number of community cards on a full board.
pub const BOARD_SIZE: usize = 5;
/// Number of hole cards each player holds.
pub const HOLE_CARDS: usize = 2;

/// One player's part in a saved hand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplayPlayer {
    pub id: PlayerId,
    pub name: String,
    /// Only recorded for players that didn't fold and whose cards were
    /// both filled in.
    pub hole_cards: Option<[Card; HOLE_CARDS]>,
    pub is_winner: bool,
    /// Stack change over the hand. Negative for players that lost chips.
    pub win_amount: i64,
    pub is_all_in: bool,
    pub is_eliminated: bool,
    pub is_rebought: bool,
}

/// A saved hand. Never changed once created.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandReplay {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub players: Vec<ReplayPlayer>,
    pub community_cards: Vec<Card>,
    /// Everything that went into the pot during the hand.
    pub pot: u64,
    pub big_blind: u64,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DraftPlayer {
    id: PlayerId,
    name: String,
    hole_cards: [Option<Card>; HOLE_CARDS],
    is_folded: bool,
    is_winner: bool,
    win_amount: i64,
    is_all_in: bool,
    is_eliminated: bool,
    is_rebought: bool,
}

/// A replay the operator is still filling in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayDraft {
    players: Vec<DraftPlayer>,
    board: [Option<Card>; BOARD_SIZE],
    pot: u64,
    big_blind: u64,
    phase: Phase,
}

impl ReplayDraft {
    /// Start a draft from the state of a finished hand. Players that had no
    /// chips when the hand started weren't dealt in and are left out.
    pub fn from_state(state: &GameState) -> Self {
        let players = state
            .players
            .iter()
            .filter(|p| p.initial_chips_for_hand > 0)
            .map(|p| DraftPlayer {
                id: p.id,
                name: p.name.clone(),
                hole_cards: [None; HOLE_CARDS],
                is_folded: p.is_folded,
                is_winner: p.last_action == Some(ActionLabel::Winner),
                win_amount: p.chips as i64 - p.initial_chips_for_hand as i64,
                is_all_in: p.is_all_in,
                is_eliminated: p.is_eliminated && !p.rebought_this_hand,
                is_rebought: p.rebought_this_hand,
            })
            .collect();

        Self {
            players,
            board: [None; BOARD_SIZE],
            pot: state.hand_pot_total,
            big_blind: state.big_blind,
            phase: state.current_phase,
        }
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }

    /// Whether the card is already on the board or in someone's hand.
    pub fn is_card_used(&self, card: Card) -> bool {
        self.board.iter().flatten().any(|c| *c == card)
            || self
                .players
                .iter()
                .flat_map(|p| p.hole_cards.iter().flatten())
                .any(|c| *c == card)
    }

    /// Put a card on the board. Replacing a slot's card with itself is
    /// allowed.
    pub fn set_board_card(&mut self, slot: usize, card: Card) -> Result<(), ReplayError> {
        let current = *self
            .board
            .get(slot)
            .ok_or(ReplayError::InvalidBoardSlot(slot))?;
        if current != Some(card) && self.is_card_used(card) {
            return Err(ReplayError::DuplicateCard(card));
        }
        self.board[slot] = Some(card);
        Ok(())
    }

    pub fn clear_board_card(&mut self, slot: usize) -> Result<(), ReplayError> {
        let entry = self
            .board
            .get_mut(slot)
            .ok_or(ReplayError::InvalidBoardSlot(slot))?;
        *entry = None;
        Ok(())
    }

    /// Record one of a player's hole cards. Folded players' cards aren't
    /// recorded.
    pub fn set_hole_card(
        &mut self,
        player_id: PlayerId,
        slot: usize,
        card: Card,
    ) -> Result<(), ReplayError> {
        if slot >= HOLE_CARDS {
            return Err(ReplayError::InvalidHoleSlot(slot));
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(ReplayError::UnknownPlayer(player_id))?;
        if self.players[idx].is_folded {
            return Err(ReplayError::FoldedPlayer(player_id));
        }
        if self.players[idx].hole_cards[slot] != Some(card) && self.is_card_used(card) {
            return Err(ReplayError::DuplicateCard(card));
        }
        self.players[idx].hole_cards[slot] = Some(card);
        Ok(())
    }

    /// Freeze the draft into a replay stamped with the current time.
    pub fn finish(self) -> HandReplay {
        self.finish_at(Utc::now())
    }

    pub fn finish_at(self, timestamp: DateTime<Utc>) -> HandReplay {
        let players = self
            .players
            .into_iter()
            .map(|p| {
                let hole_cards = match (p.is_folded, p.hole_cards) {
                    (false, [Some(first), Some(second)]) => Some([first, second]),
                    _ => None,
                };
                ReplayPlayer {
                    id: p.id,
                    name: p.name,
                    hole_cards,
                    is_winner: p.is_winner,
                    win_amount: p.win_amount,
                    is_all_in: p.is_all_in,
                    is_eliminated: p.is_eliminated,
                    is_rebought: p.is_rebought,
                }
            })
            .collect();

        HandReplay {
            id: Uuid::now_v7(),
            timestamp,
            players,
            community_cards: self.board.iter().flatten().copied().collect(),
            pot: self.pot,
            big_blind: self.big_blind,
            phase: self.phase,
        }
    }
}
