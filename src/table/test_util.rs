//! Helpers shared by the unit tests, the fuzz target and the benches.
use std::collections::HashSet;

use super::game_state::GameState;
use super::player::Player;

/// A table with the given stacks and the first hand dealt.
pub fn seated_state(
    stacks: &[u64],
    dealer_index: usize,
    small_blind: u64,
    big_blind: u64,
) -> GameState {
    let mut state = GameState {
        players: stacks
            .iter()
            .enumerate()
            .map(|(idx, &chips)| Player::new(format!("Player {idx}"), chips, idx))
            .collect(),
        dealer_index,
        small_blind,
        big_blind,
        min_raise: big_blind,
        ..Default::default()
    };
    state.move_dealer();
    state
}

/// Every chip is either in a stack or in the pot.
pub fn assert_chips_conserved(expected_total: u64, state: &GameState) {
    let stacks: u64 = state.players.iter().map(|p| p.chips).sum();
    assert_eq!(
        expected_total,
        stacks + state.pot,
        "stacks {stacks} + pot {} doesn't add up, players: {:?}",
        state.pot,
        state.players.iter().map(|p| p.chips).collect::<Vec<_>>()
    );
}

/// Until the hand is resolved each player's stack plus what they put in
/// adds up to what they started the hand with. Chips rebought during the
/// hand aren't part of that and those players are skipped.
pub fn assert_player_accounting(state: &GameState) {
    for player in state.players.iter().filter(|p| !p.rebought_this_hand) {
        assert_eq!(
            player.initial_chips_for_hand,
            player.chips + player.hand_contribution,
            "player {} started with {} but has {} plus {} in the pot",
            player.name,
            player.initial_chips_for_hand,
            player.chips,
            player.hand_contribution
        );
    }
}

/// Seat indexes point at real seats and the seating bookkeeping is
/// consistent.
pub fn assert_valid_indices(state: &GameState) {
    let num_players = state.players.len();
    if num_players == 0 {
        return;
    }

    assert!(
        state.dealer_index < num_players,
        "dealer_index {} out of range for {num_players} players",
        state.dealer_index
    );
    assert!(
        state.current_player_index < num_players,
        "current_player_index {} out of range for {num_players} players",
        state.current_player_index
    );
    if let Some(aggressor) = state.last_aggressor_index {
        assert!(aggressor < num_players, "last_aggressor_index {aggressor} out of range");
    }

    for (idx, player) in state.players.iter().enumerate() {
        assert_eq!(idx, player.position, "player {} has a stale position", player.name);
    }

    let ids: HashSet<_> = state.players.iter().map(|p| p.id).collect();
    assert_eq!(num_players, ids.len(), "player ids must be unique");

    assert!(state.players.iter().filter(|p| p.is_dealer).count() <= 1);
    assert!(state.players.iter().filter(|p| p.is_small_blind).count() <= 1);
    assert!(state.players.iter().filter(|p| p.is_big_blind).count() <= 1);

    // The pot only shrinks from what went in this hand.
    assert!(state.pot <= state.hand_pot_total);
}
