use tracing::{debug, instrument, trace, warn};

use crate::table::action::ActionLabel;
use crate::table::game_state::GameState;
use crate::table::player::PlayerId;

impl GameState {
    /// Pay out the pot layer the given winners are eligible for.
    ///
    /// The layer is capped by the smallest contribution among the winners.
    /// Every player, folded or not, gives up to that much from their
    /// contribution. The total is split evenly between the winners, rounding
    /// down. Odd chips that don't divide evenly leave the table.
    ///
    /// When contributions were unequal (someone all-in for less) the hand
    /// stays open with the rest of the pot so the operator can pick the
    /// winners of the side pot next.
    #[instrument(level = "trace", skip(self))]
    pub fn resolve_hand(&mut self, winner_ids: &[PlayerId]) -> bool {
        if self.is_hand_over {
            trace!("Hand is already over");
            return false;
        }

        let winners: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| winner_ids.contains(&p.id))
            .map(|(idx, _)| idx)
            .collect();
        let Some(layer_cap) = winners
            .iter()
            .map(|&idx| self.players[idx].hand_contribution)
            .min()
        else {
            trace!("No known winners");
            return false;
        };

        if layer_cap == 0 {
            warn!(pot = self.pot, "Winners have nothing in the pot, ending the hand");
            self.is_hand_over = true;
            return true;
        }

        let mut resolved = 0;
        for player in self.players.iter_mut() {
            let taken = player.hand_contribution.min(layer_cap);
            player.hand_contribution -= taken;
            resolved += taken;
        }

        let num_winners = winners.len() as u64;
        let share = resolved / num_winners;
        let remainder = resolved % num_winners;
        if remainder > 0 {
            debug!(remainder, "Odd chips left over after the split");
        }

        for &idx in &winners {
            let winner = &mut self.players[idx];
            winner.chips += share;
            winner.stats.hands_won += 1;
            winner.last_action = Some(ActionLabel::Winner);
        }

        self.pot = self.pot.saturating_sub(resolved);
        let side_pot_left = self.pot > 0
            && self
                .players
                .iter()
                .any(|p| p.is_in_hand() && p.hand_contribution > 0);
        self.is_hand_over = !side_pot_left;

        debug!(
            resolved,
            share,
            num_winners,
            pot = self.pot,
            is_hand_over = self.is_hand_over,
            "Resolved pot"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::table::game_state::Phase;
    use crate::table::test_util::{assert_chips_conserved, seated_state};

    use super::*;

    /// Three players in for 50, 100 and 100 with the button on seat 0.
    fn side_pot_state() -> crate::table::GameState {
        let mut state = seated_state(&[50, 100, 100], 0, 5, 10);
        for (player, contribution) in state.players.iter_mut().zip([50, 100, 100]) {
            player.chips -= contribution - player.hand_contribution;
            player.hand_contribution = contribution;
            player.current_bet = 0;
        }
        state.players[0].is_all_in = true;
        state.pot = 250;
        state.hand_pot_total = 250;
        state.current_phase = Phase::Showdown;
        state
    }

    #[test]
    fn test_single_winner_takes_everything() {
        let mut state = side_pot_state();
        let winner = state.players[1].id;

        assert!(state.resolve_hand(&[winner]));
        assert_eq!(250, state.players[1].chips);
        assert_eq!(0, state.pot);
        assert!(state.is_hand_over);
        assert_chips_conserved(250, &state);
    }

    #[test]
    fn test_short_stack_wins_main_pot_then_side_pot() {
        let mut state = side_pot_state();
        let short = state.players[0].id;
        let big = state.players[2].id;

        state.resolve_hand(&[short]);
        assert_eq!(150, state.players[0].chips);
        assert_eq!(100, state.pot);
        assert!(!state.is_hand_over);
        assert_eq!(
            vec![state.players[1].id, state.players[2].id],
            state
                .showdown_candidates()
                .iter()
                .map(|p| p.id)
                .collect::<Vec<_>>()
        );

        state.resolve_hand(&[big]);
        assert_eq!(100, state.players[2].chips);
        assert_eq!(0, state.pot);
        assert!(state.is_hand_over);
        assert_eq!(1, state.players[0].stats.hands_won);
        assert_eq!(1, state.players[2].stats.hands_won);
        assert_chips_conserved(250, &state);
    }

    #[test]
    fn test_split_drops_odd_chip() {
        let mut state = seated_state(&[100, 100, 100], 0, 5, 10);
        for player in state.players.iter_mut() {
            player.hand_contribution = 0;
        }
        state.players[0].hand_contribution = 10;
        state.players[1].hand_contribution = 10;
        state.players[2].hand_contribution = 5;
        state.players[2].is_folded = true;
        state.pot = 25;
        let before: Vec<u64> = state.players.iter().map(|p| p.chips).collect();

        let winners = [state.players[0].id, state.players[1].id];
        state.resolve_hand(&winners);

        assert_eq!(before[0] + 12, state.players[0].chips);
        assert_eq!(before[1] + 12, state.players[1].chips);
        assert_eq!(0, state.pot);
        assert!(state.is_hand_over);
    }

    #[test]
    fn test_winner_with_nothing_in_ends_hand() {
        let mut state = side_pot_state();
        state.players[1].hand_contribution = 0;
        let winner = state.players[1].id;
        let chips_before = state.players[1].chips;

        assert!(state.resolve_hand(&[winner]));
        assert!(state.is_hand_over);
        assert_eq!(chips_before, state.players[1].chips);
        assert_eq!(250, state.pot);
    }

    #[test]
    fn test_no_known_winners_is_a_no_op() {
        let mut state = side_pot_state();
        let before = state.clone();

        assert!(!state.resolve_hand(&[]));
        assert!(!state.resolve_hand(&[PlayerId::new()]));
        assert_eq!(before, state);
    }

    #[test]
    fn test_resolve_after_hand_over_is_a_no_op() {
        let mut state = side_pot_state();
        let winner = state.players[1].id;
        state.resolve_hand(&[winner]);
        let before = state.clone();

        assert!(!state.resolve_hand(&[winner]));
        assert_eq!(before, state);
    }

    #[test]
    fn test_unequal_contributions_shrink_pot() {
        let mut state = side_pot_state();
        let short = state.players[0].id;
        let pot_before = state.pot;

        state.resolve_hand(&[short]);
        assert!(state.pot < pot_before);
        assert!(state.pot > 0);
    }
}
