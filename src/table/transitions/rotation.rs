use tracing::{debug, instrument};

use crate::table::action::ActionLabel;
use crate::table::game_state::{GameState, Phase};

impl GameState {
    /// Start a new hand: move the button and blinds, post them, and reset the
    /// per-hand state.
    ///
    /// The blinds move with a dead button. The button goes to last hand's
    /// small blind seat and the small blind to last hand's big blind seat,
    /// even when those players have since been eliminated. Only the big
    /// blind searches forward for a player who is still in. This way nobody
    /// pays the big blind twice in a row and nobody skips it.
    ///
    /// Players seated since the last hand post a big blind on arrival unless
    /// they are in a blind already.
    #[instrument(level = "trace", skip(self))]
    pub fn move_dealer(&mut self) -> bool {
        if self.players.is_empty() {
            return false;
        }

        let old_small_blind = self.players.iter().position(|p| p.is_small_blind);
        let old_big_blind = self.players.iter().position(|p| p.is_big_blind);

        let (dealer, small_blind, big_blind) = match (old_small_blind, old_big_blind) {
            (Some(old_small_blind), Some(old_big_blind)) => {
                let big_blind = self.next_live_seat(old_big_blind, None);
                (old_small_blind, old_big_blind, big_blind)
            }
            _ => {
                let dealer = self.dealer_index.min(self.players.len() - 1);
                let small_blind = self.next_live_seat(dealer, Some(dealer));
                let big_blind = self.next_live_seat(small_blind, Some(dealer));
                (dealer, small_blind, big_blind)
            }
        };

        let small_blind_amount = self.small_blind;
        let big_blind_amount = self.big_blind;
        let mut pot = 0;

        for (idx, player) in self.players.iter_mut().enumerate() {
            let chips_before = player.chips;
            let owed_dead_blind = player.needs_to_post_dead_blind;
            let mut posted = 0;

            if !player.is_eliminated {
                if idx == small_blind || idx == big_blind {
                    if idx == small_blind {
                        posted = small_blind_amount.min(player.chips);
                    }
                    if idx == big_blind {
                        posted = big_blind_amount.min(player.chips);
                    }
                    player.needs_to_post_dead_blind = false;
                } else if owed_dead_blind {
                    posted = big_blind_amount.min(player.chips);
                    player.needs_to_post_dead_blind = false;
                }
            }

            player.chips -= posted;
            player.current_bet = posted;
            player.hand_contribution = posted;
            player.is_dealer = idx == dealer;
            player.is_small_blind = idx == small_blind;
            player.is_big_blind = idx == big_blind;
            player.is_folded = player.is_eliminated;
            player.initial_chips_for_hand = chips_before;
            player.is_all_in = !player.is_eliminated && player.chips == 0 && posted > 0;
            player.rebought_this_hand = false;
            player.last_action = if player.is_eliminated {
                Some(ActionLabel::Out)
            } else if owed_dead_blind && !player.needs_to_post_dead_blind {
                Some(ActionLabel::PostBigBlind)
            } else {
                None
            };
            if !player.is_eliminated {
                player.stats.total_hands += 1;
            }

            pot += posted;
        }

        self.dealer_index = dealer;
        self.current_player_index = self.next_live_seat(big_blind, None);
        self.pot = pot;
        self.hand_pot_total = pot;
        self.current_phase = Phase::PreFlop;
        self.history.clear();
        self.last_aggressor_index = None;
        self.is_hand_over = false;
        self.waiting_for_phase_advancement = false;

        debug!(
            dealer,
            small_blind,
            big_blind,
            first_to_act = self.current_player_index,
            pot,
            "Started new hand"
        );
        true
    }

    /// The first seat after `from` whose player isn't eliminated. The search
    /// gives up at `stop`, or after one lap of the table.
    fn next_live_seat(&self, from: usize, stop: Option<usize>) -> usize {
        let mut seat = self.next_seat(from);
        for _ in 0..self.players.len() {
            if !self.players[seat].is_eliminated || Some(seat) == stop {
                break;
            }
            seat = self.next_seat(seat);
        }
        seat
    }
}

#[cfg(test)]
mod tests {
    use crate::table::game_state::GameState;
    use crate::table::test_util::{assert_valid_indices, seated_state};

    use super::*;

    fn marker_seats(state: &GameState) -> (usize, usize, usize) {
        let players = &state.players;
        (
            players.iter().position(|p| p.is_dealer).unwrap(),
            players.iter().position(|p| p.is_small_blind).unwrap(),
            players.iter().position(|p| p.is_big_blind).unwrap(),
        )
    }

    /// Finish the current hand without moving chips so the next one can
    /// start.
    fn end_hand(state: &mut GameState) {
        state.is_hand_over = true;
    }

    #[test]
    fn test_first_hand_uses_configured_dealer() {
        let state = seated_state(&[100, 100, 100, 100], 2, 5, 10);
        assert_eq!((2, 3, 0), marker_seats(&state));
        assert_eq!(1, state.current_player_index);
        assert!(state.players.iter().all(|p| p.stats.total_hands == 1));
        assert_valid_indices(&state);
    }

    #[test]
    fn test_markers_rotate_one_seat() {
        let mut state = seated_state(&[100, 100, 100, 100], 0, 5, 10);
        for expected_dealer in [1, 2, 3, 0, 1] {
            end_hand(&mut state);
            assert!(state.advance_phase());
            let (dealer, small_blind, big_blind) = marker_seats(&state);
            assert_eq!(expected_dealer, dealer);
            assert_eq!((dealer + 1) % 4, small_blind);
            assert_eq!((dealer + 2) % 4, big_blind);
        }
    }

    #[test]
    fn test_dead_small_blind_after_elimination() {
        let mut state = seated_state(&[100, 100, 100, 100], 0, 5, 10);
        // Seat 2 was the big blind and busts this hand.
        state.players[2].is_eliminated = true;
        end_hand(&mut state);

        state.move_dealer();

        // The small blind lands on the eliminated seat and nobody posts it.
        let (dealer, small_blind, big_blind) = marker_seats(&state);
        assert_eq!((1, 2, 3), (dealer, small_blind, big_blind));
        assert_eq!(0, state.players[2].current_bet);
        assert_eq!(Some(ActionLabel::Out), state.players[2].last_action);
        assert!(state.players[2].is_folded);
        assert_eq!(10, state.players[3].current_bet);
        assert_eq!(10, state.pot);
        assert_eq!(0, state.current_player_index);

        // Next hand the button is dead on seat 2 and the big blind skips it.
        end_hand(&mut state);
        state.move_dealer();
        assert_eq!((2, 3, 0), marker_seats(&state));
        assert_eq!(15, state.pot);
        assert_eq!(1, state.current_player_index);
    }

    #[test]
    fn test_big_blind_skips_eliminated_seats() {
        let mut state = seated_state(&[100, 100, 100, 100, 100], 0, 5, 10);
        state.players[3].is_eliminated = true;
        end_hand(&mut state);

        state.move_dealer();

        let (dealer, small_blind, big_blind) = marker_seats(&state);
        assert_eq!((1, 2, 4), (dealer, small_blind, big_blind));
        assert_eq!(0, state.current_player_index);
    }

    #[test]
    fn test_short_blind_goes_all_in() {
        let mut state = seated_state(&[100, 100, 100], 0, 5, 10);
        state.players[0].chips = 4;
        end_hand(&mut state);

        // Seat 0 is on the big blind next hand with only 4 chips.
        state.move_dealer();

        let short = &state.players[0];
        assert!(short.is_big_blind);
        assert_eq!(4, short.current_bet);
        assert_eq!(4, short.initial_chips_for_hand);
        assert_eq!(0, short.chips);
        assert!(short.is_all_in);
    }

    #[test]
    fn test_new_hand_resets_hand_state() {
        let mut state = seated_state(&[100, 100, 100], 0, 5, 10);
        state.players[1].is_folded = true;
        state.players[1].rebought_this_hand = true;
        state.current_phase = Phase::River;
        state.last_aggressor_index = Some(2);
        state.waiting_for_phase_advancement = true;
        end_hand(&mut state);

        state.move_dealer();

        assert!(!state.players[1].is_folded);
        assert!(!state.players[1].rebought_this_hand);
        assert_eq!(Phase::PreFlop, state.current_phase);
        assert_eq!(None, state.last_aggressor_index);
        assert!(!state.is_hand_over);
        assert!(!state.waiting_for_phase_advancement);
        assert!(state.history.is_empty());
        assert_eq!(state.pot, state.hand_pot_total);
    }

    #[test]
    fn test_empty_table_is_a_no_op() {
        let mut state = GameState::default();
        assert!(!state.move_dealer());
        assert_eq!(GameState::default(), state);
    }
}
