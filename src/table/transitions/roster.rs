use tracing::{debug, instrument, trace};

use crate::table::action::ActionLabel;
use crate::table::config::TableConfig;
use crate::table::game_state::GameState;
use crate::table::player::{Player, PlayerId};

impl GameState {
    /// Seat the configured players and deal the first hand.
    pub fn from_config(config: &TableConfig) -> Self {
        let players = config
            .player_names()
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let mut player = Player::new(name.clone(), config.initial_chips(), position);
                player.is_dealer = position == config.dealer_index();
                player
            })
            .collect();

        let mut state = GameState {
            players,
            dealer_index: config.dealer_index(),
            small_blind: config.small_blind(),
            big_blind: config.big_blind(),
            min_raise: config.big_blind(),
            ..Default::default()
        };
        state.move_dealer();
        state
    }

    /// Seat a new player.
    ///
    /// `insert_index` is clamped to the table size and defaults to the end.
    /// A player seated during a hand sits it out. Either way they owe a big
    /// blind when the next hand starts.
    #[instrument(level = "trace", skip(self, name))]
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        chips: u64,
        insert_index: Option<usize>,
    ) -> PlayerId {
        let idx = insert_index
            .unwrap_or(self.players.len())
            .min(self.players.len());
        let had_players = !self.players.is_empty();

        let mut player = Player::new(name, chips, idx);
        player.is_folded = !self.is_hand_over;
        player.needs_to_post_dead_blind = true;
        let id = player.id;

        self.players.insert(idx, player);
        for (position, player) in self.players.iter_mut().enumerate() {
            player.position = position;
        }

        if had_players {
            if idx <= self.dealer_index {
                self.dealer_index += 1;
            }
            if idx <= self.current_player_index {
                self.current_player_index += 1;
            }
            if let Some(aggressor) = self.last_aggressor_index.as_mut() {
                if idx <= *aggressor {
                    *aggressor += 1;
                }
            }
        }

        debug!(%id, idx, chips, "Seated new player");
        id
    }

    /// Add chips to a player's stack, bringing them back into the game if
    /// they were eliminated.
    #[instrument(level = "trace", skip(self))]
    pub fn rebuy(&mut self, player_id: PlayerId, amount: u64) -> bool {
        if amount == 0 {
            trace!("Ignoring empty rebuy");
            return false;
        }
        let Some(player) = self.find_player_mut(player_id) else {
            trace!("Unknown player");
            return false;
        };

        let Some(chips) = player.chips.checked_add(amount) else {
            trace!("Rebuy would overflow the stack");
            return false;
        };
        player.chips = chips;
        player.rebuy_count += 1;
        player.is_eliminated = false;
        player.is_folded = false;
        player.last_action = None;
        player.rebought_this_hand = true;

        debug!(
            chips = player.chips,
            rebuy_count = player.rebuy_count,
            "Player rebought"
        );
        true
    }

    /// Knock a player out of the game. The eliminating player, if any, is
    /// credited in their stats.
    #[instrument(level = "trace", skip(self))]
    pub fn eliminate_player(
        &mut self,
        player_id: PlayerId,
        eliminated_by: Option<PlayerId>,
    ) -> bool {
        let Some(player) = self.find_player_mut(player_id) else {
            trace!("Unknown player");
            return false;
        };
        player.is_eliminated = true;
        player.is_folded = true;
        player.last_action = Some(ActionLabel::Out);

        if let Some(eliminator) = eliminated_by.and_then(|id| self.find_player_mut(id)) {
            eliminator.stats.eliminations += 1;
        }

        debug!("Player eliminated");
        true
    }

    /// Change the blinds. They take effect when the next hand starts.
    pub fn set_blinds(&mut self, small_blind: u64, big_blind: u64) -> bool {
        self.small_blind = small_blind;
        self.big_blind = big_blind;
        self.min_raise = big_blind;
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::table::action::ActionKind;
    use crate::table::config::TableConfigBuilder;
    use crate::table::test_util::{assert_valid_indices, seated_state};

    use super::*;

    #[test]
    fn test_from_config() {
        let config = TableConfigBuilder::new()
            .player_names(["Alice", "Bob", "Carol"])
            .initial_chips(500)
            .blinds(20, 10)
            .dealer_index(1)
            .build()
            .unwrap();

        let state = GameState::from_config(&config);

        assert_eq!(3, state.num_players());
        assert_eq!(1, state.dealer_index);
        assert!(state.players[1].is_dealer);
        assert!(state.players[2].is_small_blind);
        assert!(state.players[0].is_big_blind);
        assert_eq!(20, state.min_raise);
        assert_eq!(30, state.pot);
        assert_eq!(1, state.current_player_index);
        assert!(state.players.iter().all(|p| p.initial_chips == 500));
        assert_valid_indices(&state);
    }

    #[test]
    fn test_add_player_mid_hand_sits_out() {
        let mut state = seated_state(&[100, 100, 100], 0, 5, 10);
        let id = state.add_player("Dan", 200, None);

        let dan = state.find_player(id).unwrap();
        assert_eq!(3, dan.position);
        assert!(dan.is_folded);
        assert!(dan.needs_to_post_dead_blind);
        assert_eq!(200, dan.chips);
        assert_valid_indices(&state);
    }

    #[test]
    fn test_add_player_shifts_indices() {
        let mut state = seated_state(&[100, 100, 100, 100], 2, 5, 10);
        // Dealer 2, small blind 3, big blind 0, seat 1 to act.
        let to_act = state.players[1].id;
        let dealer = state.players[2].id;

        state.add_player("Eve", 100, Some(1));

        assert_eq!(to_act, state.players[state.current_player_index].id);
        assert_eq!(dealer, state.players[state.dealer_index].id);
        let positions: Vec<usize> = state.players.iter().map(|p| p.position).collect();
        assert_eq!(vec![0, 1, 2, 3, 4], positions);
    }

    #[test]
    fn test_add_player_index_is_clamped() {
        let mut state = seated_state(&[100, 100], 0, 5, 10);
        let id = state.add_player("Zed", 100, Some(99));
        assert_eq!(Some(2), state.player_index(id));
    }

    #[test]
    fn test_add_player_to_empty_table() {
        let mut state = GameState::default();
        state.add_player("First", 100, Some(0));
        assert_eq!(0, state.dealer_index);
        assert_eq!(0, state.current_player_index);
    }

    #[test]
    fn test_new_player_posts_dead_blind_once() {
        let mut state = seated_state(&[100, 100, 100, 100], 0, 5, 10);
        let id = state.add_player("Dan", 100, Some(1));
        state.is_hand_over = true;

        state.move_dealer();
        let dan = state.find_player(id).unwrap();
        // Dan sits at seat 1, the button lands on seat 2.
        assert!(!dan.is_small_blind && !dan.is_big_blind);
        assert_eq!(10, dan.current_bet);
        assert_eq!(90, dan.chips);
        assert!(!dan.is_folded);
        assert!(!dan.needs_to_post_dead_blind);
        assert_eq!(Some(ActionLabel::PostBigBlind), dan.last_action);
        assert!(dan.has_acted());

        state.is_hand_over = true;
        state.move_dealer();
        let dan = state.find_player(id).unwrap();
        assert_eq!(0, dan.current_bet);
        assert_eq!(None, dan.last_action);
    }

    #[test]
    fn test_rebuy() {
        let mut state = seated_state(&[100, 100], 0, 5, 10);
        let id = state.players[0].id;
        state.eliminate_player(id, None);

        assert!(state.rebuy(id, 100));
        let player = state.find_player(id).unwrap();
        assert_eq!(190, player.chips);
        assert_eq!(1, player.rebuy_count);
        assert!(!player.is_eliminated);
        assert!(!player.is_folded);
        assert!(player.rebought_this_hand);
        assert_eq!(None, player.last_action);
    }

    #[test]
    fn test_rebuy_that_would_overflow_is_ignored() {
        let mut state = seated_state(&[100, 100], 0, 5, 10);
        let id = state.players[0].id;
        let before = state.clone();

        assert!(!state.rebuy(id, u64::MAX));
        assert_eq!(before, state);
    }

    #[test]
    fn test_zero_rebuy_is_a_no_op() {
        let mut state = seated_state(&[100, 100], 0, 5, 10);
        let before = state.clone();
        let id = state.players[0].id;
        assert!(!state.rebuy(id, 0));
        assert!(!state.rebuy(PlayerId::new(), 10));
        assert_eq!(before, state);
    }

    #[test]
    fn test_eliminate_credits_eliminator() {
        let mut state = seated_state(&[100, 100, 100], 0, 5, 10);
        let busted = state.players[0].id;
        let hunter = state.players[1].id;

        assert!(state.eliminate_player(busted, Some(hunter)));

        let player = state.find_player(busted).unwrap();
        assert!(player.is_eliminated);
        assert!(player.is_folded);
        assert_eq!(Some(ActionLabel::Out), player.last_action);
        assert_eq!(1, state.find_player(hunter).unwrap().stats.eliminations);
    }

    #[test]
    fn test_eliminated_player_clears_pending_bust() {
        let mut state = seated_state(&[100, 100, 100], 0, 5, 10);
        let p0 = state.players[0].id;
        let p1 = state.players[1].id;
        state.record_action(p0, ActionKind::AllIn, 100, chrono::Utc::now());
        state.record_action(p1, ActionKind::Fold, 0, chrono::Utc::now());
        let p2 = state.players[2].id;
        state.record_action(p2, ActionKind::Fold, 0, chrono::Utc::now());
        assert!(state.is_hand_over);
        assert!(!state.has_pending_bust());

        // Give the pot away so seat 0 busts.
        state.players[0].chips = 0;
        assert!(state.has_pending_bust());
        assert!(!state.advance_phase());

        state.eliminate_player(p0, None);
        assert!(state.advance_phase());
        assert!(!state.is_hand_over);
    }

    #[test]
    fn test_set_blinds() {
        let mut state = seated_state(&[100, 100], 0, 5, 10);
        state.set_blinds(25, 50);
        assert_eq!(25, state.small_blind);
        assert_eq!(50, state.big_blind);
        assert_eq!(50, state.min_raise);
        // The hand in progress keeps its blinds.
        assert_eq!(15, state.pot);
    }
}
