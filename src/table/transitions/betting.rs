use chrono::{DateTime, Utc};
use tracing::{debug, instrument, trace};

use crate::table::action::{ActionKind, ActionLabel, ActionRecord};
use crate::table::game_state::{GameState, Phase};
use crate::table::player::PlayerId;

impl GameState {
    /// Record what a player did.
    ///
    /// The amount is clamped to the player's stack. Any action other than a
    /// fold that empties the stack is logged as an all-in. When everyone but
    /// one player has folded the last player standing is paid straight away,
    /// otherwise the turn moves on or the street ends.
    #[instrument(level = "trace", skip(self, timestamp), fields(phase = %self.current_phase))]
    pub fn record_action(
        &mut self,
        player_id: PlayerId,
        kind: ActionKind,
        amount: u64,
        timestamp: DateTime<Utc>,
    ) -> bool {
        if self.is_hand_over {
            trace!("Hand is over, ignoring action");
            return false;
        }
        let Some(idx) = self.player_index(player_id) else {
            trace!("Unknown player, ignoring action");
            return false;
        };

        let phase = self.current_phase;
        let big_blind = self.big_blind;
        let max_bet_before = self.max_bet();
        let already_voluntary = self.history.iter().any(|record| {
            record.player_id == player_id
                && record.phase == Phase::PreFlop
                && record.action.is_voluntary()
        });

        let player = &mut self.players[idx];
        let committed = amount.min(player.chips);
        let is_all_in =
            kind == ActionKind::AllIn || (kind != ActionKind::Fold && committed == player.chips);

        match kind {
            ActionKind::Fold => player.stats.record_fold(phase),
            ActionKind::Raise => {
                player.stats.raises += 1;
                if phase == Phase::PreFlop {
                    if max_bet_before <= big_blind {
                        player.stats.hands_opened += 1;
                    } else {
                        player.stats.three_bets += 1;
                    }
                }
            }
            _ if is_all_in => player.stats.all_ins += 1,
            _ => {}
        }
        if phase == Phase::PreFlop && kind.is_voluntary() && !already_voluntary {
            player.stats.voluntarily_played += 1;
        }

        player.chips -= committed;
        player.current_bet += committed;
        player.hand_contribution += committed;
        player.is_folded = kind == ActionKind::Fold;
        player.is_all_in = is_all_in;
        player.last_action = Some(ActionLabel::from(kind));

        let new_bet = player.current_bet;
        let player_name = player.name.clone();

        self.history.push(ActionRecord {
            player_id,
            player_name,
            action: if is_all_in { ActionKind::AllIn } else { kind },
            amount: committed,
            phase,
            timestamp,
        });

        if matches!(kind, ActionKind::Raise | ActionKind::AllIn) && new_bet > max_bet_before {
            self.last_aggressor_index = Some(idx);
        }

        self.pot += committed;
        self.hand_pot_total += committed;

        debug!(
            idx,
            %kind,
            committed,
            is_all_in,
            pot = self.pot,
            "Recorded player action"
        );

        let mut in_hand = self.players.iter().filter(|p| p.is_in_hand());
        match (in_hand.next().map(|p| p.id), in_hand.next()) {
            (Some(last_standing), None) => {
                debug!(%last_standing, "Everyone else folded");
                self.resolve_hand(&[last_standing]);
            }
            _ => self.check_round_end(),
        }
        true
    }

    /// Move the game forward.
    ///
    /// After a finished hand this starts the next one. During a hand it
    /// deals the next street. Nothing happens while a busted player is
    /// waiting for a rebuy or elimination, or at showdown before the pot has
    /// been paid out.
    #[instrument(level = "trace", skip(self), fields(phase = %self.current_phase))]
    pub fn advance_phase(&mut self) -> bool {
        if self.is_hand_over {
            if let Some(busted) = self.pending_bust_player() {
                debug!(player = %busted.name, "Busted player must rebuy or be eliminated first");
                return false;
            }
            return self.move_dealer();
        }

        let next = self.current_phase.next();
        if next == Phase::PreFlop {
            debug!("Showdown must be resolved before the next hand");
            return false;
        }
        if self.players.is_empty() {
            return false;
        }

        let num_players = self.players.len();
        let mut first_to_act = self.next_seat(self.dealer_index);
        let mut scanned = 0;
        while !self.players[first_to_act].can_act() && scanned < num_players {
            first_to_act = self.next_seat(first_to_act);
            scanned += 1;
        }

        for player in self.players.iter_mut() {
            player.current_bet = 0;
            player.last_action = if player.is_eliminated {
                Some(ActionLabel::Out)
            } else if player.is_folded {
                Some(ActionLabel::Fold)
            } else {
                None
            };
        }

        self.current_phase = next;
        self.current_player_index = first_to_act;
        self.last_aggressor_index = None;
        self.waiting_for_phase_advancement = false;

        debug!(phase = %next, first_to_act, "Advanced to next street");

        if next.is_betting_street() && self.num_can_act() <= 1 {
            self.check_round_end();
        }
        true
    }

    /// Pass the turn on, or end the street when betting is complete.
    pub(crate) fn check_round_end(&mut self) {
        let settled = self.all_bets_settled();
        if self.num_can_act() <= 1 && settled {
            self.end_street();
            return;
        }

        let num_players = self.players.len();
        let mut candidate = self.next_seat(self.current_player_index);
        let mut scanned = 0;
        while scanned < num_players && !self.players[candidate].can_act() {
            candidate = self.next_seat(candidate);
            scanned += 1;
        }

        let nobody_can_act = scanned >= num_players;
        if nobody_can_act || (self.players[candidate].has_acted() && settled) {
            self.end_street();
        } else {
            trace!(candidate, "Turn passes");
            self.current_player_index = candidate;
        }
    }

    fn end_street(&mut self) {
        if self.current_phase == Phase::River {
            self.advance_phase();
        } else {
            trace!(phase = %self.current_phase, "Street complete, waiting for the next cards");
            self.waiting_for_phase_advancement = true;
        }
    }
}
