#![no_main]

extern crate arbitrary;
extern crate libfuzzer_sys;
extern crate poker_dealer;

use chrono::Utc;
use poker_dealer::table::{
    test_util::{assert_player_accounting, assert_valid_indices, seated_state},
    ActionKind, PlayerId,
};

use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, arbitrary::Arbitrary)]
enum Command {
    Act { seat: u8, kind: ActionKind, amount: u16 },
    ActCurrent { kind: ActionKind, amount: u16 },
    Advance,
    Resolve { seats: Vec<u8> },
    Rebuy { seat: u8, amount: u16 },
    Eliminate { seat: u8, by: Option<u8> },
    AddPlayer { chips: u16, index: Option<u8> },
    SetBlinds { small: u8, big: u8 },
}

#[derive(Debug, Clone, arbitrary::Arbitrary)]
struct Input {
    pub stacks: Vec<u16>,
    pub dealer: u8,
    pub commands: Vec<Command>,
}

fuzz_target!(|input: Input| {
    let stacks: Vec<u64> = input
        .stacks
        .iter()
        .take(23)
        .map(|&s| u64::from(s) + 1)
        .collect();
    if stacks.len() < 2 {
        return;
    }
    let dealer = usize::from(input.dealer) % stacks.len();
    let mut state = seated_state(&stacks, dealer, 5, 10);
    let mut chips_brought_in: u64 = stacks.iter().sum();

    let seat_id = |state: &poker_dealer::table::GameState, seat: u8| -> PlayerId {
        state
            .players
            .get(usize::from(seat) % state.players.len())
            .map(|p| p.id)
            .unwrap_or_default()
    };

    for command in input.commands {
        match command {
            Command::Act { seat, kind, amount } => {
                let id = seat_id(&state, seat);
                state.record_action(id, kind, u64::from(amount), Utc::now());
            }
            Command::ActCurrent { kind, amount } => {
                if let Some(id) = state.current_player().map(|p| p.id) {
                    state.record_action(id, kind, u64::from(amount), Utc::now());
                }
            }
            Command::Advance => {
                state.advance_phase();
            }
            Command::Resolve { seats } => {
                let winners: Vec<PlayerId> = seats.iter().map(|&s| seat_id(&state, s)).collect();
                state.resolve_hand(&winners);
            }
            Command::Rebuy { seat, amount } => {
                let id = seat_id(&state, seat);
                if state.rebuy(id, u64::from(amount)) {
                    chips_brought_in += u64::from(amount);
                }
            }
            Command::Eliminate { seat, by } => {
                let id = seat_id(&state, seat);
                let by = by.map(|s| seat_id(&state, s));
                state.eliminate_player(id, by);
            }
            Command::AddPlayer { chips, index } => {
                if state.players.len() < 23 {
                    state.add_player("fuzz", u64::from(chips), index.map(usize::from));
                    chips_brought_in += u64::from(chips);
                }
            }
            Command::SetBlinds { small, big } => {
                state.set_blinds(u64::from(small), u64::from(big));
            }
        }

        assert_valid_indices(&state);
        // Until a pot layer is paid out every stack still lines up with
        // what its owner put in.
        if !state.is_hand_over && state.pot == state.hand_pot_total {
            assert_player_accounting(&state);
        }
        // Odd chips and pots nobody can win leave the table, nothing is
        // ever created.
        assert!(state.chips_in_play() <= chips_brought_in);
    }
});
