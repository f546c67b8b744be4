//! # poker_dealer
//!
//! `poker_dealer` is the bookkeeping side of a live, physically dealt poker
//! game. Cards are shuffled and dealt by a human; this crate keeps track of
//! everything else: chip stacks, blinds, betting rounds, the pot and side
//! pots, dead-button rotation, rebuys, eliminations and per-player
//! statistics.
//!
//! ## Core
//!
//! [`core`] holds the card types used when recording a finished hand.
//!
//! ## Table
//!
//! [`table`] holds the [`table::HandEngine`], the game state it drives and the
//! collaborators around it: observers of committed states, the room sync
//! channel and the hand replay store.
//!
//! ```
//! use poker_dealer::table::{ActionKind, HandEngine, TableConfigBuilder};
//!
//! let config = TableConfigBuilder::new()
//!     .player_names(["Alice", "Bob", "Carol", "Dave"])
//!     .initial_chips(100)
//!     .blinds(10, 5)
//!     .build()
//!     .unwrap();
//!
//! let mut engine = HandEngine::default();
//! engine.setup_game(&config);
//!
//! // Seat 1 posted the small blind and seat 2 the big blind.
//! let state = engine.state();
//! assert_eq!(15, state.pot);
//! assert_eq!(3, state.current_player_index);
//!
//! let dave = state.players[3].id;
//! engine.record_action(dave, ActionKind::Call, 10);
//! assert_eq!(25, engine.state().pot);
//! ```
pub mod core;
pub mod table;
