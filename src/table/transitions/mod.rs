//! Transitions of [`GameState`](super::GameState).
//!
//! Every transition mutates the state in place and reports whether it did
//! anything. Commands that don't apply (an unknown player, a hand that is
//! already over) leave the state untouched and return `false`.
mod betting;
mod pot;
mod rotation;
mod roster;
