//! Cards as the operator records them. Nothing in this crate shuffles, deals
//! or ranks cards; they only show up in hand replays.
mod card;
mod error;

pub use card::{Card, Suit, Value};
pub use error::ParseCardError;
