use thiserror::Error;

/// Errors from reading a card written by the operator, e.g. `"Ah"` or `"10d"`.
#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum ParseCardError {
    #[error("Card string is too short: {0:?}")]
    TooShort(String),
    #[error("Card string is too long: {0:?}")]
    TooLong(String),
    #[error("Unexpected value char {0:?}")]
    UnexpectedValueChar(char),
    #[error("Unexpected suit char {0:?}")]
    UnexpectedSuitChar(char),
}
