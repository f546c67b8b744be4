use std::fmt;
use std::str::FromStr;

use super::error::ParseCardError;

/// Card rank. The dealer never ranks hands, so the ordering only matters for
/// displaying a hand in a stable way.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Value {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Value {
    /// All thirteen values from low to high.
    pub const fn values() -> [Value; 13] {
        [
            Value::Two,
            Value::Three,
            Value::Four,
            Value::Five,
            Value::Six,
            Value::Seven,
            Value::Eight,
            Value::Nine,
            Value::Ten,
            Value::Jack,
            Value::Queen,
            Value::King,
            Value::Ace,
        ]
    }

    /// Parse the single character form of a value. `T` is ten.
    pub fn from_char(c: char) -> Option<Value> {
        match c.to_ascii_uppercase() {
            '2' => Some(Value::Two),
            '3' => Some(Value::Three),
            '4' => Some(Value::Four),
            '5' => Some(Value::Five),
            '6' => Some(Value::Six),
            '7' => Some(Value::Seven),
            '8' => Some(Value::Eight),
            '9' => Some(Value::Nine),
            'T' => Some(Value::Ten),
            'J' => Some(Value::Jack),
            'Q' => Some(Value::Queen),
            'K' => Some(Value::King),
            'A' => Some(Value::Ace),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Value::Two => '2',
            Value::Three => '3',
            Value::Four => '4',
            Value::Five => '5',
            Value::Six => '6',
            Value::Seven => '7',
            Value::Eight => '8',
            Value::Nine => '9',
            Value::Ten => 'T',
            Value::Jack => 'J',
            Value::Queen => 'Q',
            Value::King => 'K',
            Value::Ace => 'A',
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Suit {
    Spade,
    Club,
    Heart,
    Diamond,
}

impl Suit {
    pub const fn suits() -> [Suit; 4] {
        [Suit::Spade, Suit::Club, Suit::Heart, Suit::Diamond]
    }

    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            's' => Some(Suit::Spade),
            'c' => Some(Suit::Club),
            'h' => Some(Suit::Heart),
            'd' => Some(Suit::Diamond),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Spade => 's',
            Suit::Club => 'c',
            Suit::Heart => 'h',
            Suit::Diamond => 'd',
        }
    }
}

/// A single playing card as the operator reports it after a hand.
///
/// ```
/// use poker_dealer::core::{Card, Suit, Value};
///
/// let card: Card = "Ah".parse().unwrap();
/// assert_eq!(Card::new(Value::Ace, Suit::Heart), card);
///
/// // The two character form used on the felt is accepted too.
/// let ten: Card = "10d".parse().unwrap();
/// assert_eq!("Td", ten.to_string());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Card {
    pub value: Value,
    pub suit: Suit,
}

impl Card {
    pub const fn new(value: Value, suit: Suit) -> Self {
        Self { value, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value.to_char(), self.suit.to_char())
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(c) = s.chars().find(|c| !c.is_ascii()) {
            return Err(ParseCardError::UnexpectedValueChar(c));
        }
        // "10h" is how the value is printed on the card itself.
        let (value_str, suit_str) = match s.len() {
            0 | 1 => return Err(ParseCardError::TooShort(s.to_string())),
            2 => s.split_at(1),
            3 if s.starts_with("10") => ("T", &s[2..]),
            _ => return Err(ParseCardError::TooLong(s.to_string())),
        };

        let value_char = value_str.chars().next().unwrap_or_default();
        let suit_char = suit_str.chars().next().unwrap_or_default();

        let value =
            Value::from_char(value_char).ok_or(ParseCardError::UnexpectedValueChar(value_char))?;
        let suit =
            Suit::from_char(suit_char).ok_or(ParseCardError::UnexpectedSuitChar(suit_char))?;
        Ok(Card::new(value, suit))
    }
}

impl TryFrom<&str> for Card {
    type Error = ParseCardError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_cards() {
        for value in Value::values() {
            for suit in Suit::suits() {
                let card = Card::new(value, suit);
                let parsed: Card = card.to_string().parse().unwrap();
                assert_eq!(card, parsed);
            }
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Card::new(Value::King, Suit::Spade), "kS".parse().unwrap());
        assert_eq!(Card::new(Value::Ten, Suit::Club), "10C".parse().unwrap());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Err(ParseCardError::TooShort("A".to_string())),
            "A".parse::<Card>()
        );
        assert_eq!(
            Err(ParseCardError::TooLong("Ahh".to_string())),
            "Ahh".parse::<Card>()
        );
        assert_eq!(
            Err(ParseCardError::UnexpectedValueChar('X')),
            "Xh".parse::<Card>()
        );
        assert_eq!(
            Err(ParseCardError::UnexpectedSuitChar('x')),
            "Ax".parse::<Card>()
        );
    }

    #[test]
    fn test_ordering_by_value_first() {
        let low = Card::new(Value::Two, Suit::Diamond);
        let high = Card::new(Value::Ace, Suit::Spade);
        assert!(low < high);
    }
}
