// src/defs.rs
// Shared definitions for the bingo hall: the 75-ball universe, ball labels
// and the 5x5 card geometry.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GameError;

pub type Number = u8;

pub const FIRSTNUMBER: Number = 1;
pub const LASTNUMBER: Number = 75;
pub const TOTALBALLS: usize = 75;
pub const NUMBERS_PER_LETTER: Number = 15;

// 5x5 card geometry, row-major indexing.
pub const GRID_COLS: usize = 5;
pub const GRID_CELLS: usize = 25;
pub const FREE_SPACE_INDEX: usize = 12;

// Verification codes avoid glyphs that read ambiguously on a printed card
// (0/O, 1/I).
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const CODE_LENGTH: usize = 6;

/// Column letter of the bingo card, each owning a 15-number sub-range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    B,
    I,
    N,
    G,
    O,
}

impl Letter {
    pub const ALL: [Letter; GRID_COLS] = [Letter::B, Letter::I, Letter::N, Letter::G, Letter::O];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'B' => Some(Letter::B),
            'I' => Some(Letter::I),
            'N' => Some(Letter::N),
            'G' => Some(Letter::G),
            'O' => Some(Letter::O),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::B => 'B',
            Letter::I => 'I',
            Letter::N => 'N',
            Letter::G => 'G',
            Letter::O => 'O',
        }
    }

    /// Letter owning a card column (index % 5).
    pub fn for_column(col: usize) -> Self {
        Self::ALL[col % GRID_COLS]
    }

    /// The sub-range of numbers this letter may carry (B:1-15 .. O:61-75).
    pub fn range(self) -> RangeInclusive<Number> {
        let index = self as Number;
        let first = index * NUMBERS_PER_LETTER + 1;
        first..=first + NUMBERS_PER_LETTER - 1
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One labeled ball of the fixed 75-value universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ball {
    pub letter: Letter,
    pub number: Number,
}

impl Ball {
    /// Build a ball, validating that the number falls in the letter's
    /// sub-range.
    pub fn new(letter: Letter, number: Number) -> Result<Self, GameError> {
        if letter.range().contains(&number) {
            Ok(Ball { letter, number })
        } else {
            Err(GameError::InvalidBall(format!(
                "for {letter}, numbers must be between {} and {}",
                letter.range().start(),
                letter.range().end()
            )))
        }
    }

    /// The wire/display label, letter plus number with no separator
    /// (e.g. "B7", "O75").
    pub fn label(&self) -> String {
        format!("{}{}", self.letter, self.number)
    }
}

impl fmt::Display for Ball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.number)
    }
}

impl FromStr for Ball {
    type Err = GameError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim();
        let mut chars = label.chars();
        let letter = chars.next().and_then(Letter::from_char).ok_or_else(|| {
            GameError::InvalidBall(format!("unknown letter in '{label}', use B, I, N, G or O"))
        })?;
        let number: Number = chars
            .as_str()
            .parse()
            .map_err(|_| GameError::InvalidBall(format!("'{label}' has no valid number part")))?;
        Ball::new(letter, number)
    }
}

// Balls persist as their bare label so a drawn-balls array round-trips as
// ["B7", "N42", ...].
impl Serialize for Ball {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for Ball {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// The full fixed universe of 75 balls, in letter then number order.
pub fn universe() -> Vec<Ball> {
    Letter::ALL
        .iter()
        .flat_map(|&letter| letter.range().map(move |number| Ball { letter, number }))
        .collect()
}

/// Generate a 6-character verification code over the unambiguous alphabet.
pub fn generate_verification_code() -> String {
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_ranges() {
        assert_eq!(Letter::B.range(), 1..=15);
        assert_eq!(Letter::I.range(), 16..=30);
        assert_eq!(Letter::N.range(), 31..=45);
        assert_eq!(Letter::G.range(), 46..=60);
        assert_eq!(Letter::O.range(), 61..=75);
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(Letter::for_column(0), Letter::B);
        assert_eq!(Letter::for_column(2), Letter::N);
        assert_eq!(Letter::for_column(4), Letter::O);
    }

    #[test]
    fn test_universe_is_complete_and_distinct() {
        let balls = universe();
        assert_eq!(balls.len(), TOTALBALLS);

        let mut seen = std::collections::HashSet::new();
        for ball in &balls {
            assert!(ball.letter.range().contains(&ball.number));
            assert!(seen.insert(ball.label()));
        }
    }

    #[test]
    fn test_ball_label_round_trip() {
        let ball: Ball = "B7".parse().unwrap();
        assert_eq!(ball.letter, Letter::B);
        assert_eq!(ball.number, 7);
        assert_eq!(ball.label(), "B7");

        let ball: Ball = "o75".parse().unwrap();
        assert_eq!(ball.label(), "O75");
    }

    #[test]
    fn test_ball_parse_rejects_bad_labels() {
        assert!("Z5".parse::<Ball>().is_err());
        assert!("B16".parse::<Ball>().is_err()); // out of B's 1-15 range
        assert!("B".parse::<Ball>().is_err());
        assert!("".parse::<Ball>().is_err());
        assert!("17".parse::<Ball>().is_err());
    }

    #[test]
    fn test_ball_serializes_as_label() {
        let ball: Ball = "N42".parse().unwrap();
        assert_eq!(serde_json::to_string(&ball).unwrap(), "\"N42\"");
        let back: Ball = serde_json::from_str("\"N42\"").unwrap();
        assert_eq!(back, ball);
    }

    #[test]
    fn test_verification_code_format() {
        for _ in 0..50 {
            let code = generate_verification_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }
}
