// src/error.rs
// Typed errors for the game engines and the document store.

use std::error::Error;
use std::fmt;

/// Every failure the engines can surface to a caller. The session controller
/// converts these into user-facing messages; nothing retries automatically.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// Manual ball entry outside the letter/range rules.
    InvalidBall(String),
    /// Manual ball entry already present in the draw log.
    DuplicateBall(String),
    /// No balls remain for a random draw.
    ExhaustedPool,
    /// Operation attempted in a state-machine state that forbids it.
    InvalidState { operation: &'static str, status: String },
    /// Referenced game/event/pattern document is absent.
    NotFound(String),
    /// Backend read/write failure, opaque cause.
    Persistence(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidBall(reason) => write!(f, "invalid ball: {reason}"),
            GameError::DuplicateBall(label) => write!(f, "ball {label} has already been drawn"),
            GameError::ExhaustedPool => write!(f, "all 75 balls have been drawn"),
            GameError::InvalidState { operation, status } => {
                write!(f, "cannot {operation} while game is {status}")
            }
            GameError::NotFound(what) => write!(f, "{what} not found"),
            GameError::Persistence(reason) => write!(f, "persistence failure: {reason}"),
        }
    }
}

impl Error for GameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::InvalidState {
            operation: "draw a ball",
            status: "paused".to_string(),
        };
        assert_eq!(err.to_string(), "cannot draw a ball while game is paused");
        assert_eq!(
            GameError::DuplicateBall("B7".to_string()).to_string(),
            "ball B7 has already been drawn"
        );
        assert_eq!(GameError::ExhaustedPool.to_string(), "all 75 balls have been drawn");
    }
}
