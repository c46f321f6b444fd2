// src/drawlog.rs
// The ordered record of balls drawn so far for one game.

use serde::{Deserialize, Serialize};

use crate::defs::Ball;
use crate::error::GameError;

/// Append-only, duplicate-free, order-preserving sequence of drawn balls.
/// Serializes as the plain label array stored on the game document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawLog(Vec<Ball>);

impl DrawLog {
    pub fn new() -> Self {
        DrawLog(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<Ball> {
        self.0.last().copied()
    }

    pub fn balls(&self) -> &[Ball] {
        &self.0
    }

    pub fn contains(&self, ball: Ball) -> bool {
        self.0.contains(&ball)
    }

    /// Membership by label string. Used by the card verifier, where an
    /// out-of-range cell value forms a label no valid ball carries and so
    /// simply never matches.
    pub fn contains_label(&self, label: &str) -> bool {
        self.0.iter().any(|ball| ball.label() == label)
    }

    /// Append a ball, preserving draw order. Rejects duplicates; order is
    /// never rewritten afterwards.
    pub fn push(&mut self, ball: Ball) -> Result<(), GameError> {
        if self.contains(ball) {
            return Err(GameError::DuplicateBall(ball.label()));
        }
        self.0.push(ball);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut log = DrawLog::new();
        for label in ["N42", "B7", "O65"] {
            log.push(label.parse().unwrap()).unwrap();
        }

        let labels: Vec<String> = log.iter().map(Ball::label).collect();
        assert_eq!(labels, ["N42", "B7", "O65"]);
        assert_eq!(log.last().unwrap().label(), "O65");
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut log = DrawLog::new();
        let ball: Ball = "B7".parse().unwrap();
        log.push(ball).unwrap();

        assert_eq!(log.push(ball), Err(GameError::DuplicateBall("B7".to_string())));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_contains_label() {
        let mut log = DrawLog::new();
        log.push("G50".parse().unwrap()).unwrap();

        assert!(log.contains_label("G50"));
        assert!(!log.contains_label("B50")); // not a valid ball, never matches
    }

    #[test]
    fn test_serializes_as_label_array() {
        let mut log = DrawLog::new();
        log.push("B7".parse().unwrap()).unwrap();
        log.push("I16".parse().unwrap()).unwrap();

        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(json, r#"["B7","I16"]"#);

        let back: DrawLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
