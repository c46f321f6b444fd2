// src/pouch.rs
// The undrawn remainder of the 75-ball universe for one game.

use crate::defs::{self, Ball};
use crate::drawlog::DrawLog;
use crate::error::GameError;

pub struct Pouch {
    balls: Vec<Ball>,
}

impl Pouch {
    /// A full pouch holding the entire universe.
    pub fn new() -> Self {
        Pouch { balls: defs::universe() }
    }

    /// The pouch as it stands after the given draw log: universe minus
    /// everything already drawn.
    pub fn remaining(log: &DrawLog) -> Self {
        Pouch {
            balls: defs::universe()
                .into_iter()
                .filter(|ball| !log.contains(*ball))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// Draw one ball uniformly at random, without replacement.
    pub fn extract(&mut self) -> Result<Ball, GameError> {
        if self.is_empty() {
            return Err(GameError::ExhaustedPool);
        }
        let random_index = rand::random_range(0..self.len());
        Ok(self.balls.remove(random_index))
    }
}

impl Default for Pouch {
    fn default() -> Self {
        Self::new()
    }
}
