// src/game.rs
// The game document and the session controller that owns its lifecycle.
//
// The controller is the single writer of a game's draw log and status. All
// mutation goes copy -> store save -> done; nothing is recorded locally
// before the write confirms, so a failed draw never leaves a ball behind
// that was never persisted.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defs::Ball;
use crate::drawlog::DrawLog;
use crate::error::GameError;
use crate::payout;
use crate::pouch::Pouch;
use crate::store::DocumentStore;

/// Lifecycle status of a game. `completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ready,
    InProgress,
    Paused,
    Completed,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameStatus::Ready => "ready",
            GameStatus::InProgress => "in_progress",
            GameStatus::Paused => "paused",
            GameStatus::Completed => "completed",
        };
        write!(f, "{label}")
    }
}

/// Persisted game document (games/{id}).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDoc {
    #[serde(default)]
    pub id: String,
    pub event_id: String,
    pub event_name: String,
    pub game_number: u32,
    pub pattern_id: String,
    pub pattern_name: String,
    #[serde(default)]
    pub pattern_description: String,
    pub pattern_difficulty: u8,
    /// Share of the event prize pool assigned by the planner, if planned.
    pub allocated_percentage: Option<f64>,
    pub allocated_amount: Option<f64>,
    pub prize: String,
    pub verification_code: String,
    pub status: GameStatus,
    pub drawn_balls: DrawLog,
    pub created_at: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub last_ball_drawn: Option<DateTime<Utc>>,
    /// Whole seconds between start and end, stamped at completion.
    pub duration: Option<i64>,
    pub pot_amount: Option<f64>,
    pub winner_count: Option<u32>,
    pub winner_names: Option<Vec<String>>,
    pub calculated_payout_per_winner: Option<f64>,
    pub actual_payout_per_winner: Option<f64>,
    pub total_actual_payout: Option<f64>,
    pub rounding_loss: Option<f64>,
}

impl GameDoc {
    /// A fresh, unstarted game for an event.
    pub fn new(
        event_id: &str,
        event_name: &str,
        game_number: u32,
        pattern_id: &str,
        pattern_name: &str,
        pattern_description: &str,
        pattern_difficulty: u8,
        prize: &str,
    ) -> Self {
        GameDoc {
            id: String::new(),
            event_id: event_id.to_string(),
            event_name: event_name.to_string(),
            game_number,
            pattern_id: pattern_id.to_string(),
            pattern_name: pattern_name.to_string(),
            pattern_description: pattern_description.to_string(),
            pattern_difficulty,
            allocated_percentage: None,
            allocated_amount: None,
            prize: prize.to_string(),
            verification_code: crate::defs::generate_verification_code(),
            status: GameStatus::Ready,
            drawn_balls: DrawLog::new(),
            created_at: Utc::now(),
            start_time: None,
            end_time: None,
            last_ball_drawn: None,
            duration: None,
            pot_amount: None,
            winner_count: None,
            winner_names: None,
            calculated_payout_per_winner: None,
            actual_payout_per_winner: None,
            total_actual_payout: None,
            rounding_loss: None,
        }
    }

    /// Elapsed game time in whole seconds as of `now`. Always derived from
    /// the stored timestamps; the once-per-second display tick is cosmetic
    /// and never the time source.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        if self.status == GameStatus::Completed {
            return self.duration.unwrap_or(0);
        }
        match self.start_time {
            Some(start) => (now - start).num_seconds().max(0),
            None => 0,
        }
    }
}

/// Host-side controller for one game. Holds the injected store handle and
/// drives every state transition and draw.
pub struct GameSession {
    store: Arc<dyn DocumentStore>,
    game_id: String,
}

impl GameSession {
    pub fn new(store: Arc<dyn DocumentStore>, game_id: impl Into<String>) -> Self {
        GameSession { store, game_id: game_id.into() }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn load(&self) -> Result<GameDoc, GameError> {
        self.store.get_game(&self.game_id)
    }

    /// Start or resume the game. Valid from `ready` and `paused`. The start
    /// timestamp is recorded on the first start only, so pausing never
    /// resets the clock.
    pub fn start(&self) -> Result<GameDoc, GameError> {
        let mut game = self.load()?;
        match game.status {
            GameStatus::Ready | GameStatus::Paused => {}
            status => {
                return Err(GameError::InvalidState { operation: "start the game", status: status.to_string() });
            }
        }

        if game.start_time.is_none() {
            game.start_time = Some(Utc::now());
        }
        game.status = GameStatus::InProgress;
        self.store.save_game(&game)?;
        Ok(game)
    }

    /// Pause a running game. Draw log and timer state are retained.
    pub fn pause(&self) -> Result<GameDoc, GameError> {
        let mut game = self.load()?;
        if game.status != GameStatus::InProgress {
            return Err(GameError::InvalidState { operation: "pause the game", status: game.status.to_string() });
        }

        game.status = GameStatus::Paused;
        self.store.save_game(&game)?;
        Ok(game)
    }

    /// Draw the next ball uniformly at random from the undrawn pool.
    pub fn draw_ball(&self) -> Result<Ball, GameError> {
        let mut game = self.loaded_for_draw()?;
        let ball = Pouch::remaining(&game.drawn_balls).extract()?;
        self.append_draw(&mut game, ball)?;
        Ok(ball)
    }

    /// Record a manually called ball, validating the label against the
    /// letter ranges and the draw log.
    pub fn draw_manual(&self, label: &str) -> Result<Ball, GameError> {
        let mut game = self.loaded_for_draw()?;
        let ball: Ball = label.parse()?;
        self.append_draw(&mut game, ball)?;
        Ok(ball)
    }

    fn loaded_for_draw(&self) -> Result<GameDoc, GameError> {
        let game = self.load()?;
        if game.status != GameStatus::InProgress {
            return Err(GameError::InvalidState { operation: "draw a ball", status: game.status.to_string() });
        }
        Ok(game)
    }

    fn append_draw(&self, game: &mut GameDoc, ball: Ball) -> Result<(), GameError> {
        game.drawn_balls.push(ball)?;
        game.last_ball_drawn = Some(Utc::now());
        self.store.save_game(game)
    }

    /// Finalize the game: run the payout calculator, stamp the end time and
    /// duration, and persist everything with the status flip in one save.
    /// Rejected once completed; finalization happens exactly once.
    pub fn end(
        &self,
        pot_amount: f64,
        winner_count: u32,
        winner_names: Vec<String>,
    ) -> Result<GameDoc, GameError> {
        let mut game = self.load()?;
        match game.status {
            GameStatus::InProgress | GameStatus::Paused => {}
            status => {
                return Err(GameError::InvalidState { operation: "end the game", status: status.to_string() });
            }
        }

        let summary = payout::calculate(pot_amount, winner_count);
        let end_time = Utc::now();

        game.end_time = Some(end_time);
        game.duration = Some(match game.start_time {
            Some(start) => (end_time - start).num_seconds().max(0),
            None => 0,
        });
        game.pot_amount = Some(pot_amount);
        game.winner_count = Some(winner_count);
        game.winner_names = Some(winner_names);
        game.calculated_payout_per_winner = Some(summary.calculated_per_winner);
        game.actual_payout_per_winner = Some(summary.actual_per_winner);
        game.total_actual_payout = Some(summary.total_actual_payout);
        game.rounding_loss = Some(summary.rounding_loss);
        game.status = GameStatus::Completed;

        self.store.save_game(&game)?;
        Ok(game)
    }
}
