// src/api_handlers.rs
// HTTP handlers for the host API and the read-only public view.

use std::sync::Arc;

use axum::{
    Json as JsonExtractor,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defs::GRID_CELLS;
use crate::error::GameError;
use crate::game::{GameDoc, GameSession, GameStatus};
use crate::logging::{log_error, log_info};
use crate::pattern::{PatternDoc, PatternKind};
use crate::planner::{self, EventDoc, Transaction};
use crate::server::AppState;
use crate::store::resolve_pattern;
use crate::verify::verify_card;

// Response structures for JSON serialization
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Custom error type for handlers
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse { error: self.message };
        (self.status, Json(error_response)).into_response()
    }
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        let status = match &err {
            GameError::InvalidBall(_) => StatusCode::BAD_REQUEST,
            GameError::DuplicateBall(_) => StatusCode::CONFLICT,
            GameError::ExhaustedPool => StatusCode::CONFLICT,
            GameError::InvalidState { .. } => StatusCode::CONFLICT,
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

// ============================================================================
// Events & planning
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub name: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub total_prize_pool: f64,
    /// One planned game per pattern id, in play order.
    pub pattern_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct CreateEventResponse {
    pub event: EventDoc,
    pub games: Vec<GameDoc>,
}

pub async fn handle_create_event(
    State(app_state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<CreateEventRequest>,
) -> Result<Json<CreateEventResponse>, ApiError> {
    if request.pattern_ids.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "an event needs at least one game"));
    }

    let (event, games) = planner::plan_event(
        app_state.store.as_ref(),
        &request.name,
        &request.location,
        request.date,
        request.total_prize_pool,
        &request.pattern_ids,
    )?;

    log_info(&format!(
        "Created event '{}' ({}) with {} planned games",
        event.name,
        event.id,
        games.len()
    ));
    Ok(Json(CreateEventResponse { event, games }))
}

pub async fn handle_get_event(
    Path(event_id): Path<String>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<EventDoc>, ApiError> {
    Ok(Json(app_state.store.get_event(&event_id)?))
}

pub async fn handle_event_games(
    Path(event_id): Path<String>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<GameDoc>>, ApiError> {
    // Verify the event exists so a bad id yields 404 rather than [].
    app_state.store.get_event(&event_id)?;
    Ok(Json(app_state.store.list_event_games(&event_id)?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub item_type: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub notes: String,
}

pub async fn handle_add_transaction(
    Path(event_id): Path<String>,
    State(app_state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<TransactionRequest>,
) -> Result<Json<EventDoc>, ApiError> {
    let mut event = app_state.store.get_event(&event_id)?;
    event.transactions.push(Transaction::new(
        &request.item_type,
        request.quantity,
        request.price,
        &request.notes,
    ));
    app_state.store.save_event(&event)?;

    log_info(&format!(
        "Recorded {}x '{}' sale on event '{event_id}'",
        request.quantity, request.item_type
    ));
    Ok(Json(event))
}

// ============================================================================
// Patterns
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub difficulty: u8,
    pub is_custom: bool,
}

pub async fn handle_list_patterns(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<PatternEntry>>, ApiError> {
    let mut patterns: Vec<PatternEntry> = PatternKind::ALL
        .iter()
        .map(|kind| PatternEntry {
            id: kind.id().to_string(),
            name: kind.name().to_string(),
            description: kind.description().to_string(),
            difficulty: kind.difficulty(),
            is_custom: false,
        })
        .collect();

    for doc in app_state.store.list_patterns()? {
        patterns.push(PatternEntry {
            id: doc.id.clone(),
            difficulty: doc.difficulty(),
            name: doc.name,
            description: doc.description,
            is_custom: true,
        });
    }
    Ok(Json(patterns))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatternRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub grid: Vec<bool>,
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub created_by: String,
}

pub async fn handle_create_pattern(
    State(app_state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<CreatePatternRequest>,
) -> Result<Json<PatternDoc>, ApiError> {
    if request.grid.len() != GRID_CELLS {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("pattern grid must have exactly {GRID_CELLS} cells"),
        ));
    }
    if request.name.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "pattern name is required"));
    }

    let pattern = app_state.store.insert_pattern(PatternDoc {
        id: String::new(),
        name: request.name,
        description: request.description,
        grid: request.grid,
        difficulty: request.difficulty,
        created_by: request.created_by,
        created_at: Some(Utc::now()),
    })?;

    log_info(&format!("Saved custom pattern '{}' ({})", pattern.name, pattern.id));
    Ok(Json(pattern))
}

// ============================================================================
// Games
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub event_id: String,
    pub game_number: u32,
    pub pattern_id: String,
    #[serde(default)]
    pub prize: String,
}

pub async fn handle_create_game(
    State(app_state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<CreateGameRequest>,
) -> Result<Json<GameDoc>, ApiError> {
    let event = app_state.store.get_event(&request.event_id)?;
    let info = planner::pattern_info(app_state.store.as_ref(), &request.pattern_id)?;

    let game = app_state.store.insert_game(GameDoc::new(
        &event.id,
        &event.name,
        request.game_number,
        &request.pattern_id,
        &info.name,
        &info.description,
        info.difficulty,
        &request.prize,
    ))?;

    log_info(&format!(
        "Created game #{} ({}) for event '{}' with pattern '{}'",
        game.game_number, game.id, event.name, game.pattern_name
    ));
    Ok(Json(game))
}

#[derive(Deserialize)]
pub struct GamesQuery {
    pub status: Option<String>,
}

pub async fn handle_list_games(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<GamesQuery>,
) -> Result<Json<Vec<GameDoc>>, ApiError> {
    let status = match query.status.as_deref() {
        None => None,
        Some("ready") => Some(GameStatus::Ready),
        Some("in_progress") => Some(GameStatus::InProgress),
        Some("paused") => Some(GameStatus::Paused),
        Some("completed") => Some(GameStatus::Completed),
        Some(other) => {
            return Err(ApiError::new(StatusCode::BAD_REQUEST, format!("unknown status '{other}'")));
        }
    };
    Ok(Json(app_state.store.list_games(status)?))
}

pub async fn handle_get_game(
    Path(game_id): Path<String>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<GameDoc>, ApiError> {
    Ok(Json(app_state.store.get_game(&game_id)?))
}

pub async fn handle_start_game(
    Path(game_id): Path<String>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<GameDoc>, ApiError> {
    let session = GameSession::new(app_state.store.clone(), &game_id);
    let game = session.start()?;
    log_info(&format!("Game '{game_id}' started"));
    Ok(Json(game))
}

pub async fn handle_pause_game(
    Path(game_id): Path<String>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<GameDoc>, ApiError> {
    let session = GameSession::new(app_state.store.clone(), &game_id);
    let game = session.pause()?;
    log_info(&format!("Game '{game_id}' paused"));
    Ok(Json(game))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResponse {
    pub ball: String,
    pub balls_drawn: usize,
    pub balls_remaining: usize,
}

pub async fn handle_draw(
    Path(game_id): Path<String>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<DrawResponse>, ApiError> {
    let session = GameSession::new(app_state.store.clone(), &game_id);
    let ball = session.draw_ball().map_err(|e| {
        log_error(&format!("Draw failed for game '{game_id}': {e}"));
        ApiError::from(e)
    })?;
    let game = session.load()?;

    log_info(&format!("Game '{game_id}': drew {ball} ({}/75)", game.drawn_balls.len()));
    Ok(Json(DrawResponse {
        ball: ball.label(),
        balls_drawn: game.drawn_balls.len(),
        balls_remaining: crate::defs::TOTALBALLS - game.drawn_balls.len(),
    }))
}

pub async fn handle_draw_manual(
    Path((game_id, label)): Path<(String, String)>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<DrawResponse>, ApiError> {
    let session = GameSession::new(app_state.store.clone(), &game_id);
    let ball = session.draw_manual(&label).map_err(|e| {
        log_error(&format!("Manual draw '{label}' failed for game '{game_id}': {e}"));
        ApiError::from(e)
    })?;
    let game = session.load()?;

    log_info(&format!("Game '{game_id}': manually recorded {ball}"));
    Ok(Json(DrawResponse {
        ball: ball.label(),
        balls_drawn: game.drawn_balls.len(),
        balls_remaining: crate::defs::TOTALBALLS - game.drawn_balls.len(),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndGameRequest {
    pub pot_amount: f64,
    pub winner_count: u32,
    #[serde(default)]
    pub winner_names: Vec<String>,
}

pub async fn handle_end_game(
    Path(game_id): Path<String>,
    State(app_state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<EndGameRequest>,
) -> Result<Json<GameDoc>, ApiError> {
    let session = GameSession::new(app_state.store.clone(), &game_id);
    let game = session.end(request.pot_amount, request.winner_count, request.winner_names)?;

    log_info(&format!(
        "Game '{game_id}' completed: pot {:.2}, {} winner(s), payout {:.2} each, rounding loss {:.2}",
        request.pot_amount,
        request.winner_count,
        game.actual_payout_per_winner.unwrap_or(0.0),
        game.rounding_loss.unwrap_or(0.0)
    ));
    Ok(Json(game))
}

// ============================================================================
// Card verification
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub verification_code: String,
    /// 25 row-major cell values, null for unfilled cells and the free space.
    pub card: Vec<Option<u8>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_winner: bool,
    pub marked: Vec<bool>,
    pub game_id: String,
    pub event_name: String,
    pub game_number: u32,
    pub pattern_name: String,
}

pub async fn handle_verify(
    State(app_state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    if request.card.len() != GRID_CELLS {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("card must have exactly {GRID_CELLS} cells"),
        ));
    }

    let game = app_state.store.find_game_by_code(&request.verification_code)?;
    let pattern = resolve_pattern(app_state.store.as_ref(), &game.pattern_id)?;

    let mut card = [None; GRID_CELLS];
    card.copy_from_slice(&request.card);
    let result = verify_card(&card, &game.drawn_balls, &pattern);

    log_info(&format!(
        "Verified card against game '{}' ({}): {}",
        game.id,
        game.pattern_name,
        if result.is_winner { "WINNER" } else { "not a winner" }
    ));
    Ok(Json(VerifyResponse {
        is_winner: result.is_winner,
        marked: result.marked.to_vec(),
        game_id: game.id,
        event_name: game.event_name,
        game_number: game.game_number,
        pattern_name: game.pattern_name,
    }))
}

// ============================================================================
// Public view
// ============================================================================

/// The reduced document served to second-screen displays: live game state
/// without payout details or host controls.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicGameView {
    pub game_number: u32,
    pub event_name: String,
    pub pattern_name: String,
    pub pattern_description: String,
    pub prize: String,
    pub status: GameStatus,
    pub drawn_balls: Vec<String>,
    pub last_ball: Option<String>,
    pub balls_drawn: usize,
    pub elapsed_seconds: i64,
}

impl PublicGameView {
    pub fn from_game(game: &GameDoc) -> Self {
        PublicGameView {
            game_number: game.game_number,
            event_name: game.event_name.clone(),
            pattern_name: game.pattern_name.clone(),
            pattern_description: game.pattern_description.clone(),
            prize: game.prize.clone(),
            status: game.status,
            drawn_balls: game.drawn_balls.iter().map(|b| b.label()).collect(),
            last_ball: game.drawn_balls.last().map(|b| b.label()),
            balls_drawn: game.drawn_balls.len(),
            elapsed_seconds: game.elapsed_seconds(Utc::now()),
        }
    }
}

pub async fn handle_public_view(
    Path(game_id): Path<String>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<PublicGameView>, ApiError> {
    let game = app_state.store.get_game(&game_id)?;
    Ok(Json(PublicGameView::from_game(&game)))
}
