// src/server.rs
// Axum server wiring the host API over an injected document store.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::api_handlers::*;
use crate::config::ServerConfig;
use crate::logging::{log_error, log_error_stderr, log_info};
use crate::store::DocumentStore;

pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: ServerConfig,
}

pub fn start_server(
    config: ServerConfig,
    store: Arc<dyn DocumentStore>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app_state = Arc::new(AppState { store, config: config.clone() });

        let app = Router::new()
            // Events & planning
            .route("/events", post(handle_create_event))
            .route("/events/{event_id}", get(handle_get_event))
            .route("/events/{event_id}/games", get(handle_event_games))
            .route("/events/{event_id}/transactions", post(handle_add_transaction))
            // Patterns
            .route("/patterns", get(handle_list_patterns).post(handle_create_pattern))
            // Games & session control
            .route("/games", get(handle_list_games).post(handle_create_game))
            .route("/games/{game_id}", get(handle_get_game))
            .route("/games/{game_id}/start", post(handle_start_game))
            .route("/games/{game_id}/pause", post(handle_pause_game))
            .route("/games/{game_id}/draw", post(handle_draw))
            .route("/games/{game_id}/draw/{label}", post(handle_draw_manual))
            .route("/games/{game_id}/end", post(handle_end_game))
            // Verification & public display
            .route("/verify", post(handle_verify))
            .route("/games/{game_id}/public", get(handle_public_view))
            .layer(CorsLayer::permissive())
            .with_state(app_state);

        let addr = SocketAddr::from((
            config.host.parse::<std::net::IpAddr>().unwrap_or([127, 0, 0, 1].into()),
            config.port,
        ));
        let listener = match tokio::net::TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(e) => {
                log_error_stderr(&format!("Failed to start API server: {e}"));
                return;
            }
        };

        log_info(&format!("Server starting on {addr}"));

        if let Err(err) = axum::serve(listener, app).await {
            log_error(&format!("Server error: {err:?}"));
        }

        log_info("Server shutdown complete");
    })
}
