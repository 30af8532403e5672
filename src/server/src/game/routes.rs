use crate::GameAppData;
use axum::Router;
use axum::routing::{get, post};

pub fn game_routes() -> Router<GameAppData> {
    Router::new()
        .route(
            "/api/saves/{save_id}/process",
            post(super::process::game_process_action),
        )
        .route(
            "/api/saves/{save_id}/process/status",
            get(super::process::game_process_status_action),
        )
}
