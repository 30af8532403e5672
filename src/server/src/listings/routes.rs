use crate::GameAppData;
use axum::Router;
use axum::routing::{delete, get, post};

pub fn listing_routes() -> Router<GameAppData> {
    Router::new()
        .route(
            "/api/saves/{save_id}/teams/{team_id}/listings",
            get(super::team_listings_action),
        )
        .route(
            "/api/saves/{save_id}/listings",
            post(super::list_player_action),
        )
        .route(
            "/api/saves/{save_id}/listings/{player_id}",
            delete(super::remove_listing_action),
        )
}
