use crate::GameAppData;
use axum::Router;
use axum::routing::post;

pub fn negotiation_routes() -> Router<GameAppData> {
    Router::new()
        .route(
            "/api/saves/{save_id}/negotiations",
            post(super::negotiate_action),
        )
        .route(
            "/api/saves/{save_id}/offers/{offer_id}/negotiate",
            post(super::negotiate_incoming_action),
        )
}
