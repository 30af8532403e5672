use crate::GameAppData;
use axum::Router;
use axum::routing::{get, post};

pub fn offer_routes() -> Router<GameAppData> {
    Router::new()
        .route(
            "/api/saves/{save_id}/teams/{team_id}/offers",
            get(super::team_offers_action),
        )
        .route(
            "/api/saves/{save_id}/offers",
            post(super::make_offer_action),
        )
        .route(
            "/api/saves/{save_id}/offers/{offer_id}/respond",
            post(super::respond_offer_action),
        )
        .route(
            "/api/saves/{save_id}/offers/{offer_id}/accept-counter",
            post(super::accept_counter_action),
        )
        .route(
            "/api/saves/{save_id}/offers/{offer_id}/complete",
            post(super::complete_offer_action),
        )
}
