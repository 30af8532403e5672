use crate::GameAppData;
use axum::Router;
use axum::routing::get;

pub fn market_routes() -> Router<GameAppData> {
    Router::new().route(
        "/api/saves/{save_id}/market",
        get(super::market_get_action),
    )
}
