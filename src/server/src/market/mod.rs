pub mod routes;

pub use routes::market_routes;

use crate::{ApiResult, GameAppData};
use axum::Json;
use axum::extract::{Path, Query, State};
use core::transfers::market::{MarketView, TransferMarket};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct MarketGetRequest {
    pub save_id: u32,
}

#[derive(Deserialize)]
pub struct MarketGetQuery {
    pub exclude_team: Option<u32>,
}

pub async fn market_get_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<MarketGetRequest>,
    Query(query): Query<MarketGetQuery>,
) -> ApiResult<Json<MarketView>> {
    let store = state.store.read().await;

    let view = TransferMarket::get_market(&*store, route_params.save_id, query.exclude_team)?;

    Ok(Json(view))
}
