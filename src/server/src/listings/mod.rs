pub mod routes;

pub use routes::listing_routes;

use crate::common::validate;
use crate::{ApiResult, GameAppData};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use core::Listing;
use core::transfers::market::{ListedPlayer, TransferMarket};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct TeamListingsRequest {
    pub save_id: u32,
    pub team_id: u32,
}

pub async fn team_listings_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<TeamListingsRequest>,
) -> ApiResult<Json<Vec<ListedPlayer>>> {
    let store = state.store.read().await;

    let listings =
        TransferMarket::team_listings(&*store, route_params.save_id, route_params.team_id)?;

    Ok(Json(listings))
}

#[derive(Deserialize)]
pub struct ListPlayerPathRequest {
    pub save_id: u32,
}

#[derive(Deserialize)]
pub struct ListPlayerRequest {
    pub team_id: u32,
    pub player_id: u32,
    pub asking_price: Option<i64>,
}

pub async fn list_player_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<ListPlayerPathRequest>,
    Json(request): Json<ListPlayerRequest>,
) -> ApiResult<Json<Listing>> {
    validate::asking_price(request.asking_price)?;

    let mut store = state.store.write().await;

    let listing = TransferMarket::list_player(
        &mut *store,
        route_params.save_id,
        request.team_id,
        request.player_id,
        request.asking_price,
    )?;

    Ok(Json(listing))
}

#[derive(Deserialize)]
pub struct RemoveListingRequest {
    pub save_id: u32,
    pub player_id: u32,
}

#[derive(Deserialize)]
pub struct RemoveListingQuery {
    pub team_id: u32,
}

pub async fn remove_listing_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<RemoveListingRequest>,
    Query(query): Query<RemoveListingQuery>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;

    TransferMarket::remove_listing(
        &mut *store,
        route_params.save_id,
        query.team_id,
        route_params.player_id,
    )?;

    Ok(StatusCode::NO_CONTENT)
}
