pub mod routes;

pub use routes::offer_routes;

use crate::common::validate;
use crate::{ApiError, ApiResult, GameAppData};
use axum::Json;
use axum::extract::{Path, State};
use core::transfers::market::{OfferOutcome, RespondAction, TeamOffers, TransferMarket};
use core::{Offer, OfferTerms};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct TeamOffersRequest {
    pub save_id: u32,
    pub team_id: u32,
}

pub async fn team_offers_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<TeamOffersRequest>,
) -> ApiResult<Json<TeamOffers>> {
    let store = state.store.read().await;

    let offers = TransferMarket::team_offers(&*store, route_params.save_id, route_params.team_id)?;

    Ok(Json(offers))
}

#[derive(Deserialize)]
pub struct SaveRequest {
    pub save_id: u32,
}

#[derive(Deserialize)]
pub struct MakeOfferRequest {
    pub player_id: u32,
    pub from_team: Option<u32>,
    pub to_team: u32,
    pub fee: i64,
    pub wage: i64,
    pub years: u8,
}

pub async fn make_offer_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<SaveRequest>,
    Json(request): Json<MakeOfferRequest>,
) -> ApiResult<Json<OfferOutcome>> {
    validate::offer_terms(request.fee, request.wage, request.years)?;

    let mut store = state.store.write().await;

    let outcome = TransferMarket::make_offer(
        &mut *store,
        route_params.save_id,
        request.player_id,
        request.from_team,
        request.to_team,
        OfferTerms {
            fee: request.fee,
            wage: request.wage,
            years: request.years,
        },
        &state.ai_config,
    )?;

    Ok(Json(outcome))
}

#[derive(Deserialize)]
pub struct OfferRequest {
    pub save_id: u32,
    pub offer_id: u32,
}

#[derive(Deserialize)]
pub struct RespondRequest {
    pub team_id: u32,
    pub action: RespondAction,
    pub counter_fee: Option<i64>,
    pub counter_wage: Option<i64>,
}

pub async fn respond_offer_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<OfferRequest>,
    Json(request): Json<RespondRequest>,
) -> ApiResult<Json<Offer>> {
    if let (Some(fee), Some(wage)) = (request.counter_fee, request.counter_wage) {
        validate::offer_terms(fee, wage, 1)?;
    }

    let mut store = state.store.write().await;

    let offer = TransferMarket::respond_to_offer(
        &mut *store,
        route_params.save_id,
        route_params.offer_id,
        request.team_id,
        request.action,
        request.counter_fee,
        request.counter_wage,
    )?;

    Ok(Json(offer))
}

#[derive(Deserialize)]
pub struct TeamActionRequest {
    pub team_id: u32,
}

pub async fn accept_counter_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<OfferRequest>,
    Json(request): Json<TeamActionRequest>,
) -> ApiResult<Json<Offer>> {
    let mut store = state.store.write().await;

    let offer = TransferMarket::accept_counter_offer(
        &mut *store,
        route_params.save_id,
        route_params.offer_id,
        request.team_id,
    )?;

    Ok(Json(offer))
}

#[derive(Serialize)]
pub struct CompleteResponse {
    pub transfer_id: u32,
}

pub async fn complete_offer_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<OfferRequest>,
    Json(request): Json<TeamActionRequest>,
) -> ApiResult<Json<CompleteResponse>> {
    let mut store = state.store.write().await;

    let transfer_id = TransferMarket::complete(
        &mut *store,
        route_params.save_id,
        route_params.offer_id,
        request.team_id,
    )
    .map_err(ApiError::from)?;

    Ok(Json(CompleteResponse { transfer_id }))
}
