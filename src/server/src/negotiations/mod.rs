pub mod routes;

pub use routes::negotiation_routes;

use crate::common::validate;
use crate::{ApiResult, GameAppData};
use axum::Json;
use axum::extract::{Path, State};
use core::OfferTerms;
use core::transfers::negotiation::{IncomingAction, NegotiationAction, NegotiationResult};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SaveRequest {
    pub save_id: u32,
}

#[derive(Deserialize)]
pub struct NegotiateRequest {
    pub player_id: u32,
    pub from_team: Option<u32>,
    pub to_team: u32,
    pub fee: i64,
    pub wage: i64,
    pub years: u8,
    pub negotiation_id: Option<u32>,
    #[serde(default)]
    pub action: NegotiationAction,
}

/// Live haggling for a listed player or a free agent, with the human club
/// on the buying side.
pub async fn negotiate_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<SaveRequest>,
    Json(request): Json<NegotiateRequest>,
) -> ApiResult<Json<NegotiationResult>> {
    if request.action == NegotiationAction::Offer {
        validate::offer_terms(request.fee, request.wage, request.years)?;
    }

    let mut store = state.store.write().await;

    let result = state.negotiations.negotiate_transfer(
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
        request.negotiation_id,
        request.action,
    )?;

    Ok(Json(result))
}

#[derive(Deserialize)]
pub struct IncomingOfferRequest {
    pub save_id: u32,
    pub offer_id: u32,
}

#[derive(Deserialize)]
pub struct NegotiateIncomingRequest {
    pub team_id: u32,
    pub action: IncomingAction,
    pub counter_fee: Option<i64>,
    pub counter_wage: Option<i64>,
    pub counter_years: Option<u8>,
    pub negotiation_id: Option<u32>,
}

/// The human club answering an AI club's bid for one of its players.
pub async fn negotiate_incoming_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<IncomingOfferRequest>,
    Json(request): Json<NegotiateIncomingRequest>,
) -> ApiResult<Json<NegotiationResult>> {
    let counter_terms = match request.action {
        IncomingAction::Counter => {
            let fee = request.counter_fee.unwrap_or(0);
            let wage = request.counter_wage.unwrap_or(0);
            let years = request.counter_years.unwrap_or(3);
            validate::offer_terms(fee, wage, years)?;
            Some(OfferTerms { fee, wage, years })
        }
        _ => None,
    };

    let mut store = state.store.write().await;

    let result = state.negotiations.negotiate_incoming_offer(
        &mut *store,
        route_params.save_id,
        route_params.offer_id,
        request.team_id,
        request.action,
        counter_terms,
        request.negotiation_id,
    )?;

    Ok(Json(result))
}
