use crate::game::supervisor::AiTaskState;
use crate::{ApiError, ApiResult, GameAppData};
use axum::Json;
use axum::extract::{Path, State};
use core::storage::{GameClock, Mutation, TransferStore};
use core::transfers::processor::AiTransferProcessor;
use core::utils::TimeEstimation;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ROUNDS_PER_SEASON: u16 = 38;

#[derive(Deserialize)]
pub struct ProcessRequest {
    pub save_id: u32,
}

#[derive(Serialize)]
pub struct ProcessResponse {
    pub season: u16,
    pub round: u16,
}

/// Advances the game one round: bumps the clock synchronously, then hands
/// AI market activity to a detached background task so the response never
/// waits on it.
pub async fn game_process_action(
    State(state): State<GameAppData>,
    Path(route_params): Path<ProcessRequest>,
) -> ApiResult<Json<ProcessResponse>> {
    let save_id = route_params.save_id;

    if !state.ai_tasks.try_start() {
        return Err(ApiError::Conflict(
            "a processing round is already running".to_string(),
        ));
    }

    let advanced = {
        let mut store = state.store.write().await;
        advance_clock(&mut *store, save_id)
    };

    let (next, human_team_id) = match advanced {
        Ok(advanced) => advanced,
        Err(err) => {
            state.ai_tasks.reset();
            return Err(err);
        }
    };

    let data = state.clone();
    tokio::spawn(async move {
        let store = Arc::clone(&data.store);
        let mut guard = store.write_owned().await;
        let config = (*data.ai_config).clone();

        let result = tokio::task::spawn_blocking(move || {
            TimeEstimation::estimate(|| {
                AiTransferProcessor::process(
                    &mut *guard,
                    save_id,
                    human_team_id,
                    next.season,
                    next.round,
                    &config,
                )
            })
        })
        .await;

        match result {
            Ok((Ok(outcome), elapsed)) => {
                info!(
                    "season {} round {} processed in {} ms: {} expired, {} listed, {} offers, {} signings",
                    next.season,
                    next.round,
                    elapsed,
                    outcome.expired_offers,
                    outcome.new_listings,
                    outcome.new_offers,
                    outcome.free_agent_signings
                );
                data.ai_tasks.finish(outcome);
            }
            Ok((Err(err), _)) => {
                error!("AI processing failed for save {}: {}", save_id, err);
                data.ai_tasks.fail(err.to_string());
            }
            Err(err) => {
                error!("AI processing task panicked for save {}: {}", save_id, err);
                data.ai_tasks.fail(format!("task panicked: {}", err));
            }
        }
    });

    Ok(Json(ProcessResponse {
        season: next.season,
        round: next.round,
    }))
}

fn advance_clock<S: TransferStore>(
    store: &mut S,
    save_id: u32,
) -> ApiResult<(GameClock, u32)> {
    let clock = store
        .clock(save_id)
        .ok_or_else(|| ApiError::NotFound(format!("save {}", save_id)))?;

    let next = if clock.round >= ROUNDS_PER_SEASON {
        GameClock {
            season: clock.season + 1,
            round: 1,
        }
    } else {
        GameClock {
            season: clock.season,
            round: clock.round + 1,
        }
    };

    store
        .apply(save_id, &[Mutation::SetClock(next)])
        .map_err(|err| ApiError::InternalError(err.to_string()))?;

    let human_team_id = store
        .teams(save_id)
        .iter()
        .find(|t| t.controlled_by_user)
        .map(|t| t.id)
        .unwrap_or(0);

    Ok((next, human_team_id))
}

pub async fn game_process_status_action(
    State(state): State<GameAppData>,
    Path(_route_params): Path<ProcessRequest>,
) -> ApiResult<Json<AiTaskState>> {
    Ok(Json(state.ai_tasks.status()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::storage::InMemoryStore;

    #[test]
    fn season_rolls_over_at_the_last_round() {
        let mut store = InMemoryStore::new();
        store.create_save(1, GameClock { season: 3, round: 38 });

        let (next, _) = advance_clock(&mut store, 1).unwrap();
        assert_eq!(next.season, 4);
        assert_eq!(next.round, 1);
    }

    #[test]
    fn ordinary_rounds_just_increment() {
        let mut store = InMemoryStore::new();
        store.create_save(1, GameClock { season: 1, round: 7 });

        let (next, _) = advance_clock(&mut store, 1).unwrap();
        assert_eq!(next.season, 1);
        assert_eq!(next.round, 8);
    }
}
