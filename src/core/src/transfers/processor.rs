use crate::error::TransferError;
use crate::market::{Listing, Offer, OfferTerms, Player, Team};
use crate::storage::{chunk_batch, Mutation, TransferStore};
use crate::transfers::ledger::TransferLedger;
use crate::transfers::policy::{
    self, AiConfig, BuyDecision, FreeAgentDecision,
};
use crate::transfers::sweeper::ExpirySweeper;
use crate::transfers::valuation::{PlayerRatingCalculator, WageDemandCalculator};
use itertools::Itertools;
use log::{debug, error};
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Default, Clone, Serialize)]
pub struct AiProcessingResult {
    pub expired_offers: u32,
    pub new_listings: u32,
    pub new_offers: u32,
    pub free_agent_signings: u32,
}

/// Drives every AI club through one round of market activity. Steps run in
/// fixed order because later steps read what earlier steps wrote; each
/// step's writes go out as one batched operation, chunked when oversized.
pub struct AiTransferProcessor;

impl AiTransferProcessor {
    pub fn process<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        human_team_id: u32,
        season: u16,
        round: u16,
        config: &AiConfig,
    ) -> Result<AiProcessingResult, TransferError> {
        let expired_offers = ExpirySweeper::sweep(store, save_id, round)?;
        let new_listings = Self::process_listings(store, save_id, human_team_id, season, round, config)?;
        let new_offers = Self::process_offers(store, save_id, human_team_id, round, config)?;
        let free_agent_signings =
            Self::process_free_agents(store, save_id, human_team_id, season, round, config)?;

        debug!(
            "round {} AI market activity: {} expired, {} listed, {} offers, {} signings",
            round, expired_offers, new_listings, new_offers, free_agent_signings
        );

        Ok(AiProcessingResult {
            expired_offers,
            new_listings,
            new_offers,
            free_agent_signings,
        })
    }

    fn ai_teams<S: TransferStore>(store: &S, save_id: u32, human_team_id: u32) -> Vec<Team> {
        store
            .teams(save_id)
            .into_iter()
            .filter(|t| t.id != human_team_id && t.is_ai())
            .collect()
    }

    fn process_listings<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        human_team_id: u32,
        season: u16,
        round: u16,
        config: &AiConfig,
    ) -> Result<u32, TransferError> {
        let mut batch: Vec<Mutation> = Vec::new();

        for team in Self::ai_teams(store, save_id, human_team_id) {
            let squad = store.squad(save_id, team.id);

            for candidate in policy::select_players_to_list(&squad, season, config) {
                // Freshly read state: never double-list.
                if store.listing_for_player(save_id, candidate.player_id).is_some() {
                    continue;
                }

                let listing = Listing::new(
                    store.next_id(save_id),
                    candidate.player_id,
                    team.id,
                    candidate.asking_price,
                    candidate.status,
                    round,
                );
                batch.push(Mutation::InsertListing(listing));
            }
        }

        let count = batch.len() as u32;
        Self::apply_chunked(store, save_id, &batch, "listing step")?;
        Ok(count)
    }

    fn process_offers<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        human_team_id: u32,
        round: u16,
        config: &AiConfig,
    ) -> Result<u32, TransferError> {
        let listings = store.listings(save_id);
        let open_offers: Vec<Offer> = store
            .offers(save_id)
            .into_iter()
            .filter(|o| o.is_open())
            .collect();

        let mut batch: Vec<Mutation> = Vec::new();

        for team in Self::ai_teams(store, save_id, human_team_id) {
            let squad = store.squad(save_id, team.id);
            let squad_avg = policy::squad_average_overall(&squad);
            let committed_wages: i64 = squad.iter().map(|p| p.wage).sum();

            let mut budget_left = team.budget;
            let mut wage_budget_left = team.wage_budget - committed_wages;
            let mut made = 0u8;

            for listing in &listings {
                if made >= config.max_offers_per_club {
                    break;
                }
                if listing.team_id == team.id {
                    continue;
                }

                let already_bidding = open_offers
                    .iter()
                    .any(|o| o.player_id == listing.player_id && o.buyer_team_id == team.id);
                if already_bidding {
                    continue;
                }

                let player = match store.player(save_id, listing.player_id) {
                    Some(player) => player,
                    None => continue,
                };

                let need = policy::position_need(&squad, player.position);
                let decision: BuyDecision = policy::buy_decision(
                    &player,
                    listing.asking_price,
                    budget_left,
                    wage_budget_left,
                    squad_avg,
                    need,
                    team.reputation,
                    config,
                );

                if !decision.will_buy {
                    continue;
                }

                let fee = decision.offer_fee.unwrap_or(0);
                let wage = decision.offer_wage.unwrap_or(0);
                let years = decision.contract_years.unwrap_or(3);

                let mut offer = Offer::new(
                    store.next_id(save_id),
                    listing.player_id,
                    team.id,
                    Some(listing.team_id),
                    OfferTerms { fee, wage, years },
                    round,
                );
                offer.expires_round = round + config.offer_expiry_rounds;
                batch.push(Mutation::InsertOffer(offer));

                budget_left -= fee;
                wage_budget_left -= wage;
                made += 1;
            }
        }

        let count = batch.len() as u32;
        Self::apply_chunked(store, save_id, &batch, "offer step")?;
        Ok(count)
    }

    /// One free-agent signing per club per round, with the club evaluation
    /// order shuffled so no club systematically gets first pick.
    fn process_free_agents<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        human_team_id: u32,
        season: u16,
        round: u16,
        config: &AiConfig,
    ) -> Result<u32, TransferError> {
        let mut teams = Self::ai_teams(store, save_id, human_team_id);
        teams.shuffle(&mut rand::rng());

        let mut signed: HashSet<u32> = HashSet::new();
        let mut signings = 0u32;

        for team in teams {
            let squad = store.squad(save_id, team.id);
            let committed_wages: i64 = squad.iter().map(|p| p.wage).sum();
            let wage_budget_left = team.wage_budget - committed_wages;

            if wage_budget_left <= 0 {
                continue;
            }

            let candidates: Vec<Player> = store
                .free_agents(save_id)
                .into_iter()
                .filter(|p| !signed.contains(&p.id))
                .filter(|p| policy::position_need(&squad, p.position) > 0.0)
                .sorted_by_key(|p| std::cmp::Reverse(PlayerRatingCalculator::overall(p)))
                .collect();

            let Some(player) = candidates.first() else {
                continue;
            };

            let years = policy::contract_years_for_age(player.age);
            let expected = WageDemandCalculator::expected_free_agent_wage(player.wage, years);

            // Open slightly under expectation, never past the wage budget.
            let offered = ((expected as f64 * 0.9) as i64).min(wage_budget_left);
            if offered <= 0 {
                continue;
            }

            let decision =
                policy::free_agent_decision(expected, offered, team.reputation, round, config);

            let agreed_wage = match decision {
                FreeAgentDecision::Accept => offered,
                FreeAgentDecision::Counter { wage } if wage <= wage_budget_left => wage,
                _ => continue,
            };

            let offer = Offer::accepted(
                store.next_id(save_id),
                player.id,
                team.id,
                None,
                OfferTerms {
                    fee: 0,
                    wage: agreed_wage,
                    years,
                },
                round,
            );
            let offer_id = offer.id;

            store
                .apply(save_id, &[Mutation::InsertOffer(offer)])
                .map_err(TransferError::from)?;
            TransferLedger::complete_transfer(store, save_id, offer_id, season)?;

            signed.insert(player.id);
            signings += 1;
        }

        Ok(signings)
    }

    /// Applies one step's batch in chunks. Each chunk is atomic; a failure
    /// between chunks is fatal for the round and surfaces as a Storage
    /// error so the whole round's processing can be retried.
    fn apply_chunked<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        batch: &[Mutation],
        step: &str,
    ) -> Result<(), TransferError> {
        for chunk in chunk_batch(batch) {
            if let Err(err) = store.apply(save_id, chunk) {
                error!("{} failed mid-sequence, round must be retried: {}", step, err);
                return Err(TransferError::Storage(err.to_string()));
            }
        }
        Ok(())
    }
}
