use crate::error::TransferError;
use crate::market::{
    Listing, ListingStatus, Offer, OfferStatus, OfferTerms, Player,
};
use crate::storage::{Mutation, TransferStore};
use crate::transfers::ledger::TransferLedger;
use crate::transfers::policy::{self, AiConfig, FreeAgentDecision, SellDecision};
use crate::transfers::valuation::{AskingPriceCalculator, WageDemandCalculator};
use log::info;
use serde::{Deserialize, Serialize};

/// A listing joined with its player, as the market screen shows it.
#[derive(Debug, Clone, Serialize)]
pub struct ListedPlayer {
    pub listing: Listing,
    pub player: Player,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketView {
    pub listed: Vec<ListedPlayer>,
    pub free_agents: Vec<Player>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamOffers {
    pub incoming: Vec<Offer>,
    pub outgoing: Vec<Offer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespondAction {
    Accept,
    Reject,
    Counter,
}

/// What came back from placing an offer. An offer against an AI club or a
/// free agent is answered in the same call, so the status may already be
/// terminal.
#[derive(Debug, Clone, Serialize)]
pub struct OfferOutcome {
    pub offer_id: u32,
    pub status: OfferStatus,
    pub counter_fee: Option<i64>,
    pub counter_wage: Option<i64>,
}

pub struct TransferMarket;

impl TransferMarket {
    /// Market browse view: every active listing except the viewer's own,
    /// plus the free-agent pool.
    pub fn get_market<S: TransferStore>(
        store: &S,
        save_id: u32,
        exclude_team: Option<u32>,
    ) -> Result<MarketView, TransferError> {
        store
            .clock(save_id)
            .ok_or_else(|| TransferError::NotFound(format!("save {}", save_id)))?;

        let listed = store
            .listings(save_id)
            .into_iter()
            .filter(|l| Some(l.team_id) != exclude_team)
            .filter_map(|listing| {
                store.player(save_id, listing.player_id).map(|player| ListedPlayer {
                    listing,
                    player,
                })
            })
            .collect();

        Ok(MarketView {
            listed,
            free_agents: store.free_agents(save_id),
        })
    }

    pub fn team_listings<S: TransferStore>(
        store: &S,
        save_id: u32,
        team_id: u32,
    ) -> Result<Vec<ListedPlayer>, TransferError> {
        store
            .team(save_id, team_id)
            .ok_or_else(|| TransferError::NotFound(format!("team {}", team_id)))?;

        Ok(store
            .listings(save_id)
            .into_iter()
            .filter(|l| l.team_id == team_id)
            .filter_map(|listing| {
                store.player(save_id, listing.player_id).map(|player| ListedPlayer {
                    listing,
                    player,
                })
            })
            .collect())
    }

    /// Open offers touching the team, split by direction.
    pub fn team_offers<S: TransferStore>(
        store: &S,
        save_id: u32,
        team_id: u32,
    ) -> Result<TeamOffers, TransferError> {
        store
            .team(save_id, team_id)
            .ok_or_else(|| TransferError::NotFound(format!("team {}", team_id)))?;

        let mut incoming = Vec::new();
        let mut outgoing = Vec::new();

        for offer in store.offers(save_id) {
            if !offer.is_open() {
                continue;
            }
            if offer.seller_team_id == Some(team_id) {
                incoming.push(offer);
            } else if offer.buyer_team_id == team_id {
                outgoing.push(offer);
            }
        }

        Ok(TeamOffers { incoming, outgoing })
    }

    /// Puts a contracted player on the market. The asking price defaults to
    /// the valuation when the caller names none.
    pub fn list_player<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        team_id: u32,
        player_id: u32,
        asking_price: Option<i64>,
    ) -> Result<Listing, TransferError> {
        let clock = store
            .clock(save_id)
            .ok_or_else(|| TransferError::NotFound(format!("save {}", save_id)))?;

        let player = store
            .player(save_id, player_id)
            .ok_or_else(|| TransferError::NotFound(format!("player {}", player_id)))?;

        if player.team_id != Some(team_id) {
            return Err(TransferError::Authorization(format!(
                "player {} is not under contract at team {}",
                player_id, team_id
            )));
        }

        if store.listing_for_player(save_id, player_id).is_some() {
            return Err(TransferError::Conflict(format!(
                "player {} is already listed",
                player_id
            )));
        }

        let asking = match asking_price {
            Some(price) if price > 0 => price,
            Some(_) => {
                return Err(TransferError::Validation(
                    "asking price must be positive".to_string(),
                ));
            }
            None => AskingPriceCalculator::calculate(&player, clock.season),
        };

        let status = if player.remaining_contract_seasons(clock.season) == 0 {
            ListingStatus::ContractExpiring
        } else {
            ListingStatus::Available
        };

        let listing = Listing::new(
            store.next_id(save_id),
            player_id,
            team_id,
            asking,
            status,
            clock.round,
        );

        store
            .apply(save_id, &[Mutation::InsertListing(listing.clone())])
            .map_err(TransferError::from)?;

        info!(
            "team {} listed player {} at {}",
            team_id, player_id, asking
        );

        Ok(listing)
    }

    pub fn remove_listing<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        team_id: u32,
        player_id: u32,
    ) -> Result<(), TransferError> {
        let listing = store
            .listing_for_player(save_id, player_id)
            .ok_or_else(|| TransferError::NotFound(format!("listing for player {}", player_id)))?;

        if listing.team_id != team_id {
            return Err(TransferError::Authorization(format!(
                "listing for player {} belongs to another team",
                player_id
            )));
        }

        store
            .apply(save_id, &[Mutation::DeleteListing { listing_id: listing.id }])
            .map_err(TransferError::from)
    }

    /// Places an offer. When the other side is AI controlled (or the player
    /// is a free agent) it answers immediately and the returned status is
    /// already resolved.
    pub fn make_offer<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        player_id: u32,
        from_team: Option<u32>,
        to_team: u32,
        terms: OfferTerms,
        config: &AiConfig,
    ) -> Result<OfferOutcome, TransferError> {
        let clock = store
            .clock(save_id)
            .ok_or_else(|| TransferError::NotFound(format!("save {}", save_id)))?;

        let player = store
            .player(save_id, player_id)
            .ok_or_else(|| TransferError::NotFound(format!("player {}", player_id)))?;

        let buyer = store
            .team(save_id, to_team)
            .ok_or_else(|| TransferError::NotFound(format!("team {}", to_team)))?;

        if player.team_id != from_team {
            return Err(TransferError::Conflict(
                "player does not belong to the named selling team".to_string(),
            ));
        }

        if player.team_id == Some(to_team) {
            return Err(TransferError::Validation(
                "a team cannot bid for its own player".to_string(),
            ));
        }

        let listing = match from_team {
            Some(_) => Some(store.listing_for_player(save_id, player_id).ok_or_else(
                || {
                    TransferError::Conflict(format!(
                        "player {} is not on the transfer market",
                        player_id
                    ))
                },
            )?),
            None => None,
        };

        let duplicate = store.offers(save_id).into_iter().any(|o| {
            o.player_id == player_id && o.buyer_team_id == to_team && o.is_open()
        });
        if duplicate {
            return Err(TransferError::Conflict(format!(
                "team {} already has an open offer for player {}",
                to_team, player_id
            )));
        }

        let mut offer = Offer::new(
            store.next_id(save_id),
            player_id,
            to_team,
            from_team,
            terms,
            clock.round,
        );
        offer.expires_round = clock.round + config.offer_expiry_rounds;

        let ai_answers = match from_team {
            Some(seller_team_id) => store
                .team(save_id, seller_team_id)
                .map(|t| t.is_ai())
                .unwrap_or(false),
            None => true,
        };

        if !ai_answers {
            let offer_id = offer.id;
            store
                .apply(save_id, &[Mutation::InsertOffer(offer)])
                .map_err(TransferError::from)?;
            return Ok(OfferOutcome {
                offer_id,
                status: OfferStatus::Pending,
                counter_fee: None,
                counter_wage: None,
            });
        }

        // AI side answers in the same call.
        let decision = match (listing, from_team) {
            (Some(listing), Some(seller_team_id)) => {
                let depth = policy::depth_at_position(
                    &store.squad(save_id, seller_team_id),
                    player.position,
                );
                match policy::sell_decision(
                    listing.asking_price,
                    terms.fee,
                    terms.wage,
                    Some(depth),
                    &player,
                    clock.season,
                    config,
                ) {
                    SellDecision::Accept => AiAnswer::Accept,
                    SellDecision::Reject => AiAnswer::Reject,
                    SellDecision::Counter { fee, wage } => AiAnswer::Counter { fee, wage },
                }
            }
            _ => {
                let expected =
                    WageDemandCalculator::expected_free_agent_wage(player.wage, terms.years);
                match policy::free_agent_decision(
                    expected,
                    terms.wage,
                    buyer.reputation,
                    clock.round,
                    config,
                ) {
                    FreeAgentDecision::Accept => AiAnswer::Accept,
                    FreeAgentDecision::Reject => AiAnswer::Reject,
                    FreeAgentDecision::Counter { wage } => AiAnswer::Counter { fee: 0, wage },
                }
            }
        };

        let offer_id = offer.id;
        offer.responded_round = Some(clock.round);

        let outcome = match decision {
            AiAnswer::Accept => {
                offer.status = OfferStatus::Accepted;
                OfferOutcome {
                    offer_id,
                    status: OfferStatus::Accepted,
                    counter_fee: None,
                    counter_wage: None,
                }
            }
            AiAnswer::Reject => {
                offer.status = OfferStatus::Rejected;
                OfferOutcome {
                    offer_id,
                    status: OfferStatus::Rejected,
                    counter_fee: None,
                    counter_wage: None,
                }
            }
            AiAnswer::Counter { fee, wage } => {
                offer.status = OfferStatus::Counter;
                offer.counter_fee = Some(fee);
                offer.counter_wage = Some(wage);
                OfferOutcome {
                    offer_id,
                    status: OfferStatus::Counter,
                    counter_fee: Some(fee),
                    counter_wage: Some(wage),
                }
            }
        };

        store
            .apply(save_id, &[Mutation::InsertOffer(offer)])
            .map_err(TransferError::from)?;

        Ok(outcome)
    }

    /// The selling side answers an open offer.
    pub fn respond_to_offer<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        offer_id: u32,
        team_id: u32,
        action: RespondAction,
        counter_fee: Option<i64>,
        counter_wage: Option<i64>,
    ) -> Result<Offer, TransferError> {
        let clock = store
            .clock(save_id)
            .ok_or_else(|| TransferError::NotFound(format!("save {}", save_id)))?;

        let offer = store
            .offer(save_id, offer_id)
            .ok_or_else(|| TransferError::NotFound(format!("offer {}", offer_id)))?;

        if offer.seller_team_id != Some(team_id) {
            return Err(TransferError::Authorization(
                "only the selling team may respond to this offer".to_string(),
            ));
        }

        if !offer.is_open() {
            return Err(TransferError::Conflict(format!(
                "offer {} is no longer open",
                offer_id
            )));
        }

        let batch = match action {
            RespondAction::Accept => vec![Mutation::SetOfferStatus {
                offer_id,
                status: OfferStatus::Accepted,
                responded_round: Some(clock.round),
            }],
            RespondAction::Reject => vec![Mutation::SetOfferStatus {
                offer_id,
                status: OfferStatus::Rejected,
                responded_round: Some(clock.round),
            }],
            RespondAction::Counter => {
                let fee = counter_fee.ok_or_else(|| {
                    TransferError::Validation("counter requires a fee".to_string())
                })?;
                vec![
                    Mutation::SetOfferStatus {
                        offer_id,
                        status: OfferStatus::Counter,
                        responded_round: Some(clock.round),
                    },
                    Mutation::SetOfferCounter {
                        offer_id,
                        counter_fee: fee,
                        counter_wage: counter_wage.unwrap_or(offer.wage),
                    },
                ]
            }
        };

        store.apply(save_id, &batch).map_err(TransferError::from)?;

        store
            .offer(save_id, offer_id)
            .ok_or_else(|| TransferError::NotFound(format!("offer {}", offer_id)))
    }

    /// The buying side takes the seller's counter terms.
    pub fn accept_counter_offer<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        offer_id: u32,
        team_id: u32,
    ) -> Result<Offer, TransferError> {
        let clock = store
            .clock(save_id)
            .ok_or_else(|| TransferError::NotFound(format!("save {}", save_id)))?;

        let offer = store
            .offer(save_id, offer_id)
            .ok_or_else(|| TransferError::NotFound(format!("offer {}", offer_id)))?;

        if offer.buyer_team_id != team_id {
            return Err(TransferError::Authorization(
                "only the bidding team may accept a counter".to_string(),
            ));
        }

        if offer.status != OfferStatus::Counter {
            return Err(TransferError::Conflict(format!(
                "offer {} has no counter on the table",
                offer_id
            )));
        }

        store
            .apply(
                save_id,
                &[Mutation::AcceptCounter {
                    offer_id,
                    responded_round: Some(clock.round),
                }],
            )
            .map_err(TransferError::from)?;

        store
            .offer(save_id, offer_id)
            .ok_or_else(|| TransferError::NotFound(format!("offer {}", offer_id)))
    }

    /// Settles an accepted offer through the ledger.
    pub fn complete<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        offer_id: u32,
        team_id: u32,
    ) -> Result<u32, TransferError> {
        let clock = store
            .clock(save_id)
            .ok_or_else(|| TransferError::NotFound(format!("save {}", save_id)))?;

        let offer = store
            .offer(save_id, offer_id)
            .ok_or_else(|| TransferError::NotFound(format!("offer {}", offer_id)))?;

        if offer.buyer_team_id != team_id && offer.seller_team_id != Some(team_id) {
            return Err(TransferError::Authorization(
                "only a party to the offer may complete it".to_string(),
            ));
        }

        TransferLedger::complete_transfer(store, save_id, offer_id, clock.season)
    }
}

enum AiAnswer {
    Accept,
    Reject,
    Counter { fee: i64, wage: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{PlayerAttributes, PlayerPosition, PlayerStatus, Team};
    use crate::storage::{GameClock, InMemoryStore};

    const SAVE: u32 = 1;
    const HUMAN: u32 = 10;
    const AI_SELLER: u32 = 20;

    fn level(v: f32) -> PlayerAttributes {
        PlayerAttributes {
            pace: v,
            stamina: v,
            strength: v,
            passing: v,
            shooting: v,
            dribbling: v,
            tackling: v,
            positioning: v,
            reflexes: v,
            handling: v,
        }
    }

    fn seed() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.create_save(SAVE, GameClock { season: 1, round: 5 });

        for (id, user) in [(HUMAN, true), (AI_SELLER, false)] {
            store.put_team(
                SAVE,
                Team {
                    id,
                    name: format!("Team {}", id),
                    budget: 25_000_000,
                    wage_budget: 800_000,
                    reputation: 5000,
                    balance: 25_000_000,
                    controlled_by_user: user,
                },
            );
        }

        store.put_player(
            SAVE,
            Player {
                id: 100,
                name: "Own Player".into(),
                position: PlayerPosition::Midfielder,
                age: 26,
                potential: 80,
                attributes: level(12.0),
                contract_end_season: 3,
                wage: 30_000,
                market_value: 5_000_000,
                morale: 0.5,
                status: PlayerStatus::Active,
                team_id: Some(HUMAN),
            },
        );

        store.put_player(
            SAVE,
            Player {
                id: 200,
                name: "Ai Player".into(),
                position: PlayerPosition::Attacker,
                age: 23,
                potential: 88,
                attributes: level(12.0),
                contract_end_season: 4,
                wage: 35_000,
                market_value: 9_000_000,
                morale: 0.5,
                status: PlayerStatus::Active,
                team_id: Some(AI_SELLER),
            },
        );

        store.put_player(
            SAVE,
            Player {
                id: 300,
                name: "Free Agent".into(),
                position: PlayerPosition::Defender,
                age: 29,
                potential: 70,
                attributes: level(10.0),
                contract_end_season: 1,
                wage: 20_000,
                market_value: 1_000_000,
                morale: 0.4,
                status: PlayerStatus::Active,
                team_id: None,
            },
        );

        store
    }

    #[test]
    fn listing_twice_is_a_conflict() {
        let mut store = seed();

        TransferMarket::list_player(&mut store, SAVE, HUMAN, 100, Some(5_000_000)).unwrap();

        let err =
            TransferMarket::list_player(&mut store, SAVE, HUMAN, 100, Some(6_000_000)).unwrap_err();
        assert!(matches!(err, TransferError::Conflict(_)));
    }

    #[test]
    fn listing_another_clubs_player_is_forbidden() {
        let mut store = seed();

        let err =
            TransferMarket::list_player(&mut store, SAVE, HUMAN, 200, Some(5_000_000)).unwrap_err();
        assert!(matches!(err, TransferError::Authorization(_)));
    }

    #[test]
    fn listing_without_a_price_uses_the_valuation() {
        let mut store = seed();

        let listing = TransferMarket::list_player(&mut store, SAVE, HUMAN, 100, None).unwrap();
        assert_eq!(
            listing.asking_price,
            AskingPriceCalculator::calculate(&store.player(SAVE, 100).unwrap(), 1)
        );
    }

    #[test]
    fn market_view_excludes_the_viewers_own_listings() {
        let mut store = seed();
        TransferMarket::list_player(&mut store, SAVE, HUMAN, 100, Some(5_000_000)).unwrap();
        TransferMarket::list_player(&mut store, SAVE, AI_SELLER, 200, Some(9_000_000)).unwrap();

        let view = TransferMarket::get_market(&store, SAVE, Some(HUMAN)).unwrap();
        assert_eq!(view.listed.len(), 1);
        assert_eq!(view.listed[0].player.id, 200);
        assert_eq!(view.free_agents.len(), 1);
        assert_eq!(view.free_agents[0].id, 300);
    }

    #[test]
    fn offer_for_an_unlisted_player_is_rejected() {
        let mut store = seed();

        let err = TransferMarket::make_offer(
            &mut store,
            SAVE,
            200,
            Some(AI_SELLER),
            HUMAN,
            OfferTerms {
                fee: 9_000_000,
                wage: 40_000,
                years: 4,
            },
            &AiConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, TransferError::Conflict(_)));
    }

    #[test]
    fn full_asking_price_is_accepted_on_the_spot() {
        let mut store = seed();
        TransferMarket::list_player(&mut store, SAVE, AI_SELLER, 200, Some(9_000_000)).unwrap();

        let outcome = TransferMarket::make_offer(
            &mut store,
            SAVE,
            200,
            Some(AI_SELLER),
            HUMAN,
            OfferTerms {
                fee: 9_000_000,
                wage: 40_000,
                years: 4,
            },
            &AiConfig::default(),
        )
        .unwrap();

        assert_eq!(outcome.status, OfferStatus::Accepted);

        let transfer_id =
            TransferMarket::complete(&mut store, SAVE, outcome.offer_id, HUMAN).unwrap();
        assert!(transfer_id > 0);
        assert_eq!(store.player(SAVE, 200).unwrap().team_id, Some(HUMAN));
    }

    #[test]
    fn duplicate_open_offer_is_a_conflict() {
        let mut store = seed();
        TransferMarket::list_player(&mut store, SAVE, AI_SELLER, 200, Some(9_000_000)).unwrap();

        let outcome = TransferMarket::make_offer(
            &mut store,
            SAVE,
            200,
            Some(AI_SELLER),
            HUMAN,
            OfferTerms {
                fee: 6_000_000,
                wage: 40_000,
                years: 4,
            },
            &AiConfig::default(),
        )
        .unwrap();
        assert_eq!(outcome.status, OfferStatus::Counter);

        let err = TransferMarket::make_offer(
            &mut store,
            SAVE,
            200,
            Some(AI_SELLER),
            HUMAN,
            OfferTerms {
                fee: 6_500_000,
                wage: 40_000,
                years: 4,
            },
            &AiConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TransferError::Conflict(_)));
    }

    #[test]
    fn accepting_a_counter_promotes_its_terms() {
        let mut store = seed();
        TransferMarket::list_player(&mut store, SAVE, AI_SELLER, 200, Some(9_000_000)).unwrap();

        let outcome = TransferMarket::make_offer(
            &mut store,
            SAVE,
            200,
            Some(AI_SELLER),
            HUMAN,
            OfferTerms {
                fee: 6_000_000,
                wage: 40_000,
                years: 4,
            },
            &AiConfig::default(),
        )
        .unwrap();
        assert_eq!(outcome.status, OfferStatus::Counter);
        let counter_fee = outcome.counter_fee.unwrap();

        let offer =
            TransferMarket::accept_counter_offer(&mut store, SAVE, outcome.offer_id, HUMAN)
                .unwrap();
        assert_eq!(offer.status, OfferStatus::Accepted);
        assert_eq!(offer.fee, counter_fee);
    }

    #[test]
    fn incoming_offer_to_a_human_club_stays_pending() {
        let mut store = seed();
        TransferMarket::list_player(&mut store, SAVE, HUMAN, 100, Some(5_000_000)).unwrap();

        let outcome = TransferMarket::make_offer(
            &mut store,
            SAVE,
            100,
            Some(HUMAN),
            AI_SELLER,
            OfferTerms {
                fee: 5_000_000,
                wage: 35_000,
                years: 3,
            },
            &AiConfig::default(),
        )
        .unwrap();

        assert_eq!(outcome.status, OfferStatus::Pending);

        let offers = TransferMarket::team_offers(&store, SAVE, HUMAN).unwrap();
        assert_eq!(offers.incoming.len(), 1);
        assert!(offers.outgoing.is_empty());
    }

    #[test]
    fn seller_counter_then_buyer_accepts() {
        let mut store = seed();
        TransferMarket::list_player(&mut store, SAVE, HUMAN, 100, Some(5_000_000)).unwrap();

        let outcome = TransferMarket::make_offer(
            &mut store,
            SAVE,
            100,
            Some(HUMAN),
            AI_SELLER,
            OfferTerms {
                fee: 4_000_000,
                wage: 35_000,
                years: 3,
            },
            &AiConfig::default(),
        )
        .unwrap();

        let offer = TransferMarket::respond_to_offer(
            &mut store,
            SAVE,
            outcome.offer_id,
            HUMAN,
            RespondAction::Counter,
            Some(4_800_000),
            None,
        )
        .unwrap();
        assert_eq!(offer.status, OfferStatus::Counter);

        let offer = TransferMarket::accept_counter_offer(
            &mut store,
            SAVE,
            outcome.offer_id,
            AI_SELLER,
        )
        .unwrap();
        assert_eq!(offer.fee, 4_800_000);

        TransferMarket::complete(&mut store, SAVE, outcome.offer_id, HUMAN).unwrap();
        assert_eq!(store.player(SAVE, 100).unwrap().team_id, Some(AI_SELLER));
        assert_eq!(store.team(SAVE, HUMAN).unwrap().budget, 29_800_000);
    }

    #[test]
    fn free_agent_offer_needs_no_listing() {
        let mut store = seed();

        let outcome = TransferMarket::make_offer(
            &mut store,
            SAVE,
            300,
            None,
            HUMAN,
            OfferTerms {
                fee: 0,
                wage: 20_000,
                years: 2,
            },
            &AiConfig::default(),
        )
        .unwrap();

        // expected wage 20_000 * 0.7 * 1.05 = 14_700; 20k clears it
        assert_eq!(outcome.status, OfferStatus::Accepted);

        TransferMarket::complete(&mut store, SAVE, outcome.offer_id, HUMAN).unwrap();
        assert_eq!(store.player(SAVE, 300).unwrap().team_id, Some(HUMAN));
        assert!(store.transactions(SAVE).is_empty());
    }

    #[test]
    fn responding_to_anothers_offer_is_forbidden() {
        let mut store = seed();
        TransferMarket::list_player(&mut store, SAVE, HUMAN, 100, Some(5_000_000)).unwrap();

        let outcome = TransferMarket::make_offer(
            &mut store,
            SAVE,
            100,
            Some(HUMAN),
            AI_SELLER,
            OfferTerms {
                fee: 4_000_000,
                wage: 35_000,
                years: 3,
            },
            &AiConfig::default(),
        )
        .unwrap();

        let err = TransferMarket::respond_to_offer(
            &mut store,
            SAVE,
            outcome.offer_id,
            AI_SELLER,
            RespondAction::Accept,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TransferError::Authorization(_)));
    }
}
