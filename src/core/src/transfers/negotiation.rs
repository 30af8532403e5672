use crate::error::TransferError;
use crate::market::{Offer, OfferStatus, OfferTerms, Player};
use crate::storage::{Mutation, TransferStore};
use crate::transfers::ledger::TransferLedger;
use crate::transfers::policy::{self, AiConfig, FreeAgentDecision, SellDecision};
use crate::transfers::valuation::WageDemandCalculator;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Counter rounds allowed beyond the opening bid; at this round the AI
/// must resolve to accept or reject, never another counter.
pub const MAX_NEGOTIATION_ROUNDS: u8 = 2;

/// The seller's effective asking price grows by this much every round a
/// negotiation drags on.
pub const HARDENING_STEP: f64 = 0.05;

/// A resumed offer must improve the caller's own previous terms by at
/// least this fraction (fee or wage), or the call is rejected without
/// advancing the round.
pub const MIN_IMPROVEMENT: f64 = 0.05;

/// Final-round tolerance: a listed player still sells at or above this
/// fraction of the asking price.
pub const FINAL_ROUND_FEE_TOLERANCE: f64 = 0.90;

/// Final-round tolerance for free agents, against the expected wage.
pub const FINAL_ROUND_WAGE_TOLERANCE: f64 = 0.70;

pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Ephemeral negotiation state. Owns no durable data: losing a session
/// (TTL, crash, wrong id) restarts the protocol at round 1 and nothing
/// else.
#[derive(Debug, Clone)]
pub struct NegotiationSession {
    pub id: u32,
    pub player_id: u32,
    pub buyer_team_id: u32,
    pub seller_team_id: Option<u32>,
    pub round: u8,
    pub hardening: f64,
    pub last_offer: OfferTerms,
    pub last_counter: Option<OfferTerms>,
    pub created_at: Instant,
}

impl NegotiationSession {
    fn open(
        id: u32,
        player_id: u32,
        buyer_team_id: u32,
        seller_team_id: Option<u32>,
        terms: OfferTerms,
    ) -> Self {
        NegotiationSession {
            id,
            player_id,
            buyer_team_id,
            seller_team_id,
            round: 1,
            hardening: 1.0,
            last_offer: terms,
            last_counter: None,
            created_at: Instant::now(),
        }
    }

    fn matches(&self, player_id: u32, buyer_team_id: u32) -> bool {
        self.player_id == player_id && self.buyer_team_id == buyer_team_id
    }
}

/// Volatile session storage keyed by negotiation id. Injected so
/// single-instance deployments can use the in-process map while
/// multi-instance ones can plug in a shared store.
pub trait SessionStore: Send + Sync {
    fn get(&self, id: u32) -> Option<NegotiationSession>;
    fn put(&self, session: NegotiationSession);
    fn remove(&self, id: u32);
    fn next_id(&self) -> u32;
}

pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<u32, NegotiationSession>>,
    last_sweep: Mutex<Instant>,
    id_sequence: AtomicU32,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        InMemorySessionStore {
            sessions: Mutex::new(HashMap::new()),
            last_sweep: Mutex::new(Instant::now()),
            id_sequence: AtomicU32::new(1),
            ttl,
        }
    }

    /// Best-effort cleanup, at most once per sweep interval; entries past
    /// the TTL read as absent either way.
    fn sweep_if_due(&self) {
        let mut last_sweep = self.last_sweep.lock().unwrap();
        if last_sweep.elapsed() < SESSION_SWEEP_INTERVAL {
            return;
        }
        *last_sweep = Instant::now();

        let mut sessions = self.sessions.lock().unwrap();
        let ttl = self.ttl;
        sessions.retain(|_, s| s.created_at.elapsed() <= ttl);
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, id: u32) -> Option<NegotiationSession> {
        self.sweep_if_due();

        let sessions = self.sessions.lock().unwrap();
        sessions
            .get(&id)
            .filter(|s| s.created_at.elapsed() <= self.ttl)
            .cloned()
    }

    fn put(&self, session: NegotiationSession) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(session.id, session);
    }

    fn remove(&self, id: u32) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.remove(&id);
    }

    fn next_id(&self) -> u32 {
        self.id_sequence.fetch_add(1, Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationAction {
    Offer,
    AcceptCounter,
    Withdraw,
}

impl Default for NegotiationAction {
    fn default() -> Self {
        NegotiationAction::Offer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomingAction {
    Accept,
    Reject,
    Counter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStatus {
    Accepted,
    Rejected,
    Countered,
    Withdrawn,
}

#[derive(Debug, Clone, Serialize)]
pub struct NegotiationResult {
    pub negotiation_id: u32,
    pub round: u8,
    pub status: NegotiationStatus,
    pub counter_fee: Option<i64>,
    pub counter_wage: Option<i64>,
    pub transfer_id: Option<u32>,
}

impl NegotiationResult {
    fn terminal(negotiation_id: u32, round: u8, status: NegotiationStatus) -> Self {
        NegotiationResult {
            negotiation_id,
            round,
            status,
            counter_fee: None,
            counter_wage: None,
            transfer_id: None,
        }
    }
}

/// Bounded-round live negotiation for both directions: the human buying
/// from an AI club (or signing a free agent), and the human responding to
/// an AI club's incoming bid.
pub struct NegotiationManager {
    sessions: Arc<dyn SessionStore>,
    config: AiConfig,
}

impl NegotiationManager {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        NegotiationManager {
            sessions,
            config: AiConfig::default(),
        }
    }

    /// Outgoing negotiation: the human's club bids for a listed player or
    /// a free agent and haggles fee/wage with the AI side.
    #[allow(clippy::too_many_arguments)]
    pub fn negotiate_transfer<S: TransferStore>(
        &self,
        store: &mut S,
        save_id: u32,
        player_id: u32,
        from_team: Option<u32>,
        to_team: u32,
        terms: OfferTerms,
        negotiation_id: Option<u32>,
        action: NegotiationAction,
    ) -> Result<NegotiationResult, TransferError> {
        let clock = store
            .clock(save_id)
            .ok_or_else(|| TransferError::NotFound(format!("save {}", save_id)))?;

        let player = store
            .player(save_id, player_id)
            .ok_or_else(|| TransferError::NotFound(format!("player {}", player_id)))?;

        if player.team_id != from_team {
            return Err(TransferError::Conflict(
                "player does not belong to the named selling team".to_string(),
            ));
        }

        if action == NegotiationAction::Withdraw {
            if let Some(id) = negotiation_id {
                self.sessions.remove(id);
            }
            return Ok(NegotiationResult::terminal(
                negotiation_id.unwrap_or(0),
                0,
                NegotiationStatus::Withdrawn,
            ));
        }

        // Resume or open the session.
        let resumed = negotiation_id
            .and_then(|id| self.sessions.get(id))
            .filter(|s| s.matches(player_id, to_team));

        let mut session = match (resumed, action) {
            (Some(session), NegotiationAction::AcceptCounter) => {
                let counter = session.last_counter.ok_or_else(|| {
                    TransferError::Conflict("no counter-offer to accept".to_string())
                })?;
                return self.finalize_accept(
                    store, save_id, &player, from_team, to_team, counter, &session, clock.season,
                    clock.round,
                );
            }
            (Some(mut session), NegotiationAction::Offer) => {
                if !improves_buyer_terms(&session.last_offer, &terms) {
                    return Err(TransferError::Conflict(format!(
                        "a new offer must improve fee or wage by at least {}%",
                        (MIN_IMPROVEMENT * 100.0) as u32
                    )));
                }
                session.round += 1;
                session.hardening += HARDENING_STEP;
                session.last_offer = terms;
                session
            }
            (None, NegotiationAction::AcceptCounter) => {
                return Err(TransferError::Conflict(
                    "unknown or expired negotiation".to_string(),
                ));
            }
            (None, NegotiationAction::Offer) => NegotiationSession::open(
                self.sessions.next_id(),
                player_id,
                to_team,
                from_team,
                terms,
            ),
            (_, NegotiationAction::Withdraw) => unreachable!(),
        };

        debug!(
            "negotiation {} round {} for player {} (hardening {:.2})",
            session.id, session.round, player_id, session.hardening
        );

        let outcome = match from_team {
            Some(seller_team_id) => self.evaluate_listed(
                store,
                save_id,
                &player,
                seller_team_id,
                terms,
                &session,
                clock.season,
            )?,
            None => self.evaluate_free_agent(store, save_id, to_team, &player, terms, &session, clock.round)?,
        };

        match outcome {
            SessionOutcome::Accept(final_terms) => self.finalize_accept(
                store,
                save_id,
                &player,
                from_team,
                to_team,
                final_terms,
                &session,
                clock.season,
                clock.round,
            ),
            SessionOutcome::Reject => {
                self.sessions.remove(session.id);
                Ok(NegotiationResult::terminal(
                    session.id,
                    session.round,
                    NegotiationStatus::Rejected,
                ))
            }
            SessionOutcome::Counter(counter) => {
                let result = NegotiationResult {
                    negotiation_id: session.id,
                    round: session.round,
                    status: NegotiationStatus::Countered,
                    counter_fee: Some(counter.fee),
                    counter_wage: Some(counter.wage),
                    transfer_id: None,
                };
                session.last_counter = Some(counter);
                self.sessions.put(session);
                Ok(result)
            }
        }
    }

    fn evaluate_listed<S: TransferStore>(
        &self,
        store: &S,
        save_id: u32,
        player: &Player,
        seller_team_id: u32,
        terms: OfferTerms,
        session: &NegotiationSession,
        season: u16,
    ) -> Result<SessionOutcome, TransferError> {
        let listing = store
            .listing_for_player(save_id, player.id)
            .ok_or_else(|| TransferError::NotFound(format!("listing for player {}", player.id)))?;

        let effective_asking = (listing.asking_price as f64 * session.hardening) as i64;
        let depth = policy::depth_at_position(&store.squad(save_id, seller_team_id), player.position);

        let decision = policy::sell_decision(
            effective_asking,
            terms.fee,
            terms.wage,
            Some(depth),
            player,
            season,
            &self.config,
        );

        Ok(match decision {
            SellDecision::Accept => SessionOutcome::Accept(terms),
            SellDecision::Reject => SessionOutcome::Reject,
            SellDecision::Counter { fee, wage } => {
                if session.round >= MAX_NEGOTIATION_ROUNDS {
                    // Forced resolution, measured against the base asking
                    // price: close enough sells, otherwise the talks die.
                    let floor = (listing.asking_price as f64 * FINAL_ROUND_FEE_TOLERANCE) as i64;
                    if terms.fee >= floor {
                        SessionOutcome::Accept(terms)
                    } else {
                        SessionOutcome::Reject
                    }
                } else {
                    SessionOutcome::Counter(OfferTerms {
                        fee,
                        wage,
                        years: terms.years,
                    })
                }
            }
        })
    }

    fn evaluate_free_agent<S: TransferStore>(
        &self,
        store: &S,
        save_id: u32,
        buyer_team_id: u32,
        player: &Player,
        terms: OfferTerms,
        session: &NegotiationSession,
        round: u16,
    ) -> Result<SessionOutcome, TransferError> {
        let buyer = store
            .team(save_id, buyer_team_id)
            .ok_or_else(|| TransferError::NotFound(format!("team {}", buyer_team_id)))?;

        let expected = WageDemandCalculator::expected_free_agent_wage(player.wage, terms.years);
        let effective_expected = (expected as f64 * session.hardening) as i64;

        let decision = policy::free_agent_decision(
            effective_expected,
            terms.wage,
            buyer.reputation,
            round,
            &self.config,
        );

        Ok(match decision {
            FreeAgentDecision::Accept => SessionOutcome::Accept(OfferTerms { fee: 0, ..terms }),
            FreeAgentDecision::Reject => SessionOutcome::Reject,
            FreeAgentDecision::Counter { wage } => {
                if session.round >= MAX_NEGOTIATION_ROUNDS {
                    let floor = (expected as f64 * FINAL_ROUND_WAGE_TOLERANCE) as i64;
                    if terms.wage >= floor {
                        SessionOutcome::Accept(OfferTerms { fee: 0, ..terms })
                    } else {
                        SessionOutcome::Reject
                    }
                } else {
                    SessionOutcome::Counter(OfferTerms {
                        fee: 0,
                        wage,
                        years: terms.years,
                    })
                }
            }
        })
    }

    /// Agreement reached: persist an accepted offer and run the ledger
    /// immediately, then drop the session.
    #[allow(clippy::too_many_arguments)]
    fn finalize_accept<S: TransferStore>(
        &self,
        store: &mut S,
        save_id: u32,
        player: &Player,
        from_team: Option<u32>,
        to_team: u32,
        terms: OfferTerms,
        session: &NegotiationSession,
        season: u16,
        round: u16,
    ) -> Result<NegotiationResult, TransferError> {
        let offer = Offer::accepted(
            store.next_id(save_id),
            player.id,
            to_team,
            from_team,
            terms,
            round,
        );
        let offer_id = offer.id;

        store
            .apply(save_id, &[Mutation::InsertOffer(offer)])
            .map_err(TransferError::from)?;

        let transfer_id = TransferLedger::complete_transfer(store, save_id, offer_id, season)?;

        self.sessions.remove(session.id);

        Ok(NegotiationResult {
            negotiation_id: session.id,
            round: session.round,
            status: NegotiationStatus::Accepted,
            counter_fee: None,
            counter_wage: None,
            transfer_id: Some(transfer_id),
        })
    }

    /// Incoming negotiation: an AI club has an open offer for a player of
    /// the human's club; the human accepts, rejects, or counters.
    #[allow(clippy::too_many_arguments)]
    pub fn negotiate_incoming_offer<S: TransferStore>(
        &self,
        store: &mut S,
        save_id: u32,
        offer_id: u32,
        seller_team_id: u32,
        action: IncomingAction,
        counter_terms: Option<OfferTerms>,
        negotiation_id: Option<u32>,
    ) -> Result<NegotiationResult, TransferError> {
        let clock = store
            .clock(save_id)
            .ok_or_else(|| TransferError::NotFound(format!("save {}", save_id)))?;

        let offer = store
            .offer(save_id, offer_id)
            .ok_or_else(|| TransferError::NotFound(format!("offer {}", offer_id)))?;

        if offer.seller_team_id != Some(seller_team_id) {
            return Err(TransferError::Authorization(
                "offer is not addressed to this team".to_string(),
            ));
        }

        if !offer.is_open() {
            return Err(TransferError::Conflict(format!(
                "offer {} is no longer open",
                offer_id
            )));
        }

        let resumed = negotiation_id
            .and_then(|id| self.sessions.get(id))
            .filter(|s| s.matches(offer.player_id, offer.buyer_team_id));

        match action {
            IncomingAction::Accept => {
                // The offer's counter fields hold the buyer's last persisted
                // concession, so a lost session still settles at terms the
                // buyer agreed to; a never-countered offer stands as written.
                store
                    .apply(
                        save_id,
                        &[Mutation::AcceptCounter {
                            offer_id,
                            responded_round: Some(clock.round),
                        }],
                    )
                    .map_err(TransferError::from)?;

                let transfer_id =
                    TransferLedger::complete_transfer(store, save_id, offer_id, clock.season)?;

                let session_id = resumed.map(|s| s.id).unwrap_or(0);
                self.sessions.remove(session_id);

                Ok(NegotiationResult {
                    negotiation_id: session_id,
                    round: 0,
                    status: NegotiationStatus::Accepted,
                    counter_fee: None,
                    counter_wage: None,
                    transfer_id: Some(transfer_id),
                })
            }
            IncomingAction::Reject => {
                store
                    .apply(
                        save_id,
                        &[Mutation::SetOfferStatus {
                            offer_id,
                            status: OfferStatus::Rejected,
                            responded_round: Some(clock.round),
                        }],
                    )
                    .map_err(TransferError::from)?;

                if let Some(session) = resumed {
                    self.sessions.remove(session.id);
                }

                Ok(NegotiationResult::terminal(
                    negotiation_id.unwrap_or(0),
                    0,
                    NegotiationStatus::Rejected,
                ))
            }
            IncomingAction::Counter => {
                let demand = counter_terms.ok_or_else(|| {
                    TransferError::Validation("counter requires counter terms".to_string())
                })?;

                let mut session = match resumed {
                    Some(mut session) => {
                        if !improves_seller_terms(&session.last_offer, &demand) {
                            return Err(TransferError::Conflict(format!(
                                "a new counter must come down in fee or wage by at least {}%",
                                (MIN_IMPROVEMENT * 100.0) as u32
                            )));
                        }
                        session.round += 1;
                        session.hardening += HARDENING_STEP;
                        session.last_offer = demand;
                        session
                    }
                    None => NegotiationSession::open(
                        self.sessions.next_id(),
                        offer.player_id,
                        offer.buyer_team_id,
                        offer.seller_team_id,
                        demand,
                    ),
                };

                // The AI buyer stretches one hardening step past its opening
                // fee per round, never past its transfer budget.
                let buyer = store
                    .team(save_id, offer.buyer_team_id)
                    .ok_or_else(|| {
                        TransferError::NotFound(format!("team {}", offer.buyer_team_id))
                    })?;
                let stretch = session.hardening + HARDENING_STEP;
                let ceiling = ((offer.fee as f64 * stretch) as i64).min(buyer.budget);

                if demand.fee <= ceiling && demand.wage <= offer.wage * 2 {
                    // Buyer agrees to the seller's terms outright.
                    store
                        .apply(
                            save_id,
                            &[
                                Mutation::SetOfferCounter {
                                    offer_id,
                                    counter_fee: demand.fee,
                                    counter_wage: demand.wage.max(offer.wage),
                                },
                                Mutation::AcceptCounter {
                                    offer_id,
                                    responded_round: Some(clock.round),
                                },
                            ],
                        )
                        .map_err(TransferError::from)?;

                    let transfer_id =
                        TransferLedger::complete_transfer(store, save_id, offer_id, clock.season)?;
                    self.sessions.remove(session.id);

                    return Ok(NegotiationResult {
                        negotiation_id: session.id,
                        round: session.round,
                        status: NegotiationStatus::Accepted,
                        counter_fee: None,
                        counter_wage: None,
                        transfer_id: Some(transfer_id),
                    });
                }

                if session.round >= MAX_NEGOTIATION_ROUNDS {
                    // Final round and still apart: the buyer walks away.
                    store
                        .apply(
                            save_id,
                            &[Mutation::SetOfferStatus {
                                offer_id,
                                status: OfferStatus::Cancelled,
                                responded_round: Some(clock.round),
                            }],
                        )
                        .map_err(TransferError::from)?;
                    self.sessions.remove(session.id);

                    return Ok(NegotiationResult::terminal(
                        session.id,
                        session.round,
                        NegotiationStatus::Rejected,
                    ));
                }

                // Split the difference, bounded by what the buyer can pay.
                let concession = OfferTerms {
                    fee: ((offer.fee + demand.fee) / 2).min(ceiling),
                    wage: offer.wage,
                    years: offer.contract_years,
                };

                store
                    .apply(
                        save_id,
                        &[
                            Mutation::SetOfferStatus {
                                offer_id,
                                status: OfferStatus::Counter,
                                responded_round: Some(clock.round),
                            },
                            Mutation::SetOfferCounter {
                                offer_id,
                                counter_fee: concession.fee,
                                counter_wage: concession.wage,
                            },
                        ],
                    )
                    .map_err(TransferError::from)?;

                let result = NegotiationResult {
                    negotiation_id: session.id,
                    round: session.round,
                    status: NegotiationStatus::Countered,
                    counter_fee: Some(concession.fee),
                    counter_wage: Some(concession.wage),
                    transfer_id: None,
                };
                session.last_counter = Some(concession);
                self.sessions.put(session);
                Ok(result)
            }
        }
    }
}

enum SessionOutcome {
    Accept(OfferTerms),
    Reject,
    Counter(OfferTerms),
}

/// Buyers improve by paying more.
fn improves_buyer_terms(previous: &OfferTerms, next: &OfferTerms) -> bool {
    let fee_floor = (previous.fee as f64 * (1.0 + MIN_IMPROVEMENT)) as i64;
    let wage_floor = (previous.wage as f64 * (1.0 + MIN_IMPROVEMENT)) as i64;

    next.fee >= fee_floor || next.wage >= wage_floor
}

/// Sellers improve by asking for less.
fn improves_seller_terms(previous: &OfferTerms, next: &OfferTerms) -> bool {
    let fee_ceiling = (previous.fee as f64 * (1.0 - MIN_IMPROVEMENT)) as i64;
    let wage_ceiling = (previous.wage as f64 * (1.0 - MIN_IMPROVEMENT)) as i64;

    next.fee <= fee_ceiling || next.wage <= wage_ceiling
}
