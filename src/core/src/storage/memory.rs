use crate::market::{Listing, Offer, Player, Team, Transaction, TransferRecord};
use crate::storage::{GameClock, Mutation, StoreError, TransferStore};
use std::collections::HashMap;

/// Reference store backing single-instance deployments and tests.
/// `apply` stages every mutation against a copy of the save and swaps the
/// copy in only when the whole batch validated, so a failed batch is
/// invisible to readers.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    saves: HashMap<u32, SaveState>,
}

#[derive(Debug, Clone, Default)]
struct SaveState {
    clock: GameClock,
    players: HashMap<u32, Player>,
    teams: HashMap<u32, Team>,
    listings: HashMap<u32, Listing>,
    offers: HashMap<u32, Offer>,
    transactions: Vec<Transaction>,
    transfers: Vec<TransferRecord>,
    next_id: u32,
}

impl Default for GameClock {
    fn default() -> Self {
        GameClock { season: 1, round: 1 }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            saves: HashMap::new(),
        }
    }

    // Seeding API used by the save generator; runtime writes go through
    // `apply` only.

    pub fn create_save(&mut self, save_id: u32, clock: GameClock) {
        self.saves.insert(
            save_id,
            SaveState {
                clock,
                next_id: 1,
                ..SaveState::default()
            },
        );
    }

    pub fn put_team(&mut self, save_id: u32, team: Team) {
        if let Some(save) = self.saves.get_mut(&save_id) {
            save.teams.insert(team.id, team);
        }
    }

    pub fn put_player(&mut self, save_id: u32, player: Player) {
        if let Some(save) = self.saves.get_mut(&save_id) {
            save.players.insert(player.id, player);
        }
    }

    fn save(&self, save_id: u32) -> Option<&SaveState> {
        self.saves.get(&save_id)
    }
}

fn apply_one(state: &mut SaveState, mutation: &Mutation) -> Result<(), StoreError> {
    match mutation {
        Mutation::InsertListing(listing) => {
            let duplicate = state
                .listings
                .values()
                .any(|l| l.player_id == listing.player_id);
            if duplicate {
                return Err(StoreError::UniqueViolation("listing"));
            }
            state.listings.insert(listing.id, listing.clone());
        }
        Mutation::DeleteListing { listing_id } => {
            state
                .listings
                .remove(listing_id)
                .ok_or(StoreError::RowNotFound {
                    entity: "listing",
                    id: *listing_id,
                })?;
        }
        Mutation::InsertOffer(offer) => {
            let duplicate = state.offers.values().any(|o| {
                o.player_id == offer.player_id
                    && o.buyer_team_id == offer.buyer_team_id
                    && o.is_open()
            });
            if duplicate && offer.is_open() {
                return Err(StoreError::UniqueViolation("offer"));
            }
            state.offers.insert(offer.id, offer.clone());
        }
        Mutation::SetOfferStatus {
            offer_id,
            status,
            responded_round,
        } => {
            let offer = state
                .offers
                .get_mut(offer_id)
                .ok_or(StoreError::RowNotFound {
                    entity: "offer",
                    id: *offer_id,
                })?;
            if !offer.status.can_transition(*status) {
                return Err(StoreError::InvalidTransition {
                    offer_id: *offer_id,
                    from: offer.status,
                    to: *status,
                });
            }
            offer.status = *status;
            if responded_round.is_some() {
                offer.responded_round = *responded_round;
            }
        }
        Mutation::SetOfferStatusIf {
            offer_id,
            expected,
            status,
            responded_round,
        } => {
            let offer = state
                .offers
                .get_mut(offer_id)
                .ok_or(StoreError::RowNotFound {
                    entity: "offer",
                    id: *offer_id,
                })?;
            if offer.status != *expected {
                return Err(StoreError::PreconditionFailed {
                    offer_id: *offer_id,
                    expected: *expected,
                    actual: offer.status,
                });
            }
            if !offer.status.can_transition(*status) {
                return Err(StoreError::InvalidTransition {
                    offer_id: *offer_id,
                    from: offer.status,
                    to: *status,
                });
            }
            offer.status = *status;
            if responded_round.is_some() {
                offer.responded_round = *responded_round;
            }
        }
        Mutation::SetOfferCounter {
            offer_id,
            counter_fee,
            counter_wage,
        } => {
            let offer = state
                .offers
                .get_mut(offer_id)
                .ok_or(StoreError::RowNotFound {
                    entity: "offer",
                    id: *offer_id,
                })?;
            offer.counter_fee = Some(*counter_fee);
            offer.counter_wage = Some(*counter_wage);
        }
        Mutation::AcceptCounter {
            offer_id,
            responded_round,
        } => {
            let offer = state
                .offers
                .get_mut(offer_id)
                .ok_or(StoreError::RowNotFound {
                    entity: "offer",
                    id: *offer_id,
                })?;
            if !offer.status.can_transition(crate::market::OfferStatus::Accepted) {
                return Err(StoreError::InvalidTransition {
                    offer_id: *offer_id,
                    from: offer.status,
                    to: crate::market::OfferStatus::Accepted,
                });
            }
            if let Some(fee) = offer.counter_fee.take() {
                offer.fee = fee;
            }
            if let Some(wage) = offer.counter_wage.take() {
                offer.wage = wage;
            }
            offer.status = crate::market::OfferStatus::Accepted;
            if responded_round.is_some() {
                offer.responded_round = *responded_round;
            }
        }
        Mutation::ReassignPlayer {
            player_id,
            team_id,
            wage,
            contract_end_season,
            morale,
        } => {
            let player = state
                .players
                .get_mut(player_id)
                .ok_or(StoreError::RowNotFound {
                    entity: "player",
                    id: *player_id,
                })?;
            player.team_id = *team_id;
            player.wage = *wage;
            player.contract_end_season = *contract_end_season;
            player.morale = *morale;
        }
        Mutation::AdjustBudget { team_id, delta } => {
            let team = state
                .teams
                .get_mut(team_id)
                .ok_or(StoreError::RowNotFound {
                    entity: "team",
                    id: *team_id,
                })?;
            team.budget += delta;
            team.balance += delta;
        }
        Mutation::RecordTransaction(transaction) => {
            if !state.teams.contains_key(&transaction.team_id) {
                return Err(StoreError::RowNotFound {
                    entity: "team",
                    id: transaction.team_id,
                });
            }
            state.transactions.push(transaction.clone());
        }
        Mutation::InsertTransfer(record) => {
            state.transfers.push(record.clone());
        }
        Mutation::SetClock(clock) => {
            state.clock = *clock;
        }
    }

    Ok(())
}

impl TransferStore for InMemoryStore {
    fn clock(&self, save_id: u32) -> Option<GameClock> {
        self.save(save_id).map(|s| s.clock)
    }

    fn player(&self, save_id: u32, player_id: u32) -> Option<Player> {
        self.save(save_id)?.players.get(&player_id).cloned()
    }

    fn team(&self, save_id: u32, team_id: u32) -> Option<Team> {
        self.save(save_id)?.teams.get(&team_id).cloned()
    }

    fn teams(&self, save_id: u32) -> Vec<Team> {
        let mut teams: Vec<Team> = self
            .save(save_id)
            .map(|s| s.teams.values().cloned().collect())
            .unwrap_or_default();
        teams.sort_by_key(|t| t.id);
        teams
    }

    fn squad(&self, save_id: u32, team_id: u32) -> Vec<Player> {
        self.save(save_id)
            .map(|s| {
                s.players
                    .values()
                    .filter(|p| p.team_id == Some(team_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn free_agents(&self, save_id: u32) -> Vec<Player> {
        let mut agents: Vec<Player> = self
            .save(save_id)
            .map(|s| {
                s.players
                    .values()
                    .filter(|p| p.team_id.is_none() && p.is_active())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        agents.sort_by_key(|p| p.id);
        agents
    }

    fn listings(&self, save_id: u32) -> Vec<Listing> {
        let mut listings: Vec<Listing> = self
            .save(save_id)
            .map(|s| s.listings.values().cloned().collect())
            .unwrap_or_default();
        listings.sort_by_key(|l| l.id);
        listings
    }

    fn listing_for_player(&self, save_id: u32, player_id: u32) -> Option<Listing> {
        self.save(save_id)?
            .listings
            .values()
            .find(|l| l.player_id == player_id)
            .cloned()
    }

    fn offers(&self, save_id: u32) -> Vec<Offer> {
        let mut offers: Vec<Offer> = self
            .save(save_id)
            .map(|s| s.offers.values().cloned().collect())
            .unwrap_or_default();
        offers.sort_by_key(|o| o.id);
        offers
    }

    fn offer(&self, save_id: u32, offer_id: u32) -> Option<Offer> {
        self.save(save_id)?.offers.get(&offer_id).cloned()
    }

    fn transactions(&self, save_id: u32) -> Vec<Transaction> {
        self.save(save_id)
            .map(|s| s.transactions.clone())
            .unwrap_or_default()
    }

    fn transfers(&self, save_id: u32) -> Vec<TransferRecord> {
        self.save(save_id)
            .map(|s| s.transfers.clone())
            .unwrap_or_default()
    }

    fn next_id(&mut self, save_id: u32) -> u32 {
        match self.saves.get_mut(&save_id) {
            Some(save) => {
                let id = save.next_id;
                save.next_id += 1;
                id
            }
            None => 0,
        }
    }

    fn apply(&mut self, save_id: u32, batch: &[Mutation]) -> Result<(), StoreError> {
        let state = self
            .saves
            .get_mut(&save_id)
            .ok_or(StoreError::SaveNotFound(save_id))?;

        let mut staged = state.clone();

        for mutation in batch {
            apply_one(&mut staged, mutation)?;
        }

        *state = staged;
        Ok(())
    }
}
