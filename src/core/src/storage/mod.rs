pub mod memory;

pub use memory::InMemoryStore;

use crate::market::{Listing, Offer, OfferStatus, Player, Team, Transaction, TransferRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The storage layer accepts at most this many bound values per batched
/// call (SQLite-style limit); larger batches are split into chunks.
pub const MAX_BATCH_VALUES: usize = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    pub season: u16,
    pub round: u16,
}

/// Tagged mutation intents. A whole slice passed to [`TransferStore::apply`]
/// is validated first and committed only if every intent is valid, so a
/// failed batch leaves no partial state behind.
#[derive(Debug, Clone)]
pub enum Mutation {
    InsertListing(Listing),
    DeleteListing {
        listing_id: u32,
    },
    InsertOffer(Offer),
    SetOfferStatus {
        offer_id: u32,
        status: OfferStatus,
        responded_round: Option<u16>,
    },
    /// Guarded conditional update: fails the batch unless the offer is
    /// currently in `expected`. Closes the double-completion race.
    SetOfferStatusIf {
        offer_id: u32,
        expected: OfferStatus,
        status: OfferStatus,
        responded_round: Option<u16>,
    },
    SetOfferCounter {
        offer_id: u32,
        counter_fee: i64,
        counter_wage: i64,
    },
    /// Promote the stored counter terms into the offer and accept it.
    AcceptCounter {
        offer_id: u32,
        responded_round: Option<u16>,
    },
    ReassignPlayer {
        player_id: u32,
        team_id: Option<u32>,
        wage: i64,
        contract_end_season: u16,
        morale: f32,
    },
    /// Credits (or debits, when negative) both budget and balance.
    AdjustBudget {
        team_id: u32,
        delta: i64,
    },
    RecordTransaction(Transaction),
    InsertTransfer(TransferRecord),
    SetClock(GameClock),
}

impl Mutation {
    /// Bound-value cost of the mutation, mirroring the column count the
    /// statement would bind against a relational backend.
    pub fn bound_values(&self) -> usize {
        match self {
            Mutation::InsertListing(_) => 6,
            Mutation::DeleteListing { .. } => 1,
            Mutation::InsertOffer(_) => 13,
            Mutation::SetOfferStatus { .. } => 3,
            Mutation::SetOfferStatusIf { .. } => 4,
            Mutation::SetOfferCounter { .. } => 3,
            Mutation::AcceptCounter { .. } => 2,
            Mutation::ReassignPlayer { .. } => 5,
            Mutation::AdjustBudget { .. } => 2,
            Mutation::RecordTransaction(_) => 6,
            Mutation::InsertTransfer(_) => 8,
            Mutation::SetClock(_) => 2,
        }
    }
}

/// Splits a batch so each chunk stays within [`MAX_BATCH_VALUES`]. Chunks
/// are atomic individually; the sequence as a whole is not, so callers must
/// treat a mid-sequence failure as fatal and retry the whole operation.
pub fn chunk_batch(batch: &[Mutation]) -> Vec<&[Mutation]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut values = 0;

    for (idx, mutation) in batch.iter().enumerate() {
        let cost = mutation.bound_values();
        if values + cost > MAX_BATCH_VALUES && idx > start {
            chunks.push(&batch[start..idx]);
            start = idx;
            values = 0;
        }
        values += cost;
    }

    if start < batch.len() {
        chunks.push(&batch[start..]);
    }

    chunks
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    SaveNotFound(u32),
    RowNotFound {
        entity: &'static str,
        id: u32,
    },
    UniqueViolation(&'static str),
    PreconditionFailed {
        offer_id: u32,
        expected: OfferStatus,
        actual: OfferStatus,
    },
    InvalidTransition {
        offer_id: u32,
        from: OfferStatus,
        to: OfferStatus,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::SaveNotFound(id) => write!(f, "save {} not found", id),
            StoreError::RowNotFound { entity, id } => write!(f, "{} {} not found", entity, id),
            StoreError::UniqueViolation(entity) => {
                write!(f, "unique constraint violated on {}", entity)
            }
            StoreError::PreconditionFailed {
                offer_id,
                expected,
                actual,
            } => write!(
                f,
                "offer {} expected {:?}, found {:?}",
                offer_id, expected, actual
            ),
            StoreError::InvalidTransition { offer_id, from, to } => {
                write!(f, "offer {}: invalid transition {:?} -> {:?}", offer_id, from, to)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Read queries plus the single batched-write primitive this subsystem
/// requires from any backend (relational, document or in-memory).
pub trait TransferStore {
    fn clock(&self, save_id: u32) -> Option<GameClock>;
    fn player(&self, save_id: u32, player_id: u32) -> Option<Player>;
    fn team(&self, save_id: u32, team_id: u32) -> Option<Team>;
    fn teams(&self, save_id: u32) -> Vec<Team>;
    fn squad(&self, save_id: u32, team_id: u32) -> Vec<Player>;
    fn free_agents(&self, save_id: u32) -> Vec<Player>;
    fn listings(&self, save_id: u32) -> Vec<Listing>;
    fn listing_for_player(&self, save_id: u32, player_id: u32) -> Option<Listing>;
    fn offers(&self, save_id: u32) -> Vec<Offer>;
    fn offer(&self, save_id: u32, offer_id: u32) -> Option<Offer>;
    fn transactions(&self, save_id: u32) -> Vec<Transaction>;
    fn transfers(&self, save_id: u32) -> Vec<TransferRecord>;

    fn next_id(&mut self, save_id: u32) -> u32;

    /// Applies the whole batch atomically or not at all.
    fn apply(&mut self, save_id: u32, batch: &[Mutation]) -> Result<(), StoreError>;
}
