pub mod error;
pub mod market;
pub mod storage;
pub mod transfers;
pub mod utils;

pub use error::TransferError;
pub use market::{
    Listing, ListingStatus, Offer, OfferStatus, OfferTerms, Player, PlayerAttributes,
    PlayerPosition, PlayerStatus, Team, Transaction, TransactionCategory, TransactionDirection,
    TransferRecord,
};
pub use storage::{GameClock, InMemoryStore, Mutation, StoreError, TransferStore};
pub use transfers::{
    AiConfig, AiProcessingResult, AiTransferProcessor, ExpirySweeper, InMemorySessionStore,
    NegotiationManager, SessionStore, TransferLedger, TransferMarket,
};
pub use utils::*;
