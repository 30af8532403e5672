use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: u32,
    pub player_id: u32,
    pub team_id: u32,
    pub asking_price: i64,
    pub status: ListingStatus,
    pub listed_round: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    Available,
    ContractExpiring,
}

impl Listing {
    pub fn new(
        id: u32,
        player_id: u32,
        team_id: u32,
        asking_price: i64,
        status: ListingStatus,
        listed_round: u16,
    ) -> Self {
        Listing {
            id,
            player_id,
            team_id,
            asking_price,
            status,
            listed_round,
        }
    }
}
