use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub position: PlayerPosition,
    pub age: u8,
    pub potential: u8,
    pub attributes: PlayerAttributes,
    pub contract_end_season: u16,
    pub wage: i64,
    pub market_value: i64,
    pub morale: f32,
    pub status: PlayerStatus,
    pub team_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerPosition {
    Goalkeeper,
    Defender,
    Midfielder,
    Attacker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Active,
    Retired,
}

/// Valuation-relevant skill set, 1..=20 range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub pace: f32,
    pub stamina: f32,
    pub strength: f32,
    pub passing: f32,
    pub shooting: f32,
    pub dribbling: f32,
    pub tackling: f32,
    pub positioning: f32,
    pub reflexes: f32,
    pub handling: f32,
}

impl Player {
    pub fn is_free_agent(&self) -> bool {
        self.team_id.is_none()
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Seasons left on the contract, zero when the current season is the last.
    pub fn remaining_contract_seasons(&self, season: u16) -> u16 {
        self.contract_end_season.saturating_sub(season)
    }
}

impl PlayerPosition {
    pub fn is_goalkeeper(&self) -> bool {
        *self == PlayerPosition::Goalkeeper
    }

    pub fn is_attacker(&self) -> bool {
        *self == PlayerPosition::Attacker
    }
}
