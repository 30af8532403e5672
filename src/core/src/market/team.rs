use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub budget: i64,
    pub wage_budget: i64,
    pub reputation: u16,
    pub balance: i64,
    pub controlled_by_user: bool,
}

impl Team {
    pub fn is_ai(&self) -> bool {
        !self.controlled_by_user
    }
}
