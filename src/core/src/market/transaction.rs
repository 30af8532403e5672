use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u32,
    pub team_id: u32,
    pub direction: TransactionDirection,
    pub category: TransactionCategory,
    pub amount: i64,
    pub round: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    TransferFee,
}

/// Permanent transfer-history row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: u32,
    pub player_id: u32,
    pub from_team_id: Option<u32>,
    pub to_team_id: u32,
    pub fee: i64,
    pub wage: i64,
    pub season: u16,
    pub date: NaiveDate,
}
