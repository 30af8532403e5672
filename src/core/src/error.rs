use crate::storage::StoreError;
use std::fmt;

/// Error taxonomy the HTTP layer maps onto status codes. Validation of raw
/// input ranges happens upstream; core raises `Validation` only for
/// structurally impossible requests that slipped through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    Authorization(String),
    Storage(String),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Validation(msg) => write!(f, "validation error: {}", msg),
            TransferError::NotFound(msg) => write!(f, "not found: {}", msg),
            TransferError::Conflict(msg) => write!(f, "conflict: {}", msg),
            TransferError::Authorization(msg) => write!(f, "not authorized: {}", msg),
            TransferError::Storage(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for TransferError {}

impl From<StoreError> for TransferError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SaveNotFound(id) => TransferError::NotFound(format!("save {}", id)),
            StoreError::RowNotFound { entity, id } => {
                TransferError::NotFound(format!("{} {}", entity, id))
            }
            StoreError::UniqueViolation("listing") => {
                TransferError::Conflict("already listed".to_string())
            }
            StoreError::UniqueViolation(entity) => {
                TransferError::Conflict(format!("duplicate {}", entity))
            }
            StoreError::PreconditionFailed { offer_id, .. } => {
                TransferError::Conflict(format!("offer {} is not in the required state", offer_id))
            }
            StoreError::InvalidTransition { offer_id, from, to } => TransferError::Conflict(
                format!("offer {}: cannot move from {:?} to {:?}", offer_id, from, to),
            ),
        }
    }
}
