use crate::ApiError;

pub const MAX_FEE: i64 = 1_000_000_000;
pub const MAX_WAGE: i64 = 10_000_000;

/// Bounds-checks money and contract fields before they reach the core, so
/// absurd payloads die at the edge with a 400.
pub fn offer_terms(fee: i64, wage: i64, years: u8) -> Result<(), ApiError> {
    if !(0..=MAX_FEE).contains(&fee) {
        return Err(ApiError::BadRequest(format!(
            "fee must be between 0 and {}",
            MAX_FEE
        )));
    }

    if !(0..=MAX_WAGE).contains(&wage) {
        return Err(ApiError::BadRequest(format!(
            "wage must be between 0 and {}",
            MAX_WAGE
        )));
    }

    if !(1..=5).contains(&years) {
        return Err(ApiError::BadRequest(
            "contract years must be between 1 and 5".to_string(),
        ));
    }

    Ok(())
}

pub fn asking_price(price: Option<i64>) -> Result<(), ApiError> {
    if let Some(price) = price {
        if !(1..=MAX_FEE).contains(&price) {
            return Err(ApiError::BadRequest(format!(
                "asking price must be between 1 and {}",
                MAX_FEE
            )));
        }
    }

    Ok(())
}
