use serde::{Deserialize, Serialize};

/// How many rounds a new offer stays open before the sweeper expires it.
pub const OFFER_EXPIRY_ROUNDS: u16 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: u32,
    pub player_id: u32,
    pub buyer_team_id: u32,
    pub seller_team_id: Option<u32>,
    pub fee: i64,
    pub wage: i64,
    pub contract_years: u8,
    pub status: OfferStatus,
    pub counter_fee: Option<i64>,
    pub counter_wage: Option<i64>,
    pub created_round: u16,
    pub expires_round: u16,
    pub responded_round: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Counter,
    Accepted,
    Rejected,
    Expired,
    Completed,
    Cancelled,
}

/// Fee, wage and contract length of a single bid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OfferTerms {
    pub fee: i64,
    pub wage: i64,
    pub years: u8,
}

impl OfferStatus {
    /// Closed transition table. Anything not listed here is rejected by the
    /// store instead of relying on callers to only request valid moves.
    pub fn can_transition(self, to: OfferStatus) -> bool {
        use OfferStatus::*;

        match (self, to) {
            (Pending, Counter)
            | (Pending, Accepted)
            | (Pending, Rejected)
            | (Pending, Expired)
            | (Pending, Cancelled)
            | (Counter, Counter)
            | (Counter, Accepted)
            | (Counter, Rejected)
            | (Counter, Expired)
            | (Counter, Cancelled)
            | (Accepted, Completed)
            | (Accepted, Cancelled) => true,
            _ => false,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, OfferStatus::Pending | OfferStatus::Counter)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OfferStatus::Rejected
                | OfferStatus::Expired
                | OfferStatus::Completed
                | OfferStatus::Cancelled
        )
    }
}

impl Offer {
    pub fn new(
        id: u32,
        player_id: u32,
        buyer_team_id: u32,
        seller_team_id: Option<u32>,
        terms: OfferTerms,
        created_round: u16,
    ) -> Self {
        Offer {
            id,
            player_id,
            buyer_team_id,
            seller_team_id,
            fee: terms.fee,
            wage: terms.wage,
            contract_years: terms.years,
            status: OfferStatus::Pending,
            counter_fee: None,
            counter_wage: None,
            created_round,
            expires_round: created_round + OFFER_EXPIRY_ROUNDS,
            responded_round: None,
        }
    }

    /// Offer created pre-agreed, used when a live negotiation ends in accept.
    pub fn accepted(
        id: u32,
        player_id: u32,
        buyer_team_id: u32,
        seller_team_id: Option<u32>,
        terms: OfferTerms,
        created_round: u16,
    ) -> Self {
        let mut offer = Offer::new(
            id,
            player_id,
            buyer_team_id,
            seller_team_id,
            terms,
            created_round,
        );
        offer.status = OfferStatus::Accepted;
        offer.responded_round = Some(created_round);
        offer
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_offer_can_reach_every_response() {
        for to in [
            OfferStatus::Counter,
            OfferStatus::Accepted,
            OfferStatus::Rejected,
            OfferStatus::Expired,
            OfferStatus::Cancelled,
        ] {
            assert!(OfferStatus::Pending.can_transition(to));
            assert!(OfferStatus::Counter.can_transition(to));
        }
    }

    #[test]
    fn terminal_statuses_allow_no_transition() {
        for from in [
            OfferStatus::Rejected,
            OfferStatus::Expired,
            OfferStatus::Completed,
            OfferStatus::Cancelled,
        ] {
            for to in [
                OfferStatus::Pending,
                OfferStatus::Counter,
                OfferStatus::Accepted,
                OfferStatus::Completed,
            ] {
                assert!(!from.can_transition(to));
            }
        }
    }

    #[test]
    fn completion_requires_accepted() {
        assert!(OfferStatus::Accepted.can_transition(OfferStatus::Completed));
        assert!(!OfferStatus::Pending.can_transition(OfferStatus::Completed));
        assert!(!OfferStatus::Counter.can_transition(OfferStatus::Completed));
        assert!(!OfferStatus::Completed.can_transition(OfferStatus::Completed));
    }
}
