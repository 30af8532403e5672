use crate::error::TransferError;
use crate::market::{Offer, OfferStatus};
use crate::storage::{chunk_batch, Mutation, TransferStore};
use log::{debug, error};

pub struct ExpirySweeper;

impl ExpirySweeper {
    /// Flips stale open offers to `Expired` at the round boundary. An offer
    /// with `expires_round == round` is still valid; only strictly older
    /// offers expire.
    pub fn sweep<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        round: u16,
    ) -> Result<u32, TransferError> {
        let stale: Vec<Offer> = store
            .offers(save_id)
            .into_iter()
            .filter(|o| o.is_open() && o.expires_round < round)
            .collect();

        if stale.is_empty() {
            return Ok(0);
        }

        let batch: Vec<Mutation> = stale
            .iter()
            .map(|o| Mutation::SetOfferStatus {
                offer_id: o.id,
                status: OfferStatus::Expired,
                responded_round: Some(round),
            })
            .collect();

        for chunk in chunk_batch(&batch) {
            if let Err(err) = store.apply(save_id, chunk) {
                error!("expiry sweep failed mid-sequence: {}", err);
                return Err(TransferError::Storage(err.to_string()));
            }
        }

        debug!("expired {} stale offers at round {}", stale.len(), round);
        Ok(stale.len() as u32)
    }
}
