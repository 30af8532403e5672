use crate::error::TransferError;
use crate::market::{
    OfferStatus, Transaction, TransactionCategory, TransactionDirection, TransferRecord,
};
use crate::storage::{Mutation, StoreError, TransferStore};
use crate::utils::FormattingUtils;
use chrono::Utc;
use log::info;

/// Every transferred player arrives with the same fresh-start morale.
pub const MORALE_AFTER_TRANSFER: f32 = 0.75;

pub struct TransferLedger;

impl TransferLedger {
    /// Completes an accepted offer as one atomic batch: reassigns the
    /// player, moves the fee, records history, cancels competing offers
    /// and removes the listing. The batch is headed by a guarded status
    /// update, so a second completion attempt fails instead of paying
    /// twice.
    pub fn complete_transfer<S: TransferStore>(
        store: &mut S,
        save_id: u32,
        offer_id: u32,
        season: u16,
    ) -> Result<u32, TransferError> {
        let offer = store
            .offer(save_id, offer_id)
            .ok_or_else(|| TransferError::NotFound(format!("offer {}", offer_id)))?;

        let player = store
            .player(save_id, offer.player_id)
            .ok_or_else(|| TransferError::NotFound(format!("player {}", offer.player_id)))?;

        let round = store.clock(save_id).map(|c| c.round).unwrap_or(0);
        let transfer_id = store.next_id(save_id);

        let mut batch = vec![
            Mutation::SetOfferStatusIf {
                offer_id,
                expected: OfferStatus::Accepted,
                status: OfferStatus::Completed,
                responded_round: Some(round),
            },
            Mutation::ReassignPlayer {
                player_id: offer.player_id,
                team_id: Some(offer.buyer_team_id),
                wage: offer.wage,
                contract_end_season: season + offer.contract_years as u16,
                morale: MORALE_AFTER_TRANSFER,
            },
        ];

        if let Some(seller_team_id) = offer.seller_team_id {
            if offer.fee > 0 {
                batch.push(Mutation::AdjustBudget {
                    team_id: seller_team_id,
                    delta: offer.fee,
                });
                batch.push(Mutation::AdjustBudget {
                    team_id: offer.buyer_team_id,
                    delta: -offer.fee,
                });
                batch.push(Mutation::RecordTransaction(Transaction {
                    id: store.next_id(save_id),
                    team_id: seller_team_id,
                    direction: TransactionDirection::Income,
                    category: TransactionCategory::TransferFee,
                    amount: offer.fee,
                    round,
                }));
                batch.push(Mutation::RecordTransaction(Transaction {
                    id: store.next_id(save_id),
                    team_id: offer.buyer_team_id,
                    direction: TransactionDirection::Expense,
                    category: TransactionCategory::TransferFee,
                    amount: offer.fee,
                    round,
                }));
            }
        }

        batch.push(Mutation::InsertTransfer(TransferRecord {
            id: transfer_id,
            player_id: offer.player_id,
            from_team_id: offer.seller_team_id,
            to_team_id: offer.buyer_team_id,
            fee: offer.fee,
            wage: offer.wage,
            season,
            date: Utc::now().date_naive(),
        }));

        // The player is off the market: retire every competing open offer.
        for other in store.offers(save_id) {
            if other.player_id == offer.player_id && other.id != offer_id && other.is_open() {
                batch.push(Mutation::SetOfferStatus {
                    offer_id: other.id,
                    status: OfferStatus::Cancelled,
                    responded_round: Some(round),
                });
            }
        }

        if let Some(listing) = store.listing_for_player(save_id, offer.player_id) {
            batch.push(Mutation::DeleteListing {
                listing_id: listing.id,
            });
        }

        store.apply(save_id, &batch).map_err(|err| match err {
            StoreError::PreconditionFailed { .. } => {
                TransferError::Conflict(format!("offer {} is not accepted", offer_id))
            }
            other => other.into(),
        })?;

        info!(
            "transfer {} completed: player {} to team {} for {}",
            transfer_id,
            player.id,
            offer.buyer_team_id,
            FormattingUtils::format_money(offer.fee)
        );

        Ok(transfer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{
        Listing, ListingStatus, Offer, OfferTerms, Player, PlayerAttributes, PlayerPosition,
        PlayerStatus, Team,
    };
    use crate::storage::{GameClock, InMemoryStore};

    fn seed() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.create_save(1, GameClock { season: 2, round: 8 });

        for (id, user) in [(10, false), (20, false), (30, false)] {
            store.put_team(
                1,
                Team {
                    id,
                    name: format!("Team {}", id),
                    budget: 20_000_000,
                    wage_budget: 500_000,
                    reputation: 5000,
                    balance: 20_000_000,
                    controlled_by_user: user,
                },
            );
        }

        store.put_player(
            1,
            Player {
                id: 100,
                name: "Target".into(),
                position: PlayerPosition::Attacker,
                age: 24,
                potential: 85,
                attributes: PlayerAttributes::default(),
                contract_end_season: 4,
                wage: 25_000,
                market_value: 8_000_000,
                morale: 0.3,
                status: PlayerStatus::Active,
                team_id: Some(20),
            },
        );

        store
    }

    fn accepted_offer(id: u32, buyer: u32, seller: Option<u32>, fee: i64) -> Offer {
        Offer::accepted(
            id,
            100,
            buyer,
            seller,
            OfferTerms {
                fee,
                wage: 30_000,
                years: 4,
            },
            8,
        )
    }

    #[test]
    fn completion_moves_player_money_and_history() {
        let mut store = seed();

        store
            .apply(
                1,
                &[
                    Mutation::InsertListing(Listing::new(
                        1,
                        100,
                        20,
                        8_000_000,
                        ListingStatus::Available,
                        8,
                    )),
                    Mutation::InsertOffer(accepted_offer(2, 10, Some(20), 7_000_000)),
                ],
            )
            .unwrap();

        let transfer_id = TransferLedger::complete_transfer(&mut store, 1, 2, 2).unwrap();

        let player = store.player(1, 100).unwrap();
        assert_eq!(player.team_id, Some(10));
        assert_eq!(player.wage, 30_000);
        assert_eq!(player.contract_end_season, 6);
        assert_eq!(player.morale, MORALE_AFTER_TRANSFER);

        assert_eq!(store.team(1, 20).unwrap().budget, 27_000_000);
        assert_eq!(store.team(1, 10).unwrap().budget, 13_000_000);

        let transactions = store.transactions(1);
        assert_eq!(transactions.len(), 2);
        assert!(transactions
            .iter()
            .any(|t| t.team_id == 20 && t.direction == TransactionDirection::Income));
        assert!(transactions
            .iter()
            .any(|t| t.team_id == 10 && t.direction == TransactionDirection::Expense));

        let transfers = store.transfers(1);
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].id, transfer_id);

        // listing is gone, offer is completed
        assert!(store.listing_for_player(1, 100).is_none());
        assert_eq!(store.offer(1, 2).unwrap().status, OfferStatus::Completed);
    }

    #[test]
    fn completion_is_not_double_applicable() {
        let mut store = seed();
        store
            .apply(1, &[Mutation::InsertOffer(accepted_offer(2, 10, Some(20), 7_000_000))])
            .unwrap();

        TransferLedger::complete_transfer(&mut store, 1, 2, 2).unwrap();

        let err = TransferLedger::complete_transfer(&mut store, 1, 2, 2).unwrap_err();
        assert!(matches!(err, TransferError::Conflict(_)));

        // money moved exactly once
        assert_eq!(store.team(1, 20).unwrap().budget, 27_000_000);
    }

    #[test]
    fn competing_open_offers_are_cancelled() {
        let mut store = seed();

        let rival = Offer::new(
            3,
            100,
            30,
            Some(20),
            OfferTerms {
                fee: 6_000_000,
                wage: 28_000,
                years: 3,
            },
            8,
        );

        store
            .apply(
                1,
                &[
                    Mutation::InsertOffer(accepted_offer(2, 10, Some(20), 7_000_000)),
                    Mutation::InsertOffer(rival),
                ],
            )
            .unwrap();

        TransferLedger::complete_transfer(&mut store, 1, 2, 2).unwrap();

        assert_eq!(store.offer(1, 3).unwrap().status, OfferStatus::Cancelled);
    }

    #[test]
    fn free_agent_completion_moves_no_money() {
        let mut store = seed();

        // make the target a free agent
        store
            .apply(
                1,
                &[Mutation::ReassignPlayer {
                    player_id: 100,
                    team_id: None,
                    wage: 25_000,
                    contract_end_season: 2,
                    morale: 0.5,
                }],
            )
            .unwrap();

        store
            .apply(1, &[Mutation::InsertOffer(accepted_offer(2, 10, None, 0))])
            .unwrap();

        TransferLedger::complete_transfer(&mut store, 1, 2, 2).unwrap();

        assert_eq!(store.player(1, 100).unwrap().team_id, Some(10));
        assert!(store.transactions(1).is_empty());
        assert_eq!(store.team(1, 10).unwrap().budget, 20_000_000);
    }
}
