use crate::market::{ListingStatus, Player, PlayerPosition};
use crate::transfers::valuation::{AskingPriceCalculator, PlayerRatingCalculator, WageDemandCalculator};
use serde::Deserialize;

/// Orchestrator and policy knobs, overridable per round-processing request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub max_offers_per_club: u8,
    pub max_listings_per_club: u8,
    pub offer_expiry_rounds: u16,
    pub sell_accept_threshold: f64,
    pub sell_reject_threshold: f64,
    pub buy_quality_margin: f64,
    pub buy_opening_ratio: f64,
    pub free_agent_accept_threshold: f64,
    pub free_agent_reject_threshold: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            max_offers_per_club: 3,
            max_listings_per_club: 3,
            offer_expiry_rounds: 3,
            sell_accept_threshold: 0.95,
            sell_reject_threshold: 0.50,
            buy_quality_margin: 5.0,
            buy_opening_ratio: 0.85,
            free_agent_accept_threshold: 0.85,
            free_agent_reject_threshold: 0.50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SellDecision {
    Accept,
    Reject,
    Counter { fee: i64, wage: i64 },
}

#[derive(Debug, Clone)]
pub struct BuyDecision {
    pub will_buy: bool,
    pub offer_fee: Option<i64>,
    pub offer_wage: Option<i64>,
    pub contract_years: Option<u8>,
}

impl BuyDecision {
    fn no() -> Self {
        BuyDecision {
            will_buy: false,
            offer_fee: None,
            offer_wage: None,
            contract_years: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FreeAgentDecision {
    Accept,
    Reject,
    Counter { wage: i64 },
}

#[derive(Debug, Clone)]
pub struct ListingCandidate {
    pub player_id: u32,
    pub asking_price: i64,
    pub status: ListingStatus,
}

/// Squad baseline per position for a 22-man squad; shortfalls drive
/// buying need, surpluses drive selling willingness.
fn position_baseline(position: PlayerPosition) -> usize {
    match position {
        PlayerPosition::Goalkeeper => 2,
        PlayerPosition::Defender => 7,
        PlayerPosition::Midfielder => 7,
        PlayerPosition::Attacker => 4,
    }
}

pub fn depth_at_position(squad: &[Player], position: PlayerPosition) -> usize {
    squad
        .iter()
        .filter(|p| p.is_active() && p.position == position)
        .count()
}

/// Need score 0.0..=1.0: how badly the squad wants another player at the
/// position. Zero once the baseline is met.
pub fn position_need(squad: &[Player], position: PlayerPosition) -> f64 {
    let baseline = position_baseline(position);
    let depth = depth_at_position(squad, position);

    if depth >= baseline {
        return 0.0;
    }

    (baseline - depth) as f64 / baseline as f64
}

pub fn squad_average_overall(squad: &[Player]) -> u8 {
    let active: Vec<&Player> = squad.iter().filter(|p| p.is_active()).collect();
    if active.is_empty() {
        return 0;
    }

    let total: u32 = active
        .iter()
        .map(|p| PlayerRatingCalculator::overall(p) as u32)
        .sum();
    (total / active.len() as u32) as u8
}

/// Seller's response to a bid. Accepts at or above a threshold fraction of
/// asking, rejects far below, otherwise counters toward the asking price.
/// Positional surplus makes the seller easier to deal with; an unknown
/// squad is treated as having no surplus.
pub fn sell_decision(
    asking_price: i64,
    offer_fee: i64,
    offer_wage: i64,
    depth: Option<usize>,
    player: &Player,
    season: u16,
    config: &AiConfig,
) -> SellDecision {
    let asking = asking_price.max(1);
    let ratio = offer_fee as f64 / asking as f64;

    let surplus = depth
        .unwrap_or(0)
        .saturating_sub(position_baseline(player.position));
    let mut accept_at = config.sell_accept_threshold - surplus as f64 * 0.03;

    // A player in the final contract season walks for free next year;
    // take what is on the table sooner.
    if player.remaining_contract_seasons(season) == 0 {
        accept_at -= 0.10;
    }

    let accept_at = accept_at.max(0.80);

    if ratio >= accept_at {
        return SellDecision::Accept;
    }

    if ratio < config.sell_reject_threshold {
        return SellDecision::Reject;
    }

    SellDecision::Counter {
        fee: (offer_fee + asking) / 2,
        wage: offer_wage.max(player.wage),
    }
}

/// Whether a club bids on a listed player and at what opening terms.
/// Never proposes a fee above `budget` or a wage above `wage_budget`.
#[allow(clippy::too_many_arguments)]
pub fn buy_decision(
    player: &Player,
    asking_price: i64,
    budget: i64,
    wage_budget: i64,
    squad_avg_overall: u8,
    need_score: f64,
    reputation: u16,
    config: &AiConfig,
) -> BuyDecision {
    if budget <= 0 || wage_budget <= 0 {
        return BuyDecision::no();
    }

    let overall = PlayerRatingCalculator::overall(player) as i16;
    let quality_delta = overall - squad_avg_overall as i16;

    // With a desperate need the club accepts a slight downgrade; with no
    // need the player must clearly raise the squad level.
    let required_delta = config.buy_quality_margin - need_score * 10.0;
    if (quality_delta as f64) < required_delta {
        return BuyDecision::no();
    }

    let wage = WageDemandCalculator::calculate(player, reputation);
    if wage > wage_budget {
        return BuyDecision::no();
    }

    let asking = asking_price.max(1);
    let opening = (asking as f64 * (config.buy_opening_ratio + need_score * 0.10)) as i64;
    let fee = opening.min(budget);

    // An opening bid under the seller's reject threshold would be refused
    // outright; do not waste the offer slot.
    if (fee as f64) < asking as f64 * config.sell_reject_threshold {
        return BuyDecision::no();
    }

    BuyDecision {
        will_buy: true,
        offer_fee: Some(fee),
        offer_wage: Some(wage),
        contract_years: Some(contract_years_for_age(player.age)),
    }
}

pub fn contract_years_for_age(age: u8) -> u8 {
    if age < 24 {
        5
    } else if age < 28 {
        4
    } else if age < 32 {
        2
    } else {
        1
    }
}

/// Free agent's response to a wage offer. Elite buyers get a prestige
/// discount and late-season rounds make the player less choosy.
pub fn free_agent_decision(
    expected_wage: i64,
    offered_wage: i64,
    reputation: u16,
    round: u16,
    config: &AiConfig,
) -> FreeAgentDecision {
    let expected = expected_wage.max(1);

    let mut accept_at = config.free_agent_accept_threshold;
    if reputation >= 8000 {
        accept_at -= 0.05;
    }
    if round > 30 {
        accept_at -= 0.05;
    }

    let ratio = offered_wage as f64 / expected as f64;

    if ratio >= accept_at {
        return FreeAgentDecision::Accept;
    }

    if ratio < config.free_agent_reject_threshold {
        return FreeAgentDecision::Reject;
    }

    FreeAgentDecision::Counter {
        wage: (offered_wage + expected) / 2,
    }
}

/// Players a club should put on the market this round: expiring contracts
/// first, then aging players, then surplus depth — capped per club.
pub fn select_players_to_list(squad: &[Player], season: u16, config: &AiConfig) -> Vec<ListingCandidate> {
    let mut candidates: Vec<ListingCandidate> = Vec::new();
    let mut picked: Vec<u32> = Vec::new();

    let push = |candidates: &mut Vec<ListingCandidate>, picked: &mut Vec<u32>, player: &Player, status: ListingStatus| {
        if picked.contains(&player.id) {
            return;
        }
        picked.push(player.id);
        candidates.push(ListingCandidate {
            player_id: player.id,
            asking_price: AskingPriceCalculator::calculate(player, season),
            status,
        });
    };

    // Contract running out within a season: cash in now or lose the fee.
    for player in squad.iter().filter(|p| p.is_active()) {
        if player.remaining_contract_seasons(season) <= 1 {
            let status = if player.remaining_contract_seasons(season) == 0 {
                ListingStatus::ContractExpiring
            } else {
                ListingStatus::Available
            };
            push(&mut candidates, &mut picked, player, status);
        }
    }

    // Aging players past the value peak.
    for player in squad.iter().filter(|p| p.is_active()) {
        if player.age >= 31 {
            push(&mut candidates, &mut picked, player, ListingStatus::Available);
        }
    }

    // Surplus depth: list the weakest players above the baseline.
    for position in [
        PlayerPosition::Goalkeeper,
        PlayerPosition::Defender,
        PlayerPosition::Midfielder,
        PlayerPosition::Attacker,
    ] {
        let baseline = position_baseline(position);
        let mut at_position: Vec<&Player> = squad
            .iter()
            .filter(|p| p.is_active() && p.position == position)
            .collect();

        if at_position.len() <= baseline {
            continue;
        }

        at_position.sort_by_key(|p| PlayerRatingCalculator::overall(p));

        let surplus = at_position.len() - baseline;
        for player in at_position.into_iter().take(surplus) {
            push(&mut candidates, &mut picked, player, ListingStatus::Available);
        }
    }

    candidates.truncate(config.max_listings_per_club as usize);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{PlayerAttributes, PlayerStatus};

    fn player(id: u32, position: PlayerPosition, age: u8, wage: i64) -> Player {
        Player {
            id,
            name: format!("Player {}", id),
            position,
            age,
            potential: 75,
            attributes: PlayerAttributes {
                pace: 12.0,
                stamina: 12.0,
                strength: 12.0,
                passing: 12.0,
                shooting: 12.0,
                dribbling: 12.0,
                tackling: 12.0,
                positioning: 12.0,
                reflexes: 12.0,
                handling: 12.0,
            },
            contract_end_season: 5,
            wage,
            market_value: 2_000_000,
            morale: 0.5,
            status: PlayerStatus::Active,
            team_id: Some(1),
        }
    }

    #[test]
    fn sell_accepts_at_asking_price() {
        let p = player(1, PlayerPosition::Midfielder, 25, 20_000);
        let decision = sell_decision(10_000_000, 9_800_000, 20_000, None, &p, 1, &AiConfig::default());
        assert_eq!(decision, SellDecision::Accept);
    }

    #[test]
    fn sell_rejects_lowball_bids() {
        let p = player(1, PlayerPosition::Midfielder, 25, 20_000);
        let decision = sell_decision(10_000_000, 3_000_000, 20_000, None, &p, 1, &AiConfig::default());
        assert_eq!(decision, SellDecision::Reject);
    }

    #[test]
    fn sell_counters_toward_asking() {
        let p = player(1, PlayerPosition::Midfielder, 25, 20_000);
        let decision = sell_decision(10_000_000, 6_000_000, 20_000, None, &p, 1, &AiConfig::default());

        match decision {
            SellDecision::Counter { fee, .. } => {
                assert_eq!(fee, 8_000_000);
            }
            other => panic!("expected counter, got {:?}", other),
        }
    }

    #[test]
    fn surplus_depth_lowers_the_accept_threshold() {
        let p = player(1, PlayerPosition::Attacker, 25, 20_000);
        let config = AiConfig::default();

        // 88% of asking: not enough normally, enough with heavy surplus
        let firm = sell_decision(10_000_000, 8_800_000, 20_000, Some(4), &p, 1, &config);
        let flexible = sell_decision(10_000_000, 8_800_000, 20_000, Some(8), &p, 1, &config);

        assert_ne!(firm, SellDecision::Accept);
        assert_eq!(flexible, SellDecision::Accept);
    }

    #[test]
    fn buy_never_exceeds_budget_or_wage_budget() {
        let p = player(1, PlayerPosition::Attacker, 25, 20_000);
        let config = AiConfig::default();

        let decision = buy_decision(&p, 10_000_000, 9_000_000, 200_000, 40, 0.5, 5000, &config);
        assert!(decision.will_buy);
        assert!(decision.offer_fee.unwrap() <= 9_000_000);

        let broke = buy_decision(&p, 10_000_000, 2_000_000, 200_000, 40, 0.5, 5000, &config);
        assert!(!broke.will_buy);

        let wage_capped = buy_decision(&p, 10_000_000, 9_000_000, 100, 40, 0.5, 5000, &config);
        assert!(!wage_capped.will_buy);
    }

    #[test]
    fn buy_requires_quality_or_need() {
        let p = player(1, PlayerPosition::Attacker, 25, 20_000);
        let config = AiConfig::default();

        // overall ~60 vs strong squad, no positional need: pass
        let decision = buy_decision(&p, 5_000_000, 50_000_000, 500_000, 75, 0.0, 5000, &config);
        assert!(!decision.will_buy);

        // same player, desperate need at the position: bid
        let decision = buy_decision(&p, 5_000_000, 50_000_000, 500_000, 62, 1.0, 5000, &config);
        assert!(decision.will_buy);
    }

    #[test]
    fn buy_thresholds_come_from_config() {
        let p = player(1, PlayerPosition::Attacker, 25, 20_000);

        let baseline = buy_decision(
            &p, 5_000_000, 50_000_000, 500_000, 40, 0.5, 5000, &AiConfig::default(),
        );
        assert!(baseline.will_buy);

        // a demanding quality margin turns the same bid down
        let strict = AiConfig {
            buy_quality_margin: 50.0,
            ..AiConfig::default()
        };
        let decision = buy_decision(&p, 5_000_000, 50_000_000, 500_000, 40, 0.5, 5000, &strict);
        assert!(!decision.will_buy);

        // a fuller opening ratio raises the opening bid
        let generous = AiConfig {
            buy_opening_ratio: 1.0,
            ..AiConfig::default()
        };
        let decision = buy_decision(&p, 5_000_000, 50_000_000, 500_000, 40, 0.5, 5000, &generous);
        assert!(decision.offer_fee.unwrap() > baseline.offer_fee.unwrap());
    }

    #[test]
    fn free_agent_accepts_at_85_percent_of_expectation() {
        let expected = WageDemandCalculator::expected_free_agent_wage(40_000, 3);
        assert_eq!(expected, 28_000);
        let config = AiConfig::default();

        let decision = free_agent_decision(expected, 23_800, 5000, 10, &config);
        assert_eq!(decision, FreeAgentDecision::Accept);

        let decision = free_agent_decision(expected, 20_000, 5000, 10, &config);
        match decision {
            FreeAgentDecision::Counter { wage } => assert_eq!(wage, 24_000),
            other => panic!("expected counter, got {:?}", other),
        }

        let decision = free_agent_decision(expected, 10_000, 5000, 10, &config);
        assert_eq!(decision, FreeAgentDecision::Reject);
    }

    #[test]
    fn listing_selection_is_capped_and_prefers_expiring_contracts() {
        let config = AiConfig::default();
        let mut squad = Vec::new();

        let mut expiring = player(1, PlayerPosition::Defender, 25, 20_000);
        expiring.contract_end_season = 1;
        squad.push(expiring);

        for id in 2..=6 {
            squad.push(player(id, PlayerPosition::Midfielder, 33, 15_000));
        }

        let candidates = select_players_to_list(&squad, 1, &config);

        assert_eq!(candidates.len(), config.max_listings_per_club as usize);
        assert_eq!(candidates[0].player_id, 1);
        assert_eq!(candidates[0].status, ListingStatus::ContractExpiring);
        assert!(candidates.iter().all(|c| c.asking_price > 0));
    }
}
