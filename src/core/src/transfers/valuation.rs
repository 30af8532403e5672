use crate::market::{Player, PlayerPosition};

/// Wage discount applied to players sitting without a club.
pub const UNEMPLOYMENT_DISCOUNT: f64 = 0.7;

const MIN_ASKING_PRICE: i64 = 10_000;
const MIN_WAGE: i64 = 1_000;

pub struct PlayerRatingCalculator;

impl PlayerRatingCalculator {
    /// Position-weighted composite of the attribute set, 0..=100.
    /// Deterministic for identical inputs; negotiation hardening math
    /// depends on that.
    pub fn overall(player: &Player) -> u8 {
        let attrs = &player.attributes;
        let weights = position_weights(player.position);

        let values = [
            attrs.pace,
            attrs.stamina,
            attrs.strength,
            attrs.passing,
            attrs.shooting,
            attrs.dribbling,
            attrs.tackling,
            attrs.positioning,
            attrs.reflexes,
            attrs.handling,
        ];

        let mut weighted = 0.0f32;
        let mut total_weight = 0.0f32;

        for (value, weight) in values.iter().zip(weights.iter()) {
            weighted += value.clamp(1.0, 20.0) * weight;
            total_weight += weight;
        }

        // 1..=20 composite scaled onto 0..=100
        let composite = weighted / total_weight;
        ((composite / 20.0) * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Weight order matches the attribute listing above:
/// pace, stamina, strength, passing, shooting, dribbling, tackling,
/// positioning, reflexes, handling.
fn position_weights(position: PlayerPosition) -> [f32; 10] {
    match position {
        PlayerPosition::Goalkeeper => [1.0, 1.0, 2.0, 1.0, 0.0, 0.0, 0.0, 3.0, 5.0, 5.0],
        PlayerPosition::Defender => [2.0, 2.0, 4.0, 2.0, 0.5, 1.0, 5.0, 4.0, 0.0, 0.0],
        PlayerPosition::Midfielder => [2.0, 4.0, 1.5, 5.0, 2.0, 3.0, 2.0, 3.0, 0.0, 0.0],
        PlayerPosition::Attacker => [3.0, 2.0, 2.0, 1.0, 5.0, 3.0, 0.5, 4.0, 0.0, 0.0],
    }
}

pub struct AskingPriceCalculator;

impl AskingPriceCalculator {
    pub fn calculate(player: &Player, season: u16) -> i64 {
        let base = determine_base_price(player);
        let age_factor = determine_age_factor(player.age);
        let potential_factor = determine_potential_factor(player);
        let contract_factor = determine_contract_factor(player, season);

        let price = base * age_factor * potential_factor * contract_factor;

        (price as i64).max(MIN_ASKING_PRICE)
    }
}

/// Exponential base from overall rating.
/// overall 40 → ~1.9M, 60 → ~6.5M, 80 → ~15M, 95 → ~26M
fn determine_base_price(player: &Player) -> f64 {
    let overall = PlayerRatingCalculator::overall(player) as f64;
    let normalized = overall / 100.0;

    60_000_000.0 * normalized * normalized * normalized * (0.5 + normalized * 0.5)
}

/// Peak band at 24-28, premium cut for teenagers, steep decline past 30.
fn determine_age_factor(age: u8) -> f64 {
    match age {
        a if a < 18 => 0.5,
        18..=20 => 0.75,
        21..=23 => 0.95,
        24..=28 => 1.1,
        29 => 0.95,
        30 => 0.8,
        31 => 0.65,
        32 => 0.5,
        33 => 0.35,
        _ => 0.2,
    }
}

/// Young players with headroom above their current level carry a premium.
fn determine_potential_factor(player: &Player) -> f64 {
    let overall = PlayerRatingCalculator::overall(player) as f64;
    let potential = player.potential as f64;

    if player.age > 27 || potential <= overall {
        return 1.0;
    }

    1.0 + ((potential - overall) / 100.0) * 0.5
}

/// A player entering the final season of their contract is worth
/// materially less; sellers cannot hold out for full price.
fn determine_contract_factor(player: &Player, season: u16) -> f64 {
    match player.remaining_contract_seasons(season) {
        0 => 0.4,
        1 => 0.7,
        2 => 0.9,
        _ => 1.0,
    }
}

pub struct WageDemandCalculator;

impl WageDemandCalculator {
    /// Base wage scaled by ability and by the buying club's reputation;
    /// bigger clubs are expected to pay a premium.
    pub fn calculate(player: &Player, buyer_reputation: u16) -> i64 {
        let base = player.wage.max(MIN_WAGE) as f64;
        let overall = PlayerRatingCalculator::overall(player) as f64;

        let ability_factor = 0.8 + (overall / 100.0) * 0.6;
        let reputation_premium = 1.0 + (buyer_reputation as f64 / 10_000.0) * 0.5;

        (base * ability_factor * reputation_premium) as i64
    }

    /// What a free agent expects: current wage discounted for unemployment
    /// and adjusted by contract length (short deals command a premium,
    /// long deals a discount).
    pub fn expected_free_agent_wage(current_wage: i64, contract_years: u8) -> i64 {
        let multiplier = contract_length_multiplier(contract_years);
        let expected = current_wage.max(MIN_WAGE) as f64 * UNEMPLOYMENT_DISCOUNT * multiplier;
        expected as i64
    }
}

fn contract_length_multiplier(years: u8) -> f64 {
    match years {
        0 | 1 => 1.10,
        2 => 1.05,
        3 => 1.00,
        4 => 0.95,
        _ => 0.90,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{PlayerAttributes, PlayerStatus};

    fn player(position: PlayerPosition, age: u8) -> Player {
        Player {
            id: 1,
            name: "Test".into(),
            position,
            age,
            potential: 85,
            attributes: PlayerAttributes {
                pace: 14.0,
                stamina: 13.0,
                strength: 12.0,
                passing: 15.0,
                shooting: 16.0,
                dribbling: 14.0,
                tackling: 8.0,
                positioning: 15.0,
                reflexes: 5.0,
                handling: 5.0,
            },
            contract_end_season: 4,
            wage: 40_000,
            market_value: 5_000_000,
            morale: 0.5,
            status: PlayerStatus::Active,
            team_id: Some(1),
        }
    }

    #[test]
    fn overall_is_deterministic() {
        let p = player(PlayerPosition::Attacker, 25);
        let first = PlayerRatingCalculator::overall(&p);
        for _ in 0..10 {
            assert_eq!(PlayerRatingCalculator::overall(&p), first);
        }
    }

    #[test]
    fn goalkeeper_weights_differ_from_attacker_weights() {
        let mut keeper = player(PlayerPosition::Goalkeeper, 25);
        keeper.attributes.reflexes = 18.0;
        keeper.attributes.handling = 17.0;
        keeper.attributes.shooting = 2.0;

        let mut striker = keeper.clone();
        striker.position = PlayerPosition::Attacker;

        // Same attributes, different composites: the keeper profile must
        // rate far higher in goal than up front.
        let as_keeper = PlayerRatingCalculator::overall(&keeper);
        let as_striker = PlayerRatingCalculator::overall(&striker);
        assert!(as_keeper > as_striker);
    }

    #[test]
    fn asking_price_is_deterministic_and_positive() {
        let p = player(PlayerPosition::Midfielder, 26);
        let first = AskingPriceCalculator::calculate(&p, 1);
        assert!(first >= MIN_ASKING_PRICE);
        for _ in 0..10 {
            assert_eq!(AskingPriceCalculator::calculate(&p, 1), first);
        }
    }

    #[test]
    fn asking_price_declines_past_peak() {
        let prime = player(PlayerPosition::Attacker, 26);
        let veteran = player(PlayerPosition::Attacker, 33);

        assert!(
            AskingPriceCalculator::calculate(&prime, 1)
                > AskingPriceCalculator::calculate(&veteran, 1)
        );
    }

    #[test]
    fn final_contract_season_cuts_the_price() {
        let mut p = player(PlayerPosition::Midfielder, 26);
        let long = AskingPriceCalculator::calculate(&p, 1);

        p.contract_end_season = 1;
        let expiring = AskingPriceCalculator::calculate(&p, 1);

        assert!(expiring < long / 2);
    }

    #[test]
    fn wage_demand_grows_with_buyer_reputation() {
        let p = player(PlayerPosition::Attacker, 25);
        let modest = WageDemandCalculator::calculate(&p, 3000);
        let elite = WageDemandCalculator::calculate(&p, 9000);

        assert!(modest >= MIN_WAGE);
        assert!(elite > modest);
    }

    #[test]
    fn free_agent_expectation_uses_unemployment_discount() {
        // 40_000 * 0.7 * 1.0 for a 3-year deal
        assert_eq!(
            WageDemandCalculator::expected_free_agent_wage(40_000, 3),
            28_000
        );
        // Shorter deals command a premium, longer a discount
        assert!(
            WageDemandCalculator::expected_free_agent_wage(40_000, 1)
                > WageDemandCalculator::expected_free_agent_wage(40_000, 5)
        );
    }
}
