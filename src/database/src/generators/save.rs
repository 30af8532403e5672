use crate::generators::PlayerGenerator;
use core::transfers::valuation::AskingPriceCalculator;
use core::utils::IntegerUtils;
use core::{GameClock, InMemoryStore, PlayerPosition, Team, TransferStore};
use log::info;
use serde::Deserialize;

static TEAM_NAMES: &[&str] = &[
    "Northfield United", "Riverton City", "Westgate Rovers", "Eastbourne Athletic",
    "Harborview FC", "Oakwood Town", "Millbrook Wanderers", "Stonebridge FC",
    "Lakeside United", "Redhill Albion", "Greenford County", "Ashworth City",
    "Clifton Rangers", "Brookdale FC", "Fairmont Athletic", "Silverton Town",
];

/// One squad slot per roll, in formation order.
static SQUAD_TEMPLATE: &[(PlayerPosition, usize)] = &[
    (PlayerPosition::Goalkeeper, 2),
    (PlayerPosition::Defender, 7),
    (PlayerPosition::Midfielder, 7),
    (PlayerPosition::Attacker, 4),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub team_count: usize,
    pub free_agent_count: usize,
    pub min_reputation: u16,
    pub max_reputation: u16,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            team_count: 16,
            free_agent_count: 30,
            min_reputation: 3000,
            max_reputation: 9000,
        }
    }
}

pub struct SaveGenerator;

impl SaveGenerator {
    /// Seeds a fresh save: a league's worth of clubs with full squads, a
    /// free-agent pool, and the clock at season 1, round 1. The first club
    /// is handed to the user.
    pub fn generate(store: &mut InMemoryStore, save_id: u32, config: &GeneratorConfig) {
        store.create_save(save_id, GameClock { season: 1, round: 1 });

        for index in 0..config.team_count {
            let team_id = store.next_id(save_id);
            let reputation = IntegerUtils::random(
                config.min_reputation as i32,
                config.max_reputation as i32,
            ) as u16;

            let rep_factor = reputation as f64 / 10_000.0;
            let budget = (5_000_000.0 + rep_factor * 45_000_000.0) as i64;

            let name = TEAM_NAMES
                .get(index)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("Club {}", index + 1));

            store.put_team(
                save_id,
                Team {
                    id: team_id,
                    name,
                    budget,
                    wage_budget: (200_000.0 + rep_factor * 1_800_000.0) as i64,
                    reputation,
                    balance: budget,
                    controlled_by_user: index == 0,
                },
            );

            Self::generate_squad(store, save_id, team_id, reputation);
        }

        for _ in 0..config.free_agent_count {
            let id = store.next_id(save_id);
            let mut player = PlayerGenerator::generate_free_agent(id);
            player.market_value = AskingPriceCalculator::calculate(&player, 1);
            store.put_player(save_id, player);
        }

        info!(
            "generated save {}: {} teams, {} free agents",
            save_id, config.team_count, config.free_agent_count
        );
    }

    fn generate_squad(store: &mut InMemoryStore, save_id: u32, team_id: u32, reputation: u16) {
        for (position, count) in SQUAD_TEMPLATE {
            for _ in 0..*count {
                let id = store.next_id(save_id);
                let mut player = PlayerGenerator::generate(id, *position, reputation, 18, 34);
                player.team_id = Some(team_id);
                player.market_value = AskingPriceCalculator::calculate(&player, 1);
                store.put_player(save_id, player);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_save_has_full_squads_and_one_user_club() {
        let mut store = InMemoryStore::new();
        SaveGenerator::generate(&mut store, 1, &GeneratorConfig::default());

        let teams = store.teams(1);
        assert_eq!(teams.len(), 16);
        assert_eq!(teams.iter().filter(|t| t.controlled_by_user).count(), 1);

        for team in &teams {
            assert_eq!(store.squad(1, team.id).len(), 20);
        }

        assert_eq!(store.free_agents(1).len(), 30);
    }

    #[test]
    fn generated_players_carry_a_valuation() {
        let mut store = InMemoryStore::new();
        SaveGenerator::generate(&mut store, 1, &GeneratorConfig::default());

        let team = store.teams(1)[0].clone();
        for player in store.squad(1, team.id) {
            assert!(player.market_value > 0);
        }
    }
}
