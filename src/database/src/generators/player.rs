use core::utils::{FloatUtils, IntegerUtils};
use core::{Player, PlayerAttributes, PlayerPosition, PlayerStatus};

static FIRST_NAMES: &[&str] = &[
    "Adam", "Bruno", "Carlos", "Diego", "Emil", "Felix", "Gabriel", "Hugo", "Ivan", "Jonas",
    "Karim", "Luca", "Marco", "Nico", "Oscar", "Pablo", "Rafael", "Sergio", "Thiago", "Viktor",
];

static LAST_NAMES: &[&str] = &[
    "Almeida", "Becker", "Costa", "Duarte", "Eriksen", "Fernandez", "Gomez", "Hernandez",
    "Ivanov", "Jansen", "Kovac", "Lopez", "Martins", "Novak", "Oliveira", "Petrov", "Rossi",
    "Silva", "Torres", "Vidal",
];

pub struct PlayerGenerator;

impl PlayerGenerator {
    /// Rolls a squad player for a club of the given reputation. Stronger
    /// clubs field stronger, better paid players.
    pub fn generate(
        id: u32,
        position: PlayerPosition,
        team_reputation: u16,
        min_age: u8,
        max_age: u8,
    ) -> Player {
        let rep_factor = (team_reputation as f32 / 10_000.0).clamp(0.0, 1.0);

        let age = IntegerUtils::random(min_age as i32, max_age as i32) as u8;
        let attributes = Self::generate_attributes(position, rep_factor);

        let overall_hint = (rep_factor * 60.0 + 30.0) as u8;
        let potential = IntegerUtils::random(
            overall_hint as i32,
            (overall_hint as i32 + 25).min(99),
        ) as u8;

        let wage_min = (2_000.0 + rep_factor * 30_000.0) as i32;
        let wage_max = (10_000.0 + rep_factor * 190_000.0) as i32;
        let wage = IntegerUtils::random(wage_min, wage_max) as i64;

        Player {
            id,
            name: Self::generate_name(),
            position,
            age,
            potential,
            attributes,
            contract_end_season: 1 + IntegerUtils::random(0, 4) as u16,
            wage,
            market_value: 0,
            morale: FloatUtils::random(0.4, 0.9),
            status: PlayerStatus::Active,
            team_id: None,
        }
    }

    /// Free agents roll weaker and older than contracted players.
    pub fn generate_free_agent(id: u32) -> Player {
        let position = match IntegerUtils::random(0, 9) {
            0 => PlayerPosition::Goalkeeper,
            1..=3 => PlayerPosition::Defender,
            4..=6 => PlayerPosition::Midfielder,
            _ => PlayerPosition::Attacker,
        };

        let mut player = Self::generate(id, position, IntegerUtils::random(1000, 4000) as u16, 24, 35);
        player.contract_end_season = 0;
        player.team_id = None;
        player.morale = FloatUtils::random(0.2, 0.6);
        player
    }

    fn generate_attributes(position: PlayerPosition, rep_factor: f32) -> PlayerAttributes {
        let skill_min = 1.0 + rep_factor * 8.0;
        let skill_max = (6.0 + rep_factor * 15.0).min(20.0);

        let roll = || FloatUtils::random(skill_min, skill_max);

        let mut attributes = PlayerAttributes {
            pace: roll(),
            stamina: roll(),
            strength: roll(),
            passing: roll(),
            shooting: roll(),
            dribbling: roll(),
            tackling: roll(),
            positioning: roll(),
            reflexes: roll(),
            handling: roll(),
        };

        // Nudge the attributes that carry the position's rating weight.
        let boost = |v: f32| (v + FloatUtils::random(1.0, 4.0)).min(20.0);
        match position {
            PlayerPosition::Goalkeeper => {
                attributes.reflexes = boost(attributes.reflexes);
                attributes.handling = boost(attributes.handling);
                attributes.positioning = boost(attributes.positioning);
            }
            PlayerPosition::Defender => {
                attributes.tackling = boost(attributes.tackling);
                attributes.strength = boost(attributes.strength);
                attributes.positioning = boost(attributes.positioning);
            }
            PlayerPosition::Midfielder => {
                attributes.passing = boost(attributes.passing);
                attributes.stamina = boost(attributes.stamina);
                attributes.dribbling = boost(attributes.dribbling);
            }
            PlayerPosition::Attacker => {
                attributes.shooting = boost(attributes.shooting);
                attributes.pace = boost(attributes.pace);
                attributes.dribbling = boost(attributes.dribbling);
            }
        }

        attributes
    }

    fn generate_name() -> String {
        let first = FIRST_NAMES[IntegerUtils::random(0, FIRST_NAMES.len() as i32 - 1) as usize];
        let last = LAST_NAMES[IntegerUtils::random(0, LAST_NAMES.len() as i32 - 1) as usize];
        format!("{} {}", first, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_player_stays_in_bounds() {
        for id in 0..50 {
            let player = PlayerGenerator::generate(id, PlayerPosition::Midfielder, 7000, 18, 34);
            assert!(player.age >= 18 && player.age <= 34);
            assert!(player.wage >= 2_000);
            assert!(player.attributes.passing >= 1.0 && player.attributes.passing <= 20.0);
            assert!(player.potential <= 99);
        }
    }

    #[test]
    fn free_agents_are_unattached() {
        let player = PlayerGenerator::generate_free_agent(1);
        assert!(player.team_id.is_none());
        assert!(player.is_free_agent());
    }
}
