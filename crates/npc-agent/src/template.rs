//! Immutable NPC configuration bundles.
//!
//! A template fixes everything about a kind of NPC: stats, senses,
//! behavior tuning, and combat kit. Agents hold their template by value
//! and never mutate it. The constructors below are the stock archetypes
//! shipped with the server; designer content deserializes the same
//! types from data files.

use serde::{Deserialize, Serialize};

use npc_core::Faction;
use npc_perception::PerceptionConfig;

/// Which behavior tree an NPC runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NpcKind {
    /// Flees when threatened, never fights.
    Passive,
    /// Minds its own business, defends itself when attacked.
    Neutral,
    /// Attacks hostile factions on sight.
    Aggressive,
    /// Aggressive with special abilities and an enrage.
    Elite,
    /// Elite tree with boss-grade numbers.
    Boss,
}

/// Base statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcStats {
    pub level: u32,
    pub health: i64,
    pub mana: i64,
    pub strength: i64,
    pub agility: i64,
    pub intellect: i64,
    pub stamina: i64,
    pub spirit: i64,
    /// Units per second.
    pub movement_speed: f64,
    /// Milliseconds between basic attacks.
    pub attack_speed_ms: i64,
}

/// Behavior tuning: wandering, chasing, leashing, assistance, fleeing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    pub wander_radius: f64,
    pub wander_min_wait_ms: i64,
    pub wander_max_wait_ms: i64,
    pub chase_max_distance: f64,
    pub chase_max_time_ms: i64,
    pub leash_radius: f64,
    pub call_for_help: bool,
    pub call_radius: f64,
    /// Health fraction below which the NPC flees; 0 never flees.
    pub flee_at_health: f64,
}

/// Combat kit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatConfig {
    pub attack_range: f64,
    pub abilities: Vec<String>,
    pub default_ability: String,
}

impl CombatConfig {
    pub fn has_ability(&self, ability: &str) -> bool {
        self.abilities.iter().any(|a| a == ability)
    }
}

/// The complete immutable configuration for one kind of NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcTemplate {
    pub kind: NpcKind,
    pub name: String,
    pub description: String,
    pub stats: NpcStats,
    pub perception: PerceptionConfig,
    pub behavior: BehaviorConfig,
    pub combat: CombatConfig,
    pub faction: Faction,
}

impl NpcTemplate {
    /// Prey animals: wide field of view, no aggro, always flees.
    pub fn passive_animal(name: impl Into<String>, level: u32) -> Self {
        let lvl = level as i64;
        Self {
            kind: NpcKind::Passive,
            name: name.into(),
            description: "A passive creature that flees when attacked".into(),
            faction: Faction::Wildlife,
            stats: NpcStats {
                level,
                health: 50 + lvl * 10,
                mana: 0,
                strength: 5 + lvl,
                agility: 10 + lvl * 2,
                intellect: 1,
                stamina: 5 + lvl,
                spirit: 5,
                movement_speed: 6.0,
                attack_speed_ms: 2000,
            },
            perception: PerceptionConfig {
                vision_range: 25.0,
                vision_angle_deg: 270.0,
                aggro_radius: 0.0,
                leash_radius: 30.0,
                ignore_line_of_sight: false,
                detection_delay_ms: 0,
                stealth_detection: 0.5,
            },
            behavior: BehaviorConfig {
                wander_radius: 15.0,
                wander_min_wait_ms: 3000,
                wander_max_wait_ms: 8000,
                chase_max_distance: 0.0,
                chase_max_time_ms: 0,
                leash_radius: 30.0,
                call_for_help: false,
                call_radius: 0.0,
                flee_at_health: 1.0,
            },
            combat: CombatConfig {
                attack_range: 0.0,
                abilities: Vec::new(),
                default_ability: String::new(),
            },
        }
    }

    /// Merchants and civilians: fight back, flee at 20%, call for help.
    pub fn neutral_humanoid(name: impl Into<String>, level: u32) -> Self {
        let lvl = level as i64;
        Self {
            kind: NpcKind::Neutral,
            name: name.into(),
            description: "A neutral humanoid that defends itself when attacked".into(),
            faction: Faction::Neutral,
            stats: NpcStats {
                level,
                health: 100 + lvl * 20,
                mana: 50 + lvl * 10,
                strength: 10 + lvl * 2,
                agility: 8 + lvl,
                intellect: 10 + lvl,
                stamina: 10 + lvl * 2,
                spirit: 10 + lvl,
                movement_speed: 5.0,
                attack_speed_ms: 2500,
            },
            perception: PerceptionConfig {
                vision_range: 20.0,
                vision_angle_deg: 120.0,
                aggro_radius: 0.0,
                leash_radius: 25.0,
                ignore_line_of_sight: false,
                detection_delay_ms: 500,
                stealth_detection: 1.0,
            },
            behavior: BehaviorConfig {
                wander_radius: 5.0,
                wander_min_wait_ms: 5000,
                wander_max_wait_ms: 15000,
                chase_max_distance: 15.0,
                chase_max_time_ms: 5000,
                leash_radius: 25.0,
                call_for_help: true,
                call_radius: 15.0,
                flee_at_health: 0.2,
            },
            combat: CombatConfig {
                attack_range: 3.0,
                abilities: vec!["basic_attack".into()],
                default_ability: "basic_attack".into(),
            },
        }
    }

    /// Standard open-world monster: attacks on sight, never flees.
    pub fn aggressive_monster(name: impl Into<String>, level: u32) -> Self {
        let lvl = level as i64;
        Self {
            kind: NpcKind::Aggressive,
            name: name.into(),
            description: "An aggressive monster that attacks on sight".into(),
            faction: Faction::Hostile,
            stats: NpcStats {
                level,
                health: 150 + lvl * 30,
                mana: 30 + lvl * 5,
                strength: 15 + lvl * 3,
                agility: 10 + lvl * 2,
                intellect: 5 + lvl,
                stamina: 15 + lvl * 3,
                spirit: 5 + lvl,
                movement_speed: 5.5,
                attack_speed_ms: 2000,
            },
            perception: PerceptionConfig {
                vision_range: 30.0,
                vision_angle_deg: 140.0,
                aggro_radius: 15.0,
                leash_radius: 40.0,
                ignore_line_of_sight: false,
                detection_delay_ms: 0,
                stealth_detection: 1.0,
            },
            behavior: BehaviorConfig {
                wander_radius: 10.0,
                wander_min_wait_ms: 2000,
                wander_max_wait_ms: 6000,
                chase_max_distance: 35.0,
                chase_max_time_ms: 15000,
                leash_radius: 40.0,
                call_for_help: true,
                call_radius: 20.0,
                flee_at_health: 0.0,
            },
            combat: CombatConfig {
                attack_range: 3.0,
                abilities: vec!["basic_attack".into(), "power_attack".into()],
                default_ability: "basic_attack".into(),
            },
        }
    }

    /// Elites: several times the health, special abilities, enrage.
    pub fn elite_monster(name: impl Into<String>, level: u32) -> Self {
        let lvl = level as i64;
        Self {
            kind: NpcKind::Elite,
            name: name.into(),
            description: "A powerful elite monster with special abilities".into(),
            faction: Faction::Hostile,
            stats: NpcStats {
                level,
                health: 500 + lvl * 100,
                mana: 100 + lvl * 20,
                strength: 25 + lvl * 5,
                agility: 15 + lvl * 3,
                intellect: 15 + lvl * 3,
                stamina: 30 + lvl * 6,
                spirit: 15 + lvl * 2,
                movement_speed: 6.0,
                attack_speed_ms: 1800,
            },
            perception: PerceptionConfig {
                vision_range: 40.0,
                vision_angle_deg: 180.0,
                aggro_radius: 20.0,
                leash_radius: 50.0,
                ignore_line_of_sight: false,
                detection_delay_ms: 0,
                stealth_detection: 1.5,
            },
            behavior: BehaviorConfig {
                wander_radius: 8.0,
                wander_min_wait_ms: 3000,
                wander_max_wait_ms: 8000,
                chase_max_distance: 45.0,
                chase_max_time_ms: 20000,
                leash_radius: 50.0,
                call_for_help: true,
                call_radius: 30.0,
                flee_at_health: 0.0,
            },
            combat: CombatConfig {
                attack_range: 4.0,
                abilities: vec![
                    "basic_attack".into(),
                    "power_attack".into(),
                    "cleave".into(),
                    "enrage".into(),
                ],
                default_ability: "basic_attack".into(),
            },
        }
    }

    /// Bosses: all-around vision, sees through walls, fights alone.
    pub fn boss_monster(name: impl Into<String>, level: u32) -> Self {
        let lvl = level as i64;
        Self {
            kind: NpcKind::Boss,
            name: name.into(),
            description: "A boss monster with multiple phases and abilities".into(),
            faction: Faction::Hostile,
            stats: NpcStats {
                level,
                health: 2000 + lvl * 400,
                mana: 500 + lvl * 100,
                strength: 50 + lvl * 10,
                agility: 30 + lvl * 5,
                intellect: 40 + lvl * 8,
                stamina: 80 + lvl * 15,
                spirit: 40 + lvl * 5,
                movement_speed: 5.0,
                attack_speed_ms: 1500,
            },
            perception: PerceptionConfig {
                vision_range: 50.0,
                vision_angle_deg: 360.0,
                aggro_radius: 25.0,
                leash_radius: 60.0,
                ignore_line_of_sight: true,
                detection_delay_ms: 0,
                stealth_detection: 2.0,
            },
            behavior: BehaviorConfig {
                wander_radius: 0.0,
                wander_min_wait_ms: 0,
                wander_max_wait_ms: 0,
                chase_max_distance: 55.0,
                chase_max_time_ms: 30000,
                leash_radius: 60.0,
                call_for_help: false,
                call_radius: 0.0,
                flee_at_health: 0.0,
            },
            combat: CombatConfig {
                attack_range: 5.0,
                abilities: vec![
                    "basic_attack".into(),
                    "power_attack".into(),
                    "cleave".into(),
                    "enrage".into(),
                    "summon_adds".into(),
                    "aoe_attack".into(),
                ],
                default_ability: "basic_attack".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_scale_with_level() {
        let low = NpcTemplate::aggressive_monster("wolf", 1);
        let high = NpcTemplate::aggressive_monster("dire wolf", 10);
        assert!(high.stats.health > low.stats.health);
        assert_eq!(low.kind, NpcKind::Aggressive);
    }

    #[test]
    fn passive_animals_never_engage() {
        let deer = NpcTemplate::passive_animal("deer", 3);
        assert_eq!(deer.perception.aggro_radius, 0.0);
        assert_eq!(deer.behavior.flee_at_health, 1.0);
        assert!(deer.combat.abilities.is_empty());
    }

    #[test]
    fn bosses_see_everything() {
        let boss = NpcTemplate::boss_monster("dragon", 60);
        assert!(boss.perception.ignore_line_of_sight);
        assert!(boss.perception.vision_angle_deg >= 360.0);
        assert!(!boss.behavior.call_for_help);
        assert!(boss.combat.has_ability("enrage"));
    }
}
