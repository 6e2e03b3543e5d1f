//! The NPC sensory pipeline.
//!
//! Each tick an agent feeds its nearby entity descriptors through
//! [`Perception::observe`], which applies range, vision cone, line of
//! sight and faction hostility, and reports which hostiles just crossed
//! into aggro. The perceived set is rebuilt from what was actually seen
//! this tick; anything not observed is forgotten.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod hostility;

pub use hostility::{HostilityMatrix, SharedHostility};

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use npc_core::{EntityDescriptor, EntityId, EntityKind, Faction, Position};

/// Sensory tuning for one NPC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerceptionConfig {
    /// How far the NPC can see, in world units.
    pub vision_range: f64,
    /// Field of view in degrees; 360 or more sees all around.
    pub vision_angle_deg: f64,
    /// Distance at which a visible hostile is engaged.
    pub aggro_radius: f64,
    /// Distance from home beyond which the NPC gives up and resets.
    pub leash_radius: f64,
    /// See through walls (bosses).
    pub ignore_line_of_sight: bool,
    /// Time between first sight and aggro eligibility.
    pub detection_delay_ms: i64,
    /// Stealth detection modifier; advisory, higher spots stealth better.
    pub stealth_detection: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            vision_range: 30.0,
            vision_angle_deg: 120.0,
            aggro_radius: 15.0,
            leash_radius: 40.0,
            ignore_line_of_sight: false,
            detection_delay_ms: 0,
            stealth_detection: 1.0,
        }
    }
}

/// One entity as the NPC currently senses it.
#[derive(Debug, Clone, PartialEq)]
pub struct PerceivedEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub faction: Faction,
    pub distance: f64,
    /// Bearing relative to the perceiver's facing, normalized to [-π, π].
    pub angle_rel: f64,
    /// Inside the vision cone with line of sight.
    pub visible: bool,
    /// Visible, inside the aggro radius, and past the detection delay.
    pub in_aggro: bool,
    /// Advisory danger estimate; does not feed the threat ledger.
    pub threat_level: f64,
    /// When the entity first entered the perceived set, in ms.
    pub detected_at_ms: i64,
}

/// Per-agent sensory state.
#[derive(Debug)]
pub struct Perception {
    config: PerceptionConfig,
    faction: Faction,
    pose: Position,
    shared: SharedHostility,
    /// Set when this agent's hostility diverges from the shared matrix.
    local: Option<HostilityMatrix>,
    perceived: BTreeMap<EntityId, PerceivedEntity>,
    last_update_ms: i64,
}

impl Perception {
    pub fn new(config: PerceptionConfig, faction: Faction, shared: SharedHostility) -> Self {
        Self {
            config,
            faction,
            pose: Position::default(),
            shared,
            local: None,
            perceived: BTreeMap::new(),
            last_update_ms: 0,
        }
    }

    pub fn config(&self) -> &PerceptionConfig {
        &self.config
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    /// Update the perceiver's own position and facing before observing.
    pub fn set_pose(&mut self, pose: Position) {
        self.pose = pose;
    }

    /// When the last sensory pass ran, in ms.
    pub fn last_update_ms(&self) -> i64 {
        self.last_update_ms
    }

    pub fn is_hostile_to(&self, other: Faction) -> bool {
        match &self.local {
            Some(matrix) => matrix.is_hostile(self.faction, other),
            None => self.shared.is_hostile(self.faction, other),
        }
    }

    /// Diverge this agent's hostility from the shared matrix. The first
    /// override forks a private copy of the current shared state.
    pub fn override_hostility(&mut self, to: Faction, hostile: bool) {
        let matrix = self.local.get_or_insert_with(|| self.shared.snapshot());
        matrix.set_hostile(self.faction, to, hostile);
    }

    /// Run one sensory pass over the candidate descriptors.
    ///
    /// Returns the ids that transitioned into "hostile and in aggro"
    /// this pass; these seed threat attribution. Entities absent
    /// from `candidates` drop out of the perceived set.
    pub fn observe(
        &mut self,
        now_ms: i64,
        candidates: &[EntityDescriptor],
        los: Option<&dyn Fn(Position, Position) -> bool>,
    ) -> Vec<EntityId> {
        self.last_update_ms = now_ms;

        let vision_range = self.config.vision_range;
        let half_angle = (self.config.vision_angle_deg / 2.0).to_radians();
        let mut next: BTreeMap<EntityId, PerceivedEntity> = BTreeMap::new();
        let mut newly_aggroed = Vec::new();

        for entity in candidates {
            let distance_sq = self.pose.distance_sq(entity.position);
            if distance_sq > vision_range * vision_range {
                continue;
            }
            let distance = distance_sq.sqrt();

            let angle_rel = self.relative_angle(entity.position);
            let in_cone = angle_rel.abs() <= half_angle || self.config.vision_angle_deg >= 360.0;

            let has_los = if self.config.ignore_line_of_sight {
                true
            } else {
                los.map_or(true, |check| check(self.pose, entity.position))
            };

            let visible = in_cone && has_los;

            let previous = self.perceived.get(&entity.id);
            let detected_at_ms = previous.map_or(now_ms, |p| p.detected_at_ms);

            let delay_elapsed = self.config.detection_delay_ms <= 0
                || now_ms - detected_at_ms >= self.config.detection_delay_ms;
            let in_aggro = visible && distance <= self.config.aggro_radius && delay_elapsed;

            let hostile = self.is_hostile_to(entity.faction);
            if hostile && in_aggro && !previous.is_some_and(|p| p.in_aggro) {
                newly_aggroed.push(entity.id.clone());
            }

            let threat_level = if hostile {
                threat_level(entity, distance, vision_range)
            } else {
                0.0
            };

            next.insert(
                entity.id.clone(),
                PerceivedEntity {
                    id: entity.id.clone(),
                    kind: entity.kind,
                    faction: entity.faction,
                    distance,
                    angle_rel,
                    visible,
                    in_aggro,
                    threat_level,
                    detected_at_ms,
                },
            );
        }

        self.perceived = next;
        newly_aggroed
    }

    fn relative_angle(&self, target: Position) -> f64 {
        let dy = target.y - self.pose.y;
        let dx = target.x - self.pose.x;
        let mut rel = dy.atan2(dx) - self.pose.facing;
        while rel > PI {
            rel -= 2.0 * PI;
        }
        while rel < -PI {
            rel += 2.0 * PI;
        }
        rel
    }

    pub fn get(&self, id: &EntityId) -> Option<&PerceivedEntity> {
        self.perceived.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.perceived.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PerceivedEntity> {
        self.perceived.values()
    }

    pub fn len(&self) -> usize {
        self.perceived.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perceived.is_empty()
    }

    /// The closest perceived entity that is hostile and in aggro.
    pub fn nearest_hostile(&self) -> Option<&PerceivedEntity> {
        self.perceived
            .values()
            .filter(|p| p.in_aggro && self.is_hostile_to(p.faction))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// The perceived entity with the greatest advisory threat level.
    pub fn highest_threat_level(&self) -> Option<&PerceivedEntity> {
        self.perceived
            .values()
            .filter(|p| p.threat_level > 0.0)
            .max_by(|a, b| a.threat_level.total_cmp(&b.threat_level))
    }

    pub fn clear(&mut self) {
        self.perceived.clear();
    }
}

/// Proximity × target-kind × target-health danger estimate, clamped to
/// [0, 2] in practice. Players weigh double; wounded targets weigh less.
fn threat_level(entity: &EntityDescriptor, distance: f64, vision_range: f64) -> f64 {
    let distance_factor = (1.0 - distance / vision_range).clamp(0.0, 1.0);
    let type_factor = if entity.kind == EntityKind::Player {
        2.0
    } else {
        1.0
    };
    distance_factor * type_factor * entity.health_fraction()
}
