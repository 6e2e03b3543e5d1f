//! The per-NPC AI owner: blackboard, tree, senses, and threat handle.

use std::sync::{Arc, Mutex};

use tracing::warn;

use npc_bt::Node;
use npc_core::{
    keys, Blackboard, CombatSink, DeterministicRng, EntityDescriptor, EntityId, Position,
    SplitMix64, TickContext, WorldView,
};
use npc_perception::{Perception, SharedHostility};
use npc_threat::{multipliers, ThreatTable};

use crate::template::NpcTemplate;
use crate::trees::build_tree;

/// Warning categories, each of which fires at most once per agent.
mod warned {
    pub const MISSING_POSITION: u8 = 1 << 0;
    pub const BAD_TEMPLATE: u8 = 1 << 1;
}

/// One NPC's AI state. Created by the scheduler on spawn, dropped on
/// despawn; may sleep in between without losing anything.
pub struct Agent {
    id: EntityId,
    template: NpcTemplate,
    blackboard: Blackboard,
    tree: Box<dyn Node>,
    perception: Perception,
    threat: Arc<Mutex<ThreatTable>>,
    active: bool,
    sleeping: bool,
    last_update_ms: i64,
    warned: u8,
}

impl Agent {
    pub fn new(
        id: EntityId,
        template: NpcTemplate,
        spawn: Position,
        threat: Arc<Mutex<ThreatTable>>,
        hostility: SharedHostility,
    ) -> Self {
        let mut blackboard = Blackboard::new();
        blackboard.set(keys::SPAWN_POSITION, spawn);
        blackboard.set(keys::HOME_POSITION, spawn);

        let mut perception = Perception::new(template.perception, template.faction, hostility);
        perception.set_pose(spawn);

        let tree = build_tree(&template);

        Self {
            id,
            template,
            blackboard,
            tree,
            perception,
            threat,
            active: true,
            sleeping: false,
            last_update_ms: 0,
            warned: 0,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn template(&self) -> &NpcTemplate {
        &self.template
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn perception(&self) -> &Perception {
        &self.perception
    }

    pub fn perception_mut(&mut self) -> &mut Perception {
        &mut self.perception
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn last_update_ms(&self) -> i64 {
        self.last_update_ms
    }

    /// Park the agent without destroying it (distant NPCs).
    pub fn sleep(&mut self) {
        self.sleeping = true;
    }

    pub fn wake(&mut self) {
        self.sleeping = false;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// The current movement intent, if one is posted.
    pub fn move_target(&self) -> Option<(f64, f64)> {
        let x = self.blackboard.get_float(keys::MOVE_TARGET_X)?;
        let z = self.blackboard.get_float(keys::MOVE_TARGET_Z)?;
        Some((x, z))
    }

    /// External threat attribution (damage, healing, taunts landing
    /// from other threads come through here, serialized on `&mut self`
    /// or the scheduler's agent map).
    pub fn add_threat(&mut self, source: &EntityId, amount: f64) {
        {
            let mut threat = self.threat.lock().expect("threat ledger poisoned");
            threat.add(source, amount);
        }

        if self.blackboard.get_id(keys::CURRENT_TARGET).is_none() {
            self.blackboard.set(keys::CURRENT_TARGET, source);
        }
        self.blackboard.set(keys::IS_IN_COMBAT, true);
    }

    /// Wipe combat state back to freshly-spawned: threat, target keys,
    /// tree progress, and the perceived set.
    pub fn reset(&mut self) {
        self.threat
            .lock()
            .expect("threat ledger poisoned")
            .clear();

        self.blackboard.delete(keys::CURRENT_TARGET);
        self.blackboard.delete(keys::HIGHEST_THREAT);
        self.blackboard.set(keys::IS_IN_COMBAT, false);
        self.blackboard.set(keys::IS_EVADING, false);
        self.blackboard.set(keys::HEALTH_PERCENT, 1.0);

        self.tree.reset();
        self.perception.clear();
    }

    /// One AI tick: sense, attribute, refresh derived values, decide.
    pub fn update(
        &mut self,
        now_ms: i64,
        dt_seconds: f64,
        world: &dyn WorldView,
        combat: &dyn CombatSink,
        seed: u64,
    ) {
        if !self.active || self.sleeping {
            return;
        }
        self.last_update_ms = now_ms;
        self.blackboard.set(keys::LAST_UPDATE_TIME, now_ms);

        // Sense.
        let Some(pos) = world.position(&self.id) else {
            self.warn_once(warned::MISSING_POSITION, "agent has no world position");
            return;
        };
        self.perception.set_pose(pos);

        let candidates = self.gather_candidates(pos, world);
        let los = |from: Position, to: Position| world.line_of_sight(from, to);
        let newly_aggroed = self.perception.observe(now_ms, &candidates, Some(&los));

        // Attribute: seed threat for hostiles that just crossed into
        // aggro, and open combat if nothing is targeted yet.
        for source in &newly_aggroed {
            self.threat
                .lock()
                .expect("threat ledger poisoned")
                .add(source, multipliers::AGGRO);

            if self.blackboard.get_id(keys::CURRENT_TARGET).is_none() {
                self.blackboard.set(keys::CURRENT_TARGET, source);
                self.blackboard.set(keys::IS_IN_COMBAT, true);
                self.blackboard.set(keys::COMBAT_START_TIME, now_ms);
            }
        }

        // Refresh derived values before deciding: the tree reads real
        // health, not a combat-derived guess.
        if let Some(descriptor) = world.descriptor(&self.id) {
            self.blackboard
                .set(keys::HEALTH_PERCENT, descriptor.health_fraction());
        }

        // Decide.
        let mut rng = SplitMix64::for_agent(seed, &self.id, now_ms as u64);
        let mut ctx = TickContext {
            agent: &self.id,
            now_ms,
            dt_seconds,
            world,
            combat,
            rng: &mut rng as &mut dyn DeterministicRng,
        };
        self.tree.tick(&mut ctx, &mut self.blackboard);
    }

    fn gather_candidates(&mut self, pos: Position, world: &dyn WorldView) -> Vec<EntityDescriptor> {
        let vision_range = self.template.perception.vision_range;
        if vision_range < 0.0 {
            self.warn_once(warned::BAD_TEMPLATE, "template has a negative vision range");
            return Vec::new();
        }

        world
            .entities_in_radius(pos, vision_range)
            .into_iter()
            .filter(|id| id != &self.id)
            .filter_map(|id| world.descriptor(&id))
            .collect()
    }

    fn warn_once(&mut self, category: u8, message: &str) {
        if self.warned & category != 0 {
            return;
        }
        self.warned |= category;
        warn!(agent = %self.id, "{message}");
    }
}
