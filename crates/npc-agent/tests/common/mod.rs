//! A deterministic in-memory world and combat sink for scenario tests.

// Each integration test compiles its own copy; not every test uses
// every helper.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use npc_core::{
    CombatSink, EntityDescriptor, EntityId, EntityKind, Faction, Position, WorldView,
};
use npc_threat::ThreatManager;

/// Entity store over a `BTreeMap`, so iteration order is stable.
#[derive(Default)]
pub struct TestWorld {
    entities: BTreeMap<EntityId, EntityDescriptor>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, descriptor: EntityDescriptor) {
        self.entities.insert(descriptor.id.clone(), descriptor);
    }

    pub fn put_player(&mut self, id: &str, pos: Position) {
        self.put(EntityDescriptor {
            id: EntityId::from(id),
            kind: EntityKind::Player,
            faction: Faction::Alliance,
            position: pos,
            health: 100.0,
            max_health: 100.0,
            level: 10,
        });
    }

    pub fn put_npc(&mut self, id: &str, faction: Faction, pos: Position) {
        self.put(EntityDescriptor {
            id: EntityId::from(id),
            kind: EntityKind::Monster,
            faction,
            position: pos,
            health: 100.0,
            max_health: 100.0,
            level: 10,
        });
    }

    pub fn remove(&mut self, id: &str) {
        self.entities.remove(&EntityId::from(id));
    }

    pub fn move_to(&mut self, id: &str, pos: Position) {
        if let Some(entity) = self.entities.get_mut(&EntityId::from(id)) {
            entity.position = pos;
        }
    }

    pub fn set_health(&mut self, id: &str, health: f64) {
        if let Some(entity) = self.entities.get_mut(&EntityId::from(id)) {
            entity.health = health;
        }
    }

    pub fn position_of(&self, id: &str) -> Position {
        self.entities[&EntityId::from(id)].position
    }

    /// Step an entity toward its XZ target, the way the external
    /// movement system would between AI ticks.
    pub fn step_toward(&mut self, id: &str, target: (f64, f64), step: f64) {
        let Some(entity) = self.entities.get_mut(&EntityId::from(id)) else {
            return;
        };
        let dx = target.0 - entity.position.x;
        let dz = target.1 - entity.position.z;
        let dist = (dx * dx + dz * dz).sqrt();
        if dist <= step || dist == 0.0 {
            entity.position.x = target.0;
            entity.position.z = target.1;
        } else {
            entity.position.x += dx / dist * step;
            entity.position.z += dz / dist * step;
        }
    }
}

impl WorldView for TestWorld {
    fn position(&self, id: &EntityId) -> Option<Position> {
        self.entities.get(id).map(|e| e.position)
    }

    fn entities_in_radius(&self, center: Position, radius: f64) -> Vec<EntityId> {
        let radius_sq = radius * radius;
        self.entities
            .values()
            .filter(|e| center.distance_sq(e.position) <= radius_sq)
            .map(|e| e.id.clone())
            .collect()
    }

    fn descriptor(&self, id: &EntityId) -> Option<EntityDescriptor> {
        self.entities.get(id).cloned()
    }
}

/// Combat sink wired straight into a shared threat manager; records
/// every accepted cast for assertions.
pub struct TestCombat {
    pub manager: Arc<ThreatManager>,
    pub casts: RefCell<Vec<(EntityId, EntityId, String)>>,
    pub accept_casts: bool,
}

impl TestCombat {
    pub fn new(manager: Arc<ThreatManager>) -> Self {
        Self {
            manager,
            casts: RefCell::new(Vec::new()),
            accept_casts: true,
        }
    }
}

impl CombatSink for TestCombat {
    fn execute_ability(&self, caster: &EntityId, target: &EntityId, ability: &str) -> bool {
        if !self.accept_casts {
            return false;
        }
        self.casts
            .borrow_mut()
            .push((caster.clone(), target.clone(), ability.to_owned()));
        true
    }

    fn threat_table(&self, npc: &EntityId) -> Vec<(EntityId, f64)> {
        self.manager.snapshot(npc)
    }

    fn add_threat(&self, npc: &EntityId, source: &EntityId, amount: f64) {
        self.manager.add_threat(npc, source, amount);
    }
}
