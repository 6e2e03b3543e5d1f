//! Interfaces to the surrounding simulation.
//!
//! The AI core never owns entity state. It reads through [`WorldView`]
//! and issues combat requests through [`CombatSink`]; the embedding
//! server implements both. Entities are referenced by id only, so agent
//! lifetime is independent of entity lifetime.

use serde::{Deserialize, Serialize};

use crate::faction::Faction;
use crate::id::EntityId;
use crate::position::Position;

/// Broad entity category, as far as perception cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Npc,
    Monster,
}

/// Read-only snapshot of one entity, obtained through [`WorldView`].
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    pub id: EntityId,
    pub kind: EntityKind,
    pub faction: Faction,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub level: u32,
}

impl EntityDescriptor {
    /// Health as a fraction of max, defaulting to full when max is unset.
    pub fn health_fraction(&self) -> f64 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            1.0
        }
    }
}

/// Read access to the world/entity store.
///
/// Implementations must be safe for concurrent readers if the scheduler
/// is ever run with cross-agent parallelism.
pub trait WorldView {
    fn position(&self, id: &EntityId) -> Option<Position>;

    /// Ids of entities within `radius` of `center`, including the
    /// querying entity itself if it is in range.
    fn entities_in_radius(&self, center: Position, radius: f64) -> Vec<EntityId>;

    fn descriptor(&self, id: &EntityId) -> Option<EntityDescriptor>;

    /// Whether an unobstructed line exists between two points. The
    /// default assumes open terrain.
    fn line_of_sight(&self, _from: Position, _to: Position) -> bool {
        true
    }
}

/// Write access to the combat resolver, plus the read-through threat
/// query the tree leaves use.
///
/// Receivers are shared: implementations serialize writes internally
/// (the combat resolver already queues requests from many sources).
pub trait CombatSink {
    /// Request an ability cast. Returns whether the resolver accepted
    /// it; rejection (range, cooldown, invalid target) is not an error.
    fn execute_ability(&self, caster: &EntityId, target: &EntityId, ability: &str) -> bool;

    /// The current threat entries for an NPC, in no guaranteed order.
    fn threat_table(&self, npc: &EntityId) -> Vec<(EntityId, f64)>;

    fn add_threat(&self, npc: &EntityId, source: &EntityId, amount: f64);
}
