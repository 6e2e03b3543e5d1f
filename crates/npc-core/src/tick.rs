use crate::id::EntityId;
use crate::position::Position;
use crate::rng::DeterministicRng;
use crate::world::{CombatSink, WorldView};

/// Everything a behavior tree node may touch during one tick.
///
/// The context is rebuilt per agent per tick by the agent controller;
/// the same `now_ms` is seen by every node in one traversal. Nodes must
/// not block or do I/O; long-running work returns `Running` and picks
/// up on the next tick.
pub struct TickContext<'a> {
    /// The agent being ticked.
    pub agent: &'a EntityId,
    /// Monotonic server time in milliseconds.
    pub now_ms: i64,
    /// Wall time since the previous scheduler tick, in seconds.
    pub dt_seconds: f64,
    pub world: &'a dyn WorldView,
    pub combat: &'a dyn CombatSink,
    /// Per-agent, per-tick deterministic stream.
    pub rng: &'a mut dyn DeterministicRng,
}

impl TickContext<'_> {
    /// The ticking agent's own position, if the world still knows it.
    pub fn self_position(&self) -> Option<Position> {
        self.world.position(self.agent)
    }
}
