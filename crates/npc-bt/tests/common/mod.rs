//! Shared fixtures for behavior tree tests: an empty world, a combat
//! sink that accepts everything, and a scripted node that replays a
//! fixed status sequence while counting ticks and resets.

// Each integration test compiles its own copy; not every test uses
// every helper.
#![allow(dead_code)]

use npc_core::{
    Blackboard, CombatSink, DeterministicRng, EntityDescriptor, EntityId, Position, SplitMix64,
    TickContext, WorldView,
};

use npc_bt::{Node, Status};

pub struct NullWorld;

impl WorldView for NullWorld {
    fn position(&self, _id: &EntityId) -> Option<Position> {
        None
    }

    fn entities_in_radius(&self, _center: Position, _radius: f64) -> Vec<EntityId> {
        Vec::new()
    }

    fn descriptor(&self, _id: &EntityId) -> Option<EntityDescriptor> {
        None
    }
}

pub struct NullCombat;

impl CombatSink for NullCombat {
    fn execute_ability(&self, _caster: &EntityId, _target: &EntityId, _ability: &str) -> bool {
        true
    }

    fn threat_table(&self, _npc: &EntityId) -> Vec<(EntityId, f64)> {
        Vec::new()
    }

    fn add_threat(&self, _npc: &EntityId, _source: &EntityId, _amount: f64) {}
}

pub struct Harness {
    agent: EntityId,
    world: NullWorld,
    combat: NullCombat,
    rng: SplitMix64,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            agent: EntityId::from("npc-under-test"),
            world: NullWorld,
            combat: NullCombat,
            rng: SplitMix64::new(seed),
        }
    }

    pub fn tick(&mut self, node: &mut dyn Node, bb: &mut Blackboard, now_ms: i64) -> Status {
        let mut ctx = TickContext {
            agent: &self.agent,
            now_ms,
            dt_seconds: 0.05,
            world: &self.world,
            combat: &self.combat,
            rng: &mut self.rng as &mut dyn DeterministicRng,
        };
        node.tick(&mut ctx, bb)
    }
}

/// Replays a status script (last entry repeats), counting activity.
pub struct Script {
    statuses: Vec<Status>,
    cursor: usize,
    pub ticks: std::rc::Rc<std::cell::Cell<usize>>,
    pub resets: std::rc::Rc<std::cell::Cell<usize>>,
}

impl Script {
    pub fn new(statuses: Vec<Status>) -> Self {
        Self {
            statuses,
            cursor: 0,
            ticks: Default::default(),
            resets: Default::default(),
        }
    }

    pub fn always(status: Status) -> Self {
        Self::new(vec![status])
    }

    /// Handles to the counters, for asserting after the node is boxed.
    pub fn counters(
        &self,
    ) -> (
        std::rc::Rc<std::cell::Cell<usize>>,
        std::rc::Rc<std::cell::Cell<usize>>,
    ) {
        (self.ticks.clone(), self.resets.clone())
    }
}

impl Node for Script {
    fn tick(&mut self, _ctx: &mut TickContext<'_>, _bb: &mut Blackboard) -> Status {
        self.ticks.set(self.ticks.get() + 1);
        let status = self.statuses[self.cursor.min(self.statuses.len() - 1)];
        self.cursor += 1;
        status
    }

    fn reset(&mut self) {
        self.resets.set(self.resets.get() + 1);
        self.cursor = 0;
    }
}
