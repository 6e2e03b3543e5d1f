//! The standard action leaves.
//!
//! Actions perform game effects by writing movement intents and combat
//! requests; they never mutate entity state directly. A missing
//! prerequisite (no target set, entity gone from the world, bad
//! configuration) is a `Failure`, never a panic. Multi-tick actions
//! keep their running state in the node and return `Running` until
//! their completion predicate holds.

use npc_bt::{Node, Status};
use npc_core::{keys, Blackboard, EntityId, Position, TickContext, Value};

/// How close counts as "arrived" for wander targets.
const WANDER_ARRIVAL: f64 = 0.5;
/// How close counts as "arrived" at a patrol waypoint.
const WAYPOINT_ARRIVAL: f64 = 1.0;

fn set_move_target(bb: &mut Blackboard, x: f64, z: f64) {
    bb.set(keys::MOVE_TARGET_X, x);
    bb.set(keys::MOVE_TARGET_Z, z);
}

fn clear_move_target(bb: &mut Blackboard) {
    bb.delete(keys::MOVE_TARGET_X);
    bb.delete(keys::MOVE_TARGET_Z);
}

/// Drift around the home position: pick a uniform point within the
/// wander radius, walk there, idle for a random wait, repeat.
///
/// Always `Running`; wandering only ends when a higher-priority branch
/// takes over and this leaf is reset.
pub struct Wander {
    radius: f64,
    min_wait_ms: i64,
    max_wait_ms: i64,
    target: Option<(f64, f64)>,
    wait_until: Option<i64>,
}

impl Wander {
    pub fn new(radius: f64, min_wait_ms: i64, max_wait_ms: i64) -> Self {
        Self {
            radius,
            min_wait_ms,
            max_wait_ms,
            target: None,
            wait_until: None,
        }
    }
}

impl Node for Wander {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        if self.radius < 0.0 {
            return Status::Failure;
        }
        let Some(home) = bb.get_pos(keys::HOME_POSITION) else {
            return Status::Failure;
        };

        if let Some(until) = self.wait_until {
            if ctx.now_ms < until {
                return Status::Running;
            }
            self.wait_until = None;
            self.target = None;
        }

        let (tx, tz) = match self.target {
            Some(t) => t,
            None => {
                let angle = ctx.rng.range_f64(0.0, std::f64::consts::TAU);
                let distance = ctx.rng.range_f64(0.0, self.radius);
                let t = (home.x + angle.cos() * distance, home.z + angle.sin() * distance);
                self.target = Some(t);
                set_move_target(bb, t.0, t.1);
                bb.set(keys::IS_WANDERING, true);
                t
            }
        };

        let Some(pos) = ctx.self_position() else {
            return Status::Failure;
        };

        let dx = tx - pos.x;
        let dz = tz - pos.z;
        if (dx * dx + dz * dz).sqrt() < WANDER_ARRIVAL {
            let wait = ctx
                .rng
                .range_f64(self.min_wait_ms as f64, self.max_wait_ms as f64)
                as i64;
            self.wait_until = Some(ctx.now_ms + wait.max(0));
            clear_move_target(bb);
            bb.set(keys::IS_WANDERING, false);
        }

        Status::Running
    }

    fn reset(&mut self) {
        self.target = None;
        self.wait_until = None;
    }
}

/// Close on the current target, refreshing the movement intent toward
/// it every tick.
///
/// Succeeds within `stop_distance` (XZ); fails when the target is gone
/// (clearing the stale key), the chaser is gone, or the chase timer
/// runs out.
pub struct ChaseTarget {
    stop_distance: f64,
    max_chase_ms: i64,
    started_at: Option<i64>,
}

impl ChaseTarget {
    pub fn new(stop_distance: f64, max_chase_ms: i64) -> Self {
        Self {
            stop_distance,
            max_chase_ms,
            started_at: None,
        }
    }
}

impl Node for ChaseTarget {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let Some(target) = bb.get_id(keys::CURRENT_TARGET) else {
            return Status::Failure;
        };

        let Some(target_pos) = ctx.world.position(&target) else {
            bb.delete(keys::CURRENT_TARGET);
            return Status::Failure;
        };

        let Some(pos) = ctx.self_position() else {
            return Status::Failure;
        };

        if pos.distance_xz(target_pos) <= self.stop_distance {
            self.reset();
            return Status::Success;
        }

        let started = *self.started_at.get_or_insert(ctx.now_ms);
        if self.max_chase_ms > 0 && ctx.now_ms - started > self.max_chase_ms {
            self.reset();
            return Status::Failure;
        }

        set_move_target(bb, target_pos.x, target_pos.z);
        bb.set(keys::LAST_SEEN_POSITION, target_pos);

        Status::Running
    }

    fn reset(&mut self) {
        self.started_at = None;
    }
}

/// Walk back to the spawn point with the evade flag raised.
///
/// On arrival the flag drops, the home position is refreshed to the
/// spawn, and the leaf succeeds.
pub struct ReturnToSpawn {
    arrival_threshold: f64,
}

impl ReturnToSpawn {
    pub fn new(arrival_threshold: f64) -> Self {
        Self { arrival_threshold }
    }
}

impl Node for ReturnToSpawn {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let Some(spawn) = bb.get_pos(keys::SPAWN_POSITION) else {
            return Status::Failure;
        };
        let Some(pos) = ctx.self_position() else {
            return Status::Failure;
        };

        if pos.distance_xz(spawn) <= self.arrival_threshold {
            bb.set(keys::IS_EVADING, false);
            bb.set(keys::HOME_POSITION, spawn);
            return Status::Success;
        }

        set_move_target(bb, spawn.x, spawn.z);
        bb.set(keys::IS_EVADING, true);

        Status::Running
    }

    fn reset(&mut self) {}
}

/// Walk a waypoint route, pausing at each stop.
///
/// Looping patrols never succeed; one-shot patrols succeed after the
/// final waypoint. An empty route is a configuration failure.
pub struct Patrol {
    waypoints: Vec<Position>,
    wait_ms: i64,
    looping: bool,
    index: usize,
    wait_until: Option<i64>,
}

impl Patrol {
    pub fn new(waypoints: Vec<Position>, wait_ms: i64, looping: bool) -> Self {
        Self {
            waypoints,
            wait_ms,
            looping,
            index: 0,
            wait_until: None,
        }
    }
}

impl Node for Patrol {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        if self.waypoints.is_empty() {
            return Status::Failure;
        }

        if let Some(until) = self.wait_until {
            if ctx.now_ms < until {
                return Status::Running;
            }
            self.wait_until = None;
            self.index += 1;

            if self.index >= self.waypoints.len() {
                if self.looping {
                    self.index = 0;
                } else {
                    bb.set(keys::IS_PATROLLING, false);
                    self.reset();
                    return Status::Success;
                }
            }
        }

        let waypoint = self.waypoints[self.index];

        let Some(pos) = ctx.self_position() else {
            return Status::Failure;
        };

        if pos.distance_xz(waypoint) < WAYPOINT_ARRIVAL {
            self.wait_until = Some(ctx.now_ms + self.wait_ms);
            return Status::Running;
        }

        set_move_target(bb, waypoint.x, waypoint.z);
        bb.set(keys::IS_PATROLLING, true);
        bb.set(keys::CURRENT_WAYPOINT, self.index as i64);

        Status::Running
    }

    fn reset(&mut self) {
        self.index = 0;
        self.wait_until = None;
    }
}

/// Cast an ability on the current target through the combat interface.
///
/// `Running` while the internal cooldown is hot. Succeeds only when the
/// resolver accepts the cast, which also stamps `last_ability_*`; every
/// precondition miss (no target, out of range, rejected cast) fails
/// without touching the cooldown.
pub struct AttackTarget {
    ability: String,
    range: f64,
    cooldown_ms: i64,
    last_attack_ms: Option<i64>,
}

impl AttackTarget {
    pub fn new(ability: impl Into<String>, range: f64, cooldown_ms: i64) -> Self {
        Self {
            ability: ability.into(),
            range,
            cooldown_ms,
            last_attack_ms: None,
        }
    }
}

impl Node for AttackTarget {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        if let Some(last) = self.last_attack_ms {
            if ctx.now_ms - last < self.cooldown_ms {
                return Status::Running;
            }
        }

        let Some(target) = bb.get_id(keys::CURRENT_TARGET) else {
            return Status::Failure;
        };
        let Some(pos) = ctx.self_position() else {
            return Status::Failure;
        };
        let Some(target_pos) = ctx.world.position(&target) else {
            bb.delete(keys::CURRENT_TARGET);
            return Status::Failure;
        };

        if pos.distance(target_pos) > self.range {
            return Status::Failure;
        }

        if ctx.combat.execute_ability(ctx.agent, &target, &self.ability) {
            self.last_attack_ms = Some(ctx.now_ms);
            bb.set(keys::LAST_ABILITY_USED, self.ability.as_str());
            bb.set(keys::LAST_ABILITY_TIME, ctx.now_ms);
            Status::Success
        } else {
            Status::Failure
        }
    }

    fn reset(&mut self) {
        // The attack cooldown survives branch switches.
    }
}

/// Pick the highest-threat entry off the ledger as the current target.
pub struct SelectTarget;

impl SelectTarget {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SelectTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for SelectTarget {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let threats = ctx.combat.threat_table(ctx.agent);

        let mut best: Option<(EntityId, f64)> = None;
        for (id, value) in threats {
            let better = match &best {
                Some((best_id, best_value)) => {
                    value > *best_value || (value == *best_value && id < *best_id)
                }
                None => true,
            };
            if better {
                best = Some((id, value));
            }
        }

        match best {
            Some((id, _)) => {
                bb.set(keys::CURRENT_TARGET, &id);
                bb.set(keys::HIGHEST_THREAT, &id);
                Status::Success
            }
            None => Status::Failure,
        }
    }

    fn reset(&mut self) {}
}

/// Drop the target keys and leave combat. Always succeeds.
pub struct ClearTarget;

impl ClearTarget {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClearTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for ClearTarget {
    fn tick(&mut self, _ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        bb.delete(keys::CURRENT_TARGET);
        bb.delete(keys::HIGHEST_THREAT);
        bb.set(keys::IS_IN_COMBAT, false);
        Status::Success
    }

    fn reset(&mut self) {}
}

/// Run directly away from the current target.
///
/// The intent is projected `flee_distance` along the away vector and
/// refreshed every tick; the leaf only succeeds once the target
/// disappears from the world.
pub struct Flee {
    flee_distance: f64,
}

impl Flee {
    pub fn new(flee_distance: f64) -> Self {
        Self { flee_distance }
    }
}

impl Node for Flee {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let Some(target) = bb.get_id(keys::CURRENT_TARGET) else {
            return Status::Failure;
        };
        let Some(pos) = ctx.self_position() else {
            return Status::Failure;
        };
        let Some(target_pos) = ctx.world.position(&target) else {
            // Nothing left to run from.
            bb.set(keys::IS_FLEEING, false);
            return Status::Success;
        };

        let mut dx = pos.x - target_pos.x;
        let mut dz = pos.z - target_pos.z;
        let mut dist = (dx * dx + dz * dz).sqrt();
        if dist < 1e-3 {
            // On top of each other: any direction will do.
            dx = 1.0;
            dz = 0.0;
            dist = 1.0;
        }

        set_move_target(
            bb,
            pos.x + (dx / dist) * self.flee_distance,
            pos.z + (dz / dist) * self.flee_distance,
        );
        bb.set(keys::IS_FLEEING, true);

        Status::Running
    }

    fn reset(&mut self) {}
}

/// Record a call for help: the target and every nearby ally id land on
/// the blackboard for the assistance system to fan out.
///
/// Always succeeds. The shout is best-effort: with no target on the
/// board the target key is left alone, and with no world position the
/// ally list comes up empty.
pub struct CallForHelp {
    radius: f64,
}

impl CallForHelp {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Node for CallForHelp {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let allies: Vec<String> = match ctx.self_position() {
            Some(pos) => ctx
                .world
                .entities_in_radius(pos, self.radius)
                .into_iter()
                .filter(|id| id != ctx.agent)
                .map(|id| id.as_str().to_owned())
                .collect(),
            None => Vec::new(),
        };

        if let Some(target) = bb.get_id(keys::CURRENT_TARGET) {
            bb.set(keys::CALL_FOR_HELP_TARGET, &target);
        }
        bb.set(keys::CALL_FOR_HELP_ALLIES, Value::StrList(allies));

        Status::Success
    }

    fn reset(&mut self) {}
}
