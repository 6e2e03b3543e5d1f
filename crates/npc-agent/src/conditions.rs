//! The standard condition leaves.
//!
//! Conditions are instant: they never return `Running` and never hold
//! state across ticks (the one exception being `HasAggroTarget`'s
//! opportunistic cleanup of a stale target key). World query misses
//! read as `Failure`.

use npc_bt::{Node, Status};
use npc_core::{keys, Blackboard, EntityDescriptor, EntityKind, TickContext, Value};

fn status(ok: bool) -> Status {
    if ok {
        Status::Success
    } else {
        Status::Failure
    }
}

/// Is the current target within `range` (full 3D distance)?
pub struct TargetInRange {
    range: f64,
}

impl TargetInRange {
    pub fn new(range: f64) -> Self {
        Self { range }
    }
}

impl Node for TargetInRange {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let Some(target) = bb.get_id(keys::CURRENT_TARGET) else {
            return Status::Failure;
        };
        let (Some(pos), Some(target_pos)) = (ctx.self_position(), ctx.world.position(&target))
        else {
            return Status::Failure;
        };
        status(pos.distance(target_pos) <= self.range)
    }

    fn reset(&mut self) {}
}

/// Is a target set and still resolvable through the world?
///
/// A target that no longer exists is cleared on the spot so later
/// branches see a clean slate.
pub struct HasAggroTarget;

impl HasAggroTarget {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HasAggroTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for HasAggroTarget {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let Some(target) = bb.get_id(keys::CURRENT_TARGET) else {
            return Status::Failure;
        };
        if ctx.world.position(&target).is_none() {
            bb.delete(keys::CURRENT_TARGET);
            return Status::Failure;
        }
        Status::Success
    }

    fn reset(&mut self) {}
}

/// Is any entity passing the filter within the detection radius?
/// Matching ids are published to `detected_entities`.
///
/// The default filter matches players; callers with other prey swap it.
pub struct PlayerDetected {
    radius: f64,
    filter: Box<dyn FnMut(&EntityDescriptor) -> bool>,
}

impl PlayerDetected {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            filter: Box::new(|d| d.kind == EntityKind::Player),
        }
    }

    pub fn with_filter(
        radius: f64,
        filter: impl FnMut(&EntityDescriptor) -> bool + 'static,
    ) -> Self {
        Self {
            radius,
            filter: Box::new(filter),
        }
    }
}

impl Node for PlayerDetected {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        if self.radius <= 0.0 {
            return Status::Failure;
        }
        let Some(pos) = ctx.self_position() else {
            return Status::Failure;
        };

        let mut detected = Vec::new();
        for id in ctx.world.entities_in_radius(pos, self.radius) {
            if &id == ctx.agent {
                continue;
            }
            let Some(descriptor) = ctx.world.descriptor(&id) else {
                continue;
            };
            if (self.filter)(&descriptor) {
                detected.push(id.as_str().to_owned());
            }
        }

        if detected.is_empty() {
            return Status::Failure;
        }
        bb.set(keys::DETECTED_ENTITIES, Value::StrList(detected));
        Status::Success
    }

    fn reset(&mut self) {}
}

/// Is a non-empty target key set at all?
pub struct TargetExists;

impl TargetExists {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TargetExists {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for TargetExists {
    fn tick(&mut self, _ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        status(bb.get_id(keys::CURRENT_TARGET).is_some())
    }

    fn reset(&mut self) {}
}

/// Does the current target still draw breath?
pub struct TargetIsAlive;

impl TargetIsAlive {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TargetIsAlive {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for TargetIsAlive {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let Some(target) = bb.get_id(keys::CURRENT_TARGET) else {
            return Status::Failure;
        };
        match ctx.world.descriptor(&target) {
            Some(descriptor) => status(descriptor.health > 0.0),
            None => Status::Failure,
        }
    }

    fn reset(&mut self) {}
}

/// Is own health at or below the threshold? Unknown health fails:
/// never flee on missing data.
pub struct LowHealth {
    threshold: f64,
}

impl LowHealth {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Node for LowHealth {
    fn tick(&mut self, _ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        match bb.get_float(keys::HEALTH_PERCENT) {
            Some(health) => status(health <= self.threshold),
            None => Status::Failure,
        }
    }

    fn reset(&mut self) {}
}

/// Is own health above the threshold? Unknown health succeeds:
/// assume full until told otherwise.
pub struct HealthAbove {
    threshold: f64,
}

impl HealthAbove {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Node for HealthAbove {
    fn tick(&mut self, _ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        match bb.get_float(keys::HEALTH_PERCENT) {
            Some(health) => status(health > self.threshold),
            None => Status::Success,
        }
    }

    fn reset(&mut self) {}
}

/// The `is_in_combat` flag.
pub struct IsInCombat;

impl IsInCombat {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IsInCombat {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for IsInCombat {
    fn tick(&mut self, _ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        status(bb.flag(keys::IS_IN_COMBAT))
    }

    fn reset(&mut self) {}
}

/// The `is_evading` flag.
pub struct IsEvading;

impl IsEvading {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IsEvading {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for IsEvading {
    fn tick(&mut self, _ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        status(bb.flag(keys::IS_EVADING))
    }

    fn reset(&mut self) {}
}

/// Has the NPC strayed beyond `max_distance` (XZ) from home?
pub struct TooFarFromHome {
    max_distance: f64,
}

impl TooFarFromHome {
    pub fn new(max_distance: f64) -> Self {
        Self { max_distance }
    }
}

impl Node for TooFarFromHome {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let Some(home) = bb.get_pos(keys::HOME_POSITION) else {
            return Status::Failure;
        };
        let Some(pos) = ctx.self_position() else {
            return Status::Failure;
        };
        status(pos.distance_xz(home) > self.max_distance)
    }

    fn reset(&mut self) {}
}

/// Is the NPC within `threshold` (XZ) of home?
pub struct AtHome {
    threshold: f64,
}

impl AtHome {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Node for AtHome {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let Some(home) = bb.get_pos(keys::HOME_POSITION) else {
            return Status::Failure;
        };
        let Some(pos) = ctx.self_position() else {
            return Status::Failure;
        };
        status(pos.distance_xz(home) <= self.threshold)
    }

    fn reset(&mut self) {}
}

/// Is the ability off cooldown, judged by the `last_ability_*` keys?
/// An ability that was never used is ready.
pub struct AbilityReady {
    ability: String,
    cooldown_ms: i64,
}

impl AbilityReady {
    pub fn new(ability: impl Into<String>, cooldown_ms: i64) -> Self {
        Self {
            ability: ability.into(),
            cooldown_ms,
        }
    }
}

impl Node for AbilityReady {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        match bb.get_str(keys::LAST_ABILITY_USED) {
            Some(last) if last == self.ability => {}
            // A different ability, or none at all, leaves this one ready.
            _ => return Status::Success,
        }

        match bb.get_int(keys::LAST_ABILITY_TIME) {
            Some(at) => status(ctx.now_ms - at >= self.cooldown_ms),
            None => Status::Success,
        }
    }

    fn reset(&mut self) {}
}

/// Does the threat ledger hold any entry?
pub struct HasThreat;

impl HasThreat {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HasThreat {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for HasThreat {
    fn tick(&mut self, ctx: &mut TickContext<'_>, _bb: &mut Blackboard) -> Status {
        status(!ctx.combat.threat_table(ctx.agent).is_empty())
    }

    fn reset(&mut self) {}
}

/// Does total ledger threat exceed the threshold?
pub struct ThreatAbove {
    threshold: f64,
}

impl ThreatAbove {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Node for ThreatAbove {
    fn tick(&mut self, ctx: &mut TickContext<'_>, _bb: &mut Blackboard) -> Status {
        let total: f64 = ctx
            .combat
            .threat_table(ctx.agent)
            .iter()
            .map(|(_, value)| value)
            .sum();
        status(total > self.threshold)
    }

    fn reset(&mut self) {}
}

/// Bernoulli draw against the injected RNG.
pub struct RandomChance {
    chance: f64,
}

impl RandomChance {
    pub fn new(chance: f64) -> Self {
        Self { chance }
    }
}

impl Node for RandomChance {
    fn tick(&mut self, ctx: &mut TickContext<'_>, _bb: &mut Blackboard) -> Status {
        status(ctx.rng.chance(self.chance))
    }

    fn reset(&mut self) {}
}

/// Has at least `min_ms` passed since the timestamp under `key`?
/// No timestamp means it never happened, which counts as "long enough".
pub struct TimeSince {
    key: &'static str,
    min_ms: i64,
}

impl TimeSince {
    pub fn new(key: &'static str, min_ms: i64) -> Self {
        Self { key, min_ms }
    }
}

impl Node for TimeSince {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        match bb.get_int(self.key) {
            Some(at) => status(ctx.now_ms - at >= self.min_ms),
            None => Status::Success,
        }
    }

    fn reset(&mut self) {}
}
