//! Behavior tree builders, one per NPC kind.
//!
//! Builders are pure functions from a template to a tree. Branch order
//! inside each root selector is the priority order: evading beats
//! fighting beats seeking beats wandering. Entering evade always drops
//! the combat flag in the same tick, so at most one of the dominant
//! state flags survives a completed traversal.

use npc_bt::{Cooldown, Failer, Inverter, Node, ReactiveSelector, ReactiveSequence, SetValue};
use npc_core::{keys, Blackboard, TickContext, Value};

use crate::actions::{
    AttackTarget, CallForHelp, ChaseTarget, ClearTarget, Flee, ReturnToSpawn, SelectTarget, Wander,
};
use crate::conditions::{
    HasAggroTarget, HasThreat, IsEvading, LowHealth, PlayerDetected, RandomChance, TargetInRange,
    TooFarFromHome,
};
use crate::template::{NpcKind, NpcTemplate};

const SPAWN_ARRIVAL: f64 = 1.0;
const PASSIVE_FLEE_DISTANCE: f64 = 30.0;
const NEUTRAL_FLEE_DISTANCE: f64 = 20.0;
const CALL_FOR_HELP_COOLDOWN_MS: i64 = 10_000;
const ENRAGE_HEALTH: f64 = 0.3;
const ENRAGE_COOLDOWN_MS: i64 = 60_000;
const SPECIAL_ATTACK_CHANCE: f64 = 0.2;
const SPECIAL_ATTACK_COOLDOWN_MS: i64 = 5_000;

/// The tree for a template's kind. Unknown combinations get the
/// neutral tree, the safest default.
pub fn build_tree(template: &NpcTemplate) -> Box<dyn Node> {
    match template.kind {
        NpcKind::Passive => passive_tree(template),
        NpcKind::Neutral => neutral_tree(template),
        NpcKind::Aggressive => aggressive_tree(template),
        NpcKind::Elite | NpcKind::Boss => elite_tree(template),
    }
}

/// Raise the evade flag and leave combat in the same breath.
fn start_evading() -> Box<dyn Node> {
    Box::new(ReactiveSequence::new(vec![
        Box::new(SetValue::new(keys::IS_EVADING, |_: &TickContext, _: &Blackboard| {
            Value::Bool(true)
        })),
        Box::new(SetValue::new(keys::IS_IN_COMBAT, |_: &TickContext, _: &Blackboard| {
            Value::Bool(false)
        })),
    ]))
}

fn wander(template: &NpcTemplate) -> Box<dyn Node> {
    Box::new(Wander::new(
        template.behavior.wander_radius,
        template.behavior.wander_min_wait_ms,
        template.behavior.wander_max_wait_ms,
    ))
}

/// Flee from danger, go home if strayed, otherwise wander.
pub fn passive_tree(template: &NpcTemplate) -> Box<dyn Node> {
    Box::new(ReactiveSelector::new(vec![
        Box::new(ReactiveSequence::new(vec![
            Box::new(HasThreat::new()),
            Box::new(Flee::new(PASSIVE_FLEE_DISTANCE)),
        ])),
        Box::new(ReactiveSequence::new(vec![
            Box::new(TooFarFromHome::new(template.behavior.leash_radius)),
            Box::new(ReturnToSpawn::new(SPAWN_ARRIVAL)),
        ])),
        wander(template),
    ]))
}

/// Evade, flee at low health, defend itself, otherwise wander.
pub fn neutral_tree(template: &NpcTemplate) -> Box<dyn Node> {
    let defend = Box::new(ReactiveSequence::new(vec![
        Box::new(HasThreat::new()),
        Box::new(ReactiveSelector::new(vec![
            // Attack when the top threat is in reach.
            Box::new(ReactiveSequence::new(vec![
                Box::new(SelectTarget::new()),
                Box::new(TargetInRange::new(template.combat.attack_range)),
                Box::new(AttackTarget::new(
                    template.combat.default_ability.clone(),
                    template.combat.attack_range,
                    template.stats.attack_speed_ms,
                )),
            ])),
            // Chase while still inside the leash.
            Box::new(ReactiveSequence::new(vec![
                Box::new(SelectTarget::new()),
                Box::new(Inverter::new(Box::new(TooFarFromHome::new(
                    template.behavior.leash_radius,
                )))),
                Box::new(ChaseTarget::new(
                    template.combat.attack_range,
                    template.behavior.chase_max_time_ms,
                )),
            ])),
            // Chased past the leash: give up and head home.
            Box::new(ReactiveSequence::new(vec![
                Box::new(TooFarFromHome::new(template.behavior.leash_radius)),
                Box::new(ClearTarget::new()),
                start_evading(),
            ])),
        ])),
    ]));

    Box::new(ReactiveSelector::new(vec![
        Box::new(ReactiveSequence::new(vec![
            Box::new(IsEvading::new()),
            Box::new(ReturnToSpawn::new(SPAWN_ARRIVAL)),
        ])),
        Box::new(ReactiveSequence::new(vec![
            Box::new(LowHealth::new(template.behavior.flee_at_health)),
            Box::new(Flee::new(NEUTRAL_FLEE_DISTANCE)),
        ])),
        defend,
        wander(template),
    ]))
}

/// Evade, fight the aggro target, seek new prey, otherwise wander.
pub fn aggressive_tree(template: &NpcTemplate) -> Box<dyn Node> {
    Box::new(ReactiveSelector::new(vec![
        evade_branch(),
        combat_branch(template, Vec::new()),
        seek_branch(template),
        wander(template),
    ]))
}

/// The aggressive tree plus an enrage at low health and an occasional
/// special attack.
pub fn elite_tree(template: &NpcTemplate) -> Box<dyn Node> {
    let mut specials: Vec<Box<dyn Node>> = Vec::new();

    if template.combat.has_ability("enrage") {
        specials.push(Box::new(ReactiveSequence::new(vec![
            Box::new(LowHealth::new(ENRAGE_HEALTH)),
            Box::new(Cooldown::new(
                // Enrage is self-targeted; range is irrelevant but the
                // cast still goes through the combat resolver.
                Box::new(AttackTarget::new(
                    "enrage",
                    f64::MAX,
                    ENRAGE_COOLDOWN_MS,
                )),
                ENRAGE_COOLDOWN_MS,
            )),
        ])));
    }

    specials.push(Box::new(ReactiveSequence::new(vec![
        Box::new(RandomChance::new(SPECIAL_ATTACK_CHANCE)),
        Box::new(TargetInRange::new(template.combat.attack_range)),
        Box::new(AttackTarget::new(
            "power_attack",
            template.combat.attack_range,
            SPECIAL_ATTACK_COOLDOWN_MS,
        )),
    ])));

    Box::new(ReactiveSelector::new(vec![
        evade_branch(),
        combat_branch(template, specials),
        seek_branch(template),
        wander(template),
    ]))
}

/// Priority 1: once evading, clear the target and walk home.
fn evade_branch() -> Box<dyn Node> {
    Box::new(ReactiveSequence::new(vec![
        Box::new(IsEvading::new()),
        Box::new(ClearTarget::new()),
        Box::new(ReturnToSpawn::new(SPAWN_ARRIVAL)),
    ]))
}

/// Priority 2: fight the current aggro target. `specials` slot in
/// between the leash check and the normal attack.
fn combat_branch(template: &NpcTemplate, specials: Vec<Box<dyn Node>>) -> Box<dyn Node> {
    let mut decisions: Vec<Box<dyn Node>> = vec![
        // Dragged past the leash: flag the evade, handled next tick.
        Box::new(ReactiveSequence::new(vec![
            Box::new(TooFarFromHome::new(template.behavior.leash_radius)),
            start_evading(),
        ])),
    ];

    if template.behavior.call_for_help {
        // The call is a side effect, not a decision: the Failer keeps
        // the selector moving to an actual attack in the same tick.
        decisions.push(Box::new(Failer::new(Box::new(Cooldown::new(
            Box::new(CallForHelp::new(template.behavior.call_radius)),
            CALL_FOR_HELP_COOLDOWN_MS,
        )))));
    }

    decisions.extend(specials);

    decisions.push(Box::new(ReactiveSequence::new(vec![
        Box::new(TargetInRange::new(template.combat.attack_range)),
        Box::new(AttackTarget::new(
            template.combat.default_ability.clone(),
            template.combat.attack_range,
            template.stats.attack_speed_ms,
        )),
    ])));

    decisions.push(Box::new(ChaseTarget::new(
        template.combat.attack_range * 0.8,
        template.behavior.chase_max_time_ms,
    )));

    Box::new(ReactiveSequence::new(vec![
        Box::new(HasAggroTarget::new()),
        Box::new(ReactiveSelector::new(decisions)),
    ]))
}

/// Priority 3: look for prey inside the aggro radius and open combat.
fn seek_branch(template: &NpcTemplate) -> Box<dyn Node> {
    Box::new(ReactiveSequence::new(vec![
        Box::new(PlayerDetected::new(template.perception.aggro_radius)),
        Box::new(SelectTarget::new()),
        Box::new(SetValue::new(keys::IS_IN_COMBAT, |_: &TickContext, _: &Blackboard| {
            Value::Bool(true)
        })),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_gets_a_tree() {
        for template in [
            NpcTemplate::passive_animal("deer", 1),
            NpcTemplate::neutral_humanoid("merchant", 5),
            NpcTemplate::aggressive_monster("wolf", 5),
            NpcTemplate::elite_monster("alpha", 10),
            NpcTemplate::boss_monster("dragon", 60),
        ] {
            let _tree = build_tree(&template);
        }
    }
}
