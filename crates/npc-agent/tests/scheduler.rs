//! Scheduler behavior: update budget round-robin, activation
//! hysteresis, and configuration validation.

mod common;

use common::{TestCombat, TestWorld};
use npc_agent::{NpcTemplate, Scheduler, SchedulerConfig};
use npc_core::{ConfigError, EntityId, Position};

const DT: f64 = 0.05;

fn populate(scheduler: &mut Scheduler, world: &mut TestWorld, count: usize) -> Vec<EntityId> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let name = format!("npc-{i:03}");
        // Spread agents out so they never perceive each other.
        let pos = Position::new(i as f64 * 1000.0, 0.0, 0.0);
        world.put_npc(&name, npc_core::Faction::Hostile, pos);

        let id = EntityId::from(name.as_str());
        scheduler.register(id.clone(), NpcTemplate::passive_animal(name.as_str(), 1), pos);
        ids.push(id);
    }
    ids
}

#[test]
fn budget_round_robins_through_the_whole_population() {
    let mut scheduler = Scheduler::new(SchedulerConfig {
        max_updates_per_tick: 100,
        ..SchedulerConfig::default()
    })
    .unwrap();

    let mut world = TestWorld::new();
    let ids = populate(&mut scheduler, &mut world, 300);
    let combat = TestCombat::new(scheduler.threat_manager().clone());

    // Three throttled ticks cover all 300 agents exactly once each,
    // in registration order.
    for (tick, now) in [0i64, 50, 100].into_iter().enumerate() {
        scheduler.update(now, DT, &world, &combat);

        for (index, id) in ids.iter().enumerate() {
            let agent = scheduler.get(id).unwrap();
            let expected = if index / 100 <= tick {
                (index / 100) as i64 * 50
            } else {
                0
            };
            let updated = agent.last_update_ms();
            if index / 100 == tick {
                assert_eq!(
                    updated, expected,
                    "agent {index} should tick on scheduler pass {tick}"
                );
            }
        }
    }

    // Every agent ran exactly once, stamped with the pass it ran in.
    for (index, id) in ids.iter().enumerate() {
        let expected = (index / 100) as i64 * 50;
        assert_eq!(scheduler.get(id).unwrap().last_update_ms(), expected);
    }

    // The cursor wrapped: the fourth tick starts over at the front.
    scheduler.update(150, DT, &world, &combat);
    assert_eq!(scheduler.get(&ids[0]).unwrap().last_update_ms(), 150);
    assert_eq!(scheduler.get(&ids[100]).unwrap().last_update_ms(), 50);
}

#[test]
fn activation_hysteresis_holds_state_between_the_bands() {
    let mut scheduler = Scheduler::new(SchedulerConfig::default()).unwrap();

    let mut world = TestWorld::new();
    let npc = EntityId::from("npc-1");
    world.put_npc(
        "npc-1",
        npc_core::Faction::Hostile,
        Position::new(0.0, 0.0, 0.0),
    );
    scheduler.register(
        npc.clone(),
        NpcTemplate::aggressive_monster("gnarl", 5),
        Position::new(0.0, 0.0, 0.0),
    );
    let combat = TestCombat::new(scheduler.threat_manager().clone());

    // In the dead band [wake=60, sleep=80]: an active agent stays active.
    world.put_player("player-1", Position::new(70.0, 0.0, 0.0));
    scheduler.update(0, DT, &world, &combat);
    scheduler.update(1000, DT, &world, &combat);
    assert!(!scheduler.get(&npc).unwrap().is_sleeping());

    // Past the sleep band: the agent parks.
    world.move_to("player-1", Position::new(95.0, 0.0, 0.0));
    scheduler.update(2000, DT, &world, &combat);
    assert!(scheduler.get(&npc).unwrap().is_sleeping());
    assert_eq!(scheduler.stats().sleeping, 1);

    // Back into the dead band: still asleep. No flapping inside the
    // hysteresis gap.
    world.move_to("player-1", Position::new(70.0, 0.0, 0.0));
    scheduler.update(3000, DT, &world, &combat);
    assert!(scheduler.get(&npc).unwrap().is_sleeping());

    // Inside the wake band: back to work.
    world.move_to("player-1", Position::new(50.0, 0.0, 0.0));
    scheduler.update(4000, DT, &world, &combat);
    assert!(!scheduler.get(&npc).unwrap().is_sleeping());
    assert_eq!(scheduler.stats().active, 1);
}

#[test]
fn sleeping_agents_are_not_ticked() {
    let mut scheduler = Scheduler::new(SchedulerConfig::default()).unwrap();

    let mut world = TestWorld::new();
    let npc = EntityId::from("npc-1");
    world.put_npc(
        "npc-1",
        npc_core::Faction::Hostile,
        Position::new(0.0, 0.0, 0.0),
    );
    scheduler.register(
        npc.clone(),
        NpcTemplate::aggressive_monster("gnarl", 5),
        Position::new(0.0, 0.0, 0.0),
    );
    let combat = TestCombat::new(scheduler.threat_manager().clone());

    scheduler.get_mut(&npc).unwrap().sleep();
    scheduler.update(100, DT, &world, &combat);
    assert_eq!(
        scheduler.get(&npc).unwrap().last_update_ms(),
        0,
        "a sleeping agent must be skipped"
    );

    scheduler.get_mut(&npc).unwrap().wake();
    scheduler.update(150, DT, &world, &combat);
    assert_eq!(scheduler.get(&npc).unwrap().last_update_ms(), 150);
}

#[test]
fn unregister_drops_the_agent_and_its_ledger() {
    let mut scheduler = Scheduler::new(SchedulerConfig::default()).unwrap();
    let npc = EntityId::from("npc-1");

    scheduler.register(
        npc.clone(),
        NpcTemplate::aggressive_monster("gnarl", 5),
        Position::new(0.0, 0.0, 0.0),
    );
    scheduler
        .threat_manager()
        .add_threat(&npc, &EntityId::from("p1"), 10.0);

    scheduler.unregister(&npc);
    assert!(scheduler.get(&npc).is_none());
    assert!(scheduler.threat_manager().table(&npc).is_none());
    assert!(scheduler.is_empty());

    // Unregistering twice is harmless.
    scheduler.unregister(&npc);
}

#[test]
fn config_bands_must_nest() {
    let bad_bands = SchedulerConfig {
        wake_distance: 80.0,
        sleep_distance: 80.0,
        ..SchedulerConfig::default()
    };
    assert!(matches!(
        bad_bands.validate(),
        Err(ConfigError::ActivationBands { .. })
    ));

    let sleep_too_far = SchedulerConfig {
        sleep_distance: 120.0,
        max_active_distance: 100.0,
        wake_distance: 60.0,
        ..SchedulerConfig::default()
    };
    assert!(matches!(
        sleep_too_far.validate(),
        Err(ConfigError::SleepBeyondActive { .. })
    ));

    let negative = SchedulerConfig {
        wake_distance: -1.0,
        ..SchedulerConfig::default()
    };
    assert!(matches!(
        negative.validate(),
        Err(ConfigError::NegativeDistance { .. })
    ));

    assert!(SchedulerConfig::default().validate().is_ok());
    assert!(Scheduler::new(bad_bands).is_err());
}
