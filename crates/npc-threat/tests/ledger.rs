use npc_core::EntityId;
use npc_threat::{multipliers, ThreatManager, ThreatTable};

fn id(s: &str) -> EntityId {
    EntityId::from(s)
}

#[test]
fn add_is_monotonic_and_clamps_negative_amounts() {
    let mut table = ThreatTable::new(id("npc"));

    assert_eq!(table.add(&id("a"), 10.0), 10.0);
    assert_eq!(table.add(&id("a"), 5.0), 15.0);

    // Negative amounts never decrease a total.
    let before = table.get(&id("a"));
    assert_eq!(table.add(&id("a"), -100.0), before);
}

#[test]
fn set_at_or_below_zero_deletes() {
    let mut table = ThreatTable::new(id("npc"));
    table.set(&id("a"), 50.0);
    assert_eq!(table.get(&id("a")), 50.0);

    table.set(&id("a"), 0.0);
    assert!(table.is_empty());
    assert_eq!(table.get(&id("a")), 0.0);
}

#[test]
fn highest_breaks_ties_toward_the_smaller_id() {
    let mut table = ThreatTable::new(id("npc"));
    table.set(&id("zed"), 100.0);
    table.set(&id("abe"), 100.0);
    table.set(&id("mid"), 40.0);

    let top = table.highest().unwrap();
    assert_eq!(top.id, id("abe"));
    assert_eq!(top.value, 100.0);
}

#[test]
fn highest_of_empty_ledger_is_none() {
    let table = ThreatTable::new(id("npc"));
    assert!(table.highest().is_none());
}

#[test]
fn sorted_is_descending_by_value_then_ascending_by_id() {
    let mut table = ThreatTable::new(id("npc"));
    table.set(&id("c"), 10.0);
    table.set(&id("a"), 30.0);
    table.set(&id("d"), 30.0);
    table.set(&id("b"), 20.0);

    let sorted = table.sorted();
    let ids: Vec<&str> = sorted.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "d", "b", "c"]);
}

#[test]
fn decay_never_increases_and_drops_sub_unit_entries() {
    let mut table = ThreatTable::new(id("npc"));
    table.set(&id("a"), 100.0);
    table.set(&id("b"), 1.5);

    table.decay(0.5);
    assert_eq!(table.get(&id("a")), 50.0);
    // 0.75 fell below the floor and was dropped.
    assert_eq!(table.get(&id("b")), 0.0);
    assert_eq!(table.len(), 1);

    table.decay(0.0);
    assert_eq!(table.get(&id("a")), 50.0);
}

#[test]
fn modifier_scales_only_existing_entries() {
    let mut table = ThreatTable::new(id("npc"));
    table.set(&id("a"), 10.0);

    table.modifier(&id("a"), 2.0);
    assert_eq!(table.get(&id("a")), 20.0);

    // No entry, no effect.
    table.modifier(&id("ghost"), 2.0);
    assert_eq!(table.len(), 1);

    table.modifier(&id("a"), 0.0);
    assert!(table.is_empty());
}

#[test]
fn full_transfer_round_trips() {
    let mut table = ThreatTable::new(id("npc"));
    table.set(&id("a"), 120.0);
    let original = table.snapshot();

    table.transfer(&id("a"), &id("b"), 1.0);
    // The donor entry is dropped once empty, not left at zero.
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(&id("b")), 120.0);

    table.transfer(&id("b"), &id("a"), 1.0);
    assert_eq!(table.snapshot(), original);
}

#[test]
fn partial_transfer_moves_exactly_the_fraction() {
    let mut table = ThreatTable::new(id("npc"));
    table.set(&id("a"), 100.0);

    table.transfer(&id("a"), &id("b"), 0.25);
    assert_eq!(table.get(&id("a")), 75.0);
    assert_eq!(table.get(&id("b")), 25.0);
}

#[test]
fn taunt_pins_above_the_current_leader() {
    let mut table = ThreatTable::new(id("npc"));
    table.set(&id("dps"), 200.0);

    let top = table.highest().unwrap().value;
    table.taunt(&id("tank"), top);

    assert_eq!(table.get(&id("tank")), 220.0);
    assert_eq!(table.highest().unwrap().id, id("tank"));
}

#[test]
fn aggro_multiplier_matches_pull_threat() {
    assert_eq!(multipliers::AGGRO, 100.0);
    assert_eq!(npc_threat::damage_threat(40.0, 1.5), 60.0);
    assert_eq!(npc_threat::healing_threat(40.0, 1.0), 20.0);
}

#[test]
fn manager_indexes_ledgers_by_npc() {
    let manager = ThreatManager::new();

    manager.add_threat(&id("npc-1"), &id("p1"), 50.0);
    manager.add_threat(&id("npc-2"), &id("p1"), 10.0);
    manager.add_threat(&id("npc-1"), &id("p2"), 70.0);

    let snap = manager.snapshot(&id("npc-1"));
    assert_eq!(snap.len(), 2);
    assert_eq!(manager.snapshot(&id("missing")), Vec::new());

    manager.remove_table(&id("npc-2"));
    assert!(manager.table(&id("npc-2")).is_none());
}

#[test]
fn removing_an_entity_sweeps_every_ledger() {
    let manager = ThreatManager::new();
    manager.add_threat(&id("npc-1"), &id("p1"), 50.0);
    manager.add_threat(&id("npc-2"), &id("p1"), 10.0);
    manager.add_threat(&id("npc-2"), &id("p2"), 10.0);

    manager.remove_entity_from_all(&id("p1"));

    assert!(manager.snapshot(&id("npc-1")).is_empty());
    assert_eq!(manager.snapshot(&id("npc-2")).len(), 1);
}

#[test]
fn shared_handles_see_each_others_writes() {
    let manager = ThreatManager::new();
    let handle = manager.get_or_create(&id("npc-1"));

    manager.add_threat(&id("npc-1"), &id("p1"), 42.0);
    assert_eq!(handle.lock().unwrap().get(&id("p1")), 42.0);
}
