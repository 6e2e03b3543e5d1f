use npc_core::{keys, Blackboard, EntityId, Position, Value};

#[test]
fn set_get_roundtrip_per_kind() {
    let mut bb = Blackboard::new();
    bb.set("s", "goblin-1");
    bb.set("i", 42i64);
    bb.set("f", 0.25f64);
    bb.set("b", true);
    bb.set("p", Position::new(1.0, 2.0, 3.0));
    bb.set("sl", vec!["a".to_string(), "b".to_string()]);
    bb.set("pl", vec![Position::new(0.0, 0.0, 0.0)]);

    assert_eq!(bb.get_str("s"), Some("goblin-1"));
    assert_eq!(bb.get_int("i"), Some(42));
    assert_eq!(bb.get_float("f"), Some(0.25));
    assert_eq!(bb.get_bool("b"), Some(true));
    assert_eq!(bb.get_pos("p"), Some(Position::new(1.0, 2.0, 3.0)));
    assert_eq!(bb.get_str_list("sl").map(<[String]>::len), Some(2));
    assert_eq!(bb.get_pos_list("pl").map(<[Position]>::len), Some(1));
}

#[test]
fn reads_are_permissive_on_absent_and_mismatched_kinds() {
    let mut bb = Blackboard::new();
    assert_eq!(bb.get_str("missing"), None);
    assert_eq!(bb.get_float("missing"), None);

    bb.set("k", 7i64);
    // Wrong-kinded reads see "not set", never panic.
    assert_eq!(bb.get_str("k"), None);
    assert_eq!(bb.get_bool("k"), None);
    assert_eq!(bb.get_int("k"), Some(7));
}

#[test]
fn writes_replace_unconditionally() {
    let mut bb = Blackboard::new();
    bb.set("k", 1i64);
    bb.set("k", "now a string");
    assert_eq!(bb.get_int("k"), None);
    assert_eq!(bb.get_str("k"), Some("now a string"));
}

#[test]
fn empty_target_reads_as_unset() {
    let mut bb = Blackboard::new();
    bb.set(keys::CURRENT_TARGET, "");
    assert_eq!(bb.get_id(keys::CURRENT_TARGET), None);

    bb.set(keys::CURRENT_TARGET, &EntityId::from("player-1"));
    assert_eq!(
        bb.get_id(keys::CURRENT_TARGET),
        Some(EntityId::from("player-1"))
    );
}

#[test]
fn flag_defaults_to_false() {
    let mut bb = Blackboard::new();
    assert!(!bb.flag(keys::IS_IN_COMBAT));
    bb.set(keys::IS_IN_COMBAT, true);
    assert!(bb.flag(keys::IS_IN_COMBAT));
}

#[test]
fn delete_clear_and_keys() {
    let mut bb = Blackboard::new();
    bb.set("a", 1i64);
    bb.set("b", 2i64);
    assert!(bb.has("a"));

    bb.delete("a");
    assert!(!bb.has("a"));
    // Deleting an absent key is a no-op.
    bb.delete("a");

    let keys: Vec<&str> = bb.keys().collect();
    assert_eq!(keys, vec!["b"]);

    bb.clear();
    assert!(bb.is_empty());
}

#[test]
fn value_conversions() {
    assert_eq!(Value::from("x"), Value::Str("x".to_string()));
    assert_eq!(Value::from(3i64), Value::Int(3));
    assert_eq!(Value::from(false), Value::Bool(false));
}
