//! Templates are the data-driven surface: they must round-trip through
//! serde unchanged.

use npc_agent::{NpcKind, NpcTemplate};

#[test]
fn templates_round_trip_through_json() {
    for template in [
        NpcTemplate::passive_animal("deer", 3),
        NpcTemplate::neutral_humanoid("merchant", 5),
        NpcTemplate::aggressive_monster("wolf", 8),
        NpcTemplate::elite_monster("alpha wolf", 12),
        NpcTemplate::boss_monster("world eater", 60),
    ] {
        let json = serde_json::to_string(&template).unwrap();
        let back: NpcTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, template);
    }
}

#[test]
fn kind_and_faction_use_wire_friendly_tags() {
    let template = NpcTemplate::aggressive_monster("wolf", 8);
    let json = serde_json::to_value(&template).unwrap();

    assert_eq!(json["kind"], "AGGRESSIVE");
    assert_eq!(json["faction"], "HOSTILE");
    assert_eq!(json["combat"]["default_ability"], "basic_attack");
}

#[test]
fn hand_written_template_json_loads() {
    let json = r#"{
        "kind": "NEUTRAL",
        "name": "innkeeper",
        "description": "Keeps the inn",
        "stats": {
            "level": 4, "health": 180, "mana": 90,
            "strength": 18, "agility": 12, "intellect": 14,
            "stamina": 18, "spirit": 14,
            "movement_speed": 5.0, "attack_speed_ms": 2500
        },
        "perception": {
            "vision_range": 20.0, "vision_angle_deg": 120.0,
            "aggro_radius": 0.0, "leash_radius": 25.0,
            "ignore_line_of_sight": false,
            "detection_delay_ms": 500, "stealth_detection": 1.0
        },
        "behavior": {
            "wander_radius": 5.0,
            "wander_min_wait_ms": 5000, "wander_max_wait_ms": 15000,
            "chase_max_distance": 15.0, "chase_max_time_ms": 5000,
            "leash_radius": 25.0,
            "call_for_help": true, "call_radius": 15.0,
            "flee_at_health": 0.2
        },
        "combat": {
            "attack_range": 3.0,
            "abilities": ["basic_attack"],
            "default_ability": "basic_attack"
        },
        "faction": "NEUTRAL"
    }"#;

    let template: NpcTemplate = serde_json::from_str(json).unwrap();
    assert_eq!(template.kind, NpcKind::Neutral);
    assert_eq!(template.name, "innkeeper");
    assert!(template.behavior.call_for_help);
}
