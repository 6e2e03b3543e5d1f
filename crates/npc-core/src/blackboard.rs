//! Per-agent shared memory for behavior tree nodes.
//!
//! Every agent owns exactly one blackboard; nodes communicate through it
//! within a tick and across ticks. The value space is a closed union,
//! and the key catalog in [`keys`] lists every key the stock leaves
//! read or write, with its expected kind.
//!
//! Reads are permissive: an absent key, or a key holding a different
//! kind than the accessor asks for, reads as "not set". Writes replace
//! unconditionally. The scheduler guarantees at most one tick runs per
//! agent at a time, so the board needs no internal locking; external
//! threads go through the agent's public API instead.

use std::collections::BTreeMap;

use crate::id::EntityId;
use crate::position::Position;

/// A blackboard value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Pos(Position),
    StrList(Vec<String>),
    PosList(Vec<Position>),
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&EntityId> for Value {
    fn from(v: &EntityId) -> Self {
        Value::Str(v.as_str().to_owned())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Position> for Value {
    fn from(v: Position) -> Self {
        Value::Pos(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StrList(v)
    }
}

impl From<Vec<Position>> for Value {
    fn from(v: Vec<Position>) -> Self {
        Value::PosList(v)
    }
}

/// Typed key/value store shared across one agent's tree nodes.
#[derive(Debug, Default)]
pub struct Blackboard {
    data: BTreeMap<String, Value>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing whatever the key held before.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.data.insert(key.to_owned(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(Value::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Read a key holding an entity id. An empty string reads as unset.
    pub fn get_id(&self, key: &str) -> Option<EntityId> {
        match self.get_str(key) {
            Some(s) if !s.is_empty() => Some(EntityId::from(s)),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.data.get(key) {
            Some(Value::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.data.get(key) {
            Some(Value::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.data.get(key) {
            Some(Value::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_pos(&self, key: &str) -> Option<Position> {
        match self.data.get(key) {
            Some(Value::Pos(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str_list(&self, key: &str) -> Option<&[String]> {
        match self.data.get(key) {
            Some(Value::StrList(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn get_pos_list(&self, key: &str) -> Option<&[Position]> {
        match self.data.get(key) {
            Some(Value::PosList(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Boolean flag read: unset reads as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get_bool(key).unwrap_or(false)
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn delete(&mut self, key: &str) {
        self.data.remove(key);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The recognized blackboard keys.
///
/// The catalog is closed: stock leaves only touch keys listed here.
/// Kinds are noted per key; consumers treat a missing key according to
/// their own documented default.
pub mod keys {
    // Target
    pub const CURRENT_TARGET: &str = "current_target"; // Str: id of current target
    pub const TARGET_POSITION: &str = "target_position"; // Pos: last known target position
    pub const AGGRO_LIST: &str = "aggro_list"; // StrList: ids that aggroed this agent
    pub const HIGHEST_THREAT: &str = "highest_threat"; // Str: id with highest threat
    pub const THREAT_TABLE: &str = "threat_table"; // StrList: threat snapshot ids

    // Positions
    pub const SPAWN_POSITION: &str = "spawn_position"; // Pos: original spawn point
    pub const HOME_POSITION: &str = "home_position"; // Pos: current home/leash anchor
    pub const PATROL_WAYPOINTS: &str = "patrol_waypoints"; // PosList
    pub const CURRENT_WAYPOINT: &str = "current_waypoint"; // Int: waypoint index
    pub const LAST_SEEN_POSITION: &str = "last_seen_position"; // Pos: where target was last seen

    // State flags
    pub const IS_IN_COMBAT: &str = "is_in_combat"; // Bool
    pub const IS_EVADING: &str = "is_evading"; // Bool: returning home
    pub const IS_PATROLLING: &str = "is_patrolling"; // Bool
    pub const IS_WANDERING: &str = "is_wandering"; // Bool
    pub const IS_FLEEING: &str = "is_fleeing"; // Bool

    // Combat
    pub const LAST_ABILITY_USED: &str = "last_ability_used"; // Str: ability id
    pub const LAST_ABILITY_TIME: &str = "last_ability_time"; // Int: ms timestamp
    pub const COMBAT_START_TIME: &str = "combat_start_time"; // Int: ms timestamp
    pub const HEALTH_PERCENT: &str = "health_percent"; // Float: 0.0..=1.0

    // Timing
    pub const LAST_UPDATE_TIME: &str = "last_update_time"; // Int: ms timestamp
    pub const STATE_CHANGE_TIME: &str = "state_change_time"; // Int: ms timestamp

    // Movement intent, consumed by the external movement system.
    // Presence means "steer toward this XZ target"; absence means stop.
    pub const MOVE_TARGET_X: &str = "move_target_x"; // Float
    pub const MOVE_TARGET_Z: &str = "move_target_z"; // Float

    // Detection / assistance
    pub const DETECTED_ENTITIES: &str = "detected_entities"; // StrList
    pub const CALL_FOR_HELP_TARGET: &str = "call_for_help_target"; // Str
    pub const CALL_FOR_HELP_ALLIES: &str = "call_for_help_allies"; // StrList
}
