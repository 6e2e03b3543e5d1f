//! Shared primitives for the NPC AI core.
//!
//! Everything here is engine-agnostic plain data: entity ids, positions,
//! the per-agent blackboard, the interface traits the surrounding
//! simulation implements, and a deterministic RNG. The behavior tree,
//! perception, threat, and agent crates all build on this one.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod error;
pub mod faction;
pub mod id;
pub mod position;
pub mod rng;
pub mod tick;
pub mod world;

pub use blackboard::{keys, Blackboard, Value};
pub use error::ConfigError;
pub use faction::Faction;
pub use id::EntityId;
pub use position::Position;
pub use rng::{derive_seed, hash_id, DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use world::{CombatSink, EntityDescriptor, EntityKind, WorldView};
