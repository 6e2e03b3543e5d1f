//! NPC agents and their scheduler.
//!
//! This crate assembles the lower layers into running NPCs: immutable
//! [`NpcTemplate`]s select a behavior tree built from the standard leaf
//! catalog, an [`Agent`] drives one NPC through sense → attribute →
//! decide each tick, and the [`Scheduler`] owns the population,
//! sleeping far-away agents and budgeting per-tick work.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod actions;
pub mod agent;
pub mod conditions;
pub mod scheduler;
pub mod template;
pub mod trees;

pub use agent::Agent;
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerStats};
pub use template::{BehaviorConfig, CombatConfig, NpcKind, NpcStats, NpcTemplate};
pub use trees::build_tree;
