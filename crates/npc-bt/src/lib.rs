//! Behavior tree runtime built on `npc-core`.
//!
//! A tree is a hierarchy of owned nodes, each returning one of three
//! statuses per tick. `Running` is the only status that carries state
//! across ticks: composites remember which child was running, leaves
//! remember their own timers. `reset` cascades down and forces every
//! node back to idle; a running leaf whose branch goes out of scope is
//! always reset before it can be ticked again.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod composite;
pub mod decorator;
pub mod leaf;
pub mod node;

pub use composite::{
    ParallelSelector, ParallelSequence, RandomSelector, ReactiveSelector, ReactiveSequence,
    Selector, Sequence,
};
pub use decorator::{Cooldown, Failer, Gate, Inverter, Repeater, Succeeder, TimeLimit};
pub use leaf::{ActionFn, ClearKey, ConditionFn, HasKey, SetValue, Wait};
pub use node::{Node, Status};
