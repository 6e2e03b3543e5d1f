//! Umbrella crate that re-exports the `npc-*` building blocks.
//!
//! Servers embedding the whole AI core depend on this crate; anything
//! narrower (say, just the behavior tree runtime) picks the individual
//! crates instead.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use npc_core as core;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use npc_bt as bt;

#[cfg(feature = "threat")]
#[cfg_attr(docsrs, doc(cfg(feature = "threat")))]
pub use npc_threat as threat;

#[cfg(feature = "perception")]
#[cfg_attr(docsrs, doc(cfg(feature = "perception")))]
pub use npc_perception as perception;

#[cfg(feature = "agent")]
#[cfg_attr(docsrs, doc(cfg(feature = "agent")))]
pub use npc_agent as agent;
