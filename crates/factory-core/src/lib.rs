//! Pure simulation kernel for the agent factory: room/script catalog, the
//! per-agent cycle state machine, world stepping, and snapshot production.
//!
//! The kernel performs no I/O and holds no clock. Callers pass wall-clock
//! timestamps into `step` and `snapshot`, so identical tick sequences produce
//! identical agent state regardless of scheduling.

pub mod agent;
pub mod catalog;
pub mod world;
