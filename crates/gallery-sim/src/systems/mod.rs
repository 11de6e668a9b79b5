//! Per-tick systems run by the engine.
//!
//! Systems are free functions over the engine's components. They report
//! lifecycle transitions back to the engine instead of applying side effects.

pub mod snapshot;
pub mod targets;
