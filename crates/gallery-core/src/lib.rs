//! Core types and definitions for the shooting gallery simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! handles, commands, events, state snapshots, configuration and constants.
//! It has no simulation logic and no dependency on a runtime framework.

pub mod commands;
pub mod config;
pub mod constants;
pub mod definitions;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
