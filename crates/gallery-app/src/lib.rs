//! Shooting gallery host application.
//!
//! Wires the simulation engine to a stand-in physics layer and a scripted
//! shooter, and runs sessions either headless or paced at the tick rate.

pub mod cli;
pub mod contact;
pub mod error;
pub mod game_loop;
pub mod settings;
pub mod shooter;
pub mod state;

pub use gallery_core as core;
