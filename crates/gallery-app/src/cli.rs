//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;
use glam::DVec3;

use gallery_core::config::SimConfig;

use crate::shooter::ShooterConfig;

#[derive(Parser, Debug)]
#[command(name = "gallery", about = "Run a shooting gallery session")]
pub struct Cli {
    /// Session configuration (JSON). Missing files fall back to defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Entity definitions (JSON). Missing entries use built-in fallbacks.
    #[arg(long)]
    pub definitions: Option<PathBuf>,

    /// Override the RNG seed from the configuration.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the session length in seconds.
    #[arg(long)]
    pub duration: Option<f64>,

    /// Pace the session at the tick rate instead of running flat out.
    #[arg(long)]
    pub realtime: bool,

    /// Stop a headless run after this many ticks even if the session is live.
    #[arg(long, default_value_t = 100_000)]
    pub max_ticks: u64,

    /// Ticks between scripted shots.
    #[arg(long, default_value_t = 10)]
    pub fire_interval: u32,

    /// Aim every n-th shot over the target.
    #[arg(long)]
    pub miss_every: Option<u32>,

    /// Let the session run without anyone shooting.
    #[arg(long)]
    pub no_shooter: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Fold the command-line overrides into a loaded configuration.
    pub fn apply_overrides(&self, config: &mut SimConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(duration) = self.duration {
            config.session.duration_secs = duration;
        }
    }

    pub fn shooter_config(&self) -> Option<ShooterConfig> {
        if self.no_shooter {
            return None;
        }
        Some(ShooterConfig {
            origin: DVec3::new(0.0, 1.0, 0.0),
            fire_interval: self.fire_interval,
            miss_every: self.miss_every,
        })
    }
}
