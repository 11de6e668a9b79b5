//! Drives the simulation engine, either as fast as possible or paced at the
//! tick rate on its own thread.
//!
//! Each step ticks the engine, sweeps the resulting projectiles for contacts
//! and queues them with the shooter's commands for the following tick.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use gallery_core::commands::PlayerCommand;
use gallery_core::config::SimConfig;
use gallery_core::constants::{DT, TICK_RATE};
use gallery_core::definitions::EntityDefinitions;
use gallery_core::enums::{ReleaseReason, SessionOutcome, SessionPhase};
use gallery_core::events::SimEvent;
use gallery_core::state::SessionSnapshot;
use gallery_sim::setup::resolve_definitions;
use gallery_sim::SimulationEngine;

use crate::contact::ContactDetector;
use crate::error::AppError;
use crate::shooter::ScriptedShooter;
use crate::state::GameLoopCommand;

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Default z of the backstop wall, well behind the target line.
pub const DEFAULT_BACKSTOP_Z: f64 = -25.0;

/// Tallies of what happened over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub outcome: Option<SessionOutcome>,
    pub score: u32,
    pub shots_fired: u32,
    pub shots_rejected: u32,
    pub hits: u32,
    pub targets_destroyed: u32,
    pub targets_out_of_bounds: u32,
    pub respawns: u32,
    pub projectiles_expired: u32,
}

impl RunSummary {
    pub fn record(&mut self, snapshot: &SessionSnapshot) {
        self.ticks = snapshot.time.tick;
        self.outcome = snapshot.outcome;
        self.score = snapshot.score;
        for event in &snapshot.events {
            match event {
                SimEvent::Fired { .. } => self.shots_fired += 1,
                SimEvent::FireRejected { .. } => self.shots_rejected += 1,
                SimEvent::Hit { .. } => self.hits += 1,
                SimEvent::Destroyed { .. } => self.targets_destroyed += 1,
                SimEvent::OutOfBounds { .. } => self.targets_out_of_bounds += 1,
                SimEvent::Respawn { .. } => self.respawns += 1,
                SimEvent::ProjectileReleased {
                    reason: ReleaseReason::Expired,
                    ..
                } => self.projectiles_expired += 1,
                _ => {}
            }
        }
    }
}

pub struct GameLoop {
    engine: SimulationEngine,
    contacts: ContactDetector,
    shooter: Option<ScriptedShooter>,
    summary: RunSummary,
}

impl GameLoop {
    pub fn new(
        config: SimConfig,
        definitions: &EntityDefinitions,
        shooter: Option<ScriptedShooter>,
    ) -> Result<Self, AppError> {
        let ground_height = config.ground_height;
        let engine = SimulationEngine::with_definitions(config, definitions)?;
        let contacts = ContactDetector::new(
            &resolve_definitions(definitions),
            ground_height,
            DEFAULT_BACKSTOP_Z,
        );
        Ok(Self {
            engine,
            contacts,
            shooter,
            summary: RunSummary::default(),
        })
    }

    /// Queue a session start unless the config already does.
    pub fn start(&mut self) {
        if !self.engine.config().session.auto_start {
            self.engine.queue_command(PlayerCommand::StartSession);
        }
    }

    pub fn step(&mut self) -> SessionSnapshot {
        let snapshot = self.engine.tick();
        let dt = DT * self.engine.time_scale();
        for contact in self.contacts.detect(&snapshot, dt) {
            self.engine.report_collision(contact);
        }
        if let Some(shooter) = self.shooter.as_mut() {
            self.engine.queue_commands(shooter.commands(&snapshot));
        }
        self.summary.record(&snapshot);
        snapshot
    }

    /// Step until the session ends or `max_ticks` steps have run.
    pub fn run_headless(&mut self, max_ticks: u64) -> RunSummary {
        for _ in 0..max_ticks {
            if self.step().phase == SessionPhase::Ended {
                break;
            }
        }
        info!(ticks = self.summary.ticks, score = self.summary.score, "headless run finished");
        self.summary.clone()
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SimulationEngine {
        &mut self.engine
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }
}

/// Run `game` on its own thread, one step per tick interval.
///
/// The thread stops when the session ends, on `Shutdown`, or when the
/// sender is dropped, and yields the run summary.
pub fn spawn_game_loop(
    game: GameLoop,
    latest_snapshot: Arc<Mutex<Option<SessionSnapshot>>>,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<RunSummary>), AppError> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("gallery-game-loop".into())
        .spawn(move || run_game_loop(game, cmd_rx, &latest_snapshot))
        .map_err(AppError::Thread)?;

    Ok((cmd_tx, handle))
}

fn run_game_loop(
    mut game: GameLoop,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<SessionSnapshot>>,
) -> RunSummary {
    let mut next_tick_time = Instant::now();

    loop {
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Player(cmd)) => game.engine.queue_command(cmd),
                Ok(GameLoopCommand::Collision(event)) => game.engine.report_collision(event),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    debug!("game loop shutting down");
                    return game.summary;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        let snapshot = game.step();
        let ended = snapshot.phase == SessionPhase::Ended;
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }
        if ended {
            return game.summary;
        }

        let time_scale = game.engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shooter::ShooterConfig;
    use gallery_core::config::SessionConfig;

    fn short_session(duration_secs: f64) -> SimConfig {
        SimConfig {
            session: SessionConfig {
                duration_secs,
                auto_start: false,
            },
            ..SimConfig::default()
        }
    }

    fn shooter(fire_interval: u32) -> Option<ScriptedShooter> {
        Some(ScriptedShooter::new(ShooterConfig {
            fire_interval,
            ..ShooterConfig::default()
        }))
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::Player(PlayerCommand::StartSession)).unwrap();
        tx.send(GameLoopCommand::Player(PlayerCommand::Reload)).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::Player(PlayerCommand::StartSession)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_tick_duration_constant() {
        let expected_nanos = 1_000_000_000u64 / 30;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }

    #[test]
    fn test_headless_shooter_wins() {
        let mut game = GameLoop::new(short_session(5.0), &EntityDefinitions::default(), shooter(5)).unwrap();
        game.start();
        let summary = game.run_headless(1_000);

        assert_eq!(summary.outcome, Some(SessionOutcome::Win));
        assert!(summary.shots_fired > 0);
        assert!(summary.hits > 0);
        assert!(summary.targets_destroyed > 0);
        assert_eq!(summary.score, summary.targets_destroyed * 10);
        assert_eq!(game.engine().phase(), SessionPhase::Ended);
    }

    #[test]
    fn test_headless_without_shooter_loses() {
        let mut game = GameLoop::new(short_session(1.0), &EntityDefinitions::default(), None).unwrap();
        game.start();
        let summary = game.run_headless(1_000);

        assert_eq!(summary.outcome, Some(SessionOutcome::Lose));
        assert_eq!(summary.shots_fired, 0);
        assert_eq!(summary.score, 0);
    }

    #[test]
    fn test_headless_stops_at_tick_limit() {
        let mut game = GameLoop::new(short_session(60.0), &EntityDefinitions::default(), None).unwrap();
        game.start();
        let summary = game.run_headless(10);
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.outcome, None);
    }

    #[test]
    fn test_headless_runs_are_deterministic() {
        let run = || {
            let mut game = GameLoop::new(short_session(4.0), &EntityDefinitions::default(), shooter(3)).unwrap();
            game.start();
            game.run_headless(1_000)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_paced_loop_shutdown() {
        let game = GameLoop::new(short_session(60.0), &EntityDefinitions::default(), None).unwrap();
        let latest = Arc::new(Mutex::new(None));
        let (tx, handle) = spawn_game_loop(game, Arc::clone(&latest)).unwrap();

        tx.send(GameLoopCommand::Player(PlayerCommand::StartSession)).unwrap();
        std::thread::sleep(Duration::from_millis(150));
        tx.send(GameLoopCommand::Shutdown).unwrap();
        let summary = handle.join().unwrap();

        assert!(summary.ticks > 0);
        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.phase, SessionPhase::Running);
    }
}
