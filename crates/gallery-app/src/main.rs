use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gallery_app::cli::Cli;
use gallery_app::error::AppError;
use gallery_app::game_loop::{spawn_game_loop, GameLoop, RunSummary};
use gallery_app::settings::{load_config, load_definitions};
use gallery_app::shooter::ScriptedShooter;
use gallery_app::state::AppState;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(summary) => {
            report(&cli, &summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "gallery failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<RunSummary, AppError> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    let definitions = load_definitions(cli.definitions.as_deref())?;

    let shooter = cli.shooter_config().map(ScriptedShooter::new);
    let mut game = GameLoop::new(config, &definitions, shooter)?;
    game.start();

    if !cli.realtime {
        return Ok(game.run_headless(cli.max_ticks));
    }

    let state = AppState::new();
    let (tx, handle) = spawn_game_loop(game, Arc::clone(&state.latest_snapshot))?;
    if let Ok(mut lock) = state.command_tx.lock() {
        *lock = Some(tx);
    }

    while !handle.is_finished() {
        std::thread::sleep(PROGRESS_INTERVAL);
        if let Some(snapshot) = state.latest() {
            info!(
                score = snapshot.score,
                remaining = snapshot.time_remaining_secs,
                active = snapshot.active_targets,
                ammo = snapshot.ammo.current,
                "session progress"
            );
        }
    }
    handle.join().map_err(|_| AppError::ThreadPanicked)
}

fn report(cli: &Cli, summary: &RunSummary) {
    if cli.json {
        match serde_json::to_string_pretty(summary) {
            Ok(json) => println!("{json}"),
            Err(err) => error!(%err, "failed to serialize summary"),
        }
        return;
    }
    let outcome = summary
        .outcome
        .map_or_else(|| "unfinished".to_string(), |o| format!("{o:?}"));
    println!(
        "{outcome}: score {} after {} ticks ({} shots, {} hits, {} destroyed)",
        summary.score, summary.ticks, summary.shots_fired, summary.hits, summary.targets_destroyed
    );
}
