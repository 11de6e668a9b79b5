//! State shared between the game loop thread and its owner.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use gallery_core::commands::PlayerCommand;
use gallery_core::state::SessionSnapshot;
use gallery_core::types::CollisionEvent;

/// Messages accepted by the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Forwarded to the engine's command queue.
    Player(PlayerCommand),
    /// A contact from an outside physics layer.
    Collision(CollisionEvent),
    /// Stop after the current tick.
    Shutdown,
}

/// Handles held by whoever drives a paced game loop.
pub struct AppState {
    /// `None` until the loop is spawned.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the loop thread after every tick.
    pub latest_snapshot: Arc<Mutex<Option<SessionSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a command to the loop. Returns false when no loop is listening.
    pub fn send(&self, command: GameLoopCommand) -> bool {
        let Ok(lock) = self.command_tx.lock() else {
            return false;
        };
        match lock.as_ref() {
            Some(tx) => tx.send(command).is_ok(),
            None => false,
        }
    }

    /// Clone of the most recent snapshot, if any tick has run.
    pub fn latest(&self) -> Option<SessionSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest().is_none());
        assert!(!state.send(GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_send_reaches_receiver() {
        let state = AppState::new();
        let (tx, rx) = mpsc::channel();
        *state.command_tx.lock().unwrap() = Some(tx);

        assert!(state.send(GameLoopCommand::Player(PlayerCommand::Pause)));
        assert!(matches!(
            rx.try_recv(),
            Ok(GameLoopCommand::Player(PlayerCommand::Pause))
        ));

        drop(rx);
        assert!(!state.send(GameLoopCommand::Shutdown));
    }
}
