use std::io;
use std::path::PathBuf;

use thiserror::Error;

use gallery_core::config::ConfigError;
use gallery_core::definitions::DefinitionError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid entity definitions: {0}")]
    Definitions(#[from] DefinitionError),
    #[error("failed to spawn the game loop thread: {0}")]
    Thread(#[source] io::Error),
    #[error("game loop thread panicked")]
    ThreadPanicked,
}
