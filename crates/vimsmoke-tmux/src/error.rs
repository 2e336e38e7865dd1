//! Error types for the tmux backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TmuxError {
    #[error("tmux command failed: {0}")]
    CommandFailed(String),

    #[error("tmux not found in PATH")]
    NotFound,

    #[error("session already exists: {0}")]
    SessionExists(String),

    #[error("tmux io error: {0}")]
    Io(#[from] std::io::Error),
}
