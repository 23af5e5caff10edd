// src/infra/errors.rs — Error types for agentdeck
//
// Most failure in this crate is deliberately swallowed at the reader
// boundary (missing or malformed state is "no data", not an error).
// DeckError covers the cases still worth naming: metric commands that
// cannot run at all, and configuration problems.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("metric command `{command}` failed: {message}")]
    Metric { command: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeckError {
    pub fn metric(command: &str, message: impl std::fmt::Display) -> Self {
        DeckError::Metric {
            command: command.to_string(),
            message: message.to_string(),
        }
    }
}
