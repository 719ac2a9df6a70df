//! Shared error types for the services crate.

use thiserror::Error;

use levelup_core::model::ConfigError;

/// Errors emitted while asking the generation service for questions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("question generation is not configured")]
    NotConfigured,
    #[error("{0}")]
    Server(String),
    #[error("AI returned empty or invalid questions.")]
    EmptyQuestions,
    #[error("invalid response body: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl GenerationError {
    /// The single line shown on the upload screen.
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("Generation failed: {self}")
    }
}

/// Errors emitted by `ReviewerService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewerError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
