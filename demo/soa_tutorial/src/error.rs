//! Error types for the tutorial program.

use crate::config::ConfigError;
use crate::runtime::RuntimeError;
use thiserror::Error;

/// Errors raised while running the tutorial.
#[derive(Debug, Error)]
pub enum TutorialError {
    /// Invalid or unreadable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Runtime scope could not be entered.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Element-wise and lane-wise fills disagree.
    #[error("Fill mismatch at tuple {tuple}: element-wise and parallel fills disagree")]
    FillMismatch { tuple: usize },

    /// Report serialisation failed.
    #[error("Report serialisation failed: {0}")]
    Json(#[from] serde_json::Error),
}
