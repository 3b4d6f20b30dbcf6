//! Common error types for the survey engine

use thiserror::Error;

/// Common result type for survey operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across survey crates
///
/// Vote rejections are not errors; see [`crate::VoteOutcome`].
#[derive(Error, Debug)]
pub enum Error {
    /// Question index outside the catalog
    #[error("Question index {index} out of range (catalog has {count} questions)")]
    OutOfRange { index: usize, count: usize },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parse error in a configuration file
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
