//! Error types for the sales agent

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the sales agent
///
/// The turn-taking engine itself is total and never produces these; they
/// surface only at the edges (configuration and templates).
#[derive(Error, Debug)]
pub enum Error {
    // Template errors
    #[error("Message template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template {template} is missing variables: {}", missing.join(", "))]
    MissingVariables { template: String, missing: Vec<String> },

    #[error("Template {template} is not a {expected} template")]
    WrongChannel { template: String, expected: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}
