//! Configuration management for the loan sales agent
//!
//! Supports loading configuration from:
//! - YAML/JSON/TOML files
//! - Environment variables (SALES_AGENT__ prefix)
//!
//! # Domain Configuration
//!
//! Everything the scripted conversation says or matches against:
//! - Intent lexicon (opt-out, defer and loan-category phrases, amount pattern)
//! - Reply script
//! - Loan product catalogue
//! - Follow-up message templates
//! - Unified domain config loader

pub mod settings;
pub mod agent;
pub mod lexicon;
pub mod prompts;
pub mod product;
pub mod messages;
pub mod domain;

pub use settings::{Settings, ObservabilityConfig, load_settings};
pub use agent::{AgentConfig, PersonaConfig};
pub use lexicon::{IntentLexicon, LoanKeywordRule};
pub use prompts::{
    ReplyScript, GreetingTemplates, StageReplies, OfferTemplates,
    ClosingTemplates, FallbackTemplates,
};
pub use product::{ProductConfig, LoanProduct};
pub use messages::{MessageTemplateConfig, FollowUpTemplateIds};
pub use domain::{
    DomainConfig, DomainConfigManager, domain_config, init_domain_config,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for sales_agent_core::Error {
    fn from(err: ConfigError) -> Self {
        sales_agent_core::Error::Config(err.to_string())
    }
}
