//! Scripted Loan Sales Agent
//!
//! Features:
//! - Keyword and regex based intent detection (opt-out, defer, loan type, amount)
//! - Stage-based dialog management over a fixed sales funnel
//! - Caller-side conversation driver with transcript
//! - Follow-up message planning from message templates

pub mod intent;
pub mod agent;
pub mod conversation;
pub mod follow_up;

pub use intent::{IntentDetector, IntentSignals, TurnIntent};
pub use agent::{SalesAgent, initial_agent_state, agent_reply};
pub use conversation::{Conversation, ConversationEvent, EndReason};
pub use follow_up::{FollowUpPlanner, FollowUpMessage, FollowUpReason};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    #[error("Configuration error: {0}")]
    Config(#[from] sales_agent_config::ConfigError),

    #[error("Template error: {0}")]
    Template(#[from] sales_agent_core::Error),
}
