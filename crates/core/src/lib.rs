//! Core types for the loan sales agent
//!
//! This crate provides the foundational types shared by the other crates:
//! - Conversation stages, loan categories and the per-turn context
//! - Transcript turns
//! - Outbound message templates and the template store seam
//! - Error types

pub mod error;
pub mod conversation;
pub mod message;

pub use error::{Error, Result};
pub use conversation::{
    AgentResponse, ConversationContext, ConversationStage, LoanType, Turn, TurnRole,
};
pub use message::{fill_template, MessageChannel, MessageTemplate, TemplateStore};
