//! Conversation types including stages, context and turns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Conversation stages for the scripted sales flow
///
/// The funnel runs `Introduction → Qualification → NeedAnalysis → Pitch →
/// Documents → Closing`. `Closing` and `Fallback` are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ConversationStage {
    /// Greeting and permission to talk
    #[default]
    Introduction,
    /// Loan purpose and income
    Qualification,
    /// Document readiness
    NeedAnalysis,
    /// Rates, EMI and timelines
    Pitch,
    /// Offer and application draft
    Documents,
    /// Conversation wrapped up
    Closing,
    /// Unrecognized stage; any unknown tag deserializes here
    #[serde(other)]
    Fallback,
}

impl ConversationStage {
    /// All stages in funnel order, fallback last
    pub const ALL: [ConversationStage; 7] = [
        ConversationStage::Introduction,
        ConversationStage::Qualification,
        ConversationStage::NeedAnalysis,
        ConversationStage::Pitch,
        ConversationStage::Documents,
        ConversationStage::Closing,
        ConversationStage::Fallback,
    ];

    /// Wire tag of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStage::Introduction => "introduction",
            ConversationStage::Qualification => "qualification",
            ConversationStage::NeedAnalysis => "need_analysis",
            ConversationStage::Pitch => "pitch",
            ConversationStage::Documents => "documents",
            ConversationStage::Closing => "closing",
            ConversationStage::Fallback => "fallback",
        }
    }

    /// Get stage display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ConversationStage::Introduction => "Introduction",
            ConversationStage::Qualification => "Qualification",
            ConversationStage::NeedAnalysis => "Need Analysis",
            ConversationStage::Pitch => "Pitch",
            ConversationStage::Documents => "Documents",
            ConversationStage::Closing => "Closing",
            ConversationStage::Fallback => "Fallback",
        }
    }

    /// Position along the sales funnel. `None` for the fallback stage,
    /// which sits outside the funnel.
    pub fn funnel_position(&self) -> Option<u8> {
        match self {
            ConversationStage::Introduction => Some(0),
            ConversationStage::Qualification => Some(1),
            ConversationStage::NeedAnalysis => Some(2),
            ConversationStage::Pitch => Some(3),
            ConversationStage::Documents => Some(4),
            ConversationStage::Closing => Some(5),
            ConversationStage::Fallback => None,
        }
    }

    /// Get default next stage along the funnel
    pub fn default_next(&self) -> Option<ConversationStage> {
        match self {
            ConversationStage::Introduction => Some(ConversationStage::Qualification),
            ConversationStage::Qualification => Some(ConversationStage::NeedAnalysis),
            ConversationStage::NeedAnalysis => Some(ConversationStage::Pitch),
            ConversationStage::Pitch => Some(ConversationStage::Documents),
            ConversationStage::Documents => Some(ConversationStage::Closing),
            ConversationStage::Closing | ConversationStage::Fallback => None,
        }
    }

    /// Absorbing stages never advance the funnel again
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationStage::Closing | ConversationStage::Fallback)
    }
}

impl std::fmt::Display for ConversationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Coarse loan category the customer is interested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Personal,
    Business,
    Home,
    Unknown,
}

impl LoanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Personal => "personal",
            LoanType::Business => "business",
            LoanType::Home => "home",
            LoanType::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, LoanType::Unknown)
    }
}

impl std::fmt::Display for LoanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Facts and stage carried between conversation turns
///
/// A context is created once by the agent's initial-state constructor and then
/// replaced wholesale by the value each turn returns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Current stage
    #[serde(default)]
    pub stage: ConversationStage,
    /// Reserved. No extraction path fills this in; callers may seed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// First known loan category detected; never replaced once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_type: Option<LoanType>,
    /// First amount expression captured; never replaced once set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Whether an SMS/WhatsApp follow-up should go out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_needed: Option<bool>,
}

impl ConversationContext {
    /// Fresh context at the introduction stage
    pub fn new() -> Self {
        Self::default()
    }

    /// Context at an arbitrary stage, mostly useful for resuming a call
    pub fn at_stage(stage: ConversationStage) -> Self {
        Self {
            stage,
            ..Self::default()
        }
    }

    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_loan_type(mut self, loan_type: LoanType) -> Self {
        self.loan_type = Some(loan_type);
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    /// Loan type if one has been detected and is not `Unknown`
    pub fn known_loan_type(&self) -> Option<LoanType> {
        self.loan_type.filter(LoanType::is_known)
    }

    /// Whether the conversation sits in an absorbing stage
    pub fn is_finished(&self) -> bool {
        self.stage.is_terminal()
    }
}

/// Result of one agent turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Text to render or synthesize
    pub reply: String,
    /// Context replacing the previous one
    pub context: ConversationContext,
}

impl AgentResponse {
    pub fn new(reply: impl Into<String>, context: ConversationContext) -> Self {
        Self {
            reply: reply.into(),
            context,
        }
    }

    /// Stage after this turn
    pub fn stage(&self) -> ConversationStage {
        self.context.stage
    }
}

/// Speaker of a transcript turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Customer utterance
    Customer,
    /// Agent reply
    Agent,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::Customer => "customer",
            TurnRole::Agent => "agent",
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single turn in the transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the speaker
    pub role: TurnRole,
    /// Content of the turn
    pub content: String,
    /// When the turn occurred
    pub timestamp: DateTime<Utc>,
    /// Stage the conversation was in after this turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<ConversationStage>,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            stage: None,
        }
    }

    /// Create a customer turn
    pub fn customer(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Customer, content)
    }

    /// Create an agent turn
    pub fn agent(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Agent, content)
    }

    pub fn with_stage(mut self, stage: ConversationStage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Get word count
    ///
    /// Uses Unicode word boundaries so Devanagari text counts correctly.
    pub fn word_count(&self) -> usize {
        self.content.unicode_words().count()
    }
}
