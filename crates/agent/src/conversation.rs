//! Conversation Management
//!
//! Caller-side driver: owns the current context and the transcript, feeds
//! utterances to the agent and reports what changed.

use std::sync::Arc;

use serde::Serialize;

use sales_agent_core::{
    AgentResponse, ConversationContext, ConversationStage, LoanType, Turn,
};

use crate::agent::SalesAgent;
use crate::follow_up::FollowUpReason;
use crate::intent::TurnIntent;

/// Conversation events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// Stage changed
    StageChanged {
        from: ConversationStage,
        to: ConversationStage,
    },
    /// Fact learned
    FactLearned { key: String, value: String },
    /// Conversation ended
    Ended { reason: EndReason },
}

/// Reason for conversation end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Customer declined or asked not to be called
    OptedOut,
    /// Customer asked to continue later
    Deferred,
    /// Application drafted at the documents step
    Completed,
}

impl EndReason {
    /// Follow-up the ending calls for, if any
    pub fn follow_up_reason(&self) -> Option<FollowUpReason> {
        match self {
            EndReason::OptedOut => None,
            EndReason::Deferred => Some(FollowUpReason::Callback),
            EndReason::Completed => Some(FollowUpReason::DocumentsLink),
        }
    }
}

/// Conversation manager
pub struct Conversation {
    session_id: String,
    agent: Arc<SalesAgent>,
    context: ConversationContext,
    transcript: Vec<Turn>,
    end_reason: Option<EndReason>,
}

impl Conversation {
    /// Start a conversation; the agent's greeting becomes the first turn
    pub fn new(agent: Arc<SalesAgent>) -> Self {
        let opening = agent.initial_state();
        Self::start(agent, opening)
    }

    /// Start a conversation with a customer whose name is already known
    pub fn for_customer(agent: Arc<SalesAgent>, customer_name: impl Into<String>) -> Self {
        let opening = agent.initial_state_for(customer_name);
        Self::start(agent, opening)
    }

    /// Continue from a stored context without a greeting
    pub fn resume(agent: Arc<SalesAgent>, context: ConversationContext) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(session_id = %session_id, stage = %context.stage, "Conversation resumed");

        Self {
            session_id,
            agent,
            context,
            transcript: Vec::new(),
            end_reason: None,
        }
    }

    fn start(agent: Arc<SalesAgent>, opening: AgentResponse) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(session_id = %session_id, "Conversation started");

        let greeting = Turn::agent(opening.reply).with_stage(opening.context.stage);

        Self {
            session_id,
            agent,
            context: opening.context,
            transcript: vec![greeting],
            end_reason: None,
        }
    }

    /// Feed one customer utterance, returning the agent's response and the
    /// events it caused
    pub fn respond(&mut self, utterance: &str) -> (AgentResponse, Vec<ConversationEvent>) {
        let previous = self.context.clone();
        let (signals, response) = self.agent.advance_classified(utterance, &previous);

        let customer_turn = Turn::customer(utterance).with_stage(previous.stage);
        tracing::debug!(
            session_id = %self.session_id,
            words = customer_turn.word_count(),
            "Customer turn"
        );
        self.transcript.push(customer_turn);
        self.transcript
            .push(Turn::agent(response.reply.clone()).with_stage(response.context.stage));

        let mut events = Vec::new();
        let next = &response.context;

        if next.stage != previous.stage {
            events.push(ConversationEvent::StageChanged {
                from: previous.stage,
                to: next.stage,
            });
        }

        if next.loan_type != previous.loan_type {
            if let Some(loan_type) = next.known_loan_type() {
                events.push(ConversationEvent::FactLearned {
                    key: "loan_type".to_string(),
                    value: loan_type.to_string(),
                });
            }
        }

        if next.amount != previous.amount {
            if let Some(amount) = &next.amount {
                events.push(ConversationEvent::FactLearned {
                    key: "amount".to_string(),
                    value: amount.clone(),
                });
            }
        }

        if next.stage == ConversationStage::Closing && previous.stage != ConversationStage::Closing {
            let reason = match signals.intent() {
                TurnIntent::OptOut => EndReason::OptedOut,
                TurnIntent::Defer => EndReason::Deferred,
                _ => EndReason::Completed,
            };
            self.end_reason = Some(reason);
            events.push(ConversationEvent::Ended { reason });

            tracing::info!(
                session_id = %self.session_id,
                reason = ?reason,
                turns = self.transcript.len(),
                loan_type = %next.loan_type.unwrap_or(LoanType::Unknown),
                "Conversation ended"
            );
        }

        self.context = response.context.clone();
        (response, events)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn agent(&self) -> &SalesAgent {
        &self.agent
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn stage(&self) -> ConversationStage {
        self.context.stage
    }

    /// All turns so far, agent greeting first
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Whether the conversation sits in an absorbing stage
    pub fn is_finished(&self) -> bool {
        self.context.is_finished()
    }

    /// Why the conversation reached closing, if it did during this session
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Follow-up due for this conversation, if any
    pub fn follow_up_reason(&self) -> Option<FollowUpReason> {
        if self.context.follow_up_needed != Some(true) {
            return None;
        }
        self.end_reason.and_then(|reason| reason.follow_up_reason())
    }
}
