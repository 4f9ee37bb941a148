//! Loan Sales Agent
//!
//! Stage-based dialog manager. Each turn classifies the utterance, merges any
//! facts it carries into the context and picks the scripted reply for the
//! stage being left. Facts are only learned before the application draft;
//! the documents → closing turn keeps the context as it was.

use once_cell::sync::Lazy;

use sales_agent_config::{DomainConfig, PersonaConfig, ReplyScript};
use sales_agent_core::{AgentResponse, ConversationContext, ConversationStage};

use crate::intent::{IntentDetector, IntentSignals, TurnIntent};
use crate::AgentError;

/// Scripted loan sales agent
///
/// Immutable after construction; share it by reference or `Arc` between
/// conversations.
pub struct SalesAgent {
    detector: IntentDetector,
    script: ReplyScript,
    persona: PersonaConfig,
}

impl SalesAgent {
    /// Create an agent with the built-in lexicon, script and persona
    pub fn new() -> Self {
        Self {
            detector: IntentDetector::new(),
            script: ReplyScript::default(),
            persona: PersonaConfig::default(),
        }
    }

    /// Build an agent from domain configuration
    pub fn from_config(domain: &DomainConfig, persona: &PersonaConfig) -> Result<Self, AgentError> {
        let empty = domain.script.empty_fields();
        if !empty.is_empty() {
            return Err(AgentError::Config(sales_agent_config::ConfigError::MissingField(
                empty.join(", "),
            )));
        }

        Ok(Self {
            detector: IntentDetector::from_lexicon(&domain.lexicon)?,
            script: domain.script.clone(),
            persona: persona.clone(),
        })
    }

    pub fn detector(&self) -> &IntentDetector {
        &self.detector
    }

    pub fn script(&self) -> &ReplyScript {
        &self.script
    }

    pub fn persona(&self) -> &PersonaConfig {
        &self.persona
    }

    /// Opening context and greeting
    pub fn initial_state(&self) -> AgentResponse {
        self.greet(ConversationContext::new())
    }

    /// Opening context for a customer whose name the caller already knows
    pub fn initial_state_for(&self, customer_name: impl Into<String>) -> AgentResponse {
        self.greet(ConversationContext::new().with_customer_name(customer_name))
    }

    fn greet(&self, context: ConversationContext) -> AgentResponse {
        let reply = self.script.greetings.format(
            &self.persona.name,
            &self.persona.company_name,
            context.customer_name.as_deref(),
        );
        AgentResponse::new(reply, context)
    }

    /// Process one customer utterance against the previous context.
    ///
    /// Total and deterministic: the same utterance and context always give
    /// the same reply and next context.
    pub fn advance(&self, utterance: &str, previous: &ConversationContext) -> AgentResponse {
        self.advance_classified(utterance, previous).1
    }

    /// [`SalesAgent::advance`], also returning what the utterance was
    /// classified as
    pub fn advance_classified(
        &self,
        utterance: &str,
        previous: &ConversationContext,
    ) -> (IntentSignals, AgentResponse) {
        let signals = self.detector.classify(utterance);
        let intent = signals.intent();

        tracing::debug!(
            stage = %previous.stage,
            intent = ?intent,
            loan_type = %signals.loan_type,
            amount = ?signals.amount,
            "Classified utterance"
        );

        let response = match intent {
            TurnIntent::Silence => {
                AgentResponse::new(self.script.fallbacks.not_understood.clone(), previous.clone())
            }
            TurnIntent::OptOut => {
                let mut context = previous.clone();
                context.stage = ConversationStage::Closing;
                context.follow_up_needed = Some(false);
                AgentResponse::new(self.render(&self.script.closings.opt_out), context)
            }
            TurnIntent::Defer => {
                let mut context = previous.clone();
                context.stage = ConversationStage::Closing;
                context.follow_up_needed = Some(true);
                AgentResponse::new(self.render(&self.script.closings.deferred), context)
            }
            TurnIntent::Continue => self.continue_funnel(&signals, previous),
        };

        if response.context.stage != previous.stage {
            tracing::debug!(
                from = %previous.stage,
                to = %response.context.stage,
                "Stage transition"
            );
        }

        (signals, response)
    }

    fn continue_funnel(&self, signals: &IntentSignals, previous: &ConversationContext) -> AgentResponse {
        let stages = &self.script.stages;

        match previous.stage {
            ConversationStage::Introduction => {
                let context = advance_to(merge_facts(previous, signals), ConversationStage::Qualification);
                AgentResponse::new(stages.qualification.clone(), context)
            }
            ConversationStage::Qualification => {
                let context = advance_to(merge_facts(previous, signals), ConversationStage::NeedAnalysis);
                AgentResponse::new(stages.need_analysis.clone(), context)
            }
            ConversationStage::NeedAnalysis => {
                let context = advance_to(merge_facts(previous, signals), ConversationStage::Pitch);
                AgentResponse::new(stages.pitch.clone(), context)
            }
            ConversationStage::Pitch => {
                let context = advance_to(merge_facts(previous, signals), ConversationStage::Documents);
                let reply = self.offer_reply(&context);
                AgentResponse::new(reply, context)
            }
            ConversationStage::Documents => {
                let mut context = advance_to(previous.clone(), ConversationStage::Closing);
                context.follow_up_needed = Some(true);
                AgentResponse::new(stages.closing.clone(), context)
            }
            ConversationStage::Closing => {
                AgentResponse::new(self.render(&self.script.closings.thank_you), previous.clone())
            }
            ConversationStage::Fallback => {
                let context = advance_to(previous.clone(), ConversationStage::Fallback);
                AgentResponse::new(self.script.fallbacks.acknowledged.clone(), context)
            }
        }
    }

    /// Pitch reply: amount lead-in, offer wording for the loan category, then
    /// the ask to start the application draft
    fn offer_reply(&self, context: &ConversationContext) -> String {
        let offers = &self.script.offers;
        let loan_detail = offers.loan_detail(context.amount.as_deref());
        let offer = offers.for_loan_type(context.loan_type);

        self.script
            .stages
            .documents
            .replace("{loan_detail}", &loan_detail)
            .replace("{offer}", offer)
    }

    fn render(&self, text: &str) -> String {
        text.replace("{company_name}", &self.persona.company_name)
            .replace("{brand_name}", &self.persona.brand_name)
            .replace("{agent_name}", &self.persona.name)
    }
}

impl Default for SalesAgent {
    fn default() -> Self {
        Self::new()
    }
}

fn advance_to(mut context: ConversationContext, stage: ConversationStage) -> ConversationContext {
    context.stage = stage;
    context
}

/// Merge extracted facts: a known loan type is never replaced, an amount is
/// never overwritten. An unknown loan type is recorded but can still be
/// upgraded by a later turn.
fn merge_facts(previous: &ConversationContext, signals: &IntentSignals) -> ConversationContext {
    let mut context = previous.clone();

    if context.known_loan_type().is_none()
        && (signals.loan_type.is_known() || context.loan_type.is_none())
    {
        context.loan_type = Some(signals.loan_type);
    }

    if context.amount.is_none() {
        context.amount = signals.amount.clone();
    }

    context
}

static DEFAULT_AGENT: Lazy<SalesAgent> = Lazy::new(SalesAgent::new);

/// Opening context and greeting from the built-in agent
pub fn initial_agent_state() -> AgentResponse {
    DEFAULT_AGENT.initial_state()
}

/// One turn against the built-in agent
pub fn agent_reply(utterance: &str, context: &ConversationContext) -> AgentResponse {
    DEFAULT_AGENT.advance(utterance, context)
}
