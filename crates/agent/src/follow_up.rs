//! Follow-up message planning
//!
//! Turns a finished conversation into the SMS and WhatsApp messages that
//! should go out after the call. Nothing is sent from here.

use std::collections::HashMap;

use serde::Serialize;

use sales_agent_config::{DomainConfig, FollowUpTemplateIds, MessageTemplateConfig, ProductConfig};
use sales_agent_core::{fill_template, ConversationContext, MessageChannel, TemplateStore};

use crate::AgentError;

/// Why a follow-up goes out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpReason {
    /// Application drafted; customer needs the document upload link
    DocumentsLink,
    /// Customer asked to be contacted later
    Callback,
}

/// A filled message ready for a delivery provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUpMessage {
    pub template_id: String,
    pub channel: MessageChannel,
    pub body: String,
    /// Declared variables that had no value; left verbatim in `body`
    pub missing: Vec<String>,
}

impl FollowUpMessage {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Follow-up planner
pub struct FollowUpPlanner<S: TemplateStore = MessageTemplateConfig> {
    store: S,
    ids: FollowUpTemplateIds,
    products: ProductConfig,
}

impl FollowUpPlanner<MessageTemplateConfig> {
    /// Planner over the domain's template catalogue and products
    pub fn from_config(domain: &DomainConfig) -> Self {
        Self::new(
            domain.messages.clone(),
            domain.messages.follow_up.clone(),
            domain.products.clone(),
        )
    }
}

impl Default for FollowUpPlanner<MessageTemplateConfig> {
    fn default() -> Self {
        Self::from_config(&DomainConfig::default())
    }
}

impl<S: TemplateStore> FollowUpPlanner<S> {
    pub fn new(store: S, ids: FollowUpTemplateIds, products: ProductConfig) -> Self {
        Self { store, ids, products }
    }

    fn template_ids(&self, reason: FollowUpReason) -> [(&str, MessageChannel); 2] {
        match reason {
            FollowUpReason::DocumentsLink => [
                (self.ids.documents_sms.as_str(), MessageChannel::Sms),
                (self.ids.documents_whatsapp.as_str(), MessageChannel::Whatsapp),
            ],
            FollowUpReason::Callback => [
                (self.ids.callback_sms.as_str(), MessageChannel::Sms),
                (self.ids.callback_whatsapp.as_str(), MessageChannel::Whatsapp),
            ],
        }
    }

    /// Template variables known from the conversation itself
    fn context_variables(&self, context: &ConversationContext) -> HashMap<String, String> {
        let mut vars = HashMap::new();

        if let Some(name) = &context.customer_name {
            vars.insert("customer_name".to_string(), name.clone());
        }
        if let Some(amount) = &context.amount {
            vars.insert("requested_amount".to_string(), amount.clone());
        }
        if let Some(product) = self.products.for_loan_type(context.loan_type) {
            vars.insert("product_title".to_string(), product.title.clone());
            vars.insert("apr".to_string(), product.apr.clone());
            vars.insert("turnaround".to_string(), product.turnaround.clone());
        }

        vars
    }

    /// Plan the messages for a conversation.
    ///
    /// Returns nothing unless the context asks for a follow-up. Values in
    /// `base_vars` (e.g. `link`) win over those derived from the context.
    pub fn plan(
        &self,
        context: &ConversationContext,
        reason: FollowUpReason,
        base_vars: &HashMap<String, String>,
    ) -> Result<Vec<FollowUpMessage>, AgentError> {
        if context.follow_up_needed != Some(true) {
            tracing::debug!(follow_up = ?context.follow_up_needed, "No follow-up planned");
            return Ok(Vec::new());
        }

        let mut vars = self.context_variables(context);
        vars.extend(base_vars.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut messages = Vec::with_capacity(2);
        for (id, channel) in self.template_ids(reason) {
            let template = self.store.template_for(id, channel)?;
            let missing = template.missing_variables(&vars);

            messages.push(FollowUpMessage {
                template_id: template.id.clone(),
                channel,
                body: fill_template(template, &vars),
                missing,
            });
        }

        tracing::info!(
            reason = ?reason,
            count = messages.len(),
            incomplete = messages.iter().filter(|m| !m.is_complete()).count(),
            "Planned follow-up messages"
        );

        Ok(messages)
    }
}
