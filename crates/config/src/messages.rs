//! Message template configuration
//!
//! Pre-approved SMS and WhatsApp templates used for post-call follow-up.

use serde::{Deserialize, Serialize};

use sales_agent_core::{MessageChannel, MessageTemplate, TemplateStore};

/// Message templates configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplateConfig {
    /// All templates
    #[serde(default = "default_templates")]
    pub templates: Vec<MessageTemplate>,
    /// Which templates go out for each follow-up reason
    #[serde(default)]
    pub follow_up: FollowUpTemplateIds,
}

impl Default for MessageTemplateConfig {
    fn default() -> Self {
        Self {
            templates: default_templates(),
            follow_up: FollowUpTemplateIds::default(),
        }
    }
}

/// Template identifiers per follow-up reason and channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpTemplateIds {
    /// Application drafted, documents link
    pub documents_sms: String,
    pub documents_whatsapp: String,
    /// Customer asked for details later
    pub callback_sms: String,
    pub callback_whatsapp: String,
}

impl Default for FollowUpTemplateIds {
    fn default() -> Self {
        Self {
            documents_sms: "sms_documents_link".to_string(),
            documents_whatsapp: "whatsapp_documents_link".to_string(),
            callback_sms: "sms_offer_summary".to_string(),
            callback_whatsapp: "whatsapp_offer_summary".to_string(),
        }
    }
}

fn template(id: &str, channel: MessageChannel, title: &str, body: &str, variables: &[&str]) -> MessageTemplate {
    MessageTemplate {
        id: id.to_string(),
        channel,
        title: title.to_string(),
        body: body.to_string(),
        variables: variables.iter().map(|v| v.to_string()).collect(),
    }
}

fn default_templates() -> Vec<MessageTemplate> {
    vec![
        template(
            "sms_documents_link",
            MessageChannel::Sms,
            "दस्तावेज़ अपलोड लिंक",
            "नमस्ते {customer_name}, आपका {product_title} आवेदन ड्राफ्ट तैयार है। दस्तावेज़ अपलोड करें: {link} - विशफिन",
            &["customer_name", "product_title", "link"],
        ),
        template(
            "whatsapp_documents_link",
            MessageChannel::Whatsapp,
            "आवेदन ड्राफ्ट और दस्तावेज़",
            "नमस्ते {customer_name} जी, {requested_amount} के लिए आपका {product_title} ({apr}) आवेदन ड्राफ्ट हो गया है। आधार, पैन और आय प्रमाण यहाँ अपलोड करें: {link}",
            &["customer_name", "requested_amount", "product_title", "apr", "link"],
        ),
        template(
            "sms_offer_summary",
            MessageChannel::Sms,
            "ऑफ़र सारांश",
            "नमस्ते {customer_name}, विशफिन से {product_title}: {apr}। अपनी सुविधा से विवरण देखें: {link}",
            &["customer_name", "product_title", "apr", "link"],
        ),
        template(
            "whatsapp_offer_summary",
            MessageChannel::Whatsapp,
            "ऑफ़र सारांश और कॉल-बैक",
            "नमस्ते {customer_name} जी, जैसा बात हुई थी, {product_title} की जानकारी भेज रही हूँ। ब्याज दर {apr}, {turnaround}। जब समय हो, इस संदेश का जवाब दें या यहाँ देखें: {link}",
            &["customer_name", "product_title", "apr", "turnaround", "link"],
        ),
    ]
}

impl MessageTemplateConfig {
    /// Validate that every follow-up template exists on the right channel
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let ids = &self.follow_up;
        let expected = [
            (&ids.documents_sms, MessageChannel::Sms),
            (&ids.documents_whatsapp, MessageChannel::Whatsapp),
            (&ids.callback_sms, MessageChannel::Sms),
            (&ids.callback_whatsapp, MessageChannel::Whatsapp),
        ];

        let mut errors = Vec::new();
        for (id, channel) in expected {
            if let Err(e) = self.template_for(id, channel) {
                errors.push(e.to_string());
            }
        }

        for template in &self.templates {
            for name in &template.variables {
                if !template.body.contains(&format!("{{{}}}", name)) {
                    errors.push(format!(
                        "Template {} declares unused variable {}",
                        template.id, name
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl TemplateStore for MessageTemplateConfig {
    fn template(&self, id: &str) -> Option<&MessageTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    fn by_channel(&self, channel: MessageChannel) -> Vec<&MessageTemplate> {
        self.templates.iter().filter(|t| t.channel == channel).collect()
    }
}
