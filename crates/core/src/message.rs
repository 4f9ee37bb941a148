//! Outbound message templates
//!
//! The agent never talks to a delivery provider. It only asks a
//! [`TemplateStore`] for a template and fills its placeholders from a plain
//! key → value map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Delivery channel of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageChannel {
    Sms,
    Whatsapp,
}

impl MessageChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageChannel::Sms => "sms",
            MessageChannel::Whatsapp => "whatsapp",
        }
    }
}

impl std::fmt::Display for MessageChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pre-approved message template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    /// Template identifier
    pub id: String,
    /// Delivery channel
    pub channel: MessageChannel,
    /// Human readable title
    #[serde(default)]
    pub title: String,
    /// Body with `{name}` placeholders
    pub body: String,
    /// Placeholder names used in the body
    #[serde(default)]
    pub variables: Vec<String>,
}

impl MessageTemplate {
    /// Declared variables with no value (or an empty value) in `values`
    pub fn missing_variables(&self, values: &HashMap<String, String>) -> Vec<String> {
        self.variables
            .iter()
            .filter(|name| values.get(*name).map_or(true, |v| v.is_empty()))
            .cloned()
            .collect()
    }

    /// Fill the body, failing if any declared variable has no value
    pub fn fill_strict(&self, values: &HashMap<String, String>) -> Result<String> {
        let missing = self.missing_variables(values);
        if !missing.is_empty() {
            return Err(Error::MissingVariables {
                template: self.id.clone(),
                missing,
            });
        }
        Ok(fill_template(self, values))
    }
}

/// Substitute `{name}` placeholders in the template body
///
/// Placeholders without a value are left verbatim so the gap is visible in a
/// preview.
pub fn fill_template(template: &MessageTemplate, values: &HashMap<String, String>) -> String {
    let mut body = template.body.clone();
    for name in &template.variables {
        match values.get(name) {
            Some(value) if !value.is_empty() => {
                body = body.replace(&format!("{{{}}}", name), value);
            }
            _ => {
                tracing::warn!(template = %template.id, variable = %name, "Template variable has no value");
            }
        }
    }
    body
}

/// Read access to a catalogue of message templates
pub trait TemplateStore: Send + Sync {
    /// Look up a template by identifier
    fn template(&self, id: &str) -> Option<&MessageTemplate>;

    /// All templates for a channel
    fn by_channel(&self, channel: MessageChannel) -> Vec<&MessageTemplate>;

    /// Look up a template and check it belongs to `channel`
    fn template_for(&self, id: &str, channel: MessageChannel) -> Result<&MessageTemplate> {
        let template = self
            .template(id)
            .ok_or_else(|| Error::TemplateNotFound(id.to_string()))?;
        if template.channel != channel {
            return Err(Error::WrongChannel {
                template: id.to_string(),
                expected: channel.to_string(),
            });
        }
        Ok(template)
    }
}
