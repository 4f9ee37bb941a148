//! Agent configuration

use serde::{Deserialize, Serialize};

/// Agent configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Default language of the script
    #[serde(default = "default_agent_language")]
    pub language: String,

    /// Persona configuration
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Stop reading input once the call reaches an absorbing stage
    #[serde(default = "default_true")]
    pub end_on_terminal_stage: bool,
}

fn default_agent_language() -> String {
    "hi".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            language: default_agent_language(),
            persona: PersonaConfig::default(),
            end_on_terminal_stage: true,
        }
    }
}

/// Who the agent says it is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Agent persona name
    #[serde(default = "default_persona_name")]
    pub name: String,

    /// Company name as spoken aloud
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Short brand name used in sign-offs
    #[serde(default = "default_brand_name")]
    pub brand_name: String,
}

fn default_persona_name() -> String {
    "प्रिया".to_string()
}

fn default_company_name() -> String {
    "विशफिन डॉट कॉम".to_string()
}

fn default_brand_name() -> String {
    "विशफिन".to_string()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
            company_name: default_company_name(),
            brand_name: default_brand_name(),
        }
    }
}
