//! Domain configuration loader
//!
//! Unified interface for loading and accessing the conversation script,
//! intent lexicon, product catalogue and message templates.

use std::path::Path;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use parking_lot::RwLock;

use crate::{
    ConfigError,
    lexicon::IntentLexicon,
    messages::MessageTemplateConfig,
    product::ProductConfig,
    prompts::ReplyScript,
};

/// Complete domain configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Domain name
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Domain version
    #[serde(default = "default_version")]
    pub version: String,
    /// Phrase lists and keyword rules
    #[serde(default)]
    pub lexicon: IntentLexicon,
    /// Spoken replies
    #[serde(default)]
    pub script: ReplyScript,
    /// Loan products
    #[serde(default)]
    pub products: ProductConfig,
    /// Follow-up message templates
    #[serde(default)]
    pub messages: MessageTemplateConfig,
}

fn default_domain() -> String {
    "loan_sales".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            version: default_version(),
            lexicon: IntentLexicon::default(),
            script: ReplyScript::default(),
            products: ProductConfig::default(),
            messages: MessageTemplateConfig::default(),
        }
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError(e.to_string()))
}

impl DomainConfig {
    /// Create new domain config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read_file(path.as_ref())?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load from JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read_file(path.as_ref())?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load from TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read_file(path.as_ref())?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load from a file, picking the format by extension (JSON otherwise)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("toml") => Self::from_toml_file(path),
            _ => Self::from_json_file(path),
        }
    }

    /// Save to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save to JSON file
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(lexicon_errors) = self.lexicon.validate() {
            errors.extend(lexicon_errors);
        }

        for field in self.script.empty_fields() {
            errors.push(format!("Reply text {} is empty", field));
        }

        if self.products.for_loan_type(None).is_none() {
            errors.push("A personal loan product is required as the default offer".to_string());
        }
        for loan_type in self.products.duplicate_categories() {
            errors.push(format!("More than one {} product", loan_type));
        }

        if let Err(message_errors) = self.messages.validate() {
            errors.extend(message_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Merge with another config (other takes precedence for non-default values)
    pub fn merge(&mut self, other: &DomainConfig) {
        if other.domain != default_domain() {
            self.domain = other.domain.clone();
        }
        if other.version != default_version() {
            self.version = other.version.clone();
        }

        if other.lexicon != IntentLexicon::default() {
            self.lexicon = other.lexicon.clone();
        }
        if other.script != ReplyScript::default() {
            self.script = other.script.clone();
        }

        // Products replace by category, new categories are appended
        for product in &other.products.products {
            match self.products.products.iter_mut().find(|p| p.loan_type == product.loan_type) {
                Some(existing) => *existing = product.clone(),
                None => self.products.products.push(product.clone()),
            }
        }

        // Templates replace by id, new ids are appended
        for template in &other.messages.templates {
            match self.messages.templates.iter_mut().find(|t| t.id == template.id) {
                Some(existing) => *existing = template.clone(),
                None => self.messages.templates.push(template.clone()),
            }
        }
        self.messages.follow_up = other.messages.follow_up.clone();
    }
}

/// Domain configuration manager with hot-reload support
pub struct DomainConfigManager {
    /// Current configuration
    config: Arc<RwLock<DomainConfig>>,
    /// Config file path (if loaded from file)
    config_path: Option<String>,
}

impl DomainConfigManager {
    /// Create new manager with default config
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(DomainConfig::default())),
            config_path: None,
        }
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let config = load_validated(path.as_ref())?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path: Some(path_str),
        })
    }

    /// Reload configuration from file
    ///
    /// The current configuration is kept if the file fails to load or validate.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let path = self.config_path.as_ref()
            .ok_or_else(|| ConfigError::FileNotFound("No config path set".to_string()))?;

        let new_config = load_validated(Path::new(path))?;
        *self.config.write() = new_config;
        tracing::info!(path = %path, "Reloaded domain configuration");
        Ok(())
    }

    /// Get current configuration
    pub fn get(&self) -> DomainConfig {
        self.config.read().clone()
    }

    /// Update configuration
    pub fn update(&self, config: DomainConfig) {
        *self.config.write() = config;
    }
}

impl Default for DomainConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn load_validated(path: &Path) -> Result<DomainConfig, ConfigError> {
    let config = DomainConfig::from_file(path)?;
    config.validate().map_err(|errors| ConfigError::InvalidValue {
        field: path.display().to_string(),
        message: errors.join("; "),
    })?;
    Ok(config)
}

/// Global domain configuration instance
static DOMAIN_CONFIG: once_cell::sync::Lazy<DomainConfigManager> =
    once_cell::sync::Lazy::new(DomainConfigManager::new);

/// Get global domain configuration
pub fn domain_config() -> &'static DomainConfigManager {
    &DOMAIN_CONFIG
}

/// Initialize global domain configuration from file
///
/// The global keeps its previous configuration if the file fails to load or
/// validate.
pub fn init_domain_config(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let manager = DomainConfigManager::from_file(path.as_ref())?;
    DOMAIN_CONFIG.update(manager.get());
    tracing::info!(path = %path.as_ref().display(), "Initialized global domain configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_agent_core::LoanType;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DomainConfig::default();
        assert_eq!(config.domain, "loan_sales");
        assert_eq!(config.products.products.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_collects_errors() {
        let mut bad_config = DomainConfig::default();
        bad_config.lexicon.amount_pattern = "(".to_string();
        bad_config.script.stages.pitch.clear();
        bad_config.products.products.retain(|p| p.loan_type != LoanType::Personal);

        let errors = bad_config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domain.yaml");

        let mut config = DomainConfig::default();
        config.version = "2.1.0".to_string();
        config.to_yaml_file(&path).unwrap();

        let loaded = DomainConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "version: \"3.0.0\"").unwrap();
        writeln!(file, "lexicon:").unwrap();
        writeln!(file, "  defer_phrases: [\"kal\", \"baad mein\"]").unwrap();

        let config = DomainConfig::from_file(file.path()).unwrap();
        assert_eq!(config.version, "3.0.0");
        assert_eq!(config.lexicon.defer_phrases.len(), 2);
        assert_eq!(config.script, ReplyScript::default());
    }

    #[test]
    fn test_missing_file() {
        let err = DomainConfig::from_yaml_file("/nonexistent/domain.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_manager_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domain.json");
        DomainConfig::default().to_json_file(&path).unwrap();

        let manager = DomainConfigManager::from_file(&path).unwrap();
        assert_eq!(manager.get().version, "1.0.0");

        let mut changed = DomainConfig::default();
        changed.version = "1.1.0".to_string();
        changed.to_json_file(&path).unwrap();
        manager.reload().unwrap();
        assert_eq!(manager.get().version, "1.1.0");

        // Invalid file leaves the current config in place
        let mut broken = DomainConfig::default();
        broken.lexicon.loan_rules.clear();
        broken.to_json_file(&path).unwrap();
        assert!(manager.reload().is_err());
        assert_eq!(manager.get().version, "1.1.0");
    }

    #[test]
    fn test_reload_without_path() {
        let manager = DomainConfigManager::new();
        assert!(manager.reload().is_err());
        assert_eq!(manager.get().products.products.len(), 3);
    }

    #[test]
    fn test_global_domain_config() {
        // Only test touching the process-wide instance
        assert_eq!(domain_config().get(), DomainConfig::default());

        assert!(init_domain_config("/nonexistent/domain.yaml").is_err());
        assert_eq!(domain_config().get().version, "1.0.0");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domain.yaml");
        let mut config = DomainConfig::default();
        config.version = "4.2.0".to_string();
        config.to_yaml_file(&path).unwrap();

        init_domain_config(&path).unwrap();
        assert_eq!(domain_config().get().version, "4.2.0");
        assert!(std::ptr::eq(domain_config(), domain_config()));
    }

    #[test]
    fn test_merge() {
        let mut base = DomainConfig::default();
        let mut overlay = DomainConfig::default();
        overlay.version = "2.0.0".to_string();
        overlay.products.products = vec![crate::LoanProduct {
            apr: "8.10% से शुरुआत".to_string(),
            ..crate::LoanProduct::home()
        }];
        overlay.messages.templates.truncate(1);
        overlay.messages.templates[0].body.push_str(" धन्यवाद");

        base.merge(&overlay);

        assert_eq!(base.version, "2.0.0");
        assert_eq!(base.products.products.len(), 3);
        assert_eq!(
            base.products.for_loan_type(Some(LoanType::Home)).unwrap().apr,
            "8.10% से शुरुआत"
        );
        assert_eq!(base.messages.templates.len(), 4);
        assert!(base.messages.templates[0].body.ends_with("धन्यवाद"));
    }
}
