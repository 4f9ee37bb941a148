//! Intent lexicon configuration
//!
//! Phrase lists and keyword rules the intent detector matches against. All
//! matching is substring based, so every entry here is a fragment, not a word.

use regex::Regex;
use serde::{Deserialize, Serialize};

use sales_agent_core::LoanType;

use crate::ConfigError;

/// Keywords that identify one loan category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanKeywordRule {
    /// Category this rule detects
    pub loan_type: LoanType,
    /// Lower-case substrings; any hit selects the category
    pub keywords: Vec<String>,
}

impl LoanKeywordRule {
    pub fn new(loan_type: LoanType, keywords: &[&str]) -> Self {
        Self {
            loan_type,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Intent lexicon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentLexicon {
    /// Opt-out phrases ("no", "stop", "don't call", ...)
    #[serde(default = "default_negative_phrases")]
    pub negative_phrases: Vec<String>,
    /// "Later / busy / let me think" phrases
    #[serde(default = "default_defer_phrases")]
    pub defer_phrases: Vec<String>,
    /// Loan category rules, checked in declared order; first hit wins
    #[serde(default = "default_loan_rules")]
    pub loan_rules: Vec<LoanKeywordRule>,
    /// Amount regex; group 1 is the captured expression
    #[serde(default = "default_amount_pattern")]
    pub amount_pattern: String,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_negative_phrases() -> Vec<String> {
    to_strings(&[
        "नहीं",
        "interested नहीं",
        "मत भेजो",
        "नंबर हटाओ",
        "no",
        "stop",
        "don't",
        "call mat",
        "interest nahi",
    ])
}

fn default_defer_phrases() -> Vec<String> {
    to_strings(&["बाद में", "बाद", "later", "time", "सोच", "सोचना"])
}

fn default_loan_rules() -> Vec<LoanKeywordRule> {
    vec![
        LoanKeywordRule::new(LoanType::Personal, &["personal", "पर्सनल", "salary", "सैलरी"]),
        LoanKeywordRule::new(LoanType::Business, &["business", "बिज़नेस", "व्यापार", "msme"]),
        LoanKeywordRule::new(
            LoanType::Home,
            &["home", "हाउस", "घर", "home loan", "property", "मकान"],
        ),
    ]
}

fn default_amount_pattern() -> String {
    // ASCII digits only; करोड़ is accepted with either nukta encoding
    r"(?i)([0-9]{1,3}(?:[,\s]?[0-9]{2,3})*(?:\s?(?:लाख|करोड़|करोड़|crore|lakh))?)".to_string()
}

impl Default for IntentLexicon {
    fn default() -> Self {
        Self {
            negative_phrases: default_negative_phrases(),
            defer_phrases: default_defer_phrases(),
            loan_rules: default_loan_rules(),
            amount_pattern: default_amount_pattern(),
        }
    }
}

impl IntentLexicon {
    /// Compile the amount pattern
    pub fn compile_amount_pattern(&self) -> Result<Regex, ConfigError> {
        let regex = Regex::new(&self.amount_pattern).map_err(|e| ConfigError::InvalidValue {
            field: "lexicon.amount_pattern".to_string(),
            message: e.to_string(),
        })?;
        if regex.captures_len() < 2 {
            return Err(ConfigError::InvalidValue {
                field: "lexicon.amount_pattern".to_string(),
                message: "pattern needs a capture group".to_string(),
            });
        }
        Ok(regex)
    }

    /// Validate the lexicon, collecting every problem found
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.negative_phrases.iter().all(|p| p.trim().is_empty()) {
            errors.push("At least one negative phrase required".to_string());
        }
        if self.defer_phrases.iter().all(|p| p.trim().is_empty()) {
            errors.push("At least one defer phrase required".to_string());
        }
        if self.loan_rules.is_empty() {
            errors.push("At least one loan keyword rule required".to_string());
        }
        for rule in &self.loan_rules {
            if !rule.loan_type.is_known() {
                errors.push("Loan keyword rules cannot target the unknown category".to_string());
            }
            if rule.keywords.iter().any(|k| k.trim().is_empty()) {
                errors.push(format!("Empty keyword in {} rule", rule.loan_type));
            }
        }
        if let Err(e) = self.compile_amount_pattern() {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
