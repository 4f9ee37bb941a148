//! Intent Detection and Entity Extraction
//!
//! Classifies a customer utterance into opt-out / defer signals, a loan
//! category and an optional amount expression.
//!
//! Classification is approximate: phrases match as plain substrings with no
//! word boundaries, so "no" also fires inside "not" or "know". That is the
//! intended permissive policy, not exact language understanding.

use regex::Regex;
use serde::Serialize;

use sales_agent_config::IntentLexicon;
use sales_agent_core::LoanType;

use crate::AgentError;

/// What the customer wants from this turn, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnIntent {
    /// Nothing usable was said
    Silence,
    /// Customer declined or asked not to be contacted
    OptOut,
    /// Customer asked to continue later
    Defer,
    /// Anything else; the funnel moves on
    Continue,
}

/// Everything the detector extracted from one utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentSignals {
    /// Trimmed, lower-cased text used for matching
    pub normalized: String,
    /// Contains an opt-out phrase
    pub negative: bool,
    /// Contains a defer phrase and no opt-out phrase
    pub defer: bool,
    /// First matching loan category
    pub loan_type: LoanType,
    /// Amount expression from the original text
    pub amount: Option<String>,
}

impl IntentSignals {
    /// Collapse the signals into the intent that drives the turn
    pub fn intent(&self) -> TurnIntent {
        if self.normalized.is_empty() {
            TurnIntent::Silence
        } else if self.negative {
            TurnIntent::OptOut
        } else if self.defer {
            TurnIntent::Defer
        } else {
            TurnIntent::Continue
        }
    }
}

/// Compiled loan rule
struct CompiledLoanRule {
    loan_type: LoanType,
    keywords: Vec<String>,
}

/// Intent detector
pub struct IntentDetector {
    negative_phrases: Vec<String>,
    defer_phrases: Vec<String>,
    /// Checked in declared order; first hit wins
    loan_rules: Vec<CompiledLoanRule>,
    amount_pattern: Regex,
}

impl IntentDetector {
    /// Create a detector with the built-in Hindi/English lexicon
    pub fn new() -> Self {
        // The built-in lexicon is covered by tests and always compiles
        Self::from_lexicon(&IntentLexicon::default())
            .expect("built-in intent lexicon must compile")
    }

    /// Build a detector from lexicon configuration
    ///
    /// Phrases and keywords go through [`IntentDetector::normalize`] so they
    /// compare like-for-like with normalized utterances.
    pub fn from_lexicon(lexicon: &IntentLexicon) -> Result<Self, AgentError> {
        lexicon
            .validate()
            .map_err(|errors| AgentError::Lexicon(errors.join("; ")))?;

        let amount_pattern = lexicon.compile_amount_pattern()?;

        let detector = Self {
            negative_phrases: normalize_all(&lexicon.negative_phrases),
            defer_phrases: normalize_all(&lexicon.defer_phrases),
            loan_rules: lexicon
                .loan_rules
                .iter()
                .map(|rule| CompiledLoanRule {
                    loan_type: rule.loan_type,
                    keywords: normalize_all(&rule.keywords),
                })
                .collect(),
            amount_pattern,
        };

        tracing::debug!(
            negative = detector.negative_phrases.len(),
            defer = detector.defer_phrases.len(),
            loan_rules = detector.loan_rules.len(),
            "Compiled intent lexicon"
        );

        Ok(detector)
    }

    /// Trim and lower-case an utterance.
    ///
    /// Precomposed Devanagari nukta letters (क़ ख़ ग़ ज़ ड़ ढ़ फ़ य़) are also
    /// decomposed so both keyboard encodings match the same phrases.
    pub fn normalize(utterance: &str) -> String {
        let mut normalized = String::with_capacity(utterance.len());
        for c in utterance.trim().chars().flat_map(char::to_lowercase) {
            match decompose_nukta(c) {
                Some(base) => {
                    normalized.push(base);
                    normalized.push(NUKTA);
                }
                None => normalized.push(c),
            }
        }
        normalized
    }

    /// Whether the normalized text contains an opt-out phrase
    pub fn is_negative(&self, normalized: &str) -> bool {
        contains_any(normalized, &self.negative_phrases)
    }

    /// Whether the normalized text contains a defer phrase.
    ///
    /// Callers should only act on this when [`IntentDetector::is_negative`] is
    /// false; opt-out always wins.
    pub fn is_defer(&self, normalized: &str) -> bool {
        contains_any(normalized, &self.defer_phrases)
    }

    /// First loan category, in declared rule order, with a keyword hit
    pub fn detect_loan_type(&self, normalized: &str) -> LoanType {
        self.loan_rules
            .iter()
            .find(|rule| contains_any(normalized, &rule.keywords))
            .map(|rule| rule.loan_type)
            .unwrap_or(LoanType::Unknown)
    }

    /// Amount expression such as "5 लाख" or "2,50,000", whitespace collapsed.
    ///
    /// Runs on the original utterance so digit formatting is preserved.
    pub fn extract_amount(&self, utterance: &str) -> Option<String> {
        let captures = self.amount_pattern.captures(utterance)?;
        let matched = captures.get(1)?.as_str();
        let collapsed = matched.split_whitespace().collect::<Vec<_>>().join(" ");

        if collapsed.is_empty() {
            None
        } else {
            Some(collapsed)
        }
    }

    /// Run every extractor over one utterance
    pub fn classify(&self, utterance: &str) -> IntentSignals {
        let normalized = Self::normalize(utterance);
        let negative = self.is_negative(&normalized);
        let defer = !negative && self.is_defer(&normalized);
        let loan_type = self.detect_loan_type(&normalized);
        let amount = self.extract_amount(utterance);

        IntentSignals {
            normalized,
            negative,
            defer,
            loan_type,
            amount,
        }
    }
}

impl Default for IntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

const NUKTA: char = '\u{093C}';

fn decompose_nukta(c: char) -> Option<char> {
    match c {
        '\u{0958}' => Some('\u{0915}'),
        '\u{0959}' => Some('\u{0916}'),
        '\u{095A}' => Some('\u{0917}'),
        '\u{095B}' => Some('\u{091C}'),
        '\u{095C}' => Some('\u{0921}'),
        '\u{095D}' => Some('\u{0922}'),
        '\u{095E}' => Some('\u{092B}'),
        '\u{095F}' => Some('\u{092F}'),
        _ => None,
    }
}

fn normalize_all(phrases: &[String]) -> Vec<String> {
    phrases
        .iter()
        .map(|p| IntentDetector::normalize(p))
        .filter(|p| !p.is_empty())
        .collect()
}

fn contains_any(text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_agent_config::LoanKeywordRule;

    #[test]
    fn test_normalize() {
        assert_eq!(IntentDetector::normalize("  Personal LOAN \n"), "personal loan");
        assert_eq!(IntentDetector::normalize("   "), "");
    }

    #[test]
    fn test_normalize_folds_precomposed_nukta() {
        // U+095B is the precomposed ज़
        let precomposed = "बि\u{095B}नेस";
        let decomposed = "बि\u{091C}\u{093C}नेस";
        assert_eq!(IntentDetector::normalize(precomposed), decomposed);
    }

    #[test]
    fn test_negative_phrases() {
        let detector = IntentDetector::new();

        for text in ["नहीं", "मुझे interested नहीं है", "NO thanks", "please STOP calling", "नंबर हटाओ"] {
            let normalized = IntentDetector::normalize(text);
            assert!(detector.is_negative(&normalized), "{text}");
        }
        assert!(!detector.is_negative(&IntentDetector::normalize("हाँ बताइए")));
    }

    #[test]
    fn test_substring_matching_is_permissive() {
        let detector = IntentDetector::new();
        // "know" contains "no"
        assert!(detector.is_negative("i know about it"));
    }

    #[test]
    fn test_defer_phrases() {
        let detector = IntentDetector::new();

        assert!(detector.is_defer(&IntentDetector::normalize("बाद में बात करते हैं")));
        assert!(detector.is_defer(&IntentDetector::normalize("Call me LATER")));
        assert!(detector.is_defer(&IntentDetector::normalize("मुझे सोचना पड़ेगा")));
        assert!(!detector.is_defer(&IntentDetector::normalize("हाँ जी")));
    }

    #[test]
    fn test_negative_takes_priority_over_defer() {
        let detector = IntentDetector::new();
        let signals = detector.classify("नहीं, बाद में भी नहीं");
        assert!(signals.negative);
        assert!(!signals.defer);
        assert_eq!(signals.intent(), TurnIntent::OptOut);
    }

    #[test]
    fn test_later_alone_is_defer() {
        let detector = IntentDetector::new();
        let signals = detector.classify("बाद में");
        assert!(!signals.negative);
        assert!(signals.defer);
        assert_eq!(signals.intent(), TurnIntent::Defer);
    }

    #[test]
    fn test_detect_loan_type() {
        let detector = IntentDetector::new();

        let detect = |text: &str| detector.detect_loan_type(&IntentDetector::normalize(text));
        assert_eq!(detect("मुझे Personal loan चाहिए"), LoanType::Personal);
        assert_eq!(detect("सैलरी पर लोन"), LoanType::Personal);
        assert_eq!(detect("MSME के लिए"), LoanType::Business);
        assert_eq!(detect("नया घर लेना है"), LoanType::Home);
        assert_eq!(detect("property खरीदनी है"), LoanType::Home);
        assert_eq!(detect("कुछ पैसे चाहिए"), LoanType::Unknown);
    }

    #[test]
    fn test_detect_business_with_either_nukta_encoding() {
        let detector = IntentDetector::new();
        let precomposed = IntentDetector::normalize("मेरा बि\u{095B}नेस है");
        let decomposed = IntentDetector::normalize("मेरा बि\u{091C}\u{093C}नेस है");
        assert_eq!(detector.detect_loan_type(&precomposed), LoanType::Business);
        assert_eq!(detector.detect_loan_type(&decomposed), LoanType::Business);
    }

    #[test]
    fn test_first_declared_category_wins() {
        let detector = IntentDetector::new();
        // Mentions both business and home keywords; business is declared first
        let normalized = IntentDetector::normalize("business के लिए property गिरवी");
        assert_eq!(detector.detect_loan_type(&normalized), LoanType::Business);

        let mut lexicon = IntentLexicon::default();
        lexicon.loan_rules.reverse();
        let reordered = IntentDetector::from_lexicon(&lexicon).unwrap();
        assert_eq!(reordered.detect_loan_type(&normalized), LoanType::Home);
    }

    #[test]
    fn test_extract_amount() {
        let detector = IntentDetector::new();

        assert_eq!(detector.extract_amount("मुझे 5 लाख चाहिए").as_deref(), Some("5 लाख"));
        assert_eq!(detector.extract_amount("20लाख का लोन").as_deref(), Some("20लाख"));
        assert_eq!(detector.extract_amount("about 2 Crore").as_deref(), Some("2 Crore"));
        assert_eq!(detector.extract_amount("5,00,000 रुपये").as_deref(), Some("5,00,000"));
        assert_eq!(detector.extract_amount("salary 45000 है").as_deref(), Some("45000"));
        assert_eq!(detector.extract_amount("पैसे चाहिए"), None);
    }

    #[test]
    fn test_extract_amount_crore_encodings() {
        let detector = IntentDetector::new();
        let decomposed = "1 करो\u{0921}\u{093C}";
        let precomposed = "1 करो\u{095C}";
        assert_eq!(detector.extract_amount(decomposed).as_deref(), Some(decomposed));
        assert_eq!(detector.extract_amount(precomposed).as_deref(), Some(precomposed));
    }

    #[test]
    fn test_extract_amount_collapses_whitespace() {
        let detector = IntentDetector::new();
        assert_eq!(detector.extract_amount("10\tlakh").as_deref(), Some("10 lakh"));
    }

    #[test]
    fn test_classify() {
        let detector = IntentDetector::new();
        let signals = detector.classify("  मुझे personal loan चाहिए 5 लाख का ");

        assert_eq!(signals.normalized, "मुझे personal loan चाहिए 5 लाख का");
        assert!(!signals.negative);
        assert!(!signals.defer);
        assert_eq!(signals.loan_type, LoanType::Personal);
        assert_eq!(signals.amount.as_deref(), Some("5 लाख"));
        assert_eq!(signals.intent(), TurnIntent::Continue);

        assert_eq!(detector.classify(" \t").intent(), TurnIntent::Silence);
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = IntentLexicon {
            negative_phrases: vec!["NAKKO".to_string()],
            defer_phrases: vec!["nantar".to_string()],
            loan_rules: vec![LoanKeywordRule::new(LoanType::Home, &["ghar"])],
            ..IntentLexicon::default()
        };
        let detector = IntentDetector::from_lexicon(&lexicon).unwrap();

        assert!(detector.is_negative("nakko"));
        assert!(!detector.is_negative("no"));
        assert!(detector.is_defer("nantar bolu"));
        assert_eq!(detector.detect_loan_type("ghar loan"), LoanType::Home);
        assert_eq!(detector.detect_loan_type("personal"), LoanType::Unknown);
    }

    #[test]
    fn test_invalid_lexicon_rejected() {
        let lexicon = IntentLexicon {
            amount_pattern: "([0-9]+".to_string(),
            ..IntentLexicon::default()
        };
        assert!(matches!(
            IntentDetector::from_lexicon(&lexicon),
            Err(AgentError::Lexicon(_))
        ));
    }
}
