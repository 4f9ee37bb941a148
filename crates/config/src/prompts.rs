//! Reply script configuration
//!
//! Every line the agent speaks, grouped by where in the call it is used.
//! Texts may carry `{placeholder}` tokens that the agent fills in.

use serde::{Deserialize, Serialize};

use sales_agent_core::LoanType;

/// Complete reply script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyScript {
    /// Opening line
    #[serde(default)]
    pub greetings: GreetingTemplates,
    /// One line per funnel step
    #[serde(default)]
    pub stages: StageReplies,
    /// Offer wording used at the pitch step
    #[serde(default)]
    pub offers: OfferTemplates,
    /// Opt-out, defer and thank-you lines
    #[serde(default)]
    pub closings: ClosingTemplates,
    /// Clarification and generic acknowledgement
    #[serde(default)]
    pub fallbacks: FallbackTemplates,
}

impl ReplyScript {
    /// Collect the names of empty reply texts
    pub fn empty_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("greetings.default", &self.greetings.default),
            ("stages.qualification", &self.stages.qualification),
            ("stages.need_analysis", &self.stages.need_analysis),
            ("stages.pitch", &self.stages.pitch),
            ("stages.documents", &self.stages.documents),
            ("stages.closing", &self.stages.closing),
            ("offers.personal", &self.offers.personal),
            ("offers.business", &self.offers.business),
            ("offers.home", &self.offers.home),
            ("closings.opt_out", &self.closings.opt_out),
            ("closings.deferred", &self.closings.deferred),
            ("closings.thank_you", &self.closings.thank_you),
            ("fallbacks.not_understood", &self.fallbacks.not_understood),
            ("fallbacks.acknowledged", &self.fallbacks.acknowledged),
        ];

        checks
            .into_iter()
            .filter(|(_, text)| text.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

/// Greeting templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingTemplates {
    /// Opening line with `{salutation}`, `{agent_name}` and `{company_name}`
    pub default: String,
    /// Salutation when the customer's name is known
    pub named_salutation: String,
    /// Salutation otherwise
    pub anonymous_salutation: String,
}

impl Default for GreetingTemplates {
    fn default() -> Self {
        Self {
            default: "नमस्ते {salutation}, मैं {company_name} से {agent_name} बोल रही हूँ। हम आपको सबसे उपयुक्त लोन दिलाने में मदद करते हैं। क्या मैं आपकी वित्तीय ज़रूरत के बारे में थोड़ा जान सकती हूँ?".to_string(),
            named_salutation: "{customer_name} जी".to_string(),
            anonymous_salutation: "जी".to_string(),
        }
    }
}

impl GreetingTemplates {
    /// Format the greeting with variables
    pub fn format(&self, agent_name: &str, company_name: &str, customer_name: Option<&str>) -> String {
        let salutation = match customer_name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => self.named_salutation.replace("{customer_name}", name),
            None => self.anonymous_salutation.clone(),
        };

        self.default
            .replace("{salutation}", &salutation)
            .replace("{agent_name}", agent_name)
            .replace("{company_name}", company_name)
    }
}

/// Replies spoken when the funnel advances, keyed by the stage being left
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReplies {
    /// introduction → qualification: loan purpose and income
    pub qualification: String,
    /// qualification → need_analysis: documents at hand
    pub need_analysis: String,
    /// need_analysis → pitch: rates, EMI and timelines
    pub pitch: String,
    /// pitch → documents, with `{loan_detail}` and `{offer}`
    pub documents: String,
    /// documents → closing: application drafted
    pub closing: String,
}

impl Default for StageReplies {
    fn default() -> Self {
        Self {
            qualification: "बहुत बढ़िया! थोड़ी जानकारी साझा करिए ताकि मैं आपके लिए सटीक ऑफ़र निकाल सकूँ। आप किस उद्देश्य के लिए लोन लेना चाह रहे हैं और आपकी मासिक नेट आय कितनी है?".to_string(),
            need_analysis: "धन्यवाद! आपकी आय और आवश्यकता के आधार पर मैं तुरंत वैरीफाइड पार्टनर बैंकों से ऑफ़र मैच कर दूँगी। क्या आपके पास आधार, पैन और आय का प्रमाण उपलब्ध है?".to_string(),
            pitch: "उत्तम! दस्तावेज़ तैयार हैं तो प्रक्रिया बहुत तेज़ हो जाएगी। मैं आपको ब्याज दर, ईएमआई और डिस्बर्सल टाइमलाइन का पूरा विवरण अभी भेज रही हूँ।".to_string(),
            documents: "{loan_detail}{offer} उपलब्ध है। ईएमआई कैलकुलेशन और दस्तावेज़ अपलोड लिंक मैं अभी भेजती हूँ। क्या मैं आवेदन ड्राफ्ट शुरू कर दूँ?".to_string(),
            closing: "बहुत बढ़िया! आवेदन ड्राफ्ट कर दिया है। अभी मैं आपको एसएमएस और व्हाट्सएप पर लिंक भेज रही हूँ जहाँ से आप दस्तावेज़ अपलोड कर सकते हैं।".to_string(),
        }
    }
}

/// Offer wording per loan category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTemplates {
    pub personal: String,
    pub business: String,
    pub home: String,
    /// Prefix when an amount was captured, with `{amount}`
    pub amount_prefix: String,
    /// Prefix when no amount is known
    pub generic_prefix: String,
}

impl Default for OfferTemplates {
    fn default() -> Self {
        Self {
            personal: "पर्सनल लोन पर 10.49% से दरें और तुरंत प्री-अप्रूव्ड ऑफ़र".to_string(),
            business: "एमएसएमई और बिज़नेस लोन पर 9.75% से दरें और working capital सुविधाएँ".to_string(),
            home: "होम लोन पर 8.4% से शुरुआत और 30 साल तक का टेन्योर विकल्प".to_string(),
            amount_prefix: "आपके बताए हुए {amount} के लिए ".to_string(),
            generic_prefix: "आपकी आवश्यकता के लिए ".to_string(),
        }
    }
}

impl OfferTemplates {
    /// Offer wording for a category. Home and business have their own lines;
    /// everything else, unknown included, gets the personal loan wording.
    pub fn for_loan_type(&self, loan_type: Option<LoanType>) -> &str {
        match loan_type {
            Some(LoanType::Home) => &self.home,
            Some(LoanType::Business) => &self.business,
            _ => &self.personal,
        }
    }

    /// Lead-in naming the captured amount when there is one
    pub fn loan_detail(&self, amount: Option<&str>) -> String {
        match amount {
            Some(amount) => self.amount_prefix.replace("{amount}", amount),
            None => self.generic_prefix.clone(),
        }
    }
}

/// Closing templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingTemplates {
    /// Customer opted out
    pub opt_out: String,
    /// Customer asked to be contacted later
    pub deferred: String,
    /// Anything said after the call has closed, with `{brand_name}`
    pub thank_you: String,
}

impl Default for ClosingTemplates {
    fn default() -> Self {
        Self {
            opt_out: "कोई बात नहीं, मैं आपका नंबर नोट कर लेती हूँ और आगे आपको परेशान नहीं किया जाएगा। अगर कभी भविष्य में सहायता चाहिए तो {company_name} पर ज़रूर याद कीजिएगा। आपका दिन शुभ हो!".to_string(),
            deferred: "समझ सकती हूँ कि अभी व्यस्त होंगे। मैं एक संक्षिप्त संदेश और व्हाट्सएप में विवरण भेज देती हूँ ताकि आप अपनी सुविधा से देख सकें। क्या मैं आपके लिए किसी विशेष समय का नोट बना दूँ?".to_string(),
            thank_you: "धन्यवाद! {brand_name} पर भरोसा करने के लिए शुक्रिया। किसी भी समय सवाल हो तो इसी कॉल या व्हाट्सएप संदेश का जवाब दे दीजिएगा।".to_string(),
        }
    }
}

/// Fallback templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackTemplates {
    /// Nothing was heard
    pub not_understood: String,
    /// Generic acknowledgement outside the funnel
    pub acknowledged: String,
}

impl Default for FallbackTemplates {
    fn default() -> Self {
        Self {
            not_understood: "माफ़ कीजिएगा, मैं आपको ठीक से सुन नहीं पाई। क्या आप दोबारा बता सकते हैं कि आपको किस तरह की वित्तीय सहायता चाहिए?".to_string(),
            acknowledged: "मैंने आपकी बात नोट कर ली है। अगर कोई और जानकारी चाहिए तो बेझिझक बताइए।".to_string(),
        }
    }
}
