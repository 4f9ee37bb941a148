//! Product configuration
//!
//! Loan products offered on the call, one per loan category.

use serde::{Deserialize, Serialize};

use sales_agent_core::LoanType;

/// Loan product catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Products, at most one per category
    #[serde(default)]
    pub products: Vec<LoanProduct>,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            products: vec![
                LoanProduct::personal(),
                LoanProduct::business(),
                LoanProduct::home(),
            ],
        }
    }
}

impl ProductConfig {
    /// Product for a category. Unknown or missing categories fall back to the
    /// personal loan, matching the pitch wording.
    pub fn for_loan_type(&self, loan_type: Option<LoanType>) -> Option<&LoanProduct> {
        let wanted = match loan_type {
            Some(LoanType::Home) => LoanType::Home,
            Some(LoanType::Business) => LoanType::Business,
            _ => LoanType::Personal,
        };
        self.products.iter().find(|p| p.loan_type == wanted)
    }

    /// Categories listed more than once
    pub fn duplicate_categories(&self) -> Vec<LoanType> {
        let mut seen = Vec::new();
        let mut duplicates = Vec::new();
        for product in &self.products {
            if seen.contains(&product.loan_type) {
                if !duplicates.contains(&product.loan_type) {
                    duplicates.push(product.loan_type);
                }
            } else {
                seen.push(product.loan_type);
            }
        }
        duplicates
    }
}

/// A single loan product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanProduct {
    /// Product ID
    pub id: String,
    /// Category this product serves
    pub loan_type: LoanType,
    /// Display title
    pub title: String,
    /// Headline rate, e.g. "10.49% से शुरुआत"
    pub apr: String,
    /// Disbursal turnaround
    pub turnaround: String,
    /// Selling points
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl LoanProduct {
    /// Personal loan
    pub fn personal() -> Self {
        Self {
            id: "personal".to_string(),
            loan_type: LoanType::Personal,
            title: "पर्सनल लोन".to_string(),
            apr: "10.49% से शुरुआत".to_string(),
            turnaround: "24 घंटे में डिस्बर्सल".to_string(),
            highlights: vec![
                "₹50,000 से ₹30 लाख तक".to_string(),
                "नो-कोलेटरल, त्वरित प्रक्रिया".to_string(),
                "शीघ्र ईएमआई कैलकुलेटर और तुलना".to_string(),
            ],
        }
    }

    /// Business and MSME loan
    pub fn business() -> Self {
        Self {
            id: "business".to_string(),
            loan_type: LoanType::Business,
            title: "बिज़नेस और एमएसएमई लोन".to_string(),
            apr: "9.75% से शुरुआत".to_string(),
            turnaround: "3-5 कार्य दिवस".to_string(),
            highlights: vec![
                "वर्किंग कैपिटल और टर्म लोन विकल्प".to_string(),
                "जीएसटी / बैंक स्टेटमेंट आधारित रीकैडिट".to_string(),
                "उद्योग-विशेष सलाह".to_string(),
            ],
        }
    }

    /// Home loan
    pub fn home() -> Self {
        Self {
            id: "home".to_string(),
            loan_type: LoanType::Home,
            title: "होम लोन".to_string(),
            apr: "8.40% से शुरुआत".to_string(),
            turnaround: "5-7 कार्य दिवस".to_string(),
            highlights: vec![
                "30 साल तक टेन्योर".to_string(),
                "इंस्टेंट प्री-अप्रूवल और दस्तावेज़ सहायता".to_string(),
                "बैलेंस ट्रांसफर और टॉप-अप सुविधाएँ".to_string(),
            ],
        }
    }
}
