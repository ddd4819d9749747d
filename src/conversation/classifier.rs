//! Keyword classification of user input.
//!
//! Rules are kept in an ordered list and evaluated first-match-wins, so a
//! message mentioning both an emergency and a lawyer gets the emergency reply.

use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// What the classifier decided a message is about.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Emergency or request for immediate help.
    Emergency,
    /// Wants a lawyer or legal advice.
    LawyerConnect,
    /// Asks about rights.
    Rights,
    /// Wants to file a complaint.
    Complaint,
    /// Nothing matched.
    Fallback,
}

/// Reply used when no rule matches.
pub const FALLBACK_REPLY: &str = "I'm here to help you. Please provide more details.";

/// A keyword pattern mapped to an intent and its canned reply.
struct KeywordRule {
    pattern: Regex,
    intent: Intent,
    reply: &'static str,
}

/// Result of classifying one message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Classification {
    /// Intent of the first matching rule.
    pub intent: Intent,
    /// Reply text for that intent.
    pub reply: &'static str,
}

/// Ordered, first-match-wins keyword classifier.
pub struct KeywordClassifier {
    rules: Vec<KeywordRule>,
}

impl KeywordClassifier {
    /// Build the classifier with the fixed rule order.
    ///
    /// # Errors
    /// Returns an error if any regex pattern is invalid.
    pub fn new() -> Result<Self, regex::Error> {
        let rules = vec![
            KeywordRule {
                pattern: Regex::new(r"(?i)help|emergency|sos")?,
                intent: Intent::Emergency,
                reply: "If this is an emergency, please contact local authorities or use the SOS feature.",
            },
            KeywordRule {
                pattern: Regex::new(r"(?i)lawyer|legal")?,
                intent: Intent::LawyerConnect,
                reply: "I can connect you with a legal advisor. Would you like to proceed?",
            },
            KeywordRule {
                pattern: Regex::new(r"(?i)rights|women")?,
                intent: Intent::Rights,
                reply: "Women's rights are protected under various laws. Would you like to know more about a specific right?",
            },
            KeywordRule {
                pattern: Regex::new(r"(?i)complaint|file")?,
                intent: Intent::Complaint,
                reply: "To file a complaint, please provide the details of your situation.",
            },
        ];

        Ok(Self { rules })
    }

    /// Classify a message. Exactly one outcome is produced.
    #[must_use]
    pub fn classify(&self, text: &str) -> Classification {
        let classification = self
            .rules
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .map_or(
                Classification {
                    intent: Intent::Fallback,
                    reply: FALLBACK_REPLY,
                },
                |rule| Classification {
                    intent: rule.intent,
                    reply: rule.reply,
                },
            );

        debug!(intent = ?classification.intent, "classified user text");
        classification
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn classifier() -> KeywordClassifier {
        KeywordClassifier::new().expect("keyword patterns are valid")
    }

    #[test]
    fn test_each_rule_fires() {
        let classifier = classifier();
        let cases = [
            ("This is an EMERGENCY", Intent::Emergency),
            ("I want a lawyer", Intent::LawyerConnect),
            ("what are my rights", Intent::Rights),
            ("how do I raise a complaint", Intent::Complaint),
            ("hello there", Intent::Fallback),
        ];
        for (text, expected) in cases {
            assert_eq!(classifier.classify(text).intent, expected, "{text}");
        }
    }

    #[test]
    fn test_first_match_wins() {
        let classifier = classifier();
        let outcome = classifier.classify("I need sos help with a legal issue");
        assert_eq!(outcome.intent, Intent::Emergency);
        assert!(outcome.reply.starts_with("If this is an emergency"));

        // "women" and "file" both present: rights rule is earlier.
        assert_eq!(classifier.classify("women filing").intent, Intent::Rights);
    }

    #[test]
    fn test_substring_matching() {
        let classifier = classifier();
        // Substring, not word, matching: "profile" contains "file".
        assert_eq!(classifier.classify("update my profile").intent, Intent::Complaint);
        assert_eq!(classifier.classify("paralegal").intent, Intent::LawyerConnect);
    }

    #[test]
    fn test_fallback_reply() {
        let classifier = classifier();
        assert_eq!(classifier.classify("good morning").reply, FALLBACK_REPLY);
    }
}
