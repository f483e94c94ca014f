//! Regimen shape classifier.
//!
//! Classification is an ordered rule table evaluated first-match-wins.
//! Order is significant because the patterns overlap: ambiguous-end
//! language is checked before generic duration detection so that
//! "continue until swelling resolves" is not misread as short-term by
//! incidentally containing a number elsewhere.

use regex::Regex;

use super::extract::COUNT_PATTERN;
use crate::models::{RegimenClassification, RegimenType};

/// Reason shared by every ambiguous-end rule; callers use it to tell a
/// deliberate chronic classification apart from the default fallback.
pub const AMBIGUOUS_END_REASON: &str = "ambiguous end condition";

/// One entry in the classification rule table.
pub struct ClassifierRule {
    /// Stable rule identifier, used in tests
    pub name: &'static str,
    pattern: Regex,
    outcome: RegimenType,
    reason: &'static str,
}

impl ClassifierRule {
    fn new(
        name: &'static str,
        pattern: &str,
        outcome: RegimenType,
        reason: &'static str,
    ) -> Self {
        Self {
            name,
            // Patterns are fixed at compile time; a failure here is a
            // programming error caught by the rule-table tests.
            pattern: Regex::new(pattern).unwrap_or_else(|e| {
                panic!("invalid classifier pattern `{}`: {}", name, e)
            }),
            outcome,
            reason,
        }
    }

    /// Whether this rule fires for the given text.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Classifier over free-text clinical instructions.
///
/// Total over all strings: every input, including the empty string, maps to
/// exactly one of the three regimen shapes and never panics.
pub struct Classifier {
    rules: Vec<ClassifierRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// Create a classifier with the default rule table.
    pub fn new() -> Self {
        Self {
            rules: Self::default_rules(),
        }
    }

    /// Classify an instruction string into a regimen shape.
    pub fn classify(&self, instructions: &str) -> RegimenClassification {
        let text = instructions.trim();
        if text.is_empty() {
            return RegimenClassification::new(
                RegimenType::Chronic,
                "no instructions given, assume ongoing",
            );
        }

        for rule in &self.rules {
            if rule.matches(text) {
                return RegimenClassification::new(rule.outcome, rule.reason);
            }
        }

        RegimenClassification::new(
            RegimenType::Chronic,
            "no timeline indicators, assume ongoing",
        )
    }

    /// The rule table in evaluation order.
    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// Default rule table, in priority order: tapering shapes, then
    /// ambiguous end conditions, then concrete durations.
    fn default_rules() -> Vec<ClassifierRule> {
        let freq = format!(r"{}\s*(?:x\b|times?\b)", COUNT_PATTERN);

        vec![
            // --- Tapering ---
            ClassifierRule::new(
                "frequency-then-frequency",
                &format!(r"(?i)\b{}[\s\S]*?\bthen\b[\s\S]*?\b{}", freq, freq),
                RegimenType::Tapering,
                "multiple dose frequencies joined by 'then'",
            ),
            ClassifierRule::new(
                "taper-keyword",
                r"(?i)\b(?:taper(?:ing|ed)?|wean(?:ing)?|step[-\s]?down|gradually|reduc(?:e|ing|ed)|decreas(?:e|ing|ed))\b",
                RegimenType::Tapering,
                "explicit tapering language",
            ),
            ClassifierRule::new(
                "start-high-then-lower",
                r"(?i)\bstart\b[\s\S]*?\bthen\b[\s\S]*?\b(?:lower|less|fewer|drop)\b",
                RegimenType::Tapering,
                "start-high-then-lower shape",
            ),
            // --- Ambiguous end conditions ---
            ClassifierRule::new(
                "until-condition",
                r"(?i)\buntil\b[^,.;]*\b(?:improv\w*|resolv\w*|normal\w*|clear\w*|heal\w*|subsid\w*|better|gone)\b",
                RegimenType::Chronic,
                AMBIGUOUS_END_REASON,
            ),
            ClassifierRule::new(
                "until-no-more",
                r"(?i)\buntil\s+(?:no\s+more|there\s+(?:is|are)\s+no)\b",
                RegimenType::Chronic,
                AMBIGUOUS_END_REASON,
            ),
            ClassifierRule::new(
                "until-further",
                r"(?i)\buntil\s+further\s+(?:notice|evaluation|instruction|review)\b",
                RegimenType::Chronic,
                AMBIGUOUS_END_REASON,
            ),
            ClassifierRule::new(
                "or-until",
                r"(?i)\bor\s+until\b",
                RegimenType::Chronic,
                AMBIGUOUS_END_REASON,
            ),
            // --- Concrete durations ---
            ClassifierRule::new(
                "counted-duration",
                &format!(r"(?i)\b{}\s+(?:more\s+)?(?:day|week|month)s?\b", COUNT_PATTERN),
                RegimenType::ShortTerm,
                "specific duration given",
            ),
            ClassifierRule::new(
                "complete-course",
                r"(?i)\bcomplete\s+(?:the\s+)?(?:full\s+)?course\b",
                RegimenType::ShortTerm,
                "instructed to complete the course",
            ),
            ClassifierRule::new(
                "finish-all",
                r"(?i)\bfinish\s+(?:all|the)\b[\s\S]*?\b(?:pill|tablet|capsule|dose|medication)s?\b",
                RegimenType::ShortTerm,
                "instructed to finish the supply",
            ),
            ClassifierRule::new(
                "calendar-date",
                r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2}\b|\b\d{1,2}/\d{1,2}(?:/\d{2,4})?\b",
                RegimenType::ShortTerm,
                "explicit calendar reference",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_chronic() {
        let classifier = Classifier::new();

        assert_eq!(classifier.classify("").regimen_type, RegimenType::Chronic);
        assert_eq!(classifier.classify("   ").regimen_type, RegimenType::Chronic);
    }

    #[test]
    fn test_tapering_then_shape() {
        let classifier = Classifier::new();

        let result =
            classifier.classify("4 times daily for 1 week, then 3 times daily for 1 week");
        assert_eq!(result.regimen_type, RegimenType::Tapering);
        assert_eq!(result.reason, "multiple dose frequencies joined by 'then'");
    }

    #[test]
    fn test_tapering_keywords() {
        let classifier = Classifier::new();

        for text in [
            "taper over the next month",
            "gradually reduce the dose",
            "wean off over several weeks",
            "step-down as tolerated",
            "decrease to once daily",
        ] {
            assert_eq!(
                classifier.classify(text).regimen_type,
                RegimenType::Tapering,
                "expected tapering for: {}",
                text
            );
        }
    }

    #[test]
    fn test_ambiguous_end_is_chronic() {
        let classifier = Classifier::new();

        for text in [
            "use until symptoms resolve",
            "continue until we see your inflammation improve",
            "apply until the rash clears",
            "take until no more discharge",
            "continue until further notice",
        ] {
            let result = classifier.classify(text);
            assert_eq!(
                result.regimen_type,
                RegimenType::Chronic,
                "expected chronic for: {}",
                text
            );
            assert_eq!(result.reason, AMBIGUOUS_END_REASON);
        }
    }

    #[test]
    fn test_ambiguous_end_beats_duration() {
        let classifier = Classifier::new();

        // Contains a number, but the open end condition wins
        let result = classifier.classify("take 2 tablets until swelling resolves");
        assert_eq!(result.regimen_type, RegimenType::Chronic);

        let result = classifier.classify("take for 7 days or until fever is gone");
        assert_eq!(result.regimen_type, RegimenType::Chronic);
    }

    #[test]
    fn test_specific_duration_is_short_term() {
        let classifier = Classifier::new();

        for text in [
            "take 3 times per day for 7 days",
            "two weeks of treatment",
            "5 more days",
            "complete the full course",
            "finish all the pills",
            "continue through January 15",
        ] {
            assert_eq!(
                classifier.classify(text).regimen_type,
                RegimenType::ShortTerm,
                "expected short-term for: {}",
                text
            );
        }
    }

    #[test]
    fn test_default_chronic() {
        let classifier = Classifier::new();

        let result = classifier.classify("take with food as needed");
        assert_eq!(result.regimen_type, RegimenType::Chronic);
        assert_eq!(result.reason, "no timeline indicators, assume ongoing");
    }

    #[test]
    fn test_rule_table_order() {
        let classifier = Classifier::new();
        let names: Vec<&str> = classifier.rules().iter().map(|r| r.name).collect();

        // Tapering rules come first, ambiguous-end before durations
        assert_eq!(names[0], "frequency-then-frequency");
        let until = names.iter().position(|n| *n == "until-condition").unwrap();
        let duration = names.iter().position(|n| *n == "counted-duration").unwrap();
        assert!(until < duration);
    }

    #[test]
    fn test_garbage_input_total() {
        let classifier = Classifier::new();

        for text in ["💊💊💊", "\u{0}\u{1}\u{2}", "ooooooooo", "1234567890"] {
            let result = classifier.classify(text);
            assert!(matches!(
                result.regimen_type,
                RegimenType::Tapering | RegimenType::ShortTerm | RegimenType::Chronic
            ));
        }
    }
}
