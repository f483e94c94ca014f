//! Shared number/date extraction helpers.
//!
//! Handles:
//! - Digit and spelled-out counts ("3", "three")
//! - First frequency mention ("3 times", "4x")
//! - First duration mention ("7 days", "two weeks")
//! - Relative start-date keywords ("starting tomorrow", "immediately")

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

/// Regex fragment matching a digit or spelled-out count.
pub(crate) const COUNT_PATTERN: &str =
    r"(?:\d+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)";

/// Parse a digit string or spelled-out number word.
///
/// Malformed input falls back to `None`; callers apply their documented
/// defaults rather than propagating a failure.
pub(crate) fn parse_count(token: &str) -> Option<u32> {
    let token = token.trim().to_lowercase();
    if let Ok(n) = token.parse::<u32>() {
        return Some(n);
    }
    match token.as_str() {
        "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        "eleven" => Some(11),
        "twelve" => Some(12),
        _ => None,
    }
}

/// Convert a counted duration unit to days (weeks x7, months x30).
pub(crate) fn duration_to_days(count: u32, unit: &str) -> i64 {
    let unit = unit.trim().to_lowercase();
    let count = i64::from(count);
    if unit.starts_with("week") {
        count * 7
    } else if unit.starts_with("month") {
        count * 30
    } else {
        count
    }
}

/// First doses-per-day mention in the text ("3 times", "4x").
pub(crate) fn first_frequency(text: &str) -> Option<u32> {
    let re = Regex::new(&format!(r"(?i)\b({})\s*(?:x\b|times?\b)", COUNT_PATTERN)).ok()?;
    let caps = re.captures(text)?;
    parse_count(&caps[1])
}

/// First counted duration in the text, in days ("7 days", "two weeks").
pub(crate) fn first_duration_days(text: &str) -> Option<i64> {
    let re = Regex::new(&format!(
        r"(?i)\b({})\s+(day|week|month)s?\b",
        COUNT_PATTERN
    ))
    .ok()?;
    let caps = re.captures(text)?;
    let count = parse_count(&caps[1])?;
    Some(duration_to_days(count, &caps[2]))
}

/// Resolve the course start date.
///
/// Relative keywords in the instructions win, then the record's explicit
/// start, then its creation time, then the reference date itself.
pub(crate) fn resolve_start_date(
    instructions: &str,
    explicit_start: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
    reference: DateTime<Utc>,
) -> DateTime<Utc> {
    let tomorrow =
        Regex::new(r"(?i)\b(?:starting\s+)?tomorrow\b|\bnext\s+day\b").map(|re| re.is_match(instructions));
    if tomorrow.unwrap_or(false) {
        return reference + Duration::days(1);
    }

    let today =
        Regex::new(r"(?i)\btoday\b|\bnow\b|\bimmediately\b").map(|re| re.is_match(instructions));
    if today.unwrap_or(false) {
        return reference;
    }

    explicit_start.or(created_at).unwrap_or(reference)
}
