//! Timeline builder.
//!
//! Turns a classification plus the numbers extracted from the instruction
//! text into an ordered sequence of phases with absolute dates. Building is
//! a pure function of (record, classification, reference date): rebuilding
//! with identical inputs yields an identical timeline.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use super::extract;
use crate::models::{
    MedicationRecord, Phase, RegimenClassification, RegimenType, Timeline,
};

/// Message attached to timelines that carry no schedule.
pub const CHRONIC_MESSAGE: &str = "Continue as prescribed — no specific end date";

/// Default course length in days when no duration can be extracted.
const DEFAULT_DURATION_DAYS: i64 = 7;

/// Ceiling on any extracted duration (ten years). Numbers beyond this are
/// treated as data-entry noise; clamping keeps date arithmetic total.
const MAX_DURATION_DAYS: i64 = 3650;

/// Numbers extracted for one dosing phase.
#[derive(Debug, Clone, PartialEq)]
struct PhaseSpec {
    times_per_day: u32,
    dosage_units: u32,
    dosage_label: Option<String>,
    duration_days: i64,
}

/// One pattern class for tapering phase extraction.
struct PhasePattern {
    /// Stable class identifier, used in tests
    name: &'static str,
    pattern: Regex,
    /// Capture layout: dose group present or not
    has_dosage: bool,
}

impl PhasePattern {
    fn new(name: &'static str, pattern: &str, has_dosage: bool) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern)
                .unwrap_or_else(|e| panic!("invalid phase pattern `{}`: {}", name, e)),
            has_dosage,
        }
    }

    /// Extract every phase this class finds in the text, in order.
    fn extract_all(&self, text: &str) -> Vec<PhaseSpec> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                if self.has_dosage {
                    let dosage = extract::parse_count(&caps[1])?;
                    let label = caps.get(2).map(|m| m.as_str().to_lowercase());
                    let freq = extract::parse_count(&caps[3])?;
                    let count = extract::parse_count(&caps[4])?;
                    Some(PhaseSpec {
                        times_per_day: freq,
                        dosage_units: dosage,
                        dosage_label: label,
                        duration_days: extract::duration_to_days(count, &caps[5]),
                    })
                } else {
                    let freq = extract::parse_count(&caps[1])?;
                    let count = extract::parse_count(&caps[2])?;
                    Some(PhaseSpec {
                        times_per_day: freq,
                        dosage_units: 1,
                        dosage_label: None,
                        duration_days: extract::duration_to_days(count, &caps[3]),
                    })
                }
            })
            .collect()
    }
}

/// Builder from classified instructions to dated phases.
pub struct TimelineBuilder {
    phase_patterns: Vec<PhasePattern>,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineBuilder {
    /// Create a builder with the default phase-pattern table.
    pub fn new() -> Self {
        Self {
            phase_patterns: Self::default_patterns(),
        }
    }

    /// Build a timeline for a record.
    ///
    /// Total over all inputs: malformed numbers fall back to documented
    /// defaults (frequency 1, duration 7 days, dosage 1) and never error.
    pub fn build(
        &self,
        record: &MedicationRecord,
        classification: &RegimenClassification,
        reference: DateTime<Utc>,
    ) -> Timeline {
        let start = extract::resolve_start_date(
            &record.full_instructions,
            record.start_date,
            record.created_at,
            reference,
        );

        match classification.regimen_type {
            RegimenType::Tapering => self.build_tapering(record, start, reference),
            RegimenType::ShortTerm => self.build_short_term(record, start, reference),
            RegimenType::Chronic => Self::chronic_timeline(CHRONIC_MESSAGE),
        }
    }

    fn build_tapering(
        &self,
        record: &MedicationRecord,
        start: DateTime<Utc>,
        reference: DateTime<Utc>,
    ) -> Timeline {
        // The first pattern class with any match supplies every phase;
        // classes are never mixed within one timeline.
        let specs = self
            .phase_patterns
            .iter()
            .map(|p| p.extract_all(&record.full_instructions))
            .find(|specs| !specs.is_empty())
            .unwrap_or_default();

        if specs.is_empty() {
            // Tapering language without extractable numbers: no dates can
            // be assigned, so degrade to a schedule-less timeline.
            let mut timeline = Self::chronic_timeline(
                "Taper as directed — phase dates could not be determined",
            );
            timeline.regimen_type = RegimenType::Tapering;
            return timeline;
        }

        let mut phases = Vec::with_capacity(specs.len());
        let mut cursor = start;
        for (i, spec) in specs.iter().enumerate() {
            let end = cursor + Duration::days(spec.duration_days.clamp(0, MAX_DURATION_DAYS));
            phases.push(Phase {
                index: i as u32 + 1,
                start_date: cursor,
                end_date: end,
                times_per_day: spec.times_per_day,
                dosage_units: spec.dosage_units,
                instruction_text: synthesize_instruction(spec),
            });
            cursor = end;
        }

        Self::finish(RegimenType::Tapering, phases, reference)
    }

    fn build_short_term(
        &self,
        record: &MedicationRecord,
        start: DateTime<Utc>,
        reference: DateTime<Utc>,
    ) -> Timeline {
        // Structured fields win over text extraction; both fall back to
        // documented defaults.
        let times_per_day = record
            .frequency
            .as_deref()
            .and_then(extract::parse_count)
            .or_else(|| extract::first_frequency(&record.full_instructions))
            .unwrap_or(1);

        let duration_days = record
            .duration
            .as_deref()
            .and_then(|d| d.trim().parse::<i64>().ok())
            .or_else(|| extract::first_duration_days(&record.full_instructions))
            .unwrap_or(DEFAULT_DURATION_DAYS)
            .clamp(0, MAX_DURATION_DAYS);

        let instruction_text = if record.full_instructions.trim().is_empty() {
            format!("{} times daily", times_per_day)
        } else {
            record.full_instructions.trim().to_string()
        };

        let phases = vec![Phase {
            index: 1,
            start_date: start,
            end_date: start + Duration::days(duration_days),
            times_per_day,
            dosage_units: 1,
            instruction_text,
        }];

        Self::finish(RegimenType::ShortTerm, phases, reference)
    }

    fn chronic_timeline(message: &str) -> Timeline {
        Timeline {
            regimen_type: RegimenType::Chronic,
            phases: Vec::new(),
            total_duration_days: 0,
            has_schedule: false,
            message: Some(message.to_string()),
            current_phase_index: 1,
            overall_progress_percent: 0,
        }
    }

    /// Fill the aggregate fields from the assembled phases.
    fn finish(regimen_type: RegimenType, phases: Vec<Phase>, reference: DateTime<Utc>) -> Timeline {
        let total_duration_days = phases.iter().map(Phase::duration_days).sum();
        let mut timeline = Timeline {
            regimen_type,
            phases,
            total_duration_days,
            has_schedule: true,
            message: None,
            current_phase_index: 1,
            overall_progress_percent: 0,
        };
        timeline.current_phase_index = timeline.current_phase_index_at(reference);
        timeline.overall_progress_percent = timeline.progress_percent_at(reference);
        timeline
    }

    /// Pattern classes in priority order.
    fn default_patterns() -> Vec<PhasePattern> {
        let count = extract::COUNT_PATTERN;
        let dose_unit = r"(drops?|tablets?|tabs?|capsules?|caps?|pills?|puffs?|sprays?|units?)";

        vec![
            PhasePattern::new(
                "frequency-duration",
                &format!(
                    r"(?i)\b({c})\s*times?\s+(?:daily|a\s+day)\s*(?:,?\s*for)?\s+({c})\s*(days?|weeks?)\b",
                    c = count
                ),
                false,
            ),
            PhasePattern::new(
                "dosage-frequency-duration",
                &format!(
                    r"(?i)\b({c})\s*{u}\s*,?\s*({c})\s*(?:x|times?)\s*(?:daily|per\s+day|a\s+day|/day)?\s*,?\s*(?:for\s+)?({c})\s*(days?|weeks?)\b",
                    c = count,
                    u = dose_unit
                ),
                true,
            ),
            PhasePattern::new(
                "compact-nx-duration",
                &format!(
                    r"(?i)\b({c})\s*x\s*(?:daily|/day|per\s+day)\s*(?:x|for|,)?\s*({c})\s*(days?|weeks?)\b",
                    c = count
                ),
                false,
            ),
            PhasePattern::new(
                "times-per-day-for-days",
                &format!(
                    r"(?i)\b({c})\s*times?\s+per\s+day\s+for\s+({c})\s*(days?|weeks?)\b",
                    c = count
                ),
                false,
            ),
        ]
    }
}

/// Synthesize a phase instruction line from its extracted numbers.
fn synthesize_instruction(spec: &PhaseSpec) -> String {
    if spec.dosage_units > 1 {
        let label = spec.dosage_label.as_deref().unwrap_or("doses");
        format!(
            "{} {}, {} times daily",
            spec.dosage_units, label, spec.times_per_day
        )
    } else {
        format!("{} times daily", spec.times_per_day)
    }
}
