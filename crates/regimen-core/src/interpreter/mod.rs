//! Medication-regimen interpreter.
//!
//! Pipeline: Classification → Timeline Building → Status Evaluation /
//! Daily Schedule Generation
//!
//! Every stage is a synchronous, side-effect-free function of its explicit
//! inputs. The current time is always threaded through as an argument so
//! the whole pipeline is deterministic and testable without wall-clock
//! coupling.

mod classifier;
mod daily;
mod extract;
mod status;
mod timeline;

pub use classifier::*;
pub use daily::*;
pub use status::*;
pub use timeline::*;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    DailyScheduleItem, MedicationRecord, Phase, RegimenClassification, RegimenType,
    ScheduleConfig, StatusSnapshot, Timeline,
};

/// Main interpreter that coordinates the full pipeline.
pub struct RegimenInterpreter {
    classifier: Classifier,
    builder: TimelineBuilder,
    config: ScheduleConfig,
}

impl Default for RegimenInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl RegimenInterpreter {
    /// Create an interpreter with default named dose times.
    pub fn new() -> Self {
        Self::with_config(ScheduleConfig::default())
    }

    /// Create an interpreter with user-configured named dose times.
    pub fn with_config(config: ScheduleConfig) -> Self {
        Self {
            classifier: Classifier::new(),
            builder: TimelineBuilder::new(),
            config,
        }
    }

    /// Classify an instruction string into a regimen shape.
    pub fn classify(&self, instructions: &str) -> RegimenClassification {
        self.classifier.classify(instructions)
    }

    /// Classify a whole record.
    ///
    /// A record with no instructions and no structured dosing fields
    /// cannot yield a schedule; that degrades to chronic with an
    /// explanatory reason, never an error. When the text alone shows no
    /// timeline indicators but a structured duration exists, the duration
    /// field decides and the record is treated as short-term. A deliberate
    /// ambiguous-end classification is never overridden.
    pub fn classify_record(&self, record: &MedicationRecord) -> RegimenClassification {
        if !record.has_dosing_source() {
            return RegimenClassification::new(
                RegimenType::Chronic,
                "no dosing information on record",
            );
        }

        let classification = self.classifier.classify(&record.full_instructions);
        if classification.regimen_type == RegimenType::Chronic
            && classification.reason != AMBIGUOUS_END_REASON
            && record
                .duration
                .as_deref()
                .is_some_and(|d| d.trim().parse::<i64>().map_or(false, |n| n > 0))
        {
            return RegimenClassification::new(
                RegimenType::ShortTerm,
                "structured duration field on record",
            );
        }
        classification
    }

    /// Build the dated phase timeline for a record.
    pub fn build_timeline(
        &self,
        record: &MedicationRecord,
        classification: &RegimenClassification,
        reference: DateTime<Utc>,
    ) -> Timeline {
        self.builder.build(record, classification, reference)
    }

    /// Evaluate where a timeline stands at `now`.
    pub fn evaluate_status(&self, timeline: &Timeline, now: DateTime<Utc>) -> StatusSnapshot {
        evaluate_status(timeline, now)
    }

    /// Generate the dose events for one day of one phase.
    pub fn daily_schedule(&self, phase: &Phase, date: NaiveDate) -> Vec<DailyScheduleItem> {
        generate_daily_schedule(phase, date, &self.config)
    }

    /// Run the full pipeline for a record at `now`.
    pub fn interpret(
        &self,
        record: &MedicationRecord,
        now: DateTime<Utc>,
    ) -> (Timeline, StatusSnapshot) {
        let classification = self.classify_record(record);
        let timeline = self.build_timeline(record, &classification, now);
        let snapshot = self.evaluate_status(&timeline, now);
        (timeline, snapshot)
    }

    /// The named dose times in effect.
    pub fn schedule_config(&self) -> &ScheduleConfig {
        &self.config
    }
}
