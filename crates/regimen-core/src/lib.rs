//! Regimen Core Library
//!
//! Medication-regimen interpreter: a deterministic text-to-timeline
//! compiler with a small derived state machine over wall-clock time.
//!
//! # Architecture
//!
//! ```text
//! MedicationRecord ──► Classifier ──► Timeline Builder
//!  (storage layer)        │                 │
//!                   regimen shape     dated phases
//!                                           │
//!                          ┌────────────────┴────────────────┐
//!                          ▼                                 ▼
//!                  Status Evaluator               Daily Schedule Generator
//!                  (progress, phase,              (clock times, dose counts)
//!                   days remaining)                        │
//!                          │                               ▼
//!                          ▼                       Reminder scheduling
//!                    Presentation                    (collaborator)
//! ```
//!
//! # Core Principle
//!
//! **Everything is re-derived from immutable inputs.** No computed schedule
//! is ever persisted; every query is a pure function of the record and an
//! explicitly supplied "now". Ambiguous instruction text is classified as
//! chronic (no determinable timeline) rather than guessed.
//!
//! # Modules
//!
//! - [`models`]: Domain types (MedicationRecord, Timeline, Phase, etc.)
//! - [`interpreter`]: The pipeline (classifier, builder, evaluator, generator)

pub mod interpreter;
pub mod models;

// Re-export commonly used types
pub use interpreter::{
    evaluate_status, generate_daily_schedule, Classifier, RegimenInterpreter, TimelineBuilder,
};
pub use models::{
    DailyScheduleItem, MedicationRecord, Phase, RegimenClassification, RegimenType,
    ScheduleConfig, ScheduleStatus, StatusSnapshot, Timeline,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum RegimenError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid clock time: {0}")]
    InvalidTime(String),

    #[error("Phase not found: {0}")]
    PhaseNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RegimenError {
    fn from(e: serde_json::Error) -> Self {
        RegimenError::SerializationError(e.to_string())
    }
}

fn parse_utc(value: &str, field: &str) -> Result<DateTime<Utc>, RegimenError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RegimenError::InvalidDate(format!("{}: {} ({})", field, value, e)))
}

fn parse_day(value: &str) -> Result<NaiveDate, RegimenError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| RegimenError::InvalidDate(format!("date: {} ({})", value, e)))
}

fn parse_clock(value: &str) -> Result<NaiveTime, RegimenError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| RegimenError::InvalidTime(format!("{} ({})", value, e)))
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create an engine with default named dose times.
#[uniffi::export]
pub fn new_engine() -> Arc<RegimenEngine> {
    Arc::new(RegimenEngine {
        interpreter: RegimenInterpreter::new(),
    })
}

/// Create an engine with user-configured named dose times ("HH:MM").
#[uniffi::export]
pub fn new_engine_with_times(
    morning: String,
    afternoon: String,
    evening: String,
    bedtime: String,
) -> Result<Arc<RegimenEngine>, RegimenError> {
    let config = ScheduleConfig {
        morning: parse_clock(&morning)?,
        afternoon: parse_clock(&afternoon)?,
        evening: parse_clock(&evening)?,
        bedtime: parse_clock(&bedtime)?,
    };
    Ok(Arc::new(RegimenEngine {
        interpreter: RegimenInterpreter::with_config(config),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Stateless interpreter wrapper for FFI.
///
/// Every operation re-derives its output from the supplied record and
/// reference time; nothing is cached or mutated, so a single engine can be
/// shared freely across host threads.
#[derive(uniffi::Object)]
pub struct RegimenEngine {
    interpreter: RegimenInterpreter,
}

#[uniffi::export]
impl RegimenEngine {
    /// Classify an instruction string into a regimen shape.
    pub fn classify_instructions(&self, instructions: String) -> FfiClassification {
        self.interpreter.classify(&instructions).into()
    }

    /// Build the dated phase timeline for a record.
    pub fn build_timeline(
        &self,
        record: FfiMedicationRecord,
        reference: String,
    ) -> Result<FfiTimeline, RegimenError> {
        let reference = parse_utc(&reference, "reference")?;
        let record: MedicationRecord = record.try_into()?;
        let classification = self.interpreter.classify_record(&record);
        let timeline = self
            .interpreter
            .build_timeline(&record, &classification, reference);
        Ok(timeline_to_ffi(&timeline, reference))
    }

    /// Evaluate where a record's regimen stands at `now`.
    pub fn evaluate_status(
        &self,
        record: FfiMedicationRecord,
        now: String,
    ) -> Result<FfiStatusSnapshot, RegimenError> {
        let now = parse_utc(&now, "now")?;
        let record: MedicationRecord = record.try_into()?;
        let (_timeline, snapshot) = self.interpreter.interpret(&record, now);
        Ok(snapshot_to_ffi(&snapshot, now))
    }

    /// Dose events for one calendar day ("YYYY-MM-DD") of one phase.
    pub fn daily_schedule(
        &self,
        record: FfiMedicationRecord,
        phase_index: u32,
        date: String,
        reference: String,
    ) -> Result<Vec<FfiDailyScheduleItem>, RegimenError> {
        let reference = parse_utc(&reference, "reference")?;
        let date = parse_day(&date)?;
        let record: MedicationRecord = record.try_into()?;
        let classification = self.interpreter.classify_record(&record);
        let timeline = self
            .interpreter
            .build_timeline(&record, &classification, reference);

        let phase = timeline
            .phases
            .iter()
            .find(|p| p.index == phase_index)
            .ok_or_else(|| RegimenError::PhaseNotFound(format!("phase {}", phase_index)))?;

        Ok(self
            .interpreter
            .daily_schedule(phase, date)
            .into_iter()
            .map(|item| item.into())
            .collect())
    }

    /// Export a record's timeline as JSON, for host-side rendering.
    pub fn timeline_json(
        &self,
        record: FfiMedicationRecord,
        reference: String,
    ) -> Result<String, RegimenError> {
        let reference = parse_utc(&reference, "reference")?;
        let record: MedicationRecord = record.try_into()?;
        let classification = self.interpreter.classify_record(&record);
        let timeline = self
            .interpreter
            .build_timeline(&record, &classification, reference);
        Ok(serde_json::to_string(&timeline)?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medication record. Timestamps are RFC 3339 strings.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationRecord {
    pub local_id: Option<String>,
    pub name: String,
    pub full_instructions: String,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub start_date: Option<String>,
    pub created_at: Option<String>,
    pub is_active: bool,
}

impl TryFrom<FfiMedicationRecord> for MedicationRecord {
    type Error = RegimenError;

    fn try_from(record: FfiMedicationRecord) -> Result<Self, Self::Error> {
        let start_date = record
            .start_date
            .as_deref()
            .map(|s| parse_utc(s, "start_date"))
            .transpose()?;
        let created_at = record
            .created_at
            .as_deref()
            .map(|s| parse_utc(s, "created_at"))
            .transpose()?;

        Ok(MedicationRecord {
            local_id: record
                .local_id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            server_id: None,
            name: record.name,
            full_instructions: record.full_instructions,
            frequency: record.frequency,
            duration: record.duration,
            start_date,
            created_at,
            is_active: record.is_active,
        })
    }
}

/// FFI-safe classification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClassification {
    pub regimen_type: String,
    pub reason: String,
}

impl From<RegimenClassification> for FfiClassification {
    fn from(classification: RegimenClassification) -> Self {
        Self {
            regimen_type: classification.regimen_type.to_string(),
            reason: classification.reason,
        }
    }
}

/// FFI-safe phase with activity flags evaluated at the request's
/// reference time.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPhase {
    pub index: u32,
    pub start_date: String,
    pub end_date: String,
    pub times_per_day: u32,
    pub dosage_units: u32,
    pub instruction_text: String,
    pub is_active: bool,
    pub is_completed: bool,
}

fn phase_to_ffi(phase: &Phase, at: DateTime<Utc>) -> FfiPhase {
    FfiPhase {
        index: phase.index,
        start_date: phase.start_date.to_rfc3339(),
        end_date: phase.end_date.to_rfc3339(),
        times_per_day: phase.times_per_day,
        dosage_units: phase.dosage_units,
        instruction_text: phase.instruction_text.clone(),
        is_active: phase.is_active(at),
        is_completed: phase.is_completed(at),
    }
}

/// FFI-safe timeline.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTimeline {
    pub regimen_type: String,
    pub phases: Vec<FfiPhase>,
    pub total_duration_days: i64,
    pub has_schedule: bool,
    pub message: Option<String>,
    pub current_phase_index: u32,
    pub overall_progress_percent: u32,
}

fn timeline_to_ffi(timeline: &Timeline, at: DateTime<Utc>) -> FfiTimeline {
    FfiTimeline {
        regimen_type: timeline.regimen_type.to_string(),
        phases: timeline.phases.iter().map(|p| phase_to_ffi(p, at)).collect(),
        total_duration_days: timeline.total_duration_days,
        has_schedule: timeline.has_schedule,
        message: timeline.message.clone(),
        current_phase_index: timeline.current_phase_index,
        overall_progress_percent: timeline.overall_progress_percent,
    }
}

/// FFI-safe status snapshot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStatusSnapshot {
    pub status: String,
    pub message: String,
    pub current_phase: Option<FfiPhase>,
    pub days_remaining: Option<i64>,
    pub next_phase: Option<FfiPhase>,
}

fn snapshot_to_ffi(snapshot: &StatusSnapshot, at: DateTime<Utc>) -> FfiStatusSnapshot {
    FfiStatusSnapshot {
        status: snapshot.status.to_string(),
        message: snapshot.message.clone(),
        current_phase: snapshot.current_phase.as_ref().map(|p| phase_to_ffi(p, at)),
        days_remaining: snapshot.days_remaining,
        next_phase: snapshot.next_phase.as_ref().map(|p| phase_to_ffi(p, at)),
    }
}

/// FFI-safe daily schedule item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDailyScheduleItem {
    pub clock_time: String,
    pub dose_count: u32,
    pub instruction_text: String,
    pub scheduled_at: String,
    pub taken: bool,
}

impl From<DailyScheduleItem> for FfiDailyScheduleItem {
    fn from(item: DailyScheduleItem) -> Self {
        Self {
            clock_time: item.clock_time.format("%H:%M").to_string(),
            dose_count: item.dose_count,
            instruction_text: item.instruction_text,
            scheduled_at: item.scheduled_at.to_rfc3339(),
            taken: item.taken,
        }
    }
}
