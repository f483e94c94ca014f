//! Medication record models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A medication record with dual-ID support for offline-first sync.
///
/// Owned by the storage layer; the interpreter only reads it. The
/// structured `frequency`/`duration` fields hold values a clinician entered
/// directly and take precedence over anything extracted from
/// `full_instructions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRecord {
    /// Local UUID - always present, generated locally
    pub local_id: String,
    /// Server ID - null until first sync
    pub server_id: Option<String>,
    /// Medication name
    pub name: String,
    /// Free-text clinical instructions (may be empty)
    pub full_instructions: String,
    /// Structured doses-per-day, as entered (numeric string, e.g. "3")
    pub frequency: Option<String>,
    /// Structured duration, as entered (e.g. "7" days or descriptive text)
    pub duration: Option<String>,
    /// Explicit course start, if known
    pub start_date: Option<DateTime<Utc>>,
    /// Record creation time - fallback start reference
    pub created_at: Option<DateTime<Utc>>,
    /// Whether the medication is currently prescribed
    pub is_active: bool,
}

impl MedicationRecord {
    /// Create a new active record with required fields.
    pub fn new(name: String) -> Self {
        Self {
            local_id: uuid::Uuid::new_v4().to_string(),
            server_id: None,
            name,
            full_instructions: String::new(),
            frequency: None,
            duration: None,
            start_date: None,
            created_at: Some(Utc::now()),
            is_active: true,
        }
    }

    /// Check if this record has been synced to server.
    pub fn is_synced(&self) -> bool {
        self.server_id.is_some()
    }

    /// Whether any dosing information exists at all.
    ///
    /// When this is false no timeline can be derived and classification
    /// degrades to chronic with an explanatory message.
    pub fn has_dosing_source(&self) -> bool {
        !self.full_instructions.trim().is_empty()
            || self.frequency.as_deref().is_some_and(|f| !f.trim().is_empty())
            || self.duration.as_deref().is_some_and(|d| !d.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = MedicationRecord::new("Amoxicillin".into());

        assert!(!record.local_id.is_empty());
        assert!(!record.is_synced());
        assert!(record.is_active);
        assert!(record.created_at.is_some());
        assert!(!record.has_dosing_source());
    }

    #[test]
    fn test_dosing_source_detection() {
        let mut record = MedicationRecord::new("Prednisone".into());
        assert!(!record.has_dosing_source());

        record.frequency = Some("  ".into());
        assert!(!record.has_dosing_source());

        record.frequency = Some("3".into());
        assert!(record.has_dosing_source());

        record.frequency = None;
        record.full_instructions = "take with food".into();
        assert!(record.has_dosing_source());
    }
}
