//! Status snapshot models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::timeline::Phase;

/// Where a regimen stands relative to "now".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// First phase has not begun yet
    NotStarted,
    /// Exactly one phase is underway
    Active,
    /// Every phase lies in the past
    Completed,
    /// Fallback for a state the evaluator cannot classify; only reachable
    /// if phase contiguity is violated upstream
    Unknown,
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Point-in-time view of a timeline, computed fresh on every query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusSnapshot {
    /// Lifecycle status at the evaluated instant
    pub status: ScheduleStatus,
    /// Plain-language status line for presentation
    pub message: String,
    /// The phase underway, when status is active
    pub current_phase: Option<Phase>,
    /// Ceiling-rounded days until the current phase ends, clamped at 0
    pub days_remaining: Option<i64>,
    /// The upcoming phase, when status is not-started
    pub next_phase: Option<Phase>,
}

impl StatusSnapshot {
    /// Snapshot with only a status and message.
    pub fn bare(status: ScheduleStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            current_phase: None,
            days_remaining: None,
            next_phase: None,
        }
    }
}
