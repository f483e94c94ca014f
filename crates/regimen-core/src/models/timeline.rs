//! Phase and timeline models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::regimen::RegimenType;

/// One contiguous sub-interval of a regimen with constant frequency/dosage.
///
/// Phases are 1-indexed and contiguous: phase n's `end_date` equals phase
/// n+1's `start_date`. Activity flags are derived from a caller-supplied
/// "now", never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Phase {
    /// Position within the timeline (1-based)
    pub index: u32,
    /// First day of the phase (inclusive)
    pub start_date: DateTime<Utc>,
    /// Boundary instant; equals the next phase's start
    pub end_date: DateTime<Utc>,
    /// Doses per day
    pub times_per_day: u32,
    /// Units (drops, tablets, ...) per dose
    pub dosage_units: u32,
    /// Human-readable phase instruction
    pub instruction_text: String,
}

impl Phase {
    /// Whether `now` falls within `[start_date, end_date]` inclusive.
    ///
    /// On a boundary between two phases both satisfy this test; the status
    /// evaluator resolves the tie in favor of the later phase
    /// (inclusive-start policy).
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_date && now <= self.end_date
    }

    /// Whether the phase lies entirely in the past.
    pub fn is_completed(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }

    /// Calendar length of the phase in whole days.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Days left until the phase ends, ceiling-rounded and clamped at 0.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        let seconds = (self.end_date - now).num_seconds();
        if seconds <= 0 {
            0
        } else {
            (seconds + 86_399) / 86_400
        }
    }
}

/// An ordered sequence of dosing phases with absolute dates.
///
/// Built once from a record and a reference date; `current_phase_index` and
/// `overall_progress_percent` are snapshots taken against that reference
/// date, and the `*_at` methods re-derive them for any later instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Timeline {
    /// The classified regimen shape
    pub regimen_type: RegimenType,
    /// Ordered, contiguous phases; empty for chronic regimens
    pub phases: Vec<Phase>,
    /// Sum of all phase lengths in days
    pub total_duration_days: i64,
    /// False for chronic regimens (no derivable schedule)
    pub has_schedule: bool,
    /// Explanatory text, populated only when `has_schedule` is false
    pub message: Option<String>,
    /// 1-based index of the current phase at build time; past-the-end when
    /// every phase is complete
    pub current_phase_index: u32,
    /// Percent complete at build time, 0-100
    pub overall_progress_percent: u32,
}

impl Timeline {
    /// Total number of phases.
    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// 1-based index of the first phase not yet finished at `now`, or
    /// past-the-end (`phase_count + 1`) when the whole course is complete.
    pub fn current_phase_index_at(&self, now: DateTime<Utc>) -> u32 {
        for phase in &self.phases {
            if !phase.is_completed(now) {
                return phase.index;
            }
        }
        self.phases.len() as u32 + 1
    }

    /// The phase active at `now`, preferring the later phase when `now`
    /// sits exactly on a boundary.
    pub fn active_phase(&self, now: DateTime<Utc>) -> Option<&Phase> {
        self.phases.iter().rev().find(|p| p.is_active(now))
    }

    /// Percent of the course complete at `now`, clamped to [0, 100].
    ///
    /// Elapsed time within the active phase counts fractionally so the
    /// result is non-decreasing as `now` advances.
    pub fn progress_percent_at(&self, now: DateTime<Utc>) -> u32 {
        if self.total_duration_days <= 0 {
            return 0;
        }

        let mut elapsed_days = 0.0_f64;
        for phase in &self.phases {
            if phase.is_completed(now) {
                elapsed_days += phase.duration_days() as f64;
            } else if now > phase.start_date {
                elapsed_days += (now - phase.start_date).num_seconds() as f64 / 86_400.0;
            }
        }

        let percent = elapsed_days / self.total_duration_days as f64 * 100.0;
        percent.clamp(0.0, 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn two_phase_timeline() -> Timeline {
        let phases = vec![
            Phase {
                index: 1,
                start_date: utc(2024, 1, 1),
                end_date: utc(2024, 1, 8),
                times_per_day: 4,
                dosage_units: 1,
                instruction_text: "4 times daily".into(),
            },
            Phase {
                index: 2,
                start_date: utc(2024, 1, 8),
                end_date: utc(2024, 1, 15),
                times_per_day: 3,
                dosage_units: 1,
                instruction_text: "3 times daily".into(),
            },
        ];
        Timeline {
            regimen_type: RegimenType::Tapering,
            phases,
            total_duration_days: 14,
            has_schedule: true,
            message: None,
            current_phase_index: 1,
            overall_progress_percent: 0,
        }
    }

    #[test]
    fn test_phase_activity_window() {
        let timeline = two_phase_timeline();
        let first = &timeline.phases[0];

        assert!(!first.is_active(utc(2023, 12, 31)));
        assert!(first.is_active(utc(2024, 1, 1)));
        assert!(first.is_active(utc(2024, 1, 8)));
        assert!(!first.is_active(utc(2024, 1, 9)));
        assert!(first.is_completed(utc(2024, 1, 9)));
    }

    #[test]
    fn test_boundary_belongs_to_later_phase() {
        let timeline = two_phase_timeline();
        let active = timeline.active_phase(utc(2024, 1, 8)).unwrap();
        assert_eq!(active.index, 2);
    }

    #[test]
    fn test_current_phase_index_progression() {
        let timeline = two_phase_timeline();

        assert_eq!(timeline.current_phase_index_at(utc(2023, 12, 25)), 1);
        assert_eq!(timeline.current_phase_index_at(utc(2024, 1, 3)), 1);
        assert_eq!(timeline.current_phase_index_at(utc(2024, 1, 10)), 2);
        // Past-the-end once everything is complete
        assert_eq!(timeline.current_phase_index_at(utc(2024, 2, 1)), 3);
    }

    #[test]
    fn test_progress_percent_bounds() {
        let timeline = two_phase_timeline();

        assert_eq!(timeline.progress_percent_at(utc(2023, 12, 1)), 0);
        assert_eq!(timeline.progress_percent_at(utc(2024, 1, 8)), 50);
        assert_eq!(timeline.progress_percent_at(utc(2024, 6, 1)), 100);
    }

    #[test]
    fn test_progress_zero_duration() {
        let timeline = Timeline {
            regimen_type: RegimenType::Chronic,
            phases: vec![],
            total_duration_days: 0,
            has_schedule: false,
            message: Some("ongoing".into()),
            current_phase_index: 1,
            overall_progress_percent: 0,
        };
        assert_eq!(timeline.progress_percent_at(utc(2024, 1, 1)), 0);
    }

    #[test]
    fn test_days_remaining_ceiling() {
        let timeline = two_phase_timeline();
        let first = &timeline.phases[0];

        // Mid-phase with a partial day left still counts that day
        let now = Utc.with_ymd_and_hms(2024, 1, 7, 12, 0, 0).unwrap();
        assert_eq!(first.days_remaining(now), 1);
        assert_eq!(first.days_remaining(utc(2024, 1, 1)), 7);
        assert_eq!(first.days_remaining(utc(2024, 2, 1)), 0);
    }
}
