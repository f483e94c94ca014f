//! Status/progress evaluator.
//!
//! Pure function of (timeline, now); computed fresh on every query and
//! never persisted. "Now" is always passed in, never sampled internally.

use chrono::{DateTime, Utc};

use crate::models::{ScheduleStatus, StatusSnapshot, Timeline};

/// Derive the point-in-time status of a timeline.
///
/// Boundary policy: an instant on the boundary between two contiguous
/// phases counts as the later phase being active (inclusive-start), never
/// as the earlier phase.
pub fn evaluate_status(timeline: &Timeline, now: DateTime<Utc>) -> StatusSnapshot {
    if timeline.phases.is_empty() {
        // Chronic (or undeterminable) timelines carry their own message.
        let message = timeline
            .message
            .clone()
            .unwrap_or_else(|| "Continue as prescribed".to_string());
        return StatusSnapshot::bare(ScheduleStatus::Active, message);
    }

    if let Some(phase) = timeline.active_phase(now) {
        return StatusSnapshot {
            status: ScheduleStatus::Active,
            message: format!("Phase {}: {}", phase.index, phase.instruction_text),
            current_phase: Some(phase.clone()),
            days_remaining: Some(phase.days_remaining(now)),
            next_phase: None,
        };
    }

    if timeline.phases.iter().all(|p| p.is_completed(now)) {
        return StatusSnapshot::bare(ScheduleStatus::Completed, "Course complete");
    }

    let first = &timeline.phases[0];
    if now < first.start_date {
        return StatusSnapshot {
            status: ScheduleStatus::NotStarted,
            message: format!("Starts {}", first.start_date.format("%b %-d, %Y")),
            current_phase: None,
            days_remaining: None,
            next_phase: Some(first.clone()),
        };
    }

    // Unreachable while phases stay contiguous and gapless; surfaced as a
    // visible status rather than a panic so a builder defect cannot take
    // the interpreter down.
    StatusSnapshot::bare(
        ScheduleStatus::Unknown,
        "Unable to determine current status",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Phase, RegimenType};
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn phase(index: u32, start: DateTime<Utc>, end: DateTime<Utc>, freq: u32) -> Phase {
        Phase {
            index,
            start_date: start,
            end_date: end,
            times_per_day: freq,
            dosage_units: 1,
            instruction_text: format!("{} times daily", freq),
        }
    }

    fn timeline(phases: Vec<Phase>) -> Timeline {
        let total = phases.iter().map(Phase::duration_days).sum();
        Timeline {
            regimen_type: RegimenType::Tapering,
            phases,
            total_duration_days: total,
            has_schedule: true,
            message: None,
            current_phase_index: 1,
            overall_progress_percent: 0,
        }
    }

    fn two_phase() -> Timeline {
        timeline(vec![
            phase(1, utc(2024, 1, 1), utc(2024, 1, 8), 4),
            phase(2, utc(2024, 1, 8), utc(2024, 1, 15), 3),
        ])
    }

    #[test]
    fn test_active_mid_phase() {
        let snapshot = evaluate_status(&two_phase(), utc(2024, 1, 3));

        assert_eq!(snapshot.status, ScheduleStatus::Active);
        assert_eq!(snapshot.message, "Phase 1: 4 times daily");
        assert_eq!(snapshot.current_phase.as_ref().unwrap().index, 1);
        assert_eq!(snapshot.days_remaining, Some(5));
        assert!(snapshot.next_phase.is_none());
    }

    #[test]
    fn test_boundary_is_second_phase() {
        let snapshot = evaluate_status(&two_phase(), utc(2024, 1, 8));

        assert_eq!(snapshot.status, ScheduleStatus::Active);
        assert_eq!(snapshot.current_phase.as_ref().unwrap().index, 2);
    }

    #[test]
    fn test_not_started() {
        let snapshot = evaluate_status(&two_phase(), utc(2023, 12, 20));

        assert_eq!(snapshot.status, ScheduleStatus::NotStarted);
        assert_eq!(snapshot.message, "Starts Jan 1, 2024");
        assert_eq!(snapshot.next_phase.as_ref().unwrap().index, 1);
        assert!(snapshot.current_phase.is_none());
    }

    #[test]
    fn test_completed() {
        let snapshot = evaluate_status(&two_phase(), utc(2024, 2, 1));

        assert_eq!(snapshot.status, ScheduleStatus::Completed);
        assert_eq!(snapshot.message, "Course complete");
    }

    #[test]
    fn test_chronic_timeline_is_active() {
        let chronic = Timeline {
            regimen_type: RegimenType::Chronic,
            phases: vec![],
            total_duration_days: 0,
            has_schedule: false,
            message: Some("Continue as prescribed — no specific end date".into()),
            current_phase_index: 1,
            overall_progress_percent: 0,
        };
        let snapshot = evaluate_status(&chronic, utc(2024, 1, 1));

        assert_eq!(snapshot.status, ScheduleStatus::Active);
        assert_eq!(
            snapshot.message,
            "Continue as prescribed — no specific end date"
        );
    }

    #[test]
    fn test_gap_between_phases_is_unknown() {
        // A malformed timeline with a gap; the evaluator must surface
        // unknown rather than panic.
        let gapped = timeline(vec![
            phase(1, utc(2024, 1, 1), utc(2024, 1, 5), 2),
            phase(2, utc(2024, 1, 10), utc(2024, 1, 15), 1),
        ]);
        let snapshot = evaluate_status(&gapped, utc(2024, 1, 7));

        assert_eq!(snapshot.status, ScheduleStatus::Unknown);
    }

    #[test]
    fn test_days_remaining_clamped() {
        let snapshot = evaluate_status(&two_phase(), utc(2024, 1, 15));

        // Boundary of the final phase: still active, zero days left
        assert_eq!(snapshot.status, ScheduleStatus::Active);
        assert_eq!(snapshot.days_remaining, Some(0));
    }
}
