//! Daily dose schedule generator.
//!
//! Clock-time assignment, in priority order:
//! 1. Explicit timing keyword (bedtime/morning/afternoon/evening) in the
//!    phase instruction: single dose at that configured named time.
//! 2. Fixed lookup table for frequencies 1-4.
//! 3. Higher frequencies: even spacing from 08:00, wrapped modulo 24h.

use chrono::{NaiveDate, NaiveTime};

use crate::models::{DailyScheduleItem, Phase, ScheduleConfig};

/// Minutes past midnight where even spacing starts.
const EVEN_SPACING_ANCHOR_MIN: u32 = 8 * 60;

/// Generate the dose events for one calendar day within one phase.
///
/// Empty when `date` falls outside the phase's day window or the phase
/// calls for zero doses per day.
pub fn generate_daily_schedule(
    phase: &Phase,
    date: NaiveDate,
    config: &ScheduleConfig,
) -> Vec<DailyScheduleItem> {
    if date < phase.start_date.date_naive() || date > phase.end_date.date_naive() {
        return Vec::new();
    }

    if let Some(named) = keyword_time(&phase.instruction_text, config) {
        return vec![make_item(phase, date, named)];
    }

    clock_times(phase.times_per_day)
        .into_iter()
        .map(|t| make_item(phase, date, t))
        .collect()
}

/// Named time-of-day requested by the instruction text, if any.
fn keyword_time(instruction: &str, config: &ScheduleConfig) -> Option<NaiveTime> {
    let lower = instruction.to_lowercase();
    if lower.contains("bedtime") {
        Some(config.bedtime)
    } else if lower.contains("morning") {
        Some(config.morning)
    } else if lower.contains("afternoon") {
        Some(config.afternoon)
    } else if lower.contains("evening") {
        Some(config.evening)
    } else {
        None
    }
}

/// Clock times for a numeric frequency.
fn clock_times(times_per_day: u32) -> Vec<NaiveTime> {
    let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    match times_per_day {
        0 => Vec::new(),
        1 => vec![hm(8, 0)],
        2 => vec![hm(8, 0), hm(20, 0)],
        3 => vec![hm(8, 0), hm(14, 0), hm(20, 0)],
        4 => vec![hm(8, 0), hm(12, 0), hm(18, 0), hm(22, 0)],
        n => {
            let step = 24 * 60 / n;
            (0..n)
                .map(|i| {
                    let minutes = (EVEN_SPACING_ANCHOR_MIN + i * step) % (24 * 60);
                    hm(minutes / 60, minutes % 60)
                })
                .collect()
        }
    }
}

fn make_item(phase: &Phase, date: NaiveDate, time: NaiveTime) -> DailyScheduleItem {
    DailyScheduleItem {
        clock_time: time,
        dose_count: phase.dosage_units,
        instruction_text: phase.instruction_text.clone(),
        scheduled_at: date.and_time(time).and_utc(),
        taken: false,
    }
}
