//! Daily dosing schedule models.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One dose event on one calendar day within one phase.
///
/// Produced on demand, never stored. `taken` is always false here;
/// adherence tracking belongs to the reminder collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyScheduleItem {
    /// Clock time of the dose
    pub clock_time: NaiveTime,
    /// Units to take at this event
    pub dose_count: u32,
    /// Phase instruction text, carried for display
    pub instruction_text: String,
    /// Absolute instant of the dose
    pub scheduled_at: DateTime<Utc>,
    /// Adherence flag, owned by an external collaborator
    pub taken: bool,
}

/// User-configurable named dose times.
///
/// Passed explicitly into the schedule generator so it stays pure; never a
/// process-wide singleton.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub morning: NaiveTime,
    pub afternoon: NaiveTime,
    pub evening: NaiveTime,
    pub bedtime: NaiveTime,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            morning: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            afternoon: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            evening: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            bedtime: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_named_times() {
        let config = ScheduleConfig::default();
        assert_eq!(config.morning, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(config.afternoon, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(config.evening, NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        assert_eq!(config.bedtime, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
    }
}
