use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Availability for one day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeWorking {
    /// Whether the doctor works on this day
    pub is_available: bool,
    #[schema(value_type = String, example = "09:00:00")]
    pub time_start_at: NaiveTime,
    #[schema(value_type = String, example = "17:00:00")]
    pub time_end_at: NaiveTime,
}

impl TimeWorking {
    fn office_hours(is_available: bool) -> Self {
        Self {
            is_available,
            time_start_at: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            time_end_at: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
        }
    }

    /// 09:00:00 - 17:00:00, available
    pub fn available() -> Self {
        Self::office_hours(true)
    }

    pub fn unavailable() -> Self {
        Self::office_hours(false)
    }
}

impl Default for TimeWorking {
    fn default() -> Self {
        Self::available()
    }
}

/// Weekly schedule stored as JSON on the doctor row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WorkingHours {
    pub monday: TimeWorking,
    pub tuesday: TimeWorking,
    pub wednesday: TimeWorking,
    pub thursday: TimeWorking,
    pub friday: TimeWorking,
    pub saturday: TimeWorking,
    pub sunday: TimeWorking,
    pub holidays: TimeWorking,
}

/// Weekdays office hours; weekend and holidays off
impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            monday: TimeWorking::available(),
            tuesday: TimeWorking::available(),
            wednesday: TimeWorking::available(),
            thursday: TimeWorking::available(),
            friday: TimeWorking::available(),
            saturday: TimeWorking::unavailable(),
            sunday: TimeWorking::unavailable(),
            holidays: TimeWorking::unavailable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_schedule_serializes_as_clock_times() {
        let value = serde_json::to_value(WorkingHours::default()).unwrap();

        assert_eq!(
            value["monday"],
            json!({"is_available": true, "time_start_at": "09:00:00", "time_end_at": "17:00:00"})
        );
        assert_eq!(value["sunday"]["is_available"], json!(false));
        assert_eq!(value["holidays"]["is_available"], json!(false));
    }

    #[test]
    fn test_schedule_rejects_malformed_time() {
        let mut value = serde_json::to_value(WorkingHours::default()).unwrap();
        value["friday"]["time_end_at"] = json!("late");

        assert!(serde_json::from_value::<WorkingHours>(value).is_err());
    }
}
