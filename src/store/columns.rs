use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DATE: &str = "Date";
pub const ACTIVITY_TYPE: &str = "Activity Type";
pub const DURATION: &str = "Duration (Minutes)";
pub const CALORIES: &str = "Calories Burned";

pub const TIMESTAMP_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const TIMESTAMP_READ_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

pub fn header() -> [&'static str; 4] {
    [DATE, ACTIVITY_TYPE, DURATION, CALORIES]
}

/// Accepts the timestamp shapes the log has been written with over time.
/// Offsets are dropped after conversion to the wall-clock time they carry.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();

    DateTime::parse_from_rfc3339(trimmed)
        .map(|datetime| datetime.naive_local())
        .ok()
        .or_else(|| {
            TIMESTAMP_READ_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_WRITE_FORMAT).to_string()
}
