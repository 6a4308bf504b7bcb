pub mod charts;
pub mod report;

use crate::error::InvalidDateError;
use crate::store::ActivityRecord;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_calories: f64,
    pub average_duration: f64,
    /// Activity type to record count, highest count first.
    pub activity_frequency: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Type,
    Date,
}

impl FromStr for Criterion {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "type" => Ok(Self::Type),
            "date" => Ok(Self::Date),
            other => Err(format!("Unsupported filter criterion: {other}")),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => write!(f, "type"),
            Self::Date => write!(f, "date"),
        }
    }
}

/// Summary statistics, or `None` for an empty log.
pub fn aggregate(records: &[ActivityRecord]) -> Option<Metrics> {
    if records.is_empty() {
        return None;
    }

    let total_calories = records.iter().map(|record| record.calories_burned).sum::<f64>();
    let total_duration = records.iter().map(|record| record.duration_minutes).sum::<f64>();

    Some(Metrics {
        total_calories,
        average_duration: total_duration / records.len() as f64,
        activity_frequency: activity_frequency(records),
    })
}

/// Counts per activity type, ordered by descending count. Ties keep the
/// order in which each type first appears.
pub fn activity_frequency(records: &[ActivityRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match slots.get(record.activity_type.as_str()).copied() {
            Some(slot) => counts[slot].1 += 1,
            None => {
                slots.insert(&record.activity_type, counts.len());
                counts.push((record.activity_type.clone(), 1));
            }
        }
    }

    counts.sort_by(|left, right| right.1.cmp(&left.1));
    counts
}

/// Read-only selection in insertion order. A criterion other than `type` or
/// `date` matches nothing.
pub fn filter<'a>(
    records: &'a [ActivityRecord],
    criterion: &str,
    value: &str,
) -> Result<Vec<&'a ActivityRecord>, InvalidDateError> {
    match criterion.parse::<Criterion>() {
        Ok(criterion) => filter_by(records, criterion, value),
        Err(reason) => {
            debug!(criterion, reason = %reason, "filter criterion ignored");
            Ok(Vec::new())
        }
    }
}

pub fn filter_by<'a>(
    records: &'a [ActivityRecord],
    criterion: Criterion,
    value: &str,
) -> Result<Vec<&'a ActivityRecord>, InvalidDateError> {
    match criterion {
        Criterion::Type => {
            let wanted = value.to_lowercase();
            Ok(records
                .iter()
                .filter(|record| record.activity_type.to_lowercase() == wanted)
                .collect())
        }
        Criterion::Date => {
            let date = parse_filter_date(value)?;
            Ok(records
                .iter()
                .filter(|record| record.timestamp.date() == date)
                .collect())
        }
    }
}

pub fn parse_filter_date(value: &str) -> Result<NaiveDate, InvalidDateError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| InvalidDateError {
        value: value.to_string(),
    })
}
