use crate::analyzer::activity_frequency;
use crate::error::InsufficientDataError;
use crate::store::{ActivityRecord, columns};
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub const MIN_SERIES_RECORDS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChartKind {
    /// Total time spent per activity type
    Duration,
    /// Calories burned per day
    Calories,
    /// Share of records per activity type
    Distribution,
    /// Correlation between duration and calories
    Correlation,
}

impl ChartKind {
    pub fn all() -> [Self; 4] {
        [
            Self::Duration,
            Self::Calories,
            Self::Distribution,
            Self::Correlation,
        ]
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Self::Duration => "Bar Chart (Time per Activity)",
            Self::Calories => "Line Graph (Calories Over Time)",
            Self::Distribution => "Pie Chart (Activity Distribution)",
            Self::Correlation => "Heatmap (Correlation)",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Duration => "Total Time Spent on Each Activity Type",
            Self::Calories => "Calories Burned Over Time",
            Self::Distribution => "Percentage Distribution of Activities",
            Self::Correlation => "Correlation Between Duration and Calories Burned",
        }
    }

    fn chart_name(self) -> &'static str {
        match self {
            Self::Duration => "bar chart",
            Self::Calories => "line graph",
            Self::Distribution => "pie chart",
            Self::Correlation => "heatmap",
        }
    }
}

pub fn duration_by_activity(records: &[ActivityRecord]) -> BTreeMap<String, f64> {
    records.iter().fold(BTreeMap::new(), |mut acc, record| {
        *acc.entry(record.activity_type.clone()).or_insert(0.0) += record.duration_minutes;
        acc
    })
}

pub fn calories_by_day(
    records: &[ActivityRecord],
) -> Result<BTreeMap<NaiveDate, f64>, InsufficientDataError> {
    ensure_series(ChartKind::Calories, records)?;

    Ok(records.iter().fold(BTreeMap::new(), |mut acc, record| {
        *acc.entry(record.timestamp.date()).or_insert(0.0) += record.calories_burned;
        acc
    }))
}

pub fn activity_distribution(records: &[ActivityRecord]) -> Vec<(String, usize)> {
    activity_frequency(records)
}

/// Pearson coefficient between duration and calories. `Ok(None)` when either
/// series is constant and the coefficient is undefined.
pub fn correlation(records: &[ActivityRecord]) -> Result<Option<f64>, InsufficientDataError> {
    ensure_series(ChartKind::Correlation, records)?;

    let count = records.len() as f64;
    let mean_duration = records.iter().map(|r| r.duration_minutes).sum::<f64>() / count;
    let mean_calories = records.iter().map(|r| r.calories_burned).sum::<f64>() / count;

    let (covariance, duration_spread, calories_spread) =
        records
            .iter()
            .fold((0.0, 0.0, 0.0), |(cov, dur, cal), record| {
                let dx = record.duration_minutes - mean_duration;
                let dy = record.calories_burned - mean_calories;
                (cov + dx * dy, dur + dx * dx, cal + dy * dy)
            });

    if duration_spread == 0.0 || calories_spread == 0.0 {
        return Ok(None);
    }

    let coefficient = covariance / (duration_spread * calories_spread).sqrt();
    Ok(Some(coefficient.clamp(-1.0, 1.0)))
}

fn ensure_series(kind: ChartKind, records: &[ActivityRecord]) -> Result<(), InsufficientDataError> {
    if records.len() < MIN_SERIES_RECORDS {
        return Err(InsufficientDataError {
            chart: kind.chart_name(),
            required: MIN_SERIES_RECORDS,
            found: records.len(),
        });
    }

    Ok(())
}

/// Text rendering of a chart for the terminal. `width` is the length of the
/// longest bar.
pub fn render(
    kind: ChartKind,
    records: &[ActivityRecord],
    width: usize,
) -> Result<String, InsufficientDataError> {
    let body = match kind {
        ChartKind::Duration => {
            let rows = duration_by_activity(records)
                .into_iter()
                .map(|(name, minutes)| (name, minutes, format!("{minutes:.1} min")))
                .collect::<Vec<_>>();
            bar_rows(&rows, width)
        }
        ChartKind::Calories => {
            let rows = calories_by_day(records)?
                .into_iter()
                .map(|(date, calories)| {
                    (
                        date.format("%Y-%m-%d").to_string(),
                        calories,
                        format!("{calories:.1} kcal"),
                    )
                })
                .collect::<Vec<_>>();
            bar_rows(&rows, width)
        }
        ChartKind::Distribution => {
            let distribution = activity_distribution(records);
            let total = distribution.iter().map(|(_, count)| *count).sum::<usize>().max(1);
            let rows = distribution
                .into_iter()
                .map(|(name, count)| {
                    let share = count as f64 / total as f64 * 100.0;
                    (name, share, format!("{share:.1}%"))
                })
                .collect::<Vec<_>>();
            bar_rows(&rows, width)
        }
        ChartKind::Correlation => correlation_matrix(correlation(records)?),
    };

    Ok(format!("--- {} ---\n{body}", kind.title()))
}

fn bar_rows(rows: &[(String, f64, String)], width: usize) -> String {
    if rows.is_empty() {
        return "- No data".to_string();
    }

    let label_width = rows.iter().map(|(label, _, _)| label.chars().count()).max().unwrap_or(0);
    let peak = rows.iter().map(|(_, value, _)| *value).fold(0.0_f64, f64::max);

    rows.iter()
        .map(|(label, value, annotation)| {
            let length = if peak > 0.0 {
                ((value / peak) * width as f64).round() as usize
            } else {
                0
            };
            format!(
                "{label:<label_width$} | {} {annotation}",
                "█".repeat(length.max(1))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn correlation_matrix(coefficient: Option<f64>) -> String {
    let off_diagonal = coefficient
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "n/a".to_string());
    let label_width = columns::DURATION.len();
    let cell_width = columns::DURATION.len().max(columns::CALORIES.len());

    [
        format!(
            "{:<label_width$}  {:>cell_width$}  {:>cell_width$}",
            "",
            columns::DURATION,
            columns::CALORIES
        ),
        format!(
            "{:<label_width$}  {:>cell_width$}  {:>cell_width$}",
            columns::DURATION,
            "1.00",
            off_diagonal
        ),
        format!(
            "{:<label_width$}  {:>cell_width$}  {:>cell_width$}",
            columns::CALORIES,
            off_diagonal,
            "1.00"
        ),
    ]
    .join("\n")
}
