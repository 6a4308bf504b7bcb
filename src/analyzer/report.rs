use crate::analyzer::{Metrics, aggregate};
use crate::store::{ActivityRecord, columns};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct FrequencyEntry {
    pub activity_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub date: String,
    pub generated_at: String,
    pub record_count: usize,
    pub total_calories: f64,
    pub average_duration: f64,
    pub activity_frequency: Vec<FrequencyEntry>,
}

#[derive(Debug)]
pub struct SavedReport {
    pub markdown_path: PathBuf,
    pub json_path: PathBuf,
}

pub fn build_summary_report(date: NaiveDate, records: &[ActivityRecord]) -> Option<SummaryReport> {
    let Metrics {
        total_calories,
        average_duration,
        activity_frequency,
    } = aggregate(records)?;

    Some(SummaryReport {
        date: date.format("%Y-%m-%d").to_string(),
        generated_at: Local::now().to_rfc3339(),
        record_count: records.len(),
        total_calories,
        average_duration,
        activity_frequency: activity_frequency
            .into_iter()
            .map(|(activity_type, count)| FrequencyEntry {
                activity_type,
                count,
            })
            .collect(),
    })
}

pub fn render_text(report: &SummaryReport) -> String {
    format!(
        "--- Fitness Summary Report ---\nTotal Calories Burned: {:.2} kcal\nAverage Activity Duration: {:.2} minutes\n\n--- Activity Frequency ---\n{}\n----------------------------",
        report.total_calories,
        report.average_duration,
        frequency_rows(&report.activity_frequency)
    )
}

pub fn render_markdown(report: &SummaryReport) -> String {
    let frequency_table = report
        .activity_frequency
        .iter()
        .map(|entry| {
            let ratio = entry.count as f64 / report.record_count.max(1) as f64 * 100.0;
            format!("| {} | {} | {:.0}% |", entry.activity_type, entry.count, ratio)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# Fitness Summary Report - {}\n\n## Summary\n- Logged activities: {}\n- Total calories burned: {:.2} kcal\n- Average activity duration: {:.2} minutes\n\n## Activity Frequency\n| Activity | Count | Ratio |\n|----------|-------|-------|\n{}\n",
        report.date,
        report.record_count,
        report.total_calories,
        report.average_duration,
        frequency_table
    )
}

pub fn save_report_files(report: &SummaryReport, report_dir: &Path) -> Result<SavedReport> {
    fs::create_dir_all(report_dir).with_context(|| {
        format!(
            "Failed to create report directory: {}",
            report_dir.display()
        )
    })?;

    let stem = format!("fitness-report-{}", report.date);
    let json_content =
        serde_json::to_string_pretty(report).context("Failed to serialize report JSON")?;

    Ok(SavedReport {
        markdown_path: write_report_file(report_dir, &stem, "md", &render_markdown(report))?,
        json_path: write_report_file(report_dir, &stem, "json", &json_content)?,
    })
}

fn write_report_file(dir: &Path, stem: &str, extension: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{stem}.{extension}"));
    fs::write(&path, content)
        .with_context(|| format!("Failed to write {extension} report: {}", path.display()))?;

    Ok(path)
}

/// Aligned table of records under the store's column names.
pub fn render_records_table(records: &[&ActivityRecord]) -> String {
    let rows = records
        .iter()
        .map(|record| {
            [
                record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                record.activity_type.clone(),
                format_number(record.duration_minutes),
                format_number(record.calories_burned),
            ]
        })
        .collect::<Vec<_>>();

    let header = columns::header();
    let widths = (0..header.len())
        .map(|column| {
            rows.iter()
                .map(|row| row[column].chars().count())
                .chain([header[column].len()])
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    let format_line = |cells: [&str; 4]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:>width$}", width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    std::iter::once(format_line(header))
        .chain(rows.iter().map(|row| {
            format_line([
                row[0].as_str(),
                row[1].as_str(),
                row[2].as_str(),
                row[3].as_str(),
            ])
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

fn frequency_rows(entries: &[FrequencyEntry]) -> String {
    let label_width = entries
        .iter()
        .map(|entry| entry.activity_type.chars().count())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|entry| format!("{:<label_width$}    {}", entry.activity_type, entry.count))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_number(value: f64) -> String {
    format!("{value:.1}")
}

#[cfg(test)]
mod tests {
    use super::{build_summary_report, render_records_table, render_text, save_report_files};
    use crate::analyzer::tests::sample;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn report_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 16).expect("date")
    }

    #[test]
    fn empty_log_has_no_report() {
        assert!(build_summary_report(report_date(), &[]).is_none());
    }

    #[test]
    fn text_report_lists_totals_and_frequency() {
        let report = build_summary_report(report_date(), &sample()).expect("report");
        let text = render_text(&report);

        assert!(text.contains("Total Calories Burned: 850.00 kcal"));
        assert!(text.contains("Average Activity Duration: 31.67 minutes"));
        assert!(text.contains("Run     2\nSwim    1"));
    }

    #[test]
    fn saved_report_writes_markdown_and_json() {
        let dir = TempDir::new().expect("temp dir");
        let report = build_summary_report(report_date(), &sample()).expect("report");

        let saved = save_report_files(&report, &dir.path().join("reports")).expect("save");
        assert!(saved.markdown_path.ends_with("fitness-report-2024-01-16.md"));

        let markdown = fs::read_to_string(&saved.markdown_path).expect("markdown");
        assert!(markdown.contains("| Run | 2 | 67% |"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&saved.json_path).expect("json"))
                .expect("valid json");
        assert_eq!(json["total_calories"], 850.0);
        assert_eq!(json["activity_frequency"][1]["activity_type"], "Swim");
    }

    #[test]
    fn saving_twice_overwrites_the_same_day_files() {
        let dir = TempDir::new().expect("temp dir");
        let report = build_summary_report(report_date(), &sample()).expect("report");

        let first = save_report_files(&report, dir.path()).expect("save");
        let second = save_report_files(&report, dir.path()).expect("save again");

        assert_eq!(first.json_path, second.json_path);
        assert!(second.json_path.ends_with("fitness-report-2024-01-16.json"));
        assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 2);
    }

    #[test]
    fn records_table_right_aligns_columns() {
        let records = sample();
        let borrowed = records.iter().collect::<Vec<_>>();
        let table = render_records_table(&borrowed);
        let lines = table.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("Duration (Minutes)  Calories Burned"));
        assert!(lines[1].starts_with("2024-01-15 07:15:00"));
        assert!(lines[2].ends_with("45.0            400.0"));
        assert!(lines.iter().all(|line| line.len() == lines[0].len()));
    }
}
