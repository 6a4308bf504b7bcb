use crate::analyzer::charts::{self, ChartKind};
use crate::analyzer::report::{self, build_summary_report};
use crate::analyzer::{Criterion, filter};
use crate::config::Config;
use crate::store::{ActivityLog, ActivityRecord};
use anyhow::Result;
use chrono::Local;
use tracing::{debug, info};

pub fn print_logged(record: &ActivityRecord) {
    println!("\nActivity '{}' logged successfully.", record.activity_type);
}

pub fn print_report(log: &ActivityLog, config: &Config, save: bool) -> Result<()> {
    let Some(summary) = build_summary_report(Local::now().date_naive(), log.records()) else {
        println!("\nNo data available to generate a report.");
        return Ok(());
    };

    println!("\n{}\n", report::render_text(&summary));

    if save {
        let saved = report::save_report_files(&summary, &config.report_dir)?;
        info!(markdown = %saved.markdown_path.display(), "report saved");
        println!("Report saved:");
        println!("- Markdown: {}", saved.markdown_path.display());
        println!("- JSON: {}", saved.json_path.display());
    }

    Ok(())
}

pub fn print_filtered(log: &ActivityLog, criterion: &str, value: &str) {
    println!("{}", filter_message(log, criterion, value));
}

/// Everything the filter command shows the user, as one block of text.
pub fn filter_message(log: &ActivityLog, criterion: &str, value: &str) -> String {
    if criterion.parse::<Criterion>().is_err() {
        debug!(criterion, "filter criterion rejected");
        return "Invalid filter option.".to_string();
    }

    if log.is_empty() {
        return "\nNo activities to filter.".to_string();
    }

    let matched = match filter(log.records(), criterion, value) {
        Ok(matched) => matched,
        Err(error) => {
            debug!(criterion, value, "filter value rejected");
            return error.to_string();
        }
    };

    if matched.is_empty() {
        format!("\nNo activities found for '{value}'.")
    } else {
        format!(
            "\n--- Filtered Results for '{value}' ---\n{}",
            report::render_records_table(&matched)
        )
    }
}

pub fn print_chart(log: &ActivityLog, kind: ChartKind, width: usize) {
    if log.is_empty() {
        println!("\nNot enough data to create visualizations.");
        return;
    }

    match charts::render(kind, log.records(), width) {
        Ok(chart) => println!("\n{chart}\n"),
        Err(error) => println!("{error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::filter_message;
    use crate::store::ActivityLog;
    use tempfile::TempDir;

    fn seeded_log(dir: &TempDir) -> ActivityLog {
        let path = dir.path().join("fitness_activities.csv");
        ActivityLog::create(&path).expect("create store");
        let mut log = ActivityLog::load(&path).expect("load store");
        log.append("Run", 30.0, 300.0).expect("append");
        log
    }

    #[test]
    fn rejected_date_shows_only_the_date_error() {
        let dir = TempDir::new().expect("temp dir");
        let log = seeded_log(&dir);

        assert_eq!(
            filter_message(&log, "date", "not-a-date"),
            "Invalid date format: not-a-date. Use YYYY-MM-DD."
        );
    }

    #[test]
    fn unknown_criterion_is_an_invalid_option() {
        let dir = TempDir::new().expect("temp dir");
        let log = seeded_log(&dir);

        assert_eq!(
            filter_message(&log, "calories", "300"),
            "Invalid filter option."
        );
    }

    #[test]
    fn matches_and_misses_are_reported() {
        let dir = TempDir::new().expect("temp dir");
        let log = seeded_log(&dir);

        let found = filter_message(&log, "TYPE", "run");
        assert!(found.starts_with("\n--- Filtered Results for 'run' ---\n"));
        assert!(found.contains("300.0"));

        assert_eq!(
            filter_message(&log, "type", "swim"),
            "\nNo activities found for 'swim'."
        );
    }

    #[test]
    fn empty_log_has_nothing_to_filter() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("fitness_activities.csv");
        ActivityLog::create(&path).expect("create store");
        let log = ActivityLog::load(&path).expect("load store");

        assert_eq!(
            filter_message(&log, "type", "run"),
            "\nNo activities to filter."
        );
    }
}
