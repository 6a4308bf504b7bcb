use crate::analyzer::Criterion;
use crate::analyzer::charts::ChartKind;
use crate::cli::{output, parse_positive};
use crate::config::Config;
use crate::error::InvalidInputError;
use crate::store::ActivityLog;
use anyhow::{Context, Result};
use dialoguer::{Input, Select, theme::ColorfulTheme};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    LogActivity,
    GenerateReport,
    FilterActivities,
    ShowVisualizations,
    Exit,
}

impl MenuChoice {
    const ALL: [Self; 5] = [
        Self::LogActivity,
        Self::GenerateReport,
        Self::FilterActivities,
        Self::ShowVisualizations,
        Self::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::LogActivity => "Log Activity",
            Self::GenerateReport => "Generate Report",
            Self::FilterActivities => "Filter Activities",
            Self::ShowVisualizations => "Show Visualizations",
            Self::Exit => "Exit",
        }
    }
}

pub fn run_menu(log: &mut ActivityLog, config: &Config) -> Result<()> {
    let theme = ColorfulTheme::default();
    let labels = MenuChoice::ALL.map(MenuChoice::label);

    loop {
        println!("\n===== Fitness Tracker Menu =====");

        let index = Select::with_theme(&theme)
            .with_prompt("Enter your choice")
            .default(0)
            .items(&labels)
            .interact()
            .context("Failed to read menu choice")?;
        let choice = MenuChoice::ALL[index];
        debug!(choice = choice.label(), "menu choice");

        match choice {
            MenuChoice::LogActivity => log_activity(log, &theme)?,
            MenuChoice::GenerateReport => output::print_report(log, config, false)?,
            MenuChoice::FilterActivities => filter_activities(log, &theme)?,
            MenuChoice::ShowVisualizations => show_visualizations(log, config, &theme)?,
            MenuChoice::Exit => {
                println!("\nGoodbye!");
                return Ok(());
            }
        }
    }
}

fn log_activity(log: &mut ActivityLog, theme: &ColorfulTheme) -> Result<()> {
    let activity_type: String = Input::with_theme(theme)
        .with_prompt("Enter activity type")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read activity type")?;
    let duration = positive_input(theme, "Enter duration in minutes")?;
    let calories = positive_input(theme, "Enter calories burned")?;

    let record = log.append(&activity_type, duration, calories)?;
    output::print_logged(record);

    Ok(())
}

/// Re-prompts until the answer is a positive number.
fn positive_input(theme: &ColorfulTheme, prompt: &str) -> Result<f64> {
    let raw: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|input: &String| -> std::result::Result<(), InvalidInputError> {
            parse_positive(input).map(|_| ())
        })
        .interact_text()
        .with_context(|| format!("Failed to read input for: {prompt}"))?;

    Ok(parse_positive(&raw)?)
}

fn filter_activities(log: &ActivityLog, theme: &ColorfulTheme) -> Result<()> {
    let raw_criterion: String = Input::with_theme(theme)
        .with_prompt("Filter by 'type' or 'date'?")
        .interact_text()
        .context("Failed to read filter criterion")?;

    let Ok(criterion) = raw_criterion.parse::<Criterion>() else {
        println!("Invalid filter option.");
        return Ok(());
    };

    let value: String = Input::with_theme(theme)
        .with_prompt(format!("Enter the {criterion} to filter by"))
        .interact_text()
        .context("Failed to read filter value")?;

    output::print_filtered(log, &criterion.to_string(), &value);
    Ok(())
}

fn show_visualizations(log: &ActivityLog, config: &Config, theme: &ColorfulTheme) -> Result<()> {
    if log.is_empty() {
        println!("\nNot enough data to create visualizations.");
        return Ok(());
    }

    println!("\n--- Visualization Menu ---");
    let kinds = ChartKind::all();
    let labels = kinds.map(ChartKind::menu_label);

    let index = Select::with_theme(theme)
        .with_prompt("Choose a visualization")
        .default(0)
        .items(&labels)
        .interact()
        .context("Failed to read visualization choice")?;

    output::print_chart(log, kinds[index], config.chart_width);
    Ok(())
}
