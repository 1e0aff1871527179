use crate::config::{Config, ScenarioConfig};
use crate::display::{display_outstanding, display_results};
use crate::loaders::load_students;
use crate::model::Roster;
use crate::notifier::{ConsoleNotifier, Notifier};
use clap::{ArgAction, Parser};
use eyre::{Result, ensure};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info};

mod config;
mod display;
mod grader;
mod loaders;
mod model;
mod notifier;
mod timers;

#[derive(Parser)]
#[command(version, author, about)]
struct Args {
    /// Use FILE instead of the built-in classroom scenario
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Set verbosity level
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
}

fn build_roster(config: &Config) -> Result<Roster> {
    let mut records = config.students.clone();
    if let Some(students_file) = &config.scenario.students_file {
        records.extend(load_students(students_file)?);
    }
    ensure!(!records.is_empty(), "no students in the classlist");
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let settings = config.settings();
    let mut roster = Roster::new(notifier);
    for record in records {
        roster.add_student(record.into_student(roster.notifier(), settings.clone()));
    }
    Ok(roster)
}

/// Release the assignments, have every student start on one of them, then
/// remind the class about the first one.
async fn run_scenario(roster: &Roster, scenario: &ScenarioConfig) -> Result<()> {
    info!(assignments = ?scenario.assignments, "releasing assignments");
    roster
        .release_assignments_parallel(scenario.assignments.as_slice())
        .await?;
    for (student, assignment) in roster
        .students()
        .iter()
        .zip(scenario.assignments.iter().cycle())
    {
        student.start_working(assignment);
    }
    let reminder_delay = Duration::from_millis(scenario.reminder_delay_ms);
    tokio::time::sleep(reminder_delay).await;
    if let Some(first) = scenario.assignments.first() {
        roster.send_reminder(first);
    }
    let report_delay = Duration::from_millis(scenario.report_delay_ms);
    tokio::time::sleep(report_delay.saturating_sub(reminder_delay)).await;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let config = match &args.config {
        Some(file_name) => Config::load(file_name)?,
        None => Config::default(),
    };
    let roster = build_roster(&config)?;
    run_scenario(&roster, &config.scenario).await?;
    display_results(&roster);
    display_outstanding(&roster);
    Ok(())
}
