use crate::grader::{FixedGrader, Grader, MAX_GRADE, RandomGrader};
use crate::loaders::StudentRecord;
use crate::model::Settings;
use eyre::{Result, WrapErr, ensure};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub timers: TimersConfig,
    #[serde(default)]
    pub grading: GradingConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub students: Vec<StudentRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimersConfig {
    pub work_delay_ms: u64,
    pub grading_delay_ms: u64,
}

impl Default for TimersConfig {
    fn default() -> TimersConfig {
        TimersConfig {
            work_delay_ms: 500,
            grading_delay_ms: 500,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradingConfig {
    /// Grade every submission with this value instead of a random one.
    pub fixed: Option<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    pub assignments: Vec<String>,
    pub reminder_delay_ms: u64,
    pub report_delay_ms: u64,
    /// CSV file with `name,email` columns, relative to the configuration file.
    pub students_file: Option<PathBuf>,
}

impl Default for ScenarioConfig {
    fn default() -> ScenarioConfig {
        ScenarioConfig {
            assignments: vec!["A1".to_owned(), "A2".to_owned()],
            reminder_delay_ms: 200,
            report_delay_ms: 2000,
            students_file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            timers: TimersConfig::default(),
            grading: GradingConfig::default(),
            scenario: ScenarioConfig::default(),
            students: vec![
                StudentRecord::new("Alice Smith", "alice@example.com"),
                StudentRecord::new("Bob Jones", "bob@example.com"),
            ],
        }
    }
}

impl Config {
    pub fn load(file_name: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot load configuration file {}", file_name.display()))?;
        let mut config = Config::parse(&content)
            .wrap_err_with(|| format!("invalid configuration file {}", file_name.display()))?;
        if let Some(students_file) = &mut config.scenario.students_file {
            if let Some(dir) = file_name.parent() {
                *students_file = dir.join(&*students_file);
            }
        }
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).wrap_err("cannot parse configuration")?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        ensure!(
            !self.scenario.assignments.is_empty(),
            "scenario.assignments must name at least one assignment"
        );
        if let Some(grade) = self.grading.fixed {
            ensure!(
                grade <= MAX_GRADE,
                "grading.fixed must be at most {}, got {}",
                MAX_GRADE,
                grade
            );
        }
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        let grader: Arc<dyn Grader> = match self.grading.fixed {
            Some(grade) => Arc::new(FixedGrader(grade)),
            None => Arc::new(RandomGrader),
        };
        Settings {
            work_delay: Duration::from_millis(self.timers.work_delay_ms),
            grading_delay: Duration::from_millis(self.timers.grading_delay_ms),
            grader,
        }
    }
}
