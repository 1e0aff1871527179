use crate::model::{Settings, Student};
use crate::notifier::Notifier;
use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

/// Identity of a student as found in configuration or CSV files.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct StudentRecord {
    pub name: String,
    pub email: String,
}

impl StudentRecord {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> StudentRecord {
        StudentRecord {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn into_student(self, notifier: Arc<dyn Notifier>, settings: Settings) -> Student {
        Student::with_settings(self.name, self.email, notifier, settings)
    }
}

/// Load students from a CSV file with `name` and `email` columns.
pub fn load_students(file_name: &Path) -> Result<Vec<StudentRecord>> {
    let reader = csv::Reader::from_path(file_name)
        .wrap_err_with(|| format!("cannot open students file {}", file_name.display()))?;
    read_students(reader)
}

fn read_students<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<StudentRecord>> {
    reader
        .deserialize::<StudentRecord>()
        .enumerate()
        .map(|(line, record)| -> Result<StudentRecord> {
            let record =
                record.wrap_err_with(|| format!("cannot read student record {}", line + 1))?;
            trace!(student = %record.name, email = %record.email, "student loaded");
            Ok(record)
        })
        .collect()
}
