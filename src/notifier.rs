use crate::model::Status;
use std::fmt;
use tracing::debug;

/// Status changes reported to the observer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    Released,
    Working,
    FinalReminder,
    Submitted,
    Graded(Status),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Released => f.write_str("has been released"),
            Event::Working => f.write_str("is working on"),
            Event::FinalReminder => f.write_str("has received a final reminder for"),
            Event::Submitted => f.write_str("has submitted"),
            Event::Graded(status) => write!(f, "has {status}ed"),
        }
    }
}

pub fn format_report(student: &str, assignment: &str, event: Event) -> String {
    format!("{student}, {assignment} {event}")
}

/// Receiver of status-change reports. Implementations must not fail, block
/// or call back into the student that reports to them.
pub trait Notifier: Send + Sync {
    fn notify(&self, student: &str, assignment: &str, event: Event);
}

/// Prints every report on the standard output.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, student: &str, assignment: &str, event: Event) {
        debug!(student, assignment, %event, "status change");
        println!("{}", format_report(student, assignment, event));
    }
}

#[cfg(test)]
pub use self::recording::RecordingNotifier;

#[cfg(test)]
mod recording {
    use super::{Event, Notifier, format_report};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }

        pub fn count(&self, suffix: &str) -> usize {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.ends_with(suffix))
                .count()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, student: &str, assignment: &str, event: Event) {
            self.messages
                .lock()
                .unwrap()
                .push(format_report(student, assignment, event));
        }
    }
}
