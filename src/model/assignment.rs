use std::fmt;

/// Grades strictly above this value pass.
const PASSING_GRADE: u8 = 50;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Status {
    Released,
    Working,
    FinalReminder,
    Submitted,
    Pass,
    Fail,
}

impl Status {
    pub fn is_graded(self) -> bool {
        matches!(self, Status::Pass | Status::Fail)
    }

    /// Submitted or graded assignments are no longer outstanding.
    pub fn is_handed_in(self) -> bool {
        self == Status::Submitted || self.is_graded()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Released => "released",
            Status::Working => "working",
            Status::FinalReminder => "finalReminder",
            Status::Submitted => "submitted",
            Status::Pass => "pass",
            Status::Fail => "fail",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Assignment {
    name: String,
    status: Status,
    grade: Option<u8>,
}

impl Assignment {
    pub fn new(name: impl Into<String>) -> Assignment {
        Assignment {
            name: name.into(),
            status: Status::Released,
            grade: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn grade(&self) -> Option<u8> {
        self.grade
    }

    pub fn set_grade(&mut self, grade: u8) {
        self.grade = Some(grade);
        self.status = if grade > PASSING_GRADE {
            Status::Pass
        } else {
            Status::Fail
        };
    }

    /// Move to a non-graded status. A grade left over from a previous
    /// round is dropped.
    pub(crate) fn set_status(&mut self, status: Status) {
        debug_assert!(!status.is_graded(), "use set_grade to grade an assignment");
        self.status = status;
        self.grade = None;
    }
}
