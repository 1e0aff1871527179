use super::{Assignment, Status};
use crate::grader::{Grader, RandomGrader};
use crate::notifier::{Event, Notifier};
use crate::timers::Timers;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, trace};

pub const NOT_ASSIGNED: &str = "Hasn't been assigned";

const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Delays and grading policy shared by students.
#[derive(Clone)]
pub struct Settings {
    /// Time a student works before handing in automatically.
    pub work_delay: Duration,
    /// Time between a submission and its grade.
    pub grading_delay: Duration,
    pub grader: Arc<dyn Grader>,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            work_delay: DEFAULT_DELAY,
            grading_delay: DEFAULT_DELAY,
            grader: Arc::new(RandomGrader),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("work_delay", &self.work_delay)
            .field("grading_delay", &self.grading_delay)
            .finish_non_exhaustive()
    }
}

/// Handle on a student. Clones share the same state, which timers keep
/// alive until they have fired.
#[derive(Clone)]
pub struct Student {
    inner: Arc<Inner>,
}

struct Inner {
    notifier: Arc<dyn Notifier>,
    settings: Settings,
    state: Mutex<State>,
}

struct State {
    full_name: String,
    email: String,
    assignments: Vec<Assignment>,
    overall_grade: f64,
    working: Timers,
    grading: Timers,
}

impl State {
    fn assignment(&self, name: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.name() == name)
    }

    fn assignment_mut(&mut self, name: &str) -> Option<&mut Assignment> {
        self.assignments.iter_mut().find(|a| a.name() == name)
    }

    fn recompute_overall_grade(&mut self) {
        let grades = self
            .assignments
            .iter()
            .filter(|a| a.status().is_graded())
            .filter_map(Assignment::grade)
            .map(f64::from)
            .collect::<Vec<_>>();
        self.overall_grade = if grades.is_empty() {
            0.0
        } else {
            grades.iter().sum::<f64>() / grades.len() as f64
        };
    }
}

#[allow(dead_code)]
impl Student {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        notifier: Arc<dyn Notifier>,
    ) -> Student {
        Student::with_settings(full_name, email, notifier, Settings::default())
    }

    pub fn with_settings(
        full_name: impl Into<String>,
        email: impl Into<String>,
        notifier: Arc<dyn Notifier>,
        settings: Settings,
    ) -> Student {
        Student {
            inner: Arc::new(Inner {
                notifier,
                settings,
                state: Mutex::new(State {
                    full_name: full_name.into(),
                    email: email.into(),
                    assignments: Vec::new(),
                    overall_grade: 0.0,
                    working: Timers::new(),
                    grading: Timers::new(),
                }),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, state: &State, assignment: &str, event: Event) {
        self.inner
            .notifier
            .notify(&state.full_name, assignment, event);
    }

    pub fn full_name(&self) -> String {
        self.lock().full_name.clone()
    }

    pub fn email(&self) -> String {
        self.lock().email.clone()
    }

    pub fn set_full_name(&self, full_name: impl Into<String>) {
        self.lock().full_name = full_name.into();
    }

    pub fn set_email(&self, email: impl Into<String>) {
        self.lock().email = email.into();
    }

    /// Release `name` if it is new, then apply `grade` if one is given.
    pub fn update_assignment_status(&self, name: &str, grade: Option<u8>) {
        let mut state = self.lock();
        self.update_locked(&mut state, name, grade);
    }

    fn update_locked(&self, state: &mut State, name: &str, grade: Option<u8>) {
        if state.assignment(name).is_none() {
            state.assignments.push(Assignment::new(name));
            trace!(student = %state.full_name, assignment = name, "assignment released");
            self.notify(state, name, Event::Released);
        }
        if let Some(grade) = grade {
            if let Some(assignment) = state.assignment_mut(name) {
                assignment.set_grade(grade);
                let status = assignment.status();
                trace!(student = %state.full_name, assignment = name, grade, %status, "assignment graded");
                self.notify(state, name, Event::Graded(status));
            }
        }
        state.recompute_overall_grade();
    }

    pub fn status_of(&self, name: &str) -> Option<Status> {
        self.lock().assignment(name).map(Assignment::status)
    }

    /// Human readable status: graded assignments are capitalized, the
    /// others are reported verbatim.
    pub fn get_assignment_status(&self, name: &str) -> String {
        match self.status_of(name) {
            None => NOT_ASSIGNED.to_owned(),
            Some(Status::Pass) => "Pass".to_owned(),
            Some(Status::Fail) => "Fail".to_owned(),
            Some(status) => status.to_string(),
        }
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.lock().assignments.clone()
    }

    pub fn has_assignment_with<F>(&self, condition: F) -> bool
    where
        F: Fn(&Assignment) -> bool,
    {
        self.lock().assignments.iter().any(condition)
    }

    /// Start working on `name`, releasing it first if needed. The work is
    /// handed in automatically once the work delay has elapsed.
    pub fn start_working(&self, name: &str) {
        let mut state = self.lock();
        state.working.cancel(name);
        self.update_locked(&mut state, name, None);
        if let Some(assignment) = state.assignment_mut(name) {
            assignment.set_status(Status::Working);
        }
        state.recompute_overall_grade();
        self.notify(&state, name, Event::Working);
        let student = self.clone();
        let key = name.to_owned();
        state
            .working
            .schedule(name, self.inner.settings.work_delay, move |token| {
                student.on_work_done(&key, token);
            });
    }

    fn on_work_done(&self, name: &str, token: u64) {
        let mut state = self.lock();
        if state.working.complete(name, token) {
            debug!(student = %state.full_name, assignment = name, "work delay elapsed");
            self.submit_locked(&mut state, name);
        }
    }

    pub fn submit_assignment(&self, name: &str) {
        let mut state = self.lock();
        self.submit_locked(&mut state, name);
    }

    fn submit_locked(&self, state: &mut State, name: &str) {
        if let Some(assignment) = state.assignment_mut(name) {
            if assignment.status() != Status::Submitted {
                assignment.set_status(Status::Submitted);
                state.recompute_overall_grade();
                self.notify(state, name, Event::Submitted);
                let student = self.clone();
                let key = name.to_owned();
                state
                    .grading
                    .schedule(name, self.inner.settings.grading_delay, move |token| {
                        student.on_grading_done(&key, token);
                    });
            }
        }
        state.working.cancel(name);
    }

    fn on_grading_done(&self, name: &str, token: u64) {
        let mut state = self.lock();
        if state.grading.complete(name, token) {
            let grade = self.inner.settings.grader.grade(&state.full_name, name);
            self.update_locked(&mut state, name, Some(grade));
        }
    }

    /// Interrupt any work in progress on `name` and hand it in right away,
    /// unless it has already been handed in.
    pub fn handle_reminder(&self, name: &str) {
        let mut state = self.lock();
        state.working.cancel(name);
        let Some(assignment) = state.assignment_mut(name) else {
            return;
        };
        if assignment.status().is_handed_in() {
            return;
        }
        assignment.set_status(Status::FinalReminder);
        self.notify(&state, name, Event::FinalReminder);
        self.submit_locked(&mut state, name);
    }

    pub fn get_grade(&self) -> f64 {
        self.lock().overall_grade
    }

    pub fn pending_timers(&self) -> usize {
        self.lock().working.len()
    }

    pub fn is_working_on(&self, name: &str) -> bool {
        self.lock().working.contains(name)
    }

    pub fn is_being_graded(&self, name: &str) -> bool {
        self.lock().grading.contains(name)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        write!(f, "{} <{}>", state.full_name, state.email)
    }
}

impl fmt::Debug for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Student")
            .field("full_name", &state.full_name)
            .field("email", &state.email)
            .field("assignments", &state.assignments)
            .field("overall_grade", &state.overall_grade)
            .finish_non_exhaustive()
    }
}
