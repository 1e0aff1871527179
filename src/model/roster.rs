use super::{Status, Student};
use crate::notifier::Notifier;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

pub struct Roster {
    students: Vec<Student>,
    notifier: Arc<dyn Notifier>,
}

#[allow(dead_code)]
impl Roster {
    pub fn new(notifier: Arc<dyn Notifier>) -> Roster {
        Roster {
            students: Vec::new(),
            notifier,
        }
    }

    /// Notifier that students of this roster are expected to share.
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn add_student(&mut self, student: Student) {
        let name = student.full_name();
        if self.find_student_by_name(&name).is_some() {
            warn!(student = %name, "a student with this name is already in the classlist");
        }
        info!(student = %student, "student added");
        println!("{name} has been added to the classlist.");
        self.students.push(student);
    }

    pub fn remove_student(&mut self, full_name: &str) {
        if let Some(pos) = self
            .students
            .iter()
            .position(|s| s.full_name() == full_name)
        {
            let student = self.students.remove(pos);
            info!(student = %student, "student removed");
        }
    }

    pub fn find_student_by_name(&self, full_name: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.full_name() == full_name)
    }

    /// Names of the students who have not handed in `assignment`, or, without
    /// an assignment name, who have anything released or in progress.
    pub fn find_outstanding_assignments(&self, assignment: Option<&str>) -> Vec<String> {
        self.students
            .iter()
            .filter(|s| match assignment {
                Some(name) => s.status_of(name).is_some_and(|status| !status.is_handed_in()),
                None => s.has_assignment_with(|a| {
                    matches!(a.status(), Status::Released | Status::Working)
                }),
            })
            .map(Student::full_name)
            .collect()
    }

    /// Release every assignment of `names` to every student concurrently and
    /// wait until all of them are visible.
    pub async fn release_assignments_parallel<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<(), JoinError> {
        let mut releases = JoinSet::new();
        for student in &self.students {
            for name in names {
                let student = student.clone();
                let name = name.as_ref().to_owned();
                releases.spawn(async move { student.update_assignment_status(&name, None) });
            }
        }
        debug!(releases = releases.len(), "releasing assignments");
        while let Some(result) = releases.join_next().await {
            result?;
        }
        Ok(())
    }

    pub fn send_reminder(&self, assignment: &str) {
        let outstanding = self.find_outstanding_assignments(Some(assignment));
        info!(assignment, students = outstanding.len(), "sending reminders");
        for name in outstanding {
            if let Some(student) = self.find_student_by_name(&name) {
                student.handle_reminder(assignment);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grader::FixedGrader;
    use crate::model::Settings;
    use crate::notifier::RecordingNotifier;
    use std::time::Duration;

    fn roster(names: &[&str]) -> (Roster, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut roster = Roster::new(notifier.clone());
        let settings = Settings {
            grader: Arc::new(FixedGrader(70)),
            ..Settings::default()
        };
        for name in names {
            roster.add_student(Student::with_settings(
                *name,
                format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                roster.notifier(),
                settings.clone(),
            ));
        }
        (roster, notifier)
    }

    #[test]
    fn test_membership() {
        let (mut roster, _) = roster(&["Alice Smith", "Bob Jones"]);
        assert_eq!(roster.len(), 2);
        assert_eq!(
            roster
                .find_student_by_name("Bob Jones")
                .map(Student::email),
            Some("bob.jones@example.com".to_owned())
        );
        assert!(roster.find_student_by_name("Carol White").is_none());
        roster.remove_student("Carol White");
        assert_eq!(roster.len(), 2);
        roster.remove_student("Alice Smith");
        assert_eq!(roster.len(), 1);
        assert!(roster.find_student_by_name("Alice Smith").is_none());
        roster.remove_student("Bob Jones");
        assert!(roster.is_empty());
    }

    #[test]
    fn test_remove_first_match_only() {
        let (mut roster, _) = roster(&["Alice Smith", "Alice Smith"]);
        roster.remove_student("Alice Smith");
        assert_eq!(roster.len(), 1);
    }

    #[tokio::test]
    async fn test_parallel_release() {
        let (roster, notifier) = roster(&["Alice Smith", "Bob Jones"]);
        roster
            .release_assignments_parallel(&["A1", "A2"])
            .await
            .unwrap();
        for student in roster.students() {
            assert_eq!(student.get_assignment_status("A1"), "released");
            assert_eq!(student.get_assignment_status("A2"), "released");
        }
        assert_eq!(notifier.count("has been released"), 4);
        for name in ["Alice Smith", "Bob Jones"] {
            let prefix = format!("{name}, ");
            assert_eq!(
                notifier
                    .messages()
                    .iter()
                    .filter(|m| m.starts_with(&prefix))
                    .count(),
                2
            );
        }
    }

    #[tokio::test]
    async fn test_parallel_release_of_nothing() {
        let (roster, notifier) = roster(&["Alice Smith"]);
        roster
            .release_assignments_parallel::<&str>(&[])
            .await
            .unwrap();
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_outstanding_for_one_assignment() {
        let (roster, _) = roster(&["Alice Smith", "Bob Jones"]);
        let alice = roster.find_student_by_name("Alice Smith").unwrap();
        alice.start_working("A1");
        assert_eq!(
            roster.find_outstanding_assignments(Some("A1")),
            vec!["Alice Smith"]
        );
        alice.submit_assignment("A1");
        assert!(roster.find_outstanding_assignments(Some("A1")).is_empty());
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(alice.get_assignment_status("A1"), "Pass");
        assert!(roster.find_outstanding_assignments(Some("A1")).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_outstanding_for_any_assignment() {
        let (roster, _) = roster(&["Alice Smith", "Bob Jones", "Carol White"]);
        roster
            .find_student_by_name("Alice Smith")
            .unwrap()
            .update_assignment_status("A1", None);
        roster
            .find_student_by_name("Bob Jones")
            .unwrap()
            .start_working("A2");
        let carol = roster.find_student_by_name("Carol White").unwrap();
        carol.update_assignment_status("A1", None);
        carol.submit_assignment("A1");
        assert_eq!(
            roster.find_outstanding_assignments(None),
            vec!["Alice Smith", "Bob Jones"]
        );
        assert_eq!(
            roster.find_outstanding_assignments(Some("A1")),
            vec!["Alice Smith"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminder_reaches_outstanding_students_only() {
        let (roster, notifier) = roster(&["Alice Smith", "Bob Jones"]);
        roster
            .release_assignments_parallel(&["A1", "A2"])
            .await
            .unwrap();
        let alice = roster.find_student_by_name("Alice Smith").unwrap();
        let bob = roster.find_student_by_name("Bob Jones").unwrap();
        alice.start_working("A1");
        bob.start_working("A2");
        tokio::time::sleep(Duration::from_millis(200)).await;
        roster.send_reminder("A1");
        assert_eq!(alice.get_assignment_status("A1"), "submitted");
        assert_eq!(alice.pending_timers(), 0);
        // Bob only had A1 released, so he is reminded as well.
        assert_eq!(bob.get_assignment_status("A1"), "submitted");
        assert_eq!(bob.get_assignment_status("A2"), "working");
        assert_eq!(notifier.count("has received a final reminder for"), 2);

        tokio::time::sleep(Duration::from_millis(1800)).await;
        for student in [alice, bob] {
            assert_eq!(student.get_assignment_status("A1"), "Pass");
            assert_eq!(student.pending_timers(), 0);
        }
        assert_eq!(bob.get_assignment_status("A2"), "Pass");
        assert_eq!(alice.get_assignment_status("A2"), "released");
        assert_eq!(alice.get_grade(), 70.0);
        assert_eq!(notifier.count("has submitted"), 3);
    }
}
