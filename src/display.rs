use crate::model::Roster;

pub fn display_results(roster: &Roster) {
    println!();
    println!("--- Final Results ---");
    for student in roster.students() {
        let name = student.full_name();
        println!("{}'s overall grade: {}", name, student.get_grade());
        for assignment in student.assignments() {
            println!(
                "{}'s {} status: {}",
                name,
                assignment.name(),
                student.get_assignment_status(assignment.name())
            );
        }
    }
}

pub fn display_outstanding(roster: &Roster) {
    let students = roster.find_outstanding_assignments(None);
    if !students.is_empty() {
        println!("Students with outstanding assignments:");
        for name in students {
            println!("  - {}", name);
        }
    }
}
