pub use self::assignment::{Assignment, Status};
pub use self::roster::Roster;
pub use self::student::{Settings, Student};

mod assignment;
mod roster;
mod student;
