pub mod courses;
pub mod plans;
pub mod selection;
pub mod status;
pub mod timetable;
