//! Weekly class timetable composition.
//!
//! Fetched course rows are merged into a [`timetable::Catalog`] with stable
//! ids, a student's [`timetable::Selection`] is checked for time-slot
//! conflicts and projected into a weekday x period grid, and named snapshots
//! of the selection are kept by a [`plans::PlanRepository`].

pub mod config;
pub mod plans;
pub mod server;
pub mod store;
pub mod timetable;
pub mod types;
