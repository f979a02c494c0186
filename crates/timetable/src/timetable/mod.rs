/// Timetable composition: slot parsing, catalog merging, conflicts and the weekly grid
mod catalog;
mod conflict;
mod error;
mod grid;
mod slots;
mod types;
mod workspace;

pub use catalog::{BatchTicket, Catalog, MergeOutcome, FIRST_SYNTHETIC_ID};
pub use conflict::{conflicted_ids, conflicts_with_selection, overlap};
pub use error::TimetableError;
pub use grid::{period_label, period_time_range, TimetableGrid, DEFAULT_PERIOD_COUNT};
pub use slots::{format_slots, parse_slots};
pub use types::*;
pub use workspace::{CourseFilter, Workspace};

use std::fs;
use std::path::Path;
use tracing::info;

/// Loads bundled baseline courses from a JSON array of courses.
///
/// # Arguments
/// * `path` - Path to the baseline catalog file
///
/// # Returns
/// * `Ok(Vec<Course>)` - The baseline courses, with `source_major` cleared
/// * `Err` - If the file can't be read or parsed
pub fn load_baseline(path: &Path) -> Result<Vec<Course>, TimetableError> {
    let content = fs::read_to_string(path)?;
    let mut courses: Vec<Course> = serde_json::from_str(&content)?;

    for course in &mut courses {
        course.source_major = None;
    }

    info!(path = %path.display(), courses = courses.len(), "Loaded baseline catalog");

    Ok(courses)
}
