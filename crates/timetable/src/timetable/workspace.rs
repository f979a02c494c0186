//! One student's timetable session: catalog, selection and saved plans.

use super::catalog::{BatchTicket, Catalog, MergeOutcome};
use super::conflict::{conflicted_ids, conflicts_with_selection};
use super::error::TimetableError;
use super::grid::TimetableGrid;
use super::types::{Course, CourseId, CourseRow, Day, SavedPlan, Selection};
use crate::plans::PlanRepository;
use std::collections::BTreeSet;
use tracing::info;

/// Read-side filter for browsing the catalog
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    /// Only show baseline courses and those fetched for this major/field
    pub major: Option<String>,
    pub grade: Option<u8>,
    pub day: Option<Day>,
    /// Case-insensitive match against name, professor or code
    pub search: Option<String>,
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        let by_grade = self.grade.map_or(true, |grade| course.grade == grade);
        let by_day = self.day.map_or(true, |day| course.meets_on(day));
        let by_term = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                [&course.name, &course.professor, &course.code]
                    .iter()
                    .any(|value| value.to_lowercase().contains(&term))
            }
            _ => true,
        };
        by_grade && by_day && by_term
    }
}

pub struct Workspace {
    catalog: Catalog,
    selection: Selection,
    plans: PlanRepository,
    period_count: u32,
}

impl Workspace {
    pub fn new(catalog: Catalog, plans: PlanRepository, period_count: u32) -> Self {
        Self {
            catalog,
            selection: Selection::new(),
            plans,
            period_count,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn period_count(&self) -> u32 {
        self.period_count
    }

    /// Merges a fetched batch, last write wins.
    pub fn merge_rows(
        &mut self,
        rows: &[CourseRow],
        source_label: &str,
    ) -> Result<MergeOutcome, TimetableError> {
        self.catalog.merge(rows, source_label)
    }

    pub fn begin_batch(&mut self, source_label: &str) -> BatchTicket {
        self.catalog.begin_batch(source_label)
    }

    /// Merges a fetched batch unless it has been superseded.
    pub fn merge_ticketed(
        &mut self,
        ticket: &BatchTicket,
        rows: &[CourseRow],
    ) -> Result<MergeOutcome, TimetableError> {
        self.catalog.merge_ticketed(ticket, rows)
    }

    /// Selects or deselects a catalog course. Returns whether it is now selected.
    pub fn toggle(&mut self, id: CourseId) -> Result<bool, TimetableError> {
        if self.catalog.get(id).is_none() && !self.selection.contains(id) {
            return Err(TimetableError::CourseNotFound { id });
        }
        Ok(self.selection.toggle(id))
    }

    /// Replaces the selection wholesale. Unknown ids are kept as inert entries.
    pub fn replace_selection(&mut self, ids: impl IntoIterator<Item = CourseId>) {
        self.selection = Selection::from_ids(ids);
    }

    /// Selected courses present in the catalog, in selection order.
    pub fn selected_courses(&self) -> Vec<&Course> {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .collect()
    }

    pub fn total_credits(&self) -> u32 {
        self.selected_courses().iter().map(|course| course.credit).sum()
    }

    pub fn conflicts(&self) -> BTreeSet<CourseId> {
        conflicted_ids(self.selected_courses())
    }

    /// Whether the course with `id` clashes with the current selection.
    pub fn conflicts_with_selection(&self, id: CourseId) -> Result<bool, TimetableError> {
        let candidate = self
            .catalog
            .get(id)
            .ok_or(TimetableError::CourseNotFound { id })?;
        let selected = self.selected_courses();
        let conflicted = conflicted_ids(selected.iter().copied());
        Ok(conflicts_with_selection(candidate, &selected, &conflicted))
    }

    pub fn grid(&self) -> TimetableGrid<'_> {
        TimetableGrid::build(self.selected_courses(), self.period_count)
    }

    /// Catalog courses matching `filter`, each with its clash flag against the selection.
    pub fn filter_courses(&self, filter: &CourseFilter) -> Vec<(&Course, bool)> {
        let selected = self.selected_courses();
        let conflicted = conflicted_ids(selected.iter().copied());

        self.catalog
            .display_courses(filter.major.as_deref())
            .filter(|course| filter.matches(course))
            .map(|course| (course, conflicts_with_selection(course, &selected, &conflicted)))
            .collect()
    }

    pub fn plans(&self) -> Vec<SavedPlan> {
        self.plans.list()
    }

    /// Saves the current selection as a new plan.
    pub fn save_plan(&self, name: Option<&str>) -> Result<SavedPlan, TimetableError> {
        self.plans.save(name, self.selection.ids())
    }

    /// Replaces the current selection with a saved plan's.
    pub fn apply_plan(&mut self, id: &str) -> Result<SavedPlan, TimetableError> {
        let plan = self
            .plans
            .get(id)
            .ok_or_else(|| TimetableError::PlanNotFound { id: id.to_string() })?;

        self.selection = PlanRepository::apply(&plan);
        let missing = self
            .selection
            .ids()
            .iter()
            .filter(|id| self.catalog.get(**id).is_none())
            .count();
        info!(plan_id = %plan.id, courses = self.selection.len(), missing, "Applied timetable plan");

        Ok(plan)
    }

    pub fn delete_plan(&self, id: &str) -> Result<(), TimetableError> {
        self.plans.remove(id)
    }
}
