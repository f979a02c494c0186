//! Projection of a selection into a weekday x period matrix.

use super::types::{Course, CourseId, Day};
use chrono::NaiveTime;
use tracing::debug;

/// Number of teaching periods in a day.
pub const DEFAULT_PERIOD_COUNT: u32 = 12;

/// Hour at which period 1 starts.
const FIRST_PERIOD_HOUR: u32 = 9;

/// Wall-clock start and end of a period (period 1 = 09:00~10:00, one hour each).
pub fn period_time_range(period: u32) -> Option<(NaiveTime, NaiveTime)> {
    if period == 0 {
        return None;
    }
    let start_hour = FIRST_PERIOD_HOUR.checked_add(period - 1)?;
    let start = NaiveTime::from_hms_opt(start_hour, 0, 0)?;
    let end = NaiveTime::from_hms_opt(start_hour + 1, 0, 0)?;
    Some((start, end))
}

/// Formats a period as `"09:00~10:00"`.
pub fn period_label(period: u32) -> Option<String> {
    period_time_range(period)
        .map(|(start, end)| format!("{}~{}", start.format("%H:%M"), end.format("%H:%M")))
}

/// Courses occupying each (day, period) cell of the week.
///
/// Every cell for `period` in `1..=period_count` exists, possibly empty.
#[derive(Debug, Clone)]
pub struct TimetableGrid<'a> {
    period_count: u32,
    /// Indexed by `[day.index()][period - 1]`
    cells: Vec<Vec<Vec<&'a Course>>>,
}

impl<'a> TimetableGrid<'a> {
    /// Builds the grid from scratch.
    ///
    /// Courses are appended to cells in iteration order. A course lands in a
    /// cell at most once, and periods beyond `period_count` are dropped.
    pub fn build<I>(selected: I, period_count: u32) -> Self
    where
        I: IntoIterator<Item = &'a Course>,
    {
        let mut cells = vec![vec![Vec::new(); period_count as usize]; Day::ALL.len()];

        for course in selected {
            for slot in &course.slots {
                for period in &slot.periods {
                    if *period == 0 || *period > period_count {
                        debug!(course = course.id, day = %slot.day, period, "Period outside grid, skipping");
                        continue;
                    }
                    let cell: &mut Vec<&Course> = &mut cells[slot.day.index()][(*period - 1) as usize];
                    if !cell.iter().any(|placed| placed.id == course.id) {
                        cell.push(course);
                    }
                }
            }
        }

        Self {
            period_count,
            cells,
        }
    }

    pub fn period_count(&self) -> u32 {
        self.period_count
    }

    /// Courses in a cell; empty for periods outside the grid.
    pub fn cell(&self, day: Day, period: u32) -> &[&'a Course] {
        if period == 0 || period > self.period_count {
            return &[];
        }
        &self.cells[day.index()][(period - 1) as usize]
    }

    /// Ids in a cell, in placement order.
    pub fn cell_ids(&self, day: Day, period: u32) -> Vec<CourseId> {
        self.cell(day, period).iter().map(|course| course.id).collect()
    }

    /// Iterates every cell row by row: period 1 Mon..Fri, period 2 Mon..Fri, ...
    pub fn rows(&self) -> impl Iterator<Item = (u32, [&[&'a Course]; 5])> + '_ {
        (1..=self.period_count).map(move |period| (period, Day::ALL.map(|day| self.cell(day, period))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::types::TimeSlot;

    fn course(id: CourseId, slots: &[(Day, &[u32])]) -> Course {
        Course {
            id,
            code: format!("C{id}"),
            name: format!("Course {id}"),
            professor: "Jung".to_string(),
            credit: 3,
            grade: 2,
            area: "Major".to_string(),
            slots: slots
                .iter()
                .map(|(day, periods)| TimeSlot {
                    day: *day,
                    periods: periods.to_vec(),
                })
                .collect(),
            english: false,
            remarks: String::new(),
            source_major: None,
        }
    }

    #[test]
    fn test_grid_cells_and_order() {
        let a = course(1, &[(Day::Mon, &[1, 2])]);
        let b = course(2, &[(Day::Mon, &[2, 3])]);

        let grid = TimetableGrid::build([&a, &b], DEFAULT_PERIOD_COUNT);
        assert_eq!(grid.cell_ids(Day::Mon, 2), vec![1, 2]);
        assert_eq!(grid.cell_ids(Day::Mon, 1), vec![1]);
        assert_eq!(grid.cell_ids(Day::Mon, 3), vec![2]);

        let reversed = TimetableGrid::build([&b, &a], DEFAULT_PERIOD_COUNT);
        assert_eq!(reversed.cell_ids(Day::Mon, 2), vec![2, 1]);
    }

    #[test]
    fn test_grid_is_complete() {
        let grid = TimetableGrid::build(std::iter::empty::<&Course>(), 12);
        assert_eq!(grid.rows().count(), 12);
        for (_, cells) in grid.rows() {
            assert!(cells.iter().all(|cell| cell.is_empty()));
        }
        assert!(grid.cell(Day::Fri, 12).is_empty());
    }

    #[test]
    fn test_grid_skips_out_of_range_and_duplicates() {
        let a = course(1, &[(Day::Wed, &[0, 2, 2, 13])]);
        let empty = course(2, &[]);

        let grid = TimetableGrid::build([&a, &empty], 12);
        assert_eq!(grid.cell_ids(Day::Wed, 2), vec![1]);
        assert!(grid.cell(Day::Wed, 13).is_empty());
        assert!(grid.cell(Day::Wed, 0).is_empty());
        let placed: usize = grid
            .rows()
            .map(|(_, cells)| cells.iter().map(|cell| cell.len()).sum::<usize>())
            .sum();
        assert_eq!(placed, 1);
    }

    #[test]
    fn test_period_labels() {
        assert_eq!(period_label(1).as_deref(), Some("09:00~10:00"));
        assert_eq!(period_label(12).as_deref(), Some("20:00~21:00"));
        assert_eq!(period_label(0), None);
        assert_eq!(period_label(15), None);
    }
}
