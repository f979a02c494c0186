//! Time-slot conflict detection between courses.

use super::types::{Course, CourseId, Day};
use std::collections::{BTreeSet, HashMap};

/// Returns true if `a` and `b` meet on the same day in at least one common period.
pub fn overlap(a: &Course, b: &Course) -> bool {
    a.slots.iter().any(|slot| {
        b.slots
            .iter()
            .filter(|other| other.day == slot.day)
            .any(|other| slot.periods.iter().any(|period| other.contains(*period)))
    })
}

/// Ids of every selected course that shares a (day, period) cell with another selected course.
///
/// Each cell counts distinct courses, so a course never conflicts with itself
/// even when its slots repeat a period.
pub fn conflicted_ids<'a, I>(selected: I) -> BTreeSet<CourseId>
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut cells: HashMap<(Day, u32), BTreeSet<CourseId>> = HashMap::new();

    for course in selected {
        for slot in &course.slots {
            for period in &slot.periods {
                cells.entry((slot.day, *period)).or_default().insert(course.id);
            }
        }
    }

    cells
        .into_values()
        .filter(|occupants| occupants.len() > 1)
        .flatten()
        .collect()
}

/// Whether `candidate` would clash with the current selection.
///
/// A candidate that is already selected is answered from `conflicted`, the
/// result of [`conflicted_ids`] for the selection, so it is never compared
/// against itself.
pub fn conflicts_with_selection(
    candidate: &Course,
    selected: &[&Course],
    conflicted: &BTreeSet<CourseId>,
) -> bool {
    if selected.iter().any(|course| course.id == candidate.id) {
        return conflicted.contains(&candidate.id);
    }
    selected.iter().any(|course| overlap(candidate, course))
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
            professor: "Choi".to_string(),
            credit: 3,
            grade: 1,
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
    fn test_overlap_shared_period() {
        let a = course(1, &[(Day::Mon, &[1, 2])]);
        let b = course(2, &[(Day::Mon, &[2, 3])]);
        let c = course(3, &[(Day::Tue, &[1, 2])]);

        assert!(overlap(&a, &b));
        assert!(overlap(&b, &a));
        assert!(!overlap(&a, &c));
        assert!(!overlap(&c, &a));
    }

    #[test]
    fn test_overlap_same_day_disjoint_periods() {
        let a = course(1, &[(Day::Wed, &[1, 2]), (Day::Fri, &[5])]);
        let b = course(2, &[(Day::Wed, &[3, 4]), (Day::Thu, &[5])]);

        assert!(!overlap(&a, &b));
        assert!(!overlap(&b, &a));
    }

    #[test]
    fn test_overlap_empty_slots_never_conflict() {
        let a = course(1, &[]);
        let b = course(2, &[(Day::Mon, &[1])]);

        assert!(!overlap(&a, &b));
        assert!(!overlap(&a, &a));
    }

    #[test]
    fn test_conflicted_ids_pairs() {
        let a = course(1, &[(Day::Mon, &[1, 2])]);
        let b = course(2, &[(Day::Mon, &[2, 3])]);
        let c = course(3, &[(Day::Tue, &[1, 2])]);

        let conflicts = conflicted_ids([&a, &b, &c]);
        assert_eq!(conflicts, BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_conflicted_ids_chain() {
        // a-b share Mon 2, b-c share Mon 4, a and c do not touch
        let a = course(1, &[(Day::Mon, &[1, 2])]);
        let b = course(2, &[(Day::Mon, &[2, 3, 4])]);
        let c = course(3, &[(Day::Mon, &[4, 5])]);

        assert_eq!(conflicted_ids([&a, &b, &c]), BTreeSet::from([1, 2, 3]));
        assert_eq!(conflicted_ids([&a, &c]), BTreeSet::new());
    }

    #[test]
    fn test_single_course_never_conflicted() {
        let a = course(1, &[(Day::Mon, &[2, 2, 3])]);
        assert!(conflicted_ids([&a]).is_empty());
        assert!(conflicted_ids(std::iter::empty::<&Course>()).is_empty());
    }

    #[test]
    fn test_order_independent() {
        let a = course(1, &[(Day::Thu, &[6])]);
        let b = course(2, &[(Day::Thu, &[6, 7])]);
        let c = course(3, &[(Day::Fri, &[1])]);

        assert_eq!(conflicted_ids([&a, &b, &c]), conflicted_ids([&c, &b, &a]));
    }

    #[test]
    fn test_candidate_not_selected() {
        let a = course(1, &[(Day::Mon, &[1, 2])]);
        let c = course(3, &[(Day::Tue, &[1, 2])]);
        let candidate = course(4, &[(Day::Tue, &[2])]);
        let free = course(5, &[(Day::Fri, &[9])]);

        let selected = [&a, &c];
        let conflicted = conflicted_ids(selected);

        assert!(conflicts_with_selection(&candidate, &selected, &conflicted));
        assert!(!conflicts_with_selection(&free, &selected, &conflicted));
    }

    #[test]
    fn test_candidate_already_selected_uses_grid_result() {
        let a = course(1, &[(Day::Mon, &[1, 2])]);
        let b = course(2, &[(Day::Mon, &[2, 3])]);
        let c = course(3, &[(Day::Tue, &[1])]);

        let selected = [&a, &b, &c];
        let conflicted = conflicted_ids(selected);

        assert!(conflicts_with_selection(&a, &selected, &conflicted));
        // Selected and alone in its cells: must not clash with itself
        assert!(!conflicts_with_selection(&c, &selected, &conflicted));
    }
}
