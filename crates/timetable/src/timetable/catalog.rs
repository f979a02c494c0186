//! The running course catalog and the merge of fetched rows into it.

use super::error::TimetableError;
use super::slots::parse_slots;
use super::types::{Course, CourseId, CourseRow};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Lowest id handed out to fetched courses.
pub const FIRST_SYNTHETIC_ID: CourseId = 100_000;

/// Generation token for one in-flight fetch of a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTicket {
    pub source_label: String,
    pub generation: u64,
}

/// Result of merging one batch of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Ids newly added to the catalog, in row order
    pub inserted: Vec<CourseId>,
    /// Ids of existing courses whose fields were replaced
    pub updated: Vec<CourseId>,
}

impl MergeOutcome {
    /// True when the batch carried no rows at all.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty()
    }
}

/// All known courses, baseline and fetched.
///
/// Ids are stable per `code` for the lifetime of the catalog. Courses are
/// never removed by a merge.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    /// code -> position in `courses`
    by_code: HashMap<String, usize>,
    /// Wider than `CourseId` so that exhaustion is a state, not an overflow
    next_id: u64,
    next_generation: u64,
    /// source label -> generations issued but not yet merged or discarded
    issued: HashMap<String, BTreeSet<u64>>,
    /// source label -> newest generation merged so far
    merged_generations: HashMap<String, u64>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::with_baseline(Vec::new())
    }

    /// Creates a catalog seeded with bundled baseline courses.
    ///
    /// The id counter starts above every baseline id so that fetched courses
    /// never collide with them.
    pub fn with_baseline(baseline: Vec<Course>) -> Self {
        let highest = baseline.iter().map(|course| course.id).max();
        if highest == Some(CourseId::MAX) {
            warn!("Baseline catalog uses the highest course id, new codes cannot be merged");
        }
        let next_id = highest
            .map(|id| u64::from(id) + 1)
            .unwrap_or(0)
            .max(u64::from(FIRST_SYNTHETIC_ID));

        let mut by_code = HashMap::with_capacity(baseline.len());
        for (index, course) in baseline.iter().enumerate() {
            if by_code.insert(course.code.clone(), index).is_some() {
                warn!(code = %course.code, "Duplicate code in baseline catalog, keeping the later entry");
            }
        }

        Self {
            courses: baseline,
            by_code,
            next_id,
            next_generation: 1,
            issued: HashMap::new(),
            merged_generations: HashMap::new(),
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn get(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn get_by_code(&self, code: &str) -> Option<&Course> {
        self.by_code.get(code).map(|index| &self.courses[*index])
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// The id the next newly seen code will receive, or `None` once every id is taken.
    pub fn next_id(&self) -> Option<CourseId> {
        CourseId::try_from(self.next_id).ok()
    }

    /// Courses visible while browsing `major`: baseline courses plus those fetched for it.
    pub fn display_courses<'a, 'b>(
        &'a self,
        major: Option<&'b str>,
    ) -> impl Iterator<Item = &'a Course> + 'b
    where
        'a: 'b,
    {
        self.courses.iter().filter(move |course| match (major, &course.source_major) {
            (Some(major), Some(source)) => source == major,
            _ => true,
        })
    }

    /// Merges a batch of rows fetched under `source_label`.
    ///
    /// Known codes keep their id and have every other field replaced; unknown
    /// codes get the next id and are appended. Batches are applied in call
    /// order, so the later call wins for a code present in both.
    ///
    /// A batch needing more fresh ids than remain is rejected whole.
    pub fn merge(
        &mut self,
        rows: &[CourseRow],
        source_label: &str,
    ) -> Result<MergeOutcome, TimetableError> {
        let mut outcome = MergeOutcome::default();

        if rows.is_empty() {
            info!(source = %source_label, "Empty course batch, catalog left as-is");
            return Ok(outcome);
        }

        let needed = rows
            .iter()
            .filter(|row| !self.by_code.contains_key(&row.code))
            .map(|row| row.code.as_str())
            .collect::<HashSet<_>>()
            .len();
        if self.next_id + needed as u64 > u64::from(CourseId::MAX) + 1 {
            warn!(source = %source_label, needed, "Not enough course ids left for batch");
            return Err(TimetableError::IdSpaceExhausted { needed });
        }

        for row in rows {
            match self.by_code.get(&row.code).copied() {
                Some(index) => {
                    let id = self.courses[index].id;
                    self.courses[index] = course_from_row(id, row, source_label);
                    if !outcome.updated.contains(&id) && !outcome.inserted.contains(&id) {
                        outcome.updated.push(id);
                    }
                }
                None => {
                    let id = CourseId::try_from(self.next_id)
                        .map_err(|_| TimetableError::IdSpaceExhausted { needed })?;
                    self.next_id += 1;
                    self.by_code.insert(row.code.clone(), self.courses.len());
                    self.courses.push(course_from_row(id, row, source_label));
                    outcome.inserted.push(id);
                }
            }
        }

        info!(
            source = %source_label,
            rows = rows.len(),
            inserted = outcome.inserted.len(),
            updated = outcome.updated.len(),
            total = self.courses.len(),
            "Merged course batch"
        );

        Ok(outcome)
    }

    /// Issues a ticket for a fetch that is about to start.
    pub fn begin_batch(&mut self, source_label: &str) -> BatchTicket {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.issued
            .entry(source_label.to_string())
            .or_default()
            .insert(generation);
        debug!(source = %source_label, generation, "Issued batch ticket");
        BatchTicket {
            source_label: source_label.to_string(),
            generation,
        }
    }

    /// Merges a batch unless a newer ticket for the same source was merged first.
    ///
    /// Only tickets issued by [`Catalog::begin_batch`] for the same source are
    /// accepted, and each at most once.
    pub fn merge_ticketed(
        &mut self,
        ticket: &BatchTicket,
        rows: &[CourseRow],
    ) -> Result<MergeOutcome, TimetableError> {
        let pending = self
            .issued
            .get(&ticket.source_label)
            .is_some_and(|generations| generations.contains(&ticket.generation));
        if !pending {
            warn!(
                source = %ticket.source_label,
                ticket = ticket.generation,
                "Rejecting batch with unknown ticket"
            );
            return Err(TimetableError::UnknownTicket {
                source_label: ticket.source_label.clone(),
                ticket: ticket.generation,
            });
        }

        if let Some(&latest) = self.merged_generations.get(&ticket.source_label) {
            if latest > ticket.generation {
                warn!(
                    source = %ticket.source_label,
                    ticket = ticket.generation,
                    latest,
                    "Discarding superseded course batch"
                );
                self.release_ticket(ticket);
                return Err(TimetableError::StaleBatch {
                    source_label: ticket.source_label.clone(),
                    ticket: ticket.generation,
                    latest,
                });
            }
        }

        let outcome = self.merge(rows, &ticket.source_label)?;
        self.release_ticket(ticket);
        self.merged_generations
            .insert(ticket.source_label.clone(), ticket.generation);
        Ok(outcome)
    }

    fn release_ticket(&mut self, ticket: &BatchTicket) {
        if let Some(generations) = self.issued.get_mut(&ticket.source_label) {
            generations.remove(&ticket.generation);
            if generations.is_empty() {
                self.issued.remove(&ticket.source_label);
            }
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the catalog entry for a row under an already chosen id.
fn course_from_row(id: CourseId, row: &CourseRow, source_label: &str) -> Course {
    Course {
        id,
        code: row.code.clone(),
        name: row.name.clone(),
        professor: row.professor.clone(),
        credit: row.credit,
        grade: row.grade_level(),
        area: row.area.clone(),
        slots: parse_slots(row.slot_source()),
        english: row.is_english,
        remarks: row.remark.clone(),
        source_major: Some(source_label.to_string()),
    }
}
