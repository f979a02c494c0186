/// Types for timetable data
use serde::{Deserialize, Serialize};

/// Identifier of a course within the in-memory catalog
pub type CourseId = u32;

/// A weekday on which classes can meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Day {
    /// All weekdays in display order.
    pub const ALL: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    /// Zero-based column of this day in the grid.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-glyph Korean form used by the catalog provider.
    pub fn glyph(self) -> &'static str {
        match self {
            Day::Mon => "월",
            Day::Tue => "화",
            Day::Wed => "수",
            Day::Thu => "목",
            Day::Fri => "금",
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The periods a course meets on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: Day,
    /// Ascending period indices (1 = first period of the day)
    pub periods: Vec<u32>,
}

impl TimeSlot {
    pub fn contains(&self, period: u32) -> bool {
        self.periods.contains(&period)
    }
}

/// A course section in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub professor: String,
    pub credit: u32,
    /// Target year of study, 0 when the provider gives none
    pub grade: u8,
    pub area: String,
    pub slots: Vec<TimeSlot>,
    pub english: bool,
    pub remarks: String,
    /// Major or field code this course was fetched under; baseline courses have none
    #[serde(default)]
    pub source_major: Option<String>,
}

impl Course {
    pub fn meets_on(&self, day: Day) -> bool {
        self.slots.iter().any(|slot| slot.day == day)
    }
}

/// A normalized row from the course data provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRow {
    pub code: String,
    pub name: String,
    pub professor: String,
    #[serde(default)]
    pub credit: u32,
    /// Raw grade text (e.g. "2"); anything outside 0-4 is read as 0
    #[serde(default)]
    pub grade: String,
    /// Time description such as "월 1 2 (화 3)"
    #[serde(default)]
    pub time: String,
    /// English time description, used when `time` is blank
    #[serde(default)]
    pub time_eng: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub is_english: bool,
    #[serde(default)]
    pub remark: String,
}

impl CourseRow {
    /// Grade as a year of study in 0-4.
    pub fn grade_level(&self) -> u8 {
        self.grade
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|grade| *grade <= 4)
            .unwrap_or(0)
    }

    /// Text the slot parser should read: `time`, then `time_eng`, then `code`.
    pub fn slot_source(&self) -> &str {
        [&self.time, &self.time_eng, &self.code]
            .into_iter()
            .find(|text| !text.trim().is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A named, persisted snapshot of a selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlan {
    pub id: String,
    pub name: String,
    pub selected_ids: Vec<CourseId>,
    /// Epoch milliseconds
    pub created_at: i64,
}

/// The set of course ids a student currently has chosen.
///
/// Ids keep the order in which they were selected; inserting an id twice is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(Vec<CourseId>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from ids, dropping repeats but keeping first-seen order.
    pub fn from_ids(ids: impl IntoIterator<Item = CourseId>) -> Self {
        let mut selection = Self::new();
        for id in ids {
            selection.insert(id);
        }
        selection
    }

    pub fn contains(&self, id: CourseId) -> bool {
        self.0.contains(&id)
    }

    /// Adds an id. Returns false if it was already selected.
    pub fn insert(&mut self, id: CourseId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Removes an id. Returns false if it was not selected.
    pub fn remove(&mut self, id: CourseId) -> bool {
        let before = self.0.len();
        self.0.retain(|selected| *selected != id);
        self.0.len() != before
    }

    /// Selects the id if absent, deselects it otherwise. Returns the new membership.
    pub fn toggle(&mut self, id: CourseId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.0.push(id);
            true
        }
    }

    pub fn ids(&self) -> &[CourseId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
