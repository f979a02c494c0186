//! Saved timetable plans.
//!
//! Plans are immutable snapshots of a selection, kept newest-first as one JSON
//! record in a [`KeyValueStore`].

use crate::store::KeyValueStore;
use crate::timetable::{CourseId, SavedPlan, Selection, TimetableError};
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

/// Key the plan list is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "saved-timetables";

/// Reads and writes the persisted list of saved plans.
#[derive(Clone)]
pub struct PlanRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl PlanRepository {
    /// Creates a repository using the default storage key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// All saved plans, newest first.
    ///
    /// A missing, unreadable or malformed record reads as no plans; the
    /// failure is logged rather than returned.
    pub fn list(&self) -> Vec<SavedPlan> {
        self.load().unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "Failed to read saved plans");
            Vec::new()
        })
    }

    /// Looks up a plan by id.
    pub fn get(&self, id: &str) -> Option<SavedPlan> {
        self.list().into_iter().find(|plan| plan.id == id)
    }

    /// Saves a new plan for `selection` and returns it.
    ///
    /// A missing or blank name becomes `"Timetable N"`, N being the number of
    /// plans after this one is added.
    pub fn save(&self, name: Option<&str>, selection: &[CourseId]) -> Result<SavedPlan, TimetableError> {
        let mut plans = self.load()?;

        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Timetable {}", plans.len() + 1),
        };

        let plan = SavedPlan {
            id: generate_plan_id(),
            name,
            selected_ids: selection.to_vec(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        plans.insert(0, plan.clone());
        self.persist(&plans)?;

        info!(
            plan_id = %plan.id,
            name = %plan.name,
            courses = plan.selected_ids.len(),
            "Saved timetable plan"
        );

        Ok(plan)
    }

    /// Deletes the plan with `id`. Unknown ids leave the list as it was.
    pub fn remove(&self, id: &str) -> Result<(), TimetableError> {
        let plans = self.load()?;
        let before = plans.len();
        let remaining: Vec<SavedPlan> = plans.into_iter().filter(|plan| plan.id != id).collect();

        if remaining.len() != before {
            info!(plan_id = %id, "Removed timetable plan");
        }

        self.persist(&remaining)
    }

    /// The selection a plan restores, verbatim.
    ///
    /// Ids of courses no longer in the catalog are kept; they are inert until
    /// the course is fetched again.
    pub fn apply(plan: &SavedPlan) -> Selection {
        Selection::from_ids(plan.selected_ids.iter().copied())
    }

    /// Reads the plan list for a write. Store failures are returned so the
    /// write does not replace plans it could not see.
    fn load(&self) -> Result<Vec<SavedPlan>, TimetableError> {
        let raw = match self.store.get(&self.key)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_str::<Vec<SavedPlan>>(&raw) {
            Ok(plans) => Ok(plans),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to load saved plans");
                Ok(Vec::new())
            }
        }
    }

    fn persist(&self, plans: &[SavedPlan]) -> Result<(), TimetableError> {
        let serialized = serde_json::to_string(plans)?;
        self.store.set(&self.key, &serialized)
    }
}

/// Generates a unique plan id from the clock and random bits.
fn generate_plan_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random: u64 = rand::thread_rng().gen();
    format!("{:x}-{:016x}", millis, random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store whose reads can be switched to fail.
    #[derive(Default)]
    struct UnreliableStore {
        inner: MemoryStore,
        fail_reads: AtomicBool,
    }

    impl KeyValueStore for UnreliableStore {
        fn get(&self, key: &str) -> Result<Option<String>, TimetableError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(TimetableError::Store {
                    message: "database is locked".to_string(),
                });
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), TimetableError> {
            self.inner.set(key, value)
        }
    }

    fn repository() -> (Arc<MemoryStore>, PlanRepository) {
        let store = Arc::new(MemoryStore::new());
        let repo = PlanRepository::new(store.clone());
        (store, repo)
    }

    #[test]
    fn test_list_empty_when_never_written() {
        let (_, repo) = repository();
        assert!(repo.list().is_empty());
    }

    #[test]
    fn test_list_empty_on_malformed_record() {
        let (store, repo) = repository();
        store.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        assert!(repo.list().is_empty());

        store.set(DEFAULT_STORAGE_KEY, r#"[{"id": 1}]"#).unwrap();
        assert!(repo.list().is_empty());
    }

    #[test]
    fn test_save_prepends_newest_first() {
        let (_, repo) = repository();
        let first = repo.save(Some("Morning"), &[100000]).unwrap();
        let second = repo.save(Some("  Evening  "), &[100001, 100002]).unwrap();

        let plans = repo.list();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0], second);
        assert_eq!(plans[1], first);
        assert_eq!(second.name, "Evening");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_blank_name_gets_default_label() {
        let (_, repo) = repository();
        assert_eq!(repo.save(None, &[]).unwrap().name, "Timetable 1");
        assert_eq!(repo.save(Some("   "), &[]).unwrap().name, "Timetable 2");
        assert_eq!(repo.save(Some("Mine"), &[]).unwrap().name, "Mine");
    }

    #[test]
    fn test_persisted_layout() {
        let (store, repo) = repository();
        let plan = repo.save(Some("Plan"), &[100003, 100001]).unwrap();

        let raw = store.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], serde_json::json!(plan.id));
        assert_eq!(value[0]["selectedIds"], serde_json::json!([100003, 100001]));
        assert!(value[0]["createdAt"].is_i64());
    }

    #[test]
    fn test_apply_restores_selection() {
        let (_, repo) = repository();
        let ids = [100002, 7, 100000];
        let plan = repo.save(Some("Plan"), &ids).unwrap();

        let restored = PlanRepository::apply(&plan);
        let restored: BTreeSet<_> = restored.ids().iter().copied().collect();
        assert_eq!(restored, BTreeSet::from(ids));
    }

    #[test]
    fn test_remove() {
        let (_, repo) = repository();
        let keep = repo.save(Some("Keep"), &[1]).unwrap();
        let drop = repo.save(Some("Drop"), &[2]).unwrap();

        repo.remove(&drop.id).unwrap();
        assert_eq!(repo.list(), vec![keep.clone()]);
        assert!(repo.get(&drop.id).is_none());

        repo.remove("does-not-exist").unwrap();
        assert_eq!(repo.list(), vec![keep]);
    }

    #[test]
    fn test_separate_keys_do_not_mix() {
        let store = Arc::new(MemoryStore::new());
        let a = PlanRepository::with_key(store.clone(), "a");
        let b = PlanRepository::with_key(store, "b");

        a.save(Some("A"), &[1]).unwrap();
        assert!(b.list().is_empty());
    }

    #[test]
    fn test_read_failure_keeps_existing_plans() {
        let store = Arc::new(UnreliableStore::default());
        let repo = PlanRepository::new(store.clone());
        let one = repo.save(Some("One"), &[1]).unwrap();
        let two = repo.save(Some("Two"), &[2]).unwrap();

        store.fail_reads.store(true, Ordering::SeqCst);
        let err = repo.save(Some("Three"), &[3]).unwrap_err();
        assert!(err.is_retryable());
        assert!(repo.remove(&one.id).is_err());
        assert!(repo.list().is_empty());

        store.fail_reads.store(false, Ordering::SeqCst);
        assert_eq!(repo.list(), vec![two, one]);
    }
}
