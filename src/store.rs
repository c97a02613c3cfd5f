//! The task list state manager.
//!
//! [`TaskStore`] owns the in-memory task list and is its only mutation
//! path. Every mutating operation rewrites the full list through the
//! storage adapter (write-through, no batching, no debouncing). Because the
//! write happens inline before the operation returns, writes are strictly
//! ordered. Persistence failures are logged and dropped: the in-memory
//! list stays authoritative for the session.

use chrono::Utc;
use thiserror::Error;
use tracing::{error, warn};

use crate::storage::{KeyValueStorage, StorageError};
use crate::task::Task;

/// Storage key the whole list is serialized under.
pub const TASKS_KEY: &str = "tasks";

/// The persisted list could not be read or decoded.
///
/// Recovered by starting from an empty list; never surfaced to the caller.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read tasks: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to decode stored tasks: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The list could not be written.
///
/// Recovered by keeping the in-memory state and dropping the write; no
/// retry, never surfaced to the caller.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to write tasks: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

/// In-memory owner of the task list, backed by a key-value store.
pub struct TaskStore<S: KeyValueStorage> {
    storage: S,
    tasks: Vec<Task>,
    last_id: i64,
}

impl<S: KeyValueStorage> TaskStore<S> {
    /// Create a store from whatever `storage` holds under [`TASKS_KEY`].
    ///
    /// Fails soft: a missing, unreadable, or malformed value yields an
    /// empty list, reported to the log only.
    pub fn load(storage: S) -> Self {
        let tasks = match read_persisted(&storage) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!("starting with an empty task list: {e}");
                Vec::new()
            }
        };
        let last_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        TaskStore {
            storage,
            tasks,
            last_id,
        }
    }

    /// Append a new task unless `text` trims to empty.
    ///
    /// Only the emptiness check trims; the accepted text is stored
    /// verbatim. Returns the new task, or `None` for whitespace-only
    /// input, in which case nothing is written either.
    pub fn add(&mut self, text: &str) -> Option<&Task> {
        if text.trim().is_empty() {
            return None;
        }
        let id = self.next_id();
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            completed: false,
        });
        self.save();
        self.tasks.last()
    }

    /// Flip completion on the task with `id`. An unknown id is not an
    /// error; the list is persisted either way.
    pub fn toggle(&mut self, id: i64) {
        if let Some(t) = self.tasks.iter_mut().find(|t| t.id == id) {
            t.completed = !t.completed;
        }
        self.save();
    }

    /// Replace the text of the task with `id`, verbatim.
    ///
    /// Unlike [`add`](Self::add), empty text is accepted here. An unknown
    /// id is not an error; the list is persisted either way.
    pub fn edit(&mut self, id: i64, new_text: &str) {
        if let Some(t) = self.tasks.iter_mut().find(|t| t.id == id) {
            t.text = new_text.to_string();
        }
        self.save();
    }

    /// Remove the task with `id` if present.
    pub fn delete(&mut self, id: i64) {
        self.tasks.retain(|t| t.id != id);
        self.save();
    }

    /// The current list, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Get a task by id.
    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Creation time in milliseconds, bumped past the last issued id so
    /// two adds within the same millisecond stay distinct.
    fn next_id(&mut self) -> i64 {
        let id = Utc::now().timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }

    /// Write the full list through to storage. A failed write is logged
    /// and dropped; the in-memory list stays authoritative.
    fn save(&mut self) {
        if let Err(e) = self.write_through() {
            error!("{e}");
        }
    }

    fn write_through(&mut self) -> Result<(), SaveError> {
        let json = serde_json::to_string(&self.tasks)?;
        self.storage.set(TASKS_KEY, &json)?;
        Ok(())
    }
}

fn read_persisted<S: KeyValueStorage>(storage: &S) -> Result<Vec<Task>, LoadError> {
    match storage.get(TASKS_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::io;
    use std::rc::Rc;

    use super::*;
    use crate::storage::MemoryStorage;

    /// Memory storage with shared interior so tests can observe writes
    /// after the store has taken ownership of its handle.
    #[derive(Clone, Default)]
    struct SharedStorage {
        inner: Rc<RefCell<MemoryStorage>>,
        writes: Rc<Cell<usize>>,
    }

    impl KeyValueStorage for SharedStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            self.inner.borrow_mut().set(key, value)
        }
    }

    /// Storage whose writes always fail.
    struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write(io::Error::other("disk full")))
        }
    }

    fn store() -> TaskStore<MemoryStorage> {
        TaskStore::load(MemoryStorage::new())
    }

    #[test]
    fn add_appends_with_defaults() {
        let mut store = store();
        let id = store.add("Buy milk").map(|t| t.id).unwrap();
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_stores_text_verbatim_without_trimming() {
        let mut store = store();
        let id = store.add("  padded  ").map(|t| t.id).unwrap();
        assert_eq!(store.get(id).unwrap().text, "  padded  ");
    }

    #[test]
    fn whitespace_only_add_is_rejected_and_writes_nothing() {
        let shared = SharedStorage::default();
        let mut store = TaskStore::load(shared.clone());
        assert!(store.add("   ").is_none());
        assert!(store.add("").is_none());
        assert!(store.add("\t\n").is_none());
        assert!(store.is_empty());
        assert_eq!(shared.writes.get(), 0);
    }

    #[test]
    fn list_length_counts_only_accepted_adds() {
        let mut store = store();
        for text in ["a", " ", "b", "", "c"] {
            store.add(text);
        }
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn ids_are_unique_and_increasing_for_rapid_adds() {
        let mut store = store();
        let ids: Vec<i64> = (0..50)
            .map(|i| store.add(&format!("task {i}")).map(|t| t.id).unwrap())
            .collect();
        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0], "ids must strictly increase");
        }
    }

    #[test]
    fn ids_continue_past_persisted_tasks_after_reload() {
        let shared = SharedStorage::default();
        let first_id = {
            let mut store = TaskStore::load(shared.clone());
            store.add("persisted").map(|t| t.id).unwrap()
        };
        let mut reloaded = TaskStore::load(shared);
        let second_id = reloaded.add("fresh").map(|t| t.id).unwrap();
        assert!(second_id > first_id);
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let mut store = store();
        let id = store.add("x").map(|t| t.id).unwrap();
        store.toggle(id);
        assert!(store.get(id).unwrap().completed);
        store.toggle(id);
        assert!(!store.get(id).unwrap().completed);
    }

    #[test]
    fn toggle_of_unknown_id_changes_nothing_but_still_persists() {
        let shared = SharedStorage::default();
        let mut store = TaskStore::load(shared.clone());
        let id = store.add("x").map(|t| t.id).unwrap();
        let writes_before = shared.writes.get();
        store.toggle(id + 1);
        assert!(!store.get(id).unwrap().completed);
        assert_eq!(shared.writes.get(), writes_before + 1);
    }

    #[test]
    fn edit_replaces_text_and_keeps_completion() {
        let mut store = store();
        let id = store.add("Buy milk").map(|t| t.id).unwrap();
        store.toggle(id);
        store.edit(id, "Buy oat milk");
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "Buy oat milk");
        assert!(task.completed);
        assert_eq!(task.id, id);
    }

    #[test]
    fn edit_accepts_empty_text() {
        let mut store = store();
        let id = store.add("x").map(|t| t.id).unwrap();
        store.edit(id, "");
        assert_eq!(store.get(id).unwrap().text, "");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one_task() {
        let mut store = store();
        let a = store.add("a").map(|t| t.id).unwrap();
        let b = store.add("b").map(|t| t.id).unwrap();
        store.delete(a);
        assert_eq!(store.len(), 1);
        assert!(store.get(a).is_none());
        assert!(store.get(b).is_some());
    }

    #[test]
    fn operations_on_a_deleted_id_are_noops() {
        let mut store = store();
        let id = store.add("a").map(|t| t.id).unwrap();
        let keep = store.add("b").map(|t| t.id).unwrap();
        store.delete(id);
        store.toggle(id);
        store.edit(id, "ghost");
        store.delete(id);
        assert_eq!(store.len(), 1);
        let survivor = store.get(keep).unwrap();
        assert_eq!(survivor.text, "b");
        assert!(!survivor.completed);
    }

    #[test]
    fn reload_reproduces_the_saved_list() {
        let shared = SharedStorage::default();
        let mut store = TaskStore::load(shared.clone());
        store.add("one");
        store.add("two");
        let second = store.tasks()[1].id;
        store.toggle(second);
        let saved: Vec<Task> = store.tasks().to_vec();

        let reloaded = TaskStore::load(shared);
        assert_eq!(reloaded.tasks(), saved.as_slice());
    }

    #[test]
    fn missing_value_loads_as_empty_list() {
        assert!(store().is_empty());
    }

    #[test]
    fn malformed_stored_value_loads_as_empty_list() {
        let shared = SharedStorage::default();
        shared
            .inner
            .borrow_mut()
            .set(TASKS_KEY, "not valid json")
            .unwrap();
        let store = TaskStore::load(shared);
        assert!(store.is_empty());
    }

    #[test]
    fn failed_write_keeps_the_in_memory_mutation() {
        let mut store = TaskStore::load(FailingStorage);
        let id = store.add("survives").map(|t| t.id).unwrap();
        store.toggle(id);
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "survives");
        assert!(task.completed);
    }

    #[test]
    fn add_toggle_edit_delete_scenario() {
        let mut store = store();
        assert!(store.is_empty());

        let id = store.add("Buy milk").map(|t| t.id).unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert!(!store.tasks()[0].completed);

        store.toggle(id);
        assert!(store.get(id).unwrap().completed);

        store.edit(id, "Buy oat milk");
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "Buy oat milk");
        assert!(task.completed);

        store.delete(id);
        assert!(store.is_empty());
    }
}
