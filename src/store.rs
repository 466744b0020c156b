// Todo store: owns the collection, applies mutations, persists and notifies

use crate::codec;
use crate::error::{Result, StorageError, TodoError};
use crate::filter::{ViewState, derive_view};
use crate::notify::{Notifier, SubscriptionId};
use crate::storage::{Slot, SlotStorage, TODOS_SLOT};
use crate::todo::{Todo, TodoFilter, TodoPatch, TodoSort, TodoStats, normalize_description, normalize_title, now};
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info};
use uuid::Uuid;

/// The single owner of the todo collection
///
/// Every mutation runs to completion, then publishes the new snapshot to
/// subscribers and writes it to the `todos` slot. Storage failures are
/// logged and never undo the in-memory change.
pub struct TodoStore {
    slot: Slot<Vec<Todo>>,
    todos: Vec<Todo>,
    view: ViewState,
    collection_subs: Notifier<[Todo]>,
    view_subs: Notifier<[Todo]>,
    stats_subs: Notifier<TodoStats>,
}

impl TodoStore {
    /// Load the collection from the `todos` slot
    ///
    /// A missing or corrupt slot yields an empty collection.
    pub fn open(storage: Rc<dyn SlotStorage>) -> Self {
        let slot: Slot<Vec<Todo>> = Slot::new(storage, TODOS_SLOT);
        let todos = slot.load_or_default();
        info!(count = todos.len(), "Loaded todos");

        Self {
            slot,
            todos,
            view: ViewState::default(),
            collection_subs: Notifier::new(),
            view_subs: Notifier::new(),
            stats_subs: Notifier::new(),
        }
    }

    /// Replace the initial view settings
    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a todo and append it to the collection
    pub fn create(&mut self, title: &str, description: Option<&str>) -> Result<Todo> {
        let title = normalize_title(title)?;

        let todo = Todo {
            id: self.generate_id(),
            title,
            description: normalize_description(description),
            completed: false,
            created_at: now(),
            updated_at: None,
        };
        debug!(id = %todo.id, "Created todo");

        self.todos.push(todo.clone());
        self.commit();
        Ok(todo)
    }

    /// Merge `patch` into the todo with the given id
    ///
    /// `id` and `createdAt` never change; `updatedAt` is always stamped.
    pub fn update(&mut self, id: &str, patch: TodoPatch) -> Result<Todo> {
        let index = self.position(id).ok_or_else(|| TodoError::NotFound(id.to_string()))?;
        let title = patch.title.as_deref().map(normalize_title).transpose()?;

        let todo = &mut self.todos[index];
        if let Some(title) = title {
            todo.title = title;
        }
        if let Some(description) = patch.description {
            todo.description = normalize_description(description.as_deref());
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        todo.updated_at = Some(now());

        let updated = todo.clone();
        debug!(id, "Updated todo");
        self.commit();
        Ok(updated)
    }

    /// Flip `completed`; a missing id is silently ignored
    pub fn toggle(&mut self, id: &str) -> Option<Todo> {
        let completed = self.get(id)?.completed;
        self.update(id, TodoPatch::default().with_completed(!completed)).ok()
    }

    /// Remove the todo with the given id, returning whether it existed
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != id);
        // Unchanged collection: subscribers and the slot already hold this state
        if self.todos.len() == before {
            return false;
        }

        debug!(id, "Deleted todo");
        self.commit();
        true
    }

    /// Set `completed` on every todo
    pub fn toggle_all(&mut self, completed: bool) {
        let stamp = now();
        for todo in self.todos.iter_mut() {
            todo.completed = completed;
            todo.updated_at = Some(stamp);
        }

        debug!(completed, count = self.todos.len(), "Toggled all todos");
        self.commit();
    }

    /// Remove every completed todo, returning how many were removed
    pub fn clear_completed(&mut self) -> usize {
        let before = self.todos.len();
        self.todos.retain(|t| !t.completed);
        let removed = before - self.todos.len();

        // Nothing removed means no new snapshot to publish or write
        if removed > 0 {
            debug!(removed, "Cleared completed todos");
            self.commit();
        }
        removed
    }

    /// Remove the `todos` slot and empty the collection
    ///
    /// Subscribers receive the empty snapshot. If the slot cannot be removed
    /// the collection is left as it was.
    pub fn reset(&mut self) -> std::result::Result<(), StorageError> {
        self.slot.clear()?;
        self.todos.clear();
        info!("Reset todos");
        self.publish();
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn get_all(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::from_todos(&self.todos)
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// The collection filtered, searched and sorted by the current view state
    pub fn visible(&self) -> Vec<Todo> {
        derive_view(&self.todos, &self.view)
    }

    pub fn set_filter(&mut self, filter: TodoFilter) {
        self.view.filter = filter;
        self.publish_view();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.view.search = search.into();
        self.publish_view();
    }

    pub fn set_sort(&mut self, sort: TodoSort) {
        self.view.sort = sort;
        self.publish_view();
    }

    // ========================================================================
    // Import / export
    // ========================================================================

    /// Pretty-printed JSON of the whole collection, ignoring the view state
    pub fn export(&self) -> serde_json::Result<String> {
        codec::export(&self.todos)
    }

    /// Replace the collection with the todos in `text`
    ///
    /// On any validation failure the current collection is left untouched.
    pub fn import(&mut self, text: &str) -> Result<&[Todo]> {
        let todos = codec::parse_import(text, now())?;
        info!(count = todos.len(), "Imported todos");

        self.todos = todos;
        self.commit();
        Ok(&self.todos)
    }

    /// Read `path` and import it with the same contract as `import`
    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&[Todo]> {
        let text = fs::read_to_string(path.as_ref())?;
        self.import(&text)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Receive every collection snapshot, starting with the current one
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&[Todo]) + 'static,
    {
        self.collection_subs.subscribe_with(&self.todos, callback)
    }

    /// Receive the derived view after every collection or view-state change
    pub fn subscribe_view<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&[Todo]) + 'static,
    {
        let visible = self.visible();
        self.view_subs.subscribe_with(&visible, callback)
    }

    pub fn subscribe_stats<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&TodoStats) + 'static,
    {
        let stats = self.stats();
        self.stats_subs.subscribe_with(&stats, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.collection_subs.unsubscribe(id) || self.view_subs.unsubscribe(id) || self.stats_subs.unsubscribe(id)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn position(&self, id: &str) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }

    // UUIDv7 combines a millisecond clock with randomness; the loop makes
    // uniqueness hold even against imported ids.
    fn generate_id(&self) -> String {
        loop {
            let id = Uuid::now_v7().to_string();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    fn commit(&mut self) {
        self.publish();
        self.slot.save(&self.todos);
    }

    fn publish(&mut self) {
        self.collection_subs.publish(&self.todos);
        if !self.stats_subs.is_empty() {
            let stats = self.stats();
            self.stats_subs.publish(&stats);
        }
        self.publish_view();
    }

    fn publish_view(&mut self) {
        if self.view_subs.is_empty() {
            return;
        }
        let visible = self.visible();
        self.view_subs.publish(&visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn memory() -> Rc<dyn SlotStorage> {
        Rc::new(MemoryStorage::new())
    }

    fn store_with(titles: &[&str]) -> TodoStore {
        let mut store = TodoStore::open(memory());
        for title in titles {
            store.create(title, None).unwrap();
        }
        store
    }

    fn titles(todos: &[Todo]) -> Vec<String> {
        todos.iter().map(|t| t.title.clone()).collect()
    }

    /// Backend whose every operation fails
    struct BrokenStorage;

    impl SlotStorage for BrokenStorage {
        fn get(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
            Err(std::io::Error::other("storage unavailable").into())
        }

        fn set(&self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(std::io::Error::other("quota exceeded").into())
        }

        fn remove(&self, _key: &str) -> std::result::Result<(), StorageError> {
            Err(std::io::Error::other("storage unavailable").into())
        }
    }

    #[test]
    fn test_create_trims_and_appends() {
        let mut store = store_with(&["First"]);

        let todo = store.create("  Buy milk  ", Some("  two litres ")).unwrap();

        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description.as_deref(), Some("two litres"));
        assert!(!todo.completed);
        assert!(todo.updated_at.is_none());
        assert!(!todo.id.is_empty());
        assert_eq!(store.get_all().len(), 2);
        assert_eq!(store.get_all()[1], todo);
    }

    #[test]
    fn test_create_blank_description_is_absent() {
        let mut store = store_with(&[]);
        let todo = store.create("Title", Some("   ")).unwrap();
        assert!(todo.description.is_none());
    }

    #[test]
    fn test_create_generates_unique_ids() {
        let mut store = store_with(&[]);
        for i in 0..200 {
            store.create(&format!("todo {}", i), None).unwrap();
        }
        let ids: HashSet<&str> = store.get_all().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_create_rejects_empty_title() {
        let storage = memory();
        let mut store = TodoStore::open(Rc::clone(&storage));

        assert!(matches!(store.create("", None), Err(TodoError::Validation(_))));
        assert!(matches!(store.create("   ", None), Err(TodoError::Validation(_))));

        assert!(store.get_all().is_empty());
        assert_eq!(storage.get(TODOS_SLOT).unwrap(), None);
    }

    #[test]
    fn test_create_persists() {
        let storage = memory();
        let mut store = TodoStore::open(Rc::clone(&storage));
        let todo = store.create("Persist me", None).unwrap();

        let reopened = TodoStore::open(storage);
        assert_eq!(reopened.get_all(), &[todo]);
    }

    #[test]
    fn test_update_preserves_id_and_created_at() {
        let mut store = store_with(&["Original"]);
        let before = store.get_all()[0].clone();

        let updated = store.update(&before.id, TodoPatch::default().with_title("X")).unwrap();

        assert_eq!(updated.id, before.id);
        assert_eq!(updated.created_at, before.created_at);
        assert_eq!(updated.title, "X");
        assert!(updated.updated_at.is_some());
        assert_eq!(store.get(&before.id), Some(&updated));
    }

    #[test]
    fn test_update_persists() {
        let storage = memory();
        let mut store = TodoStore::open(Rc::clone(&storage));
        let id = store.create("Draft", None).unwrap().id;

        let updated = store
            .update(&id, TodoPatch::default().with_title("Final").with_description(Some("notes".to_string())))
            .unwrap();

        let reopened = TodoStore::open(storage);
        assert_eq!(reopened.get_all(), &[updated]);
    }

    #[test]
    fn test_update_stamps_updated_at_even_for_empty_patch() {
        let mut store = store_with(&["Task"]);
        let id = store.get_all()[0].id.clone();

        let updated = store.update(&id, TodoPatch::default()).unwrap();
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn test_update_missing_id() {
        let mut store = store_with(&["Task"]);
        let result = store.update("missing", TodoPatch::default().with_title("X"));
        assert!(matches!(result, Err(TodoError::NotFound(id)) if id == "missing"));
    }

    #[test]
    fn test_update_rejects_blank_title_without_change() {
        let mut store = store_with(&["Task"]);
        let before = store.get_all()[0].clone();

        let result = store.update(&before.id, TodoPatch::default().with_title("  ").with_completed(true));

        assert!(matches!(result, Err(TodoError::Validation(_))));
        assert_eq!(store.get_all()[0], before);
    }

    #[test]
    fn test_update_description_set_and_clear() {
        let mut store = store_with(&["Task"]);
        let id = store.get_all()[0].id.clone();

        let set = store
            .update(&id, TodoPatch::default().with_description(Some(" details ".to_string())))
            .unwrap();
        assert_eq!(set.description.as_deref(), Some("details"));

        let cleared = store.update(&id, TodoPatch::default().with_description(None)).unwrap();
        assert!(cleared.description.is_none());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut store = store_with(&["Task"]);
        let id = store.get_all()[0].id.clone();

        let once = store.toggle(&id).unwrap();
        assert!(once.completed);
        assert!(once.updated_at.is_some());

        let twice = store.toggle(&id).unwrap();
        assert!(!twice.completed);
    }

    #[test]
    fn test_toggle_persists() {
        let storage = memory();
        let mut store = TodoStore::open(Rc::clone(&storage));
        let id = store.create("Task", None).unwrap().id;

        let toggled = store.toggle(&id).unwrap();

        let reopened = TodoStore::open(storage);
        assert!(reopened.get(&id).unwrap().completed);
        assert_eq!(reopened.get_all(), &[toggled]);
    }

    #[test]
    fn test_toggle_missing_is_noop() {
        let mut store = store_with(&["Task"]);
        let before = store.get_all().to_vec();

        let published = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&published);
        store.subscribe(move |_| *sink.borrow_mut() += 1);

        assert!(store.toggle("missing").is_none());
        assert_eq!(store.get_all(), before.as_slice());
        // Only the initial delivery on subscribe
        assert_eq!(*published.borrow(), 1);
    }

    #[test]
    fn test_toggle_all() {
        let mut store = store_with(&["A", "B", "C"]);
        let id = store.get_all()[1].id.clone();
        store.toggle(&id);

        store.toggle_all(true);
        assert!(store.get_all().iter().all(|t| t.completed && t.updated_at.is_some()));

        store.toggle_all(false);
        assert!(store.get_all().iter().all(|t| !t.completed));
    }

    #[test]
    fn test_toggle_all_persists() {
        let storage = memory();
        let mut store = TodoStore::open(Rc::clone(&storage));
        store.create("A", None).unwrap();
        store.create("B", None).unwrap();

        store.toggle_all(true);

        let reopened = TodoStore::open(storage);
        assert_eq!(reopened.get_all(), store.get_all());
        assert!(reopened.get_all().iter().all(|t| t.completed && t.updated_at.is_some()));
    }

    #[test]
    fn test_clear_completed_preserves_order() {
        let mut store = store_with(&["A", "B", "C", "D"]);
        let ids: Vec<String> = store.get_all().iter().map(|t| t.id.clone()).collect();
        store.toggle(&ids[0]);
        store.toggle(&ids[2]);

        assert_eq!(store.clear_completed(), 2);
        assert_eq!(titles(store.get_all()), vec!["B", "D"]);
        assert_eq!(store.clear_completed(), 0);
    }

    #[test]
    fn test_clear_completed_persists() {
        let storage = memory();
        let mut store = TodoStore::open(Rc::clone(&storage));
        let done = store.create("Done", None).unwrap().id;
        store.create("Open", None).unwrap();
        store.toggle(&done);

        assert_eq!(store.clear_completed(), 1);

        let reopened = TodoStore::open(storage);
        assert_eq!(titles(reopened.get_all()), vec!["Open"]);
    }

    #[test]
    fn test_clear_completed_with_nothing_done_writes_nothing() {
        let storage = memory();
        let mut store = TodoStore::open(Rc::clone(&storage));
        store.create("Open", None).unwrap();

        // Changing the slot behind the store shows whether it is written again
        storage.set(TODOS_SLOT, "[]").unwrap();
        assert_eq!(store.clear_completed(), 0);
        assert!(!store.delete("missing"));
        assert_eq!(storage.get(TODOS_SLOT).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_delete() {
        let mut store = store_with(&["A", "B"]);
        let id = store.get_all()[0].id.clone();

        assert!(store.delete(&id));
        assert_eq!(titles(store.get_all()), vec!["B"]);
        assert!(!store.delete(&id));
        assert_eq!(store.get_all().len(), 1);
    }

    #[test]
    fn test_delete_persists() {
        let storage = memory();
        let mut store = TodoStore::open(Rc::clone(&storage));
        let gone = store.create("Gone", None).unwrap().id;
        let kept = store.create("Kept", None).unwrap();

        assert!(store.delete(&gone));

        let reopened = TodoStore::open(storage);
        assert_eq!(reopened.get_all(), &[kept]);
    }

    #[test]
    fn test_reset_empties_and_removes_slot() {
        let storage = memory();
        let mut store = TodoStore::open(Rc::clone(&storage));
        store.create("A", None).unwrap();

        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&snapshots);
        store.subscribe(move |todos| sink.borrow_mut().push(todos.len()));

        store.reset().unwrap();
        assert!(store.get_all().is_empty());
        assert_eq!(storage.get(TODOS_SLOT).unwrap(), None);
        assert_eq!(*snapshots.borrow(), vec![1, 0]);
    }

    #[test]
    fn test_reset_keeps_collection_when_slot_cannot_be_removed() {
        let mut store = TodoStore::open(Rc::new(BrokenStorage));
        store.create("Stays", None).unwrap();

        assert!(store.reset().is_err());
        assert_eq!(titles(store.get_all()), vec!["Stays"]);
    }

    #[test]
    fn test_stats() {
        let mut store = store_with(&["A", "B", "C"]);
        let ids: Vec<String> = store.get_all().iter().map(|t| t.id.clone()).collect();
        store.toggle(&ids[0]);
        store.toggle(&ids[1]);

        assert_eq!(
            store.stats(),
            TodoStats {
                total: 3,
                active: 1,
                completed: 2
            }
        );
    }

    #[test]
    fn test_visible_uses_view_state() {
        let mut store = store_with(&["Buy Groceries", "Call Mom"]);
        let mom = store.get_all()[1].id.clone();
        store.toggle(&mom);

        store.set_filter(TodoFilter::Active);
        assert_eq!(titles(&store.visible()), vec!["Buy Groceries"]);

        store.set_filter(TodoFilter::All);
        store.set_search("call");
        assert_eq!(titles(&store.visible()), vec!["Call Mom"]);

        store.set_search("");
        store.set_sort(TodoSort::TitleAscending);
        assert_eq!(titles(&store.visible()), vec!["Buy Groceries", "Call Mom"]);
        // Canonical order is untouched
        assert_eq!(titles(store.get_all()), vec!["Buy Groceries", "Call Mom"]);
    }

    #[test]
    fn test_with_view_sets_initial_view() {
        let store = TodoStore::open(memory()).with_view(ViewState::new(
            TodoFilter::Completed,
            "",
            TodoSort::StatusGrouped,
        ));
        assert_eq!(store.view_state().filter, TodoFilter::Completed);
        assert_eq!(store.view_state().sort, TodoSort::StatusGrouped);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut store = store_with(&["A", "B"]);
        let id = store.get_all()[0].id.clone();
        store.update(&id, TodoPatch::default().with_description(Some("desc".to_string()))).unwrap();
        let original = store.get_all().to_vec();

        let text = store.export().unwrap();
        let mut other = TodoStore::open(memory());
        let imported = other.import(&text).unwrap().to_vec();

        assert_eq!(imported, original);
    }

    #[test]
    fn test_import_replaces_and_persists() {
        let storage = memory();
        let mut store = TodoStore::open(Rc::clone(&storage));
        store.create("Old", None).unwrap();

        store.import(r#"[{"id":"n1","title":"New"}]"#).unwrap();
        assert_eq!(titles(store.get_all()), vec!["New"]);

        let reopened = TodoStore::open(storage);
        assert_eq!(titles(reopened.get_all()), vec!["New"]);
    }

    #[test]
    fn test_failed_import_leaves_collection_untouched() {
        let mut store = store_with(&["Keep"]);
        let before = store.get_all().to_vec();

        assert!(matches!(store.import("not json"), Err(TodoError::Format(_))));
        assert!(matches!(store.import(r#"{"a":1}"#), Err(TodoError::Schema(_))));
        assert!(matches!(store.import(r#"[{"title":"x"}]"#), Err(TodoError::Schema(_))));
        assert!(matches!(
            store.import(r#"[{"id":"1","title":"ok"},{"id":"2"}]"#),
            Err(TodoError::Schema(_))
        ));

        assert_eq!(store.get_all(), before.as_slice());
    }

    #[test]
    fn test_create_after_import_avoids_existing_ids() {
        let mut store = store_with(&[]);
        store.import(r#"[{"id":"a","title":"A"},{"id":"b","title":"B"}]"#).unwrap();

        let todo = store.create("C", None).unwrap();
        assert_ne!(todo.id, "a");
        assert_ne!(todo.id, "b");
    }

    #[test]
    fn test_import_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("todos.json");
        fs::write(&path, r#"[{"id":"f1","title":"From file","completed":true}]"#).unwrap();

        let mut store = store_with(&["Old"]);
        let imported = store.import_file(&path).unwrap();
        assert_eq!(imported.len(), 1);
        assert!(imported[0].completed);

        let missing = store.import_file(temp.path().join("missing.json"));
        assert!(matches!(missing, Err(TodoError::Io(_))));
        assert_eq!(titles(store.get_all()), vec!["From file"]);
    }

    #[test]
    fn test_corrupt_slot_loads_empty() {
        let storage = memory();
        storage.set(TODOS_SLOT, "{definitely not todos").unwrap();

        let store = TodoStore::open(storage);
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_broken_storage_never_blocks_mutations() {
        let mut store = TodoStore::open(Rc::new(BrokenStorage));
        assert!(store.get_all().is_empty());

        let todo = store.create("Still works", None).unwrap();
        assert!(store.toggle(&todo.id).unwrap().completed);
        store.toggle_all(false);
        assert!(store.delete(&todo.id));
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_subscribers_receive_snapshots() {
        let mut store = store_with(&["A"]);

        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&snapshots);
        let id = store.subscribe(move |todos| sink.borrow_mut().push(todos.len()));

        store.create("B", None).unwrap();
        let _ = store.create("", None);
        store.clear_completed();
        let first = store.get_all()[0].id.clone();
        store.delete(&first);

        assert_eq!(*snapshots.borrow(), vec![1, 2, 1]);

        assert!(store.unsubscribe(id));
        store.create("C", None).unwrap();
        assert_eq!(snapshots.borrow().len(), 3);
    }

    #[test]
    fn test_stats_subscriber() {
        let mut store = store_with(&[]);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe_stats(move |stats| sink.borrow_mut().push(*stats));

        let todo = store.create("A", None).unwrap();
        store.toggle(&todo.id);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], TodoStats::default());
        assert_eq!(
            seen[2],
            TodoStats {
                total: 1,
                active: 0,
                completed: 1
            }
        );
    }

    #[test]
    fn test_view_subscriber_follows_view_state() {
        let mut store = store_with(&["Buy Groceries", "Call Mom"]);

        let views = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&views);
        store.subscribe_view(move |todos| sink.borrow_mut().push(titles(todos)));

        store.set_search("mom");
        let mom = store.get_all()[1].id.clone();
        store.toggle(&mom);
        store.set_filter(TodoFilter::Active);

        let views = views.borrow();
        assert_eq!(views.len(), 4);
        assert_eq!(views[1], vec!["Call Mom"]);
        assert_eq!(views[2], vec!["Call Mom"]);
        assert!(views[3].is_empty());
    }
}
