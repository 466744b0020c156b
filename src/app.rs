// Composition root: one storage handle shared by every component

use crate::auth::{AuthGate, Route, guard};
use crate::config::Config;
use crate::error::StorageError;
use crate::prefs::Preferences;
use crate::storage::{Backend, SlotStorage, open_storage, used_bytes};
use crate::store::TodoStore;
use eyre::Result;
use std::path::Path;
use std::rc::Rc;
use tracing::info;

/// Everything a front end needs, built once at startup
pub struct App {
    pub todos: TodoStore,
    pub auth: AuthGate,
    pub prefs: Preferences,
    storage: Rc<dyn SlotStorage>,
    backend: Backend,
}

impl App {
    /// Open the configured storage under `store_path` and load all slots
    pub fn open<P: AsRef<Path>>(store_path: P, config: &Config) -> Result<Self> {
        let storage = open_storage(store_path, config.backend)?;
        Ok(Self::with_storage(storage, config))
    }

    pub fn with_storage(storage: Rc<dyn SlotStorage>, config: &Config) -> Self {
        Self {
            todos: TodoStore::open(Rc::clone(&storage)).with_view(config.view()),
            auth: AuthGate::open(Rc::clone(&storage)),
            prefs: Preferences::open(Rc::clone(&storage)),
            storage,
            backend: config.backend,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Bytes currently held in the app's slots
    pub fn storage_used(&self) -> std::result::Result<usize, StorageError> {
        used_bytes(self.storage.as_ref())
    }

    /// Wipe every slot: todos, login state and preferences
    ///
    /// Each component drops back to its default as its slot goes, so a
    /// failure part way leaves the remaining components untouched.
    pub fn clear_all_data(&mut self) -> std::result::Result<(), StorageError> {
        self.todos.reset()?;
        self.auth.reset()?;
        self.prefs.reset()?;
        info!("Cleared all app data");
        Ok(())
    }

    /// Where navigation to `requested` actually lands
    pub fn navigate(&self, requested: Route) -> Route {
        guard(&self.auth, requested)
    }
}
