// Local key-value slot storage with SQLite, file and in-memory backends

use crate::error::StorageError;
use eyre::{Context, Result};
use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

const CURRENT_VERSION: u32 = 1;

/// Slot holding the todo collection
pub const TODOS_SLOT: &str = "todos";
/// Slot holding the authenticated flag
pub const AUTH_SLOT: &str = "auth";
/// Slot holding the dark-mode preference
pub const DARK_MODE_SLOT: &str = "darkMode";

/// Every slot the app writes
pub const ALL_SLOTS: [&str; 3] = [TODOS_SLOT, AUTH_SLOT, DARK_MODE_SLOT];

/// Named string slots in durable local storage
///
/// Methods take `&self`; backends that need mutation use interior
/// mutability so one handle can be shared by every component.
pub trait SlotStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Which backend `open_storage` creates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Files,
    Memory,
}

/// Open the configured backend under `<path>/.todostore`
///
/// The memory backend touches nothing on disk.
pub fn open_storage<P: AsRef<Path>>(path: P, backend: Backend) -> Result<Rc<dyn SlotStorage>> {
    let base_path = path.as_ref().join(".todostore");

    let storage: Rc<dyn SlotStorage> = match backend {
        Backend::Memory => return Ok(Rc::new(MemoryStorage::new())),
        Backend::Sqlite => {
            prepare_directory(&base_path)?;
            Rc::new(SqliteStorage::open(base_path.join("todostore.db"))?)
        }
        Backend::Files => {
            prepare_directory(&base_path)?;
            Rc::new(FileStorage::open(&base_path)?)
        }
    };

    info!(path = ?base_path, ?backend, "Opened slot storage");
    Ok(storage)
}

fn prepare_directory(base_path: &Path) -> Result<()> {
    fs::create_dir_all(base_path).context("Failed to create store directory")?;
    create_gitignore(base_path)?;
    write_version(base_path)
}

fn create_gitignore(base_path: &Path) -> Result<()> {
    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(gitignore_path, "todostore.db\ntodostore.db-shm\ntodostore.db-wal\n.lock\n")
            .context("Failed to write .gitignore")?;
    }
    Ok(())
}

fn write_version(base_path: &Path) -> Result<()> {
    let version_path = base_path.join(".version");
    if !version_path.exists() {
        fs::write(version_path, CURRENT_VERSION.to_string()).context("Failed to write version file")?;
    }
    Ok(())
}

/// Bytes held by the app's slots, keys included
pub fn used_bytes(storage: &dyn SlotStorage) -> Result<usize, StorageError> {
    let mut total = 0;
    for key in ALL_SLOTS {
        if let Some(value) = storage.get(key)? {
            total += key.len() + value.len();
        }
    }
    Ok(total)
}

/// Validate a slot key
///
/// Keys double as file names for the file backend.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("slot key cannot be empty".to_string()));
    }
    if key.len() > 64 {
        return Err(StorageError::InvalidKey(format!("{} (max 64 chars)", key)));
    }
    if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(StorageError::InvalidKey(format!(
            "{} (must be alphanumeric with _/-)",
            key
        )));
    }
    Ok(())
}

// ============================================================================
// Typed slots
// ============================================================================

/// A storage slot holding one JSON-encoded value of type `T`
pub struct Slot<T> {
    key: &'static str,
    storage: Rc<dyn SlotStorage>,
    _value: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> Slot<T> {
    pub fn new(storage: Rc<dyn SlotStorage>, key: &'static str) -> Self {
        Self {
            key,
            storage,
            _value: PhantomData,
        }
    }

    /// Read and decode the slot; `Ok(None)` when it was never written
    pub fn read(&self) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.storage.get(self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|source| StorageError::Json {
            key: self.key.to_string(),
            source,
        })
    }

    pub fn write(&self, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Json {
            key: self.key.to_string(),
            source,
        })?;
        self.storage.set(self.key, &json)
    }

    /// Delete the slot; reads then report it as never written
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(self.key)?;
        debug!(slot = self.key, "Cleared slot");
        Ok(())
    }

    /// Read the slot, treating a missing, unreadable or corrupt slot as `T::default()`
    pub fn load_or_default(&self) -> T
    where
        T: Default,
    {
        match self.read() {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!(slot = self.key, error = %e, "Failed to load slot, using default");
                T::default()
            }
        }
    }

    /// Write the slot, logging instead of failing
    pub fn save(&self, value: &T) {
        match self.write(value) {
            Ok(()) => debug!(slot = self.key, "Saved slot"),
            Err(e) => warn!(slot = self.key, error = %e, "Failed to save slot"),
        }
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Process-local storage; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.slots.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

// ============================================================================
// File backend
// ============================================================================

/// One `<key>.json` file per slot
///
/// Writers stage the new value in a temporary file in the same directory
/// and rename it over the slot, so a reader sees either the old or the new
/// value in full. A `.lock` file serialises readers against writers.
#[derive(Debug)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn open<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create slot directory")?;
        Ok(Self { base_path })
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{}.json", key)))
    }

    fn lock_file(&self) -> Result<File, StorageError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.base_path.join(".lock"))?;
        Ok(file)
    }
}

impl SlotStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;

        let lock = self.lock_file()?;
        lock.lock_shared()?;

        // Lock is released when `lock` is dropped
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;

        let lock = self.lock_file()?;
        lock.lock_exclusive()?;

        let mut staged = NamedTempFile::new_in(&self.base_path)?;
        staged.write_all(value.as_bytes())?;
        staged.as_file().sync_all()?;

        // A failed rename drops the staged file and leaves the slot as it was
        staged.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;

        let lock = self.lock_file()?;
        lock.lock_exclusive()?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// SQLite backend
// ============================================================================

/// Slots as rows of a single SQLite table
pub struct SqliteStorage {
    db: Connection,
}

impl SqliteStorage {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db = Connection::open(db_path.as_ref()).context("Failed to open SQLite database")?;
        let storage = Self { db };
        storage.create_schema()?;
        Ok(storage)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let storage = Self { db };
        storage.create_schema()?;
        Ok(storage)
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating slot schema");

        self.db
            .execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
            )
            .context("Failed to create slot schema")?;

        Ok(())
    }
}

impl SlotStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let value = self
            .db
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.db.execute(
            "INSERT OR REPLACE INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, crate::todo::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.db.execute("DELETE FROM slots WHERE key = ?1", [key])?;
        Ok(())
    }
}
