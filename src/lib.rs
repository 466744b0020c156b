// TodoStore - Local todo-list engine with slot persistence

pub mod app;
pub mod auth;
pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod notify;
pub mod prefs;
pub mod storage;
pub mod store;
pub mod todo;

// Re-export main types for convenience
pub use app::App;
pub use auth::{AuthGate, Route, guard};
pub use config::Config;
pub use error::{Result, StorageError, TodoError};
pub use filter::{ViewState, derive_view};
pub use notify::SubscriptionId;
pub use prefs::Preferences;
pub use storage::{Backend, FileStorage, MemoryStorage, SlotStorage, SqliteStorage, open_storage};
pub use store::TodoStore;
pub use todo::{Todo, TodoFilter, TodoPatch, TodoSort, TodoStats, now};
