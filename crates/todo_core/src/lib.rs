//! Core domain logic for the todo list manager.
//! This crate is the single source of truth for project/todo invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{
    create_project, Project, ProjectId, DEFAULT_PROJECT_ID, DEFAULT_PROJECT_NAME,
};
pub use model::snapshot::Snapshot;
pub use model::todo::{
    create_todo, parse_due_date, ChecklistItem, Priority, Todo, TodoDraft, TodoId, TodoUpdate,
};
pub use service::sort::{order_for_view, sort_by_due_date, sort_by_priority, SortMode};
pub use service::todo_store::{ProjectStats, TodoStore};
pub use storage::gateway::{PersistenceGateway, STORAGE_KEY};
pub use storage::kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use storage::{StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
