//! Project domain model and factory.
//!
//! # Responsibility
//! - Define the named grouping that owns todos.
//! - Provide the only constructor for well-formed projects.
//!
//! # Invariants
//! - The built-in project always has `id == DEFAULT_PROJECT_ID` and
//!   `is_default == true`.
//! - Non-default projects get a fresh, never-reused ID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque project identifier as persisted in snapshots.
pub type ProjectId = String;

/// Reserved ID of the built-in, non-deletable project.
pub const DEFAULT_PROJECT_ID: &str = "default";

/// Display name given to the built-in project on first run.
pub const DEFAULT_PROJECT_NAME: &str = "Inbox";

/// Named grouping of todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    /// User-supplied display name. Emptiness is not enforced.
    pub name: String,
    /// True only for the built-in project.
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Returns a copy of this project carrying `name`.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

/// Creates a project stamped with the current time.
///
/// # Contract
/// - `is_default = true` assigns `DEFAULT_PROJECT_ID`.
/// - Otherwise a fresh UUID string is assigned.
pub fn create_project(name: impl Into<String>, is_default: bool) -> Project {
    let id = if is_default {
        DEFAULT_PROJECT_ID.to_string()
    } else {
        Uuid::new_v4().to_string()
    };

    Project {
        id,
        name: name.into(),
        is_default,
        created_at: Utc::now(),
    }
}
