//! Persisted application snapshot.

use crate::model::project::{Project, ProjectId, DEFAULT_PROJECT_ID};
use crate::model::todo::Todo;
use serde::{Deserialize, Serialize};

/// Complete serializable state written as one unit.
///
/// Missing collections decode as empty and a missing active project decodes
/// as the default project, so older or partial snapshots still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub todos: Vec<Todo>,
    #[serde(default = "default_active_project_id")]
    pub active_project_id: ProjectId,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            todos: Vec::new(),
            active_project_id: default_active_project_id(),
        }
    }
}

fn default_active_project_id() -> ProjectId {
    DEFAULT_PROJECT_ID.to_string()
}
