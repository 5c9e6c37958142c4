//! Todo domain model, factory and functional update helpers.
//!
//! # Responsibility
//! - Define the task record, its priority scale and checklist items.
//! - Provide the only constructor for well-formed todos.
//! - Express every mutation as "return a new value" helpers.
//!
//! # Invariants
//! - `id` is fresh per created todo and never reused.
//! - A freshly created todo is not completed.
//! - `project_id` is attached by the store, never by the factory.

use crate::model::project::ProjectId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque todo identifier as persisted in snapshots.
pub type TodoId = String;

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Todo urgency level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank, lower sorts first: `high=1 < medium=2 < low=3`.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Stable wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a wire label, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// One sub-item of a todo checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Single task owned by one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    /// Free text; empty means "no description".
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "priority_format::deserialize")]
    pub priority: Priority,
    /// Free text; empty means "no notes".
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Foreign key into `Project::id`.
    pub project_id: ProjectId,
}

/// Partial update merged into an existing todo.
///
/// `None` fields keep the current value. `due_date: Some(None)` clears the
/// due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub checklist: Option<Vec<ChecklistItem>>,
    pub completed: Option<bool>,
}

/// Todo produced by the factory, not yet attached to any project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub notes: String,
    pub checklist: Vec<ChecklistItem>,
    pub created_at: DateTime<Utc>,
}

impl TodoDraft {
    /// Sets initial notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Sets the initial checklist.
    pub fn with_checklist(mut self, checklist: Vec<ChecklistItem>) -> Self {
        self.checklist = checklist;
        self
    }

    /// Attaches the draft to `project_id`, producing a storable todo.
    pub fn assign_to(self, project_id: impl Into<ProjectId>) -> Todo {
        Todo {
            id: self.id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
            notes: self.notes,
            checklist: self.checklist,
            completed: false,
            created_at: self.created_at,
            project_id: project_id.into(),
        }
    }
}

/// Creates a todo draft with a fresh ID, stamped with the current time.
///
/// Notes default to empty and the checklist to no items; see
/// [`TodoDraft::with_notes`] and [`TodoDraft::with_checklist`].
pub fn create_todo(
    title: impl Into<String>,
    description: impl Into<String>,
    due_date: Option<NaiveDate>,
    priority: Priority,
) -> TodoDraft {
    TodoDraft {
        id: Uuid::new_v4().to_string(),
        title: title.into(),
        description: description.into(),
        due_date,
        priority,
        notes: String::new(),
        checklist: Vec::new(),
        created_at: Utc::now(),
    }
}

impl Todo {
    /// Returns a copy with `completed` flipped.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    /// Returns a copy with every `Some` field of `update` applied.
    pub fn updated(&self, update: &TodoUpdate) -> Self {
        let mut next = self.clone();
        if let Some(title) = &update.title {
            next.title = title.clone();
        }
        if let Some(description) = &update.description {
            next.description = description.clone();
        }
        if let Some(due_date) = update.due_date {
            next.due_date = due_date;
        }
        if let Some(priority) = update.priority {
            next.priority = priority;
        }
        if let Some(notes) = &update.notes {
            next.notes = notes.clone();
        }
        if let Some(checklist) = &update.checklist {
            next.checklist = checklist.clone();
        }
        if let Some(completed) = update.completed {
            next.completed = completed;
        }
        next
    }

    /// Returns a copy reassigned to `project_id`.
    pub fn moved_to(&self, project_id: impl Into<ProjectId>) -> Self {
        Self {
            project_id: project_id.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with a new, uncompleted checklist item appended.
    pub fn with_checklist_item(&self, text: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.checklist.push(ChecklistItem {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
        });
        next
    }

    /// Returns a copy with checklist item `item_id` flipped.
    ///
    /// Unknown item IDs leave the checklist unchanged.
    pub fn with_checklist_item_toggled(&self, item_id: &str) -> Self {
        let mut next = self.clone();
        for item in next.checklist.iter_mut().filter(|item| item.id == item_id) {
            item.completed = !item.completed;
        }
        next
    }
}

/// Parses user or persisted due-date text into a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM[:SS]`
/// values; date-time inputs keep only their date part. Blank or unparseable
/// text yields `None`.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(date_time.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|date_time| date_time.date())
}

mod due_date_format {
    use super::{parse_due_date, DUE_DATE_FORMAT};
    use chrono::NaiveDate;
    use log::warn;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(DUE_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(|value| {
            let parsed = parse_due_date(value);
            if parsed.is_none() && !value.trim().is_empty() {
                warn!("event=due_date_decode module=model status=dropped reason=unparseable");
            }
            parsed
        }))
    }
}

mod priority_format {
    use super::Priority;
    use log::warn;
    use serde::{Deserialize, Deserializer};

    // Unknown labels or non-string values fall back to the default priority
    // so one bad field cannot reject the whole snapshot.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Priority, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match raw.as_str().and_then(Priority::parse) {
            Some(priority) => priority,
            None => {
                if !raw.is_null() {
                    warn!("event=priority_decode module=model status=defaulted reason=unknown_value");
                }
                Priority::default()
            }
        })
    }
}
