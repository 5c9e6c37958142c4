//! Sort modes and ordering projections over todo lists.
//!
//! # Invariants
//! - Every projection is stable and leaves its input untouched.
//! - View ordering always places completed todos after pending ones.

use crate::model::todo::Todo;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Session-level ordering applied to pending todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// Insertion order.
    #[default]
    None,
    /// Earliest due date first; undated last.
    DueDate,
    /// `high`, then `medium`, then `low`.
    Priority,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DueDate => "dueDate",
            Self::Priority => "priority",
        }
    }

    /// Parses a mode label as emitted by [`SortMode::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "none" => Some(Self::None),
            "dueDate" => Some(Self::DueDate),
            "priority" => Some(Self::Priority),
            _ => None,
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `todos` ordered by ascending due date, undated todos last.
pub fn sort_by_due_date<'a>(todos: &[&'a Todo]) -> Vec<&'a Todo> {
    let mut sorted = todos.to_vec();
    sorted.sort_by(|a, b| compare_due_dates(a, b));
    sorted
}

/// Returns `todos` ordered by ascending priority rank.
pub fn sort_by_priority<'a>(todos: &[&'a Todo]) -> Vec<&'a Todo> {
    let mut sorted = todos.to_vec();
    sorted.sort_by_key(|todo| todo.priority.rank());
    sorted
}

/// Orders todos for display: pending sorted by `mode`, then completed in
/// insertion order.
pub fn order_for_view<'a>(todos: &[&'a Todo], mode: SortMode) -> Vec<&'a Todo> {
    let (completed, pending): (Vec<&Todo>, Vec<&Todo>) =
        todos.iter().copied().partition(|todo| todo.completed);

    let mut ordered = match mode {
        SortMode::None => pending,
        SortMode::DueDate => sort_by_due_date(&pending),
        SortMode::Priority => sort_by_priority(&pending),
    };
    ordered.extend(completed);
    ordered
}

fn compare_due_dates(a: &Todo, b: &Todo) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
