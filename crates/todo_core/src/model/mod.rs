//! Domain model for projects and todos.
//!
//! # Responsibility
//! - Define canonical entities persisted in the application snapshot.
//! - Host the entity factories; no other code constructs fresh entities.
//!
//! # Invariants
//! - Entities are updated by producing new values, never in place.
//! - Every todo references a project by `project_id`.

pub mod project;
pub mod snapshot;
pub mod todo;
