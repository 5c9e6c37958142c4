//! Domain store and its read projections.
//!
//! # Responsibility
//! - Own the in-memory collections and session state.
//! - Keep presentation callers decoupled from storage details.

pub mod sort;
pub mod todo_store;
