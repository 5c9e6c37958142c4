//! Authoritative in-memory store for projects, todos and session state.
//!
//! # Responsibility
//! - Expose every mutation and query the presentation layer needs.
//! - Persist the full snapshot through the gateway after each mutation.
//!
//! # Invariants
//! - Exactly one project is default and its ID is `DEFAULT_PROJECT_ID`.
//! - The default project is never removed.
//! - Every todo references an existing project; deleting a project
//!   deletes its todos in the same call.
//! - The active project always exists, falling back to the default.
//! - Sort mode is session-only and never persisted.
//! - Calls that change nothing do not write to storage.
//! - After a failed snapshot read, nothing is written until a later read
//!   succeeds or `reset` is called.

use crate::model::project::{
    create_project, Project, ProjectId, DEFAULT_PROJECT_ID, DEFAULT_PROJECT_NAME,
};
use crate::model::snapshot::Snapshot;
use crate::model::todo::{create_todo, Priority, Todo, TodoUpdate};
use crate::service::sort::{order_for_view, SortMode};
use crate::storage::gateway::PersistenceGateway;
use crate::storage::kv::KeyValueStore;
use chrono::NaiveDate;
use log::{debug, error, info, warn};

/// Completion counters for one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Domain store owned by the application root.
///
/// Construct with [`TodoStore::new`], then call [`TodoStore::initialize`]
/// to load persisted data.
pub struct TodoStore<S: KeyValueStore> {
    gateway: PersistenceGateway<S>,
    state: Snapshot,
    current_sort: SortMode,
    /// Set when the last load failed; stored data must not be overwritten.
    writes_suspended: bool,
}

impl<S: KeyValueStore> TodoStore<S> {
    /// Creates a store over `gateway` holding only the default project.
    ///
    /// Storage is not touched here; persisted data becomes visible after
    /// [`TodoStore::initialize`].
    pub fn new(gateway: PersistenceGateway<S>) -> Self {
        let mut store = Self {
            gateway,
            state: Snapshot::default(),
            current_sort: SortMode::default(),
            writes_suspended: false,
        };
        store.ensure_invariants();
        store
    }

    /// Loads the persisted snapshot and establishes store invariants.
    ///
    /// # Contract
    /// - A missing snapshot starts from empty collections.
    /// - A failed read also starts empty, but suspends writes so the stored
    ///   data is left untouched.
    /// - Creates and persists the default project when absent.
    /// - Repairs dangling active project and todo references to point at
    ///   the default project, persisting when anything was repaired.
    /// - Calling again reloads from storage; the sort mode is kept.
    pub fn initialize(&mut self) -> &Snapshot {
        self.state = match self.gateway.try_load() {
            Ok(snapshot) => {
                self.writes_suspended = false;
                snapshot.unwrap_or_default()
            }
            Err(err) => {
                error!(
                    "event=store_init module=store status=error writes_suspended=true error={}",
                    err
                );
                self.writes_suspended = true;
                Snapshot::default()
            }
        };
        let repaired = self.ensure_invariants();
        if repaired {
            self.persist();
        }

        info!(
            "event=store_init module=store status=ok projects={} todos={} repaired={}",
            self.state.projects.len(),
            self.state.todos.len(),
            repaired
        );
        &self.state
    }

    /// Drops all data, clears storage and re-creates the default project.
    pub fn reset(&mut self) -> &Snapshot {
        self.writes_suspended = false;
        self.gateway.clear();
        self.state = Snapshot::default();
        self.ensure_invariants();
        self.persist();

        info!("event=store_reset module=store status=ok");
        &self.state
    }

    /// Current in-memory snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    // Projects

    /// All projects in insertion order.
    pub fn list_projects(&self) -> &[Project] {
        &self.state.projects
    }

    pub fn get_project(&self, project_id: &str) -> Option<&Project> {
        self.state
            .projects
            .iter()
            .find(|project| project.id == project_id)
    }

    pub fn active_project_id(&self) -> &str {
        &self.state.active_project_id
    }

    pub fn get_active_project(&self) -> Option<&Project> {
        self.get_project(&self.state.active_project_id)
    }

    /// Selects the active project.
    ///
    /// Returns `None` without mutating when `project_id` is unknown.
    pub fn set_active_project(&mut self, project_id: &str) -> Option<ProjectId> {
        if self.get_project(project_id).is_none() {
            warn!("event=project_activate module=store status=rejected reason=not_found");
            return None;
        }
        self.state.active_project_id = project_id.to_string();
        self.persist();
        Some(self.state.active_project_id.clone())
    }

    /// Creates and appends a non-default project.
    pub fn add_project(&mut self, name: impl Into<String>) -> Project {
        let project = create_project(name, false);
        self.state.projects.push(project.clone());
        self.persist();
        project
    }

    /// Renames a project, default included.
    pub fn rename_project(&mut self, project_id: &str, name: impl Into<String>) -> Option<Project> {
        let index = self
            .state
            .projects
            .iter()
            .position(|project| project.id == project_id)?;
        let renamed = self.state.projects[index].renamed(name);
        self.state.projects[index] = renamed.clone();
        self.persist();
        Some(renamed)
    }

    /// Deletes a project and every todo it owns.
    ///
    /// Returns `false` without mutating for the default project or an
    /// unknown ID. Resets the active project to the default when the
    /// deleted project was active.
    pub fn delete_project(&mut self, project_id: &str) -> bool {
        let Some(project) = self.get_project(project_id) else {
            return false;
        };
        if project.is_default || project.id == DEFAULT_PROJECT_ID {
            warn!("event=project_delete module=store status=rejected reason=default_project");
            return false;
        }

        self.state
            .projects
            .retain(|project| project.id != project_id);
        let todos_before = self.state.todos.len();
        self.state
            .todos
            .retain(|todo| todo.project_id != project_id);
        let cascaded = todos_before - self.state.todos.len();

        if self.state.active_project_id == project_id {
            self.state.active_project_id = DEFAULT_PROJECT_ID.to_string();
        }

        self.persist();
        info!("event=project_delete module=store status=ok cascaded_todos={cascaded}");
        true
    }

    // Todos

    /// All todos, or only those of `project_id`, in insertion order.
    pub fn list_todos(&self, project_id: Option<&str>) -> Vec<&Todo> {
        match project_id {
            Some(project_id) => self
                .state
                .todos
                .iter()
                .filter(|todo| todo.project_id == project_id)
                .collect(),
            None => self.state.todos.iter().collect(),
        }
    }

    pub fn list_todos_for_active_project(&self) -> Vec<&Todo> {
        self.list_todos(Some(&self.state.active_project_id))
    }

    pub fn get_todo(&self, todo_id: &str) -> Option<&Todo> {
        self.state.todos.iter().find(|todo| todo.id == todo_id)
    }

    /// Creates a todo in the active project.
    pub fn add_todo(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<NaiveDate>,
        priority: Priority,
        notes: impl Into<String>,
    ) -> Todo {
        let todo = create_todo(title, description, due_date, priority)
            .with_notes(notes)
            .assign_to(self.state.active_project_id.clone());
        self.state.todos.push(todo.clone());
        self.persist();
        todo
    }

    /// Removes a todo. Returns whether anything was removed.
    pub fn delete_todo(&mut self, todo_id: &str) -> bool {
        let before = self.state.todos.len();
        self.state.todos.retain(|todo| todo.id != todo_id);
        if self.state.todos.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Merges `update` into a todo; unspecified fields are kept.
    pub fn edit_todo(&mut self, todo_id: &str, update: &TodoUpdate) -> Option<Todo> {
        self.replace_todo(todo_id, |todo| todo.updated(update))
    }

    pub fn toggle_complete(&mut self, todo_id: &str) -> Option<Todo> {
        self.replace_todo(todo_id, Todo::toggled)
    }

    /// Reassigns a todo to another project.
    ///
    /// Returns `None` without mutating when either ID is unknown.
    pub fn move_todo_to_project(&mut self, todo_id: &str, project_id: &str) -> Option<Todo> {
        if self.get_project(project_id).is_none() {
            warn!("event=todo_move module=store status=rejected reason=project_not_found");
            return None;
        }
        self.replace_todo(todo_id, |todo| todo.moved_to(project_id))
    }

    pub fn add_checklist_item(&mut self, todo_id: &str, text: impl Into<String>) -> Option<Todo> {
        let text = text.into();
        self.replace_todo(todo_id, |todo| todo.with_checklist_item(text))
    }

    pub fn toggle_checklist_item(&mut self, todo_id: &str, item_id: &str) -> Option<Todo> {
        if !self
            .get_todo(todo_id)?
            .checklist
            .iter()
            .any(|item| item.id == item_id)
        {
            return None;
        }
        self.replace_todo(todo_id, |todo| todo.with_checklist_item_toggled(item_id))
    }

    // Queries

    /// Counts todos of `project_id`. Unknown projects yield zeros.
    pub fn get_project_stats(&self, project_id: &str) -> ProjectStats {
        self.state
            .todos
            .iter()
            .filter(|todo| todo.project_id == project_id)
            .fold(ProjectStats::default(), |mut stats, todo| {
                stats.total += 1;
                if todo.completed {
                    stats.completed += 1;
                } else {
                    stats.pending += 1;
                }
                stats
            })
    }

    pub fn set_sort(&mut self, mode: SortMode) {
        self.current_sort = mode;
    }

    pub fn get_sort(&self) -> SortMode {
        self.current_sort
    }

    /// Active project's todos: pending ordered by the current sort mode,
    /// then completed in insertion order.
    pub fn get_sorted_todos_for_active_project(&self) -> Vec<&Todo> {
        order_for_view(&self.list_todos_for_active_project(), self.current_sort)
    }

    fn replace_todo(&mut self, todo_id: &str, update: impl FnOnce(&Todo) -> Todo) -> Option<Todo> {
        let index = self.state.todos.iter().position(|todo| todo.id == todo_id)?;
        let next = update(&self.state.todos[index]);
        self.state.todos[index] = next.clone();
        self.persist();
        Some(next)
    }

    fn persist(&self) {
        if self.writes_suspended {
            debug!("event=snapshot_save module=store status=skipped reason=writes_suspended");
            return;
        }
        self.gateway.save(&self.state);
    }

    /// Returns whether any repair was applied.
    fn ensure_invariants(&mut self) -> bool {
        let mut repaired = false;

        match self
            .state
            .projects
            .iter()
            .position(|project| project.id == DEFAULT_PROJECT_ID)
        {
            Some(index) => {
                if !self.state.projects[index].is_default {
                    self.state.projects[index].is_default = true;
                    repaired = true;
                }
            }
            None => {
                self.state
                    .projects
                    .push(create_project(DEFAULT_PROJECT_NAME, true));
                repaired = true;
            }
        }

        for project in self
            .state
            .projects
            .iter_mut()
            .filter(|project| project.is_default && project.id != DEFAULT_PROJECT_ID)
        {
            project.is_default = false;
            repaired = true;
        }

        if self.get_active_project().is_none() {
            self.state.active_project_id = DEFAULT_PROJECT_ID.to_string();
            repaired = true;
        }

        let Snapshot {
            projects, todos, ..
        } = &mut self.state;
        let mut orphaned = 0_usize;
        for todo in todos.iter_mut() {
            if !projects.iter().any(|project| project.id == todo.project_id) {
                todo.project_id = DEFAULT_PROJECT_ID.to_string();
                orphaned += 1;
            }
        }
        if orphaned > 0 {
            warn!("event=store_init module=store status=repaired orphaned_todos={orphaned}");
            repaired = true;
        }

        repaired
    }
}
