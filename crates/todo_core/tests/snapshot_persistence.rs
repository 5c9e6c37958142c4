use serde_json::json;
use todo_core::db::open_db;
use todo_core::{
    parse_due_date, KeyValueStore, MemoryKeyValueStore, PersistenceGateway, Priority, SortMode,
    SqliteKeyValueStore, StorageError, StorageResult, TodoStore, DEFAULT_PROJECT_ID, STORAGE_KEY,
};

/// Store whose every operation fails.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("disk gone".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk gone".to_string()))
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk gone".to_string()))
    }
}

#[test]
fn state_survives_reopening_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite3");

    let expected = {
        let conn = open_db(&path).unwrap();
        let mut store = TodoStore::new(PersistenceGateway::new(SqliteKeyValueStore::new(&conn)));
        store.initialize();
        let work = store.add_project("Work");
        store.set_active_project(&work.id).unwrap();
        let todo = store.add_todo(
            "ship",
            "release notes",
            parse_due_date("2024-03-01"),
            Priority::High,
            "after review",
        );
        store.add_checklist_item(&todo.id, "tag").unwrap();
        store.toggle_complete(&todo.id).unwrap();
        store.snapshot().clone()
    };

    let conn = open_db(&path).unwrap();
    let mut store = TodoStore::new(PersistenceGateway::new(SqliteKeyValueStore::new(&conn)));
    let loaded = store.initialize().clone();

    assert_eq!(loaded, expected);
    assert_eq!(store.get_active_project().unwrap().name, "Work");
}

#[test]
fn snapshot_uses_camel_case_wire_shape() {
    let backing = MemoryKeyValueStore::new();
    let mut store = TodoStore::new(PersistenceGateway::new(&backing));
    store.initialize();
    store.add_todo("a", "", parse_due_date("2024-01-01"), Priority::Low, "");

    let raw = backing.get(STORAGE_KEY).unwrap().expect("snapshot persisted");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["activeProjectId"], DEFAULT_PROJECT_ID);
    assert_eq!(value["projects"][0]["id"], DEFAULT_PROJECT_ID);
    assert_eq!(value["projects"][0]["isDefault"], true);
    assert!(value["projects"][0]["createdAt"].is_string());

    let todo = &value["todos"][0];
    assert_eq!(todo["title"], "a");
    assert_eq!(todo["dueDate"], "2024-01-01");
    assert_eq!(todo["priority"], "low");
    assert_eq!(todo["completed"], false);
    assert_eq!(todo["projectId"], DEFAULT_PROJECT_ID);
    assert_eq!(todo["checklist"], json!([]));
}

#[test]
fn legacy_snapshot_with_sparse_fields_loads() {
    let backing = MemoryKeyValueStore::new();
    let legacy = json!({
        "projects": [
            {"id": "default", "name": "Inbox", "isDefault": true, "createdAt": "2024-01-01T10:00:00.000Z"},
            {"id": "1704103200000", "name": "Work", "isDefault": false, "createdAt": "2024-01-01T10:00:00.000Z"}
        ],
        "todos": [
            {"id": "1", "title": "no date", "dueDate": "", "priority": "high",
             "createdAt": "2024-01-02T10:00:00.000Z", "projectId": "1704103200000"},
            {"id": "2", "title": "dated", "description": "d", "dueDate": "2024-02-01",
             "priority": "low", "notes": "", "checklist": [], "completed": true,
             "createdAt": "2024-01-02T10:00:00.000Z", "projectId": "default"}
        ],
        "activeProjectId": "1704103200000"
    });
    backing.set(STORAGE_KEY, &legacy.to_string()).unwrap();

    let mut store = TodoStore::new(PersistenceGateway::new(&backing));
    store.initialize();

    assert_eq!(store.list_projects().len(), 2);
    assert_eq!(store.active_project_id(), "1704103200000");
    let undated = store.get_todo("1").unwrap();
    assert_eq!(undated.due_date, None);
    assert!(undated.notes.is_empty());
    assert!(!undated.completed);
    assert_eq!(store.get_todo("2").unwrap().due_date, parse_due_date("2024-02-01"));
}

#[test]
fn initialize_repairs_dangling_references() {
    let backing = MemoryKeyValueStore::new();
    let broken = json!({
        "projects": [],
        "todos": [
            {"id": "1", "title": "orphan", "priority": "medium",
             "createdAt": "2024-01-02T10:00:00.000Z", "projectId": "gone"}
        ],
        "activeProjectId": "gone"
    });
    backing.set(STORAGE_KEY, &broken.to_string()).unwrap();

    let mut store = TodoStore::new(PersistenceGateway::new(&backing));
    store.initialize();

    assert_eq!(store.list_projects().len(), 1);
    assert_eq!(store.active_project_id(), DEFAULT_PROJECT_ID);
    assert_eq!(store.get_todo("1").unwrap().project_id, DEFAULT_PROJECT_ID);

    let persisted: serde_json::Value =
        serde_json::from_str(&backing.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted["activeProjectId"], DEFAULT_PROJECT_ID);
}

#[test]
fn corrupt_snapshot_starts_fresh_without_overwriting_storage() {
    let backing = MemoryKeyValueStore::new();
    backing.set(STORAGE_KEY, "not json at all").unwrap();

    let mut store = TodoStore::new(PersistenceGateway::new(&backing));
    let snapshot = store.initialize();

    assert_eq!(snapshot.projects.len(), 1);
    assert!(snapshot.todos.is_empty());
    assert_eq!(
        backing.get(STORAGE_KEY).unwrap().as_deref(),
        Some("not json at all")
    );
}

#[test]
fn unknown_priority_keeps_the_rest_of_the_snapshot() {
    let backing = MemoryKeyValueStore::new();
    let stored = json!({
        "projects": [
            {"id": "default", "name": "Inbox", "isDefault": true, "createdAt": "2024-01-01T10:00:00.000Z"},
            {"id": "work", "name": "Work", "isDefault": false, "createdAt": "2024-01-01T10:00:00.000Z"}
        ],
        "todos": [
            {"id": "1", "title": "odd", "priority": "urgent",
             "createdAt": "2024-01-02T10:00:00.000Z", "projectId": "work"},
            {"id": "2", "title": "fine", "priority": "high",
             "createdAt": "2024-01-02T10:00:00.000Z", "projectId": "default"}
        ],
        "activeProjectId": "work"
    });
    backing.set(STORAGE_KEY, &stored.to_string()).unwrap();

    let mut store = TodoStore::new(PersistenceGateway::new(&backing));
    store.initialize();

    assert_eq!(store.list_projects().len(), 2);
    assert_eq!(store.list_todos(None).len(), 2);
    assert_eq!(store.get_todo("1").unwrap().priority, Priority::Medium);
    assert_eq!(store.get_todo("2").unwrap().priority, Priority::High);
    assert_eq!(store.active_project_id(), "work");
}

#[test]
fn undecodable_snapshot_is_never_overwritten() {
    let backing = MemoryKeyValueStore::new();
    let stored = json!({
        "projects": [
            {"id": "default", "name": "Inbox", "isDefault": true, "createdAt": "2024-01-01T10:00:00.000Z"}
        ],
        "todos": [
            {"id": "1", "title": "no timestamp", "priority": "low", "projectId": "default"}
        ],
        "activeProjectId": "default"
    })
    .to_string();
    backing.set(STORAGE_KEY, &stored).unwrap();

    let mut store = TodoStore::new(PersistenceGateway::new(&backing));
    store.initialize();
    assert!(store.list_todos(None).is_empty());

    let todo = store.add_todo("in memory only", "", None, Priority::Low, "");
    store.toggle_complete(&todo.id).unwrap();
    store.add_project("Scratch");
    assert_eq!(store.list_todos(None).len(), 1);
    assert_eq!(backing.get(STORAGE_KEY).unwrap(), Some(stored.clone()));

    store.reset();
    let persisted: serde_json::Value =
        serde_json::from_str(&backing.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted["todos"], json!([]));
}

#[test]
fn successful_reload_resumes_writes() {
    let backing = MemoryKeyValueStore::new();
    backing.set(STORAGE_KEY, "{").unwrap();

    let mut store = TodoStore::new(PersistenceGateway::new(&backing));
    store.initialize();
    store.add_todo("dropped", "", None, Priority::Low, "");
    assert_eq!(backing.get(STORAGE_KEY).unwrap().as_deref(), Some("{"));

    backing.remove(STORAGE_KEY).unwrap();
    store.initialize();
    store.add_todo("kept", "", None, Priority::Low, "");

    let mut reopened = TodoStore::new(PersistenceGateway::new(&backing));
    reopened.initialize();
    let titles: Vec<&str> = reopened
        .list_todos(None)
        .into_iter()
        .map(|todo| todo.title.as_str())
        .collect();
    assert_eq!(titles, ["kept"]);
}

#[test]
fn storage_failures_never_reach_callers() {
    let mut store = TodoStore::new(PersistenceGateway::new(BrokenStore));
    store.initialize();

    let todo = store.add_todo("still works", "", None, Priority::Medium, "");
    assert!(store.toggle_complete(&todo.id).unwrap().completed);
    assert_eq!(store.get_project_stats(DEFAULT_PROJECT_ID).completed, 1);
    store.reset();
    assert!(store.list_todos(None).is_empty());
}

#[test]
fn sort_mode_is_not_persisted() {
    let backing = MemoryKeyValueStore::new();
    let mut store = TodoStore::new(PersistenceGateway::new(&backing));
    store.initialize();
    store.set_sort(SortMode::DueDate);

    let raw = backing.get(STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let mut keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, ["activeProjectId", "projects", "todos"]);

    let mut reopened = TodoStore::new(PersistenceGateway::new(&backing));
    reopened.initialize();
    assert_eq!(reopened.get_sort(), SortMode::None);
}

#[test]
fn reinitialize_reloads_persisted_state() {
    let backing = MemoryKeyValueStore::new();
    let mut writer = TodoStore::new(PersistenceGateway::new(&backing));
    writer.initialize();

    let mut reader = TodoStore::new(PersistenceGateway::new(&backing));
    reader.initialize();
    reader.set_sort(SortMode::Priority);

    writer.add_todo("late", "", None, Priority::Low, "");
    assert!(reader.list_todos(None).is_empty());

    reader.initialize();
    assert_eq!(reader.list_todos(None).len(), 1);
    assert_eq!(reader.get_sort(), SortMode::Priority);
}

#[test]
fn reset_clears_persisted_todos() {
    let backing = MemoryKeyValueStore::new();
    let mut store = TodoStore::new(PersistenceGateway::new(&backing));
    store.initialize();
    store.add_project("Work");
    store.add_todo("a", "", None, Priority::Low, "");

    store.reset();

    let mut reopened = TodoStore::new(PersistenceGateway::new(&backing));
    let snapshot = reopened.initialize();
    assert_eq!(snapshot.projects.len(), 1);
    assert!(snapshot.todos.is_empty());
}
