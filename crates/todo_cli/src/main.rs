//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging, SQLite storage and the domain store together.
//! - Print a deterministic plain-text summary of the persisted state.
//!
//! Usage: `todo_cli [none|dueDate|priority]`

use log::info;
use std::process::ExitCode;
use todo_core::db::open_db;
use todo_core::{
    core_version, init_logging, CoreConfig, PersistenceGateway, SortMode, SqliteKeyValueStore,
    TodoStore,
};

fn main() -> ExitCode {
    let config = CoreConfig::from_env();

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    let sort = match std::env::args().nth(1) {
        Some(raw) => match SortMode::parse(&raw) {
            Some(mode) => mode,
            None => {
                eprintln!("unknown sort mode `{raw}`; expected none|dueDate|priority");
                return ExitCode::FAILURE;
            }
        },
        None => SortMode::None,
    };

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{}`: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let gateway =
        PersistenceGateway::with_key(SqliteKeyValueStore::new(&conn), config.storage_key.clone());
    let mut store = TodoStore::new(gateway);
    store.initialize();
    store.set_sort(sort);
    info!("event=cli_summary module=cli status=start sort={sort}");

    println!("todo_core version={}", core_version());
    println!("db_path={}", config.db_path.display());
    for project in store.list_projects() {
        let stats = store.get_project_stats(&project.id);
        let marker = if project.id == store.active_project_id() {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {} [{}/{} done]",
            project.name, stats.completed, stats.total
        );
    }

    println!("sort={sort}");
    for todo in store.get_sorted_todos_for_active_project() {
        let check = if todo.completed { "x" } else { " " };
        let due = todo
            .due_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{check}] {} (priority={}, due={due})",
            todo.title,
            todo.priority.as_str()
        );
    }

    ExitCode::SUCCESS
}
