//! Core state and persistence for the TabDeck widgets.
//! This crate is the single source of truth for widget invariants; shells
//! only forward input events and show the strings returned here.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::calculator::{
    evaluate, CalcFault, CalcKey, CalcKeyError, CalculatorState, Operator, ERROR_DISPLAY,
};
pub use model::due_date::{format_date, normalize_due_date};
pub use model::gallery::{default_catalog, GalleryImage};
pub use model::number::{format_number, parse_float};
pub use model::section::Section;
pub use model::task::{Task, TaskId, TaskValidationError};
pub use repo::kv_store::{KeyValueStore, SqliteKeyValueStore};
pub use repo::task_repo::{KvTaskRepository, TaskRepository, TASKS_STORAGE_KEY};
pub use repo::{RepoError, RepoResult};
pub use service::calculator_service::{CalculatorService, DisplaySink};
pub use service::completion_timeline::{
    CompletionTimeline, TaskEvent, FADE_OUT_DELAY_MS, REMOVAL_DELAY_MS,
};
pub use service::gallery_service::{GalleryError, GalleryService, ModalView};
pub use service::navigation_service::Navigator;
pub use service::task_list_service::{current_epoch_ms, TaskError, TaskListService, TaskResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
