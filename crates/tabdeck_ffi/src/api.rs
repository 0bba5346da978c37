//! FFI use-case API for the UI shell.
//!
//! # Responsibility
//! - Expose widget-level functions to Dart via FRB.
//! - Hold per-process calculator, gallery, navigation and timeline state.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Task storage is reopened per call; pending removals live in-process.

use log::warn;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tabdeck_core::db::open_db;
use tabdeck_core::{
    core_version as core_version_inner, current_epoch_ms, format_date,
    init_logging as init_logging_inner, AppConfig, CalcKey, CalculatorState, CompletionTimeline,
    GalleryService, KvTaskRepository, Navigator, SqliteKeyValueStore, Task, TaskEvent,
    TaskListService, TaskResult,
};

static ENTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static CALCULATOR: OnceLock<Mutex<CalculatorState>> = OnceLock::new();
static GALLERY: OnceLock<Mutex<GalleryService>> = OnceLock::new();
static NAVIGATOR: OnceLock<Mutex<Navigator>> = OnceLock::new();
static TIMELINE: OnceLock<Mutex<CompletionTimeline>> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Calculator display response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcDisplayResponse {
    /// Whether the key token was accepted.
    pub ok: bool,
    /// Text the display should show after the call.
    pub display: String,
    /// Empty on success; parse error otherwise.
    pub message: String,
}

/// Feeds one keypad token (`"7"`, `"."`, `"+"`, `"="`, `"C"`, `"DEL"`) to the calculator.
///
/// # FFI contract
/// - Sync call, in-memory only.
/// - Unknown tokens leave the state untouched and return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn calc_press(token: String) -> CalcDisplayResponse {
    let mut state = lock(calculator());
    match token.parse::<CalcKey>() {
        Ok(key) => {
            state.apply(key);
            CalcDisplayResponse {
                ok: true,
                display: state.render(),
                message: String::new(),
            }
        }
        Err(err) => CalcDisplayResponse {
            ok: false,
            display: state.render(),
            message: err.to_string(),
        },
    }
}

/// Returns the current calculator display text.
#[flutter_rust_bridge::frb(sync)]
pub fn calc_display() -> String {
    lock(calculator()).render()
}

/// Task item projected for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    /// Raw `YYYY-MM-DD` due date, when set.
    pub date: Option<String>,
    /// Display label such as `Dec 9, 2025`; empty without a date.
    pub date_label: String,
    /// Whether the fade-out stage already started.
    pub fading: bool,
}

/// Generic action envelope for task mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Affected task id, when known.
    pub task_id: Option<i64>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: i64) -> Self {
        Self {
            ok: true,
            task_id: Some(task_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Timeline stage fired for a completed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTimelineItem {
    pub task_id: i64,
    /// `fade_out` or `removed`.
    pub stage: String,
}

/// Lists tasks in creation order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Returns an empty list when storage cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list() -> Vec<TaskItem> {
    with_task_service(|service| {
        let timeline = service.timeline();
        Ok(service
            .tasks()
            .iter()
            .map(|task| to_task_item(task, timeline.is_fading(task.id)))
            .collect::<Vec<_>>())
    })
    .unwrap_or_default()
}

/// Adds a task with optional `YYYY-MM-DD` due date.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String, date: Option<String>) -> TaskActionResponse {
    let now_ms = current_epoch_ms();
    match with_task_service(|service| service.add_task(&text, date.as_deref(), now_ms)) {
        Ok(id) => TaskActionResponse::success("Task added.", id),
        Err(err) => TaskActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Marks a task completed and starts its removal timeline.
///
/// Already completed or unknown tasks return `ok=true` with a no-op message.
#[flutter_rust_bridge::frb(sync)]
pub fn task_complete(id: i64) -> TaskActionResponse {
    let now_ms = current_epoch_ms();
    match with_task_service(|service| service.complete_task(id, now_ms)) {
        Ok(true) => TaskActionResponse::success("Task completed.", id),
        Ok(false) => TaskActionResponse::success("Nothing to complete.", id),
        Err(err) => TaskActionResponse::failure(format!("task_complete failed: {err}")),
    }
}

/// Deletes a task. The shell is responsible for confirming first.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> TaskActionResponse {
    match with_task_service(|service| service.delete_task(id)) {
        Ok(()) => TaskActionResponse::success("Task deleted.", id),
        Err(err) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

/// Replaces task text; blank input is a cancelled edit.
#[flutter_rust_bridge::frb(sync)]
pub fn task_edit_text(id: i64, text: String) -> TaskActionResponse {
    match with_task_service(|service| service.edit_task_text(id, &text)) {
        Ok(true) => TaskActionResponse::success("Task updated.", id),
        Ok(false) => TaskActionResponse::success("No changes.", id),
        Err(err) => TaskActionResponse::failure(format!("task_edit_text failed: {err}")),
    }
}

/// Replaces or clears (`None`/blank) a task's due date.
#[flutter_rust_bridge::frb(sync)]
pub fn task_edit_date(id: i64, date: Option<String>) -> TaskActionResponse {
    match with_task_service(|service| service.edit_task_date(id, date.as_deref())) {
        Ok(()) => TaskActionResponse::success("Due date updated.", id),
        Err(err) => TaskActionResponse::failure(format!("task_edit_date failed: {err}")),
    }
}

/// Fires due removal stages. The shell polls this while tasks are fading.
#[flutter_rust_bridge::frb(sync)]
pub fn task_tick() -> Vec<TaskTimelineItem> {
    let now_ms = current_epoch_ms();
    with_task_service(|service| service.advance(now_ms))
        .map(|events| events.into_iter().map(to_timeline_item).collect())
        .unwrap_or_default()
}

/// Gallery card projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub index: u32,
    pub thumb_url: String,
    pub title: String,
}

/// Modal viewer projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryModal {
    pub image_url: String,
    pub caption: String,
}

/// Lists gallery cards in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_images() -> Vec<GalleryItem> {
    lock(gallery())
        .images()
        .iter()
        .enumerate()
        .map(|(index, image)| GalleryItem {
            index: u32::try_from(index).unwrap_or(u32::MAX),
            thumb_url: image.url.clone(),
            title: image.title.clone(),
        })
        .collect()
}

/// Opens the modal on image `index`; `None` when out of range.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_open(index: u32) -> Option<GalleryModal> {
    let index = usize::try_from(index).ok()?;
    lock(gallery())
        .open(index)
        .ok()
        .map(|view| GalleryModal {
            image_url: view.image_url,
            caption: view.caption,
        })
}

/// Closes the modal viewer.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_close() {
    lock(gallery()).close();
}

/// Activates a section (`calculator|tasklist|gallery`) and returns the active id.
///
/// Unknown ids keep the current section.
#[flutter_rust_bridge::frb(sync)]
pub fn nav_go_to(section_id: String) -> String {
    let mut navigator = lock(navigator());
    navigator.go_to(&section_id);
    navigator.active().as_str().to_string()
}

/// Returns the active section id.
#[flutter_rust_bridge::frb(sync)]
pub fn nav_active() -> String {
    lock(navigator()).active().as_str().to_string()
}

fn calculator() -> &'static Mutex<CalculatorState> {
    CALCULATOR.get_or_init(|| Mutex::new(CalculatorState::new()))
}

fn gallery() -> &'static Mutex<GalleryService> {
    GALLERY.get_or_init(|| Mutex::new(GalleryService::default()))
}

fn navigator() -> &'static Mutex<Navigator> {
    NAVIGATOR.get_or_init(|| Mutex::new(Navigator::new()))
}

fn timeline() -> &'static Mutex<CompletionTimeline> {
    TIMELINE.get_or_init(|| Mutex::new(CompletionTimeline::new()))
}

/// Recovers from poisoning; state stays usable after a panicking caller.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn resolve_entry_db_path() -> PathBuf {
    ENTRY_DB_PATH
        .get_or_init(|| AppConfig::from_env().db_path)
        .clone()
}

type EntryTaskService<'conn> = TaskListService<KvTaskRepository<SqliteKeyValueStore<'conn>>>;

fn with_task_service<T>(
    f: impl FnOnce(&mut EntryTaskService<'_>) -> TaskResult<T>,
) -> Result<T, String> {
    with_task_service_at(&resolve_entry_db_path(), timeline(), f)
}

/// Runs `f` against a freshly loaded list and the shared timeline.
///
/// The shared timeline is replaced only after the list loaded, so a failed
/// open or load never drops pending removals.
fn with_task_service_at<T>(
    db_path: &Path,
    shared: &Mutex<CompletionTimeline>,
    f: impl FnOnce(&mut EntryTaskService<'_>) -> TaskResult<T>,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| {
        warn!("event=ffi_task_call module=ffi status=error error_code=db_open_failed");
        format!("task DB open failed: {err}")
    })?;

    let mut pending = lock(shared);
    let repo = KvTaskRepository::new(SqliteKeyValueStore::new(&conn));
    let mut service = TaskListService::resume(repo, pending.clone()).map_err(|err| {
        warn!("event=ffi_task_call module=ffi status=error error_code=load_failed");
        err.to_string()
    })?;

    let result = f(&mut service).map_err(|err| err.to_string());
    *pending = service.into_timeline();
    result
}

fn to_task_item(task: &Task, fading: bool) -> TaskItem {
    TaskItem {
        id: task.id,
        text: task.text.clone(),
        completed: task.completed,
        date: task.date.clone(),
        date_label: task.date.as_deref().map(format_date).unwrap_or_default(),
        fading,
    }
}

fn to_timeline_item(event: TaskEvent) -> TaskTimelineItem {
    TaskTimelineItem {
        task_id: event.task_id(),
        stage: event.stage().to_string(),
    }
}
