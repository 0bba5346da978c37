use rusqlite::Connection;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tabdeck_core::db::open_db_in_memory;
use tabdeck_core::{
    CompletionTimeline, KeyValueStore, KvTaskRepository, RepoError, RepoResult,
    SqliteKeyValueStore, Task, TaskError, TaskEvent, TaskListService, TaskRepository,
    FADE_OUT_DELAY_MS, REMOVAL_DELAY_MS, TASKS_STORAGE_KEY,
};

const NOW: i64 = 1_733_700_000_000;

fn service(conn: &Connection) -> TaskListService<KvTaskRepository<SqliteKeyValueStore<'_>>> {
    TaskListService::load(KvTaskRepository::new(SqliteKeyValueStore::new(conn))).unwrap()
}

fn stored_json(conn: &Connection) -> serde_json::Value {
    let raw = SqliteKeyValueStore::new(conn)
        .get_item(TASKS_STORAGE_KEY)
        .unwrap()
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn empty_storage_loads_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    assert!(tasks.tasks().is_empty());
}

#[test]
fn add_task_persists_whole_array_under_fixed_key() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = service(&conn);

    let first = tasks.add_task("buy milk", None, NOW).unwrap();
    let second = tasks.add_task(" pay rent ", Some("2025-12-09"), NOW + 5).unwrap();

    assert_eq!(first, NOW);
    assert_eq!(second, NOW + 5);
    assert_eq!(
        stored_json(&conn),
        serde_json::json!([
            {"id": NOW, "text": "buy milk", "completed": false, "date": null},
            {"id": NOW + 5, "text": "pay rent", "completed": false, "date": "2025-12-09"}
        ])
    );
}

#[test]
fn reload_restores_same_ordered_list() {
    let conn = open_db_in_memory().unwrap();
    let expected = {
        let mut tasks = service(&conn);
        tasks.add_task("a", None, NOW).unwrap();
        tasks.add_task("b", Some("2026-01-02"), NOW + 1).unwrap();
        tasks.add_task("c", None, NOW + 2).unwrap();
        tasks.tasks().to_vec()
    };

    let reloaded = service(&conn);
    assert_eq!(reloaded.tasks(), expected.as_slice());
}

#[test]
fn ids_stay_unique_when_clock_collides() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = service(&conn);

    let first = tasks.add_task("one", None, NOW).unwrap();
    let second = tasks.add_task("two", None, NOW).unwrap();
    let third = tasks.add_task("three", None, NOW - 10).unwrap();

    assert_eq!(first, NOW);
    assert_eq!(second, NOW + 1);
    assert_eq!(third, NOW + 2);
}

#[test]
fn add_task_rejects_blank_text_without_persisting() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = service(&conn);

    let err = tasks.add_task("   ", None, NOW).unwrap_err();
    assert!(matches!(err, TaskError::EmptyText));
    assert_eq!(err.to_string(), "Please enter a task!");
    assert!(SqliteKeyValueStore::new(&conn)
        .get_item(TASKS_STORAGE_KEY)
        .unwrap()
        .is_none());
}

#[test]
fn add_task_rejects_invalid_date() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = service(&conn);

    let err = tasks.add_task("dentist", Some("next tuesday"), NOW).unwrap_err();
    assert!(matches!(err, TaskError::InvalidDate(raw) if raw == "next tuesday"));
    assert!(tasks.tasks().is_empty());
}

#[test]
fn delete_task_removes_by_id() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = service(&conn);
    let keep = tasks.add_task("keep", None, NOW).unwrap();
    let drop_id = tasks.add_task("drop", None, NOW + 1).unwrap();

    tasks.delete_task(drop_id).unwrap();

    assert_eq!(tasks.tasks().len(), 1);
    assert_eq!(tasks.tasks()[0].id, keep);
    assert_eq!(stored_json(&conn).as_array().unwrap().len(), 1);

    let err = tasks.delete_task(drop_id).unwrap_err();
    assert!(matches!(err, TaskError::NotFound(id) if id == drop_id));
}

#[test]
fn completion_runs_two_stage_removal() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = service(&conn);
    let id = tasks.add_task("water plants", None, NOW).unwrap();

    assert!(tasks.complete_task(id, NOW + 10).unwrap());
    assert!(tasks.get(id).unwrap().completed);
    assert_eq!(stored_json(&conn)[0]["completed"], true);

    assert!(tasks.advance(NOW + 10 + FADE_OUT_DELAY_MS - 1).unwrap().is_empty());
    assert_eq!(
        tasks.advance(NOW + 10 + FADE_OUT_DELAY_MS).unwrap(),
        vec![TaskEvent::FadeOutStarted(id)]
    );
    assert!(tasks.get(id).is_some());

    assert_eq!(
        tasks
            .advance(NOW + 10 + FADE_OUT_DELAY_MS + REMOVAL_DELAY_MS)
            .unwrap(),
        vec![TaskEvent::Removed(id)]
    );
    assert!(tasks.get(id).is_none());
    assert_eq!(stored_json(&conn), serde_json::json!([]));
}

#[test]
fn completing_twice_or_unknown_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = service(&conn);
    let id = tasks.add_task("stretch", None, NOW).unwrap();

    assert!(tasks.complete_task(id, NOW).unwrap());
    assert!(!tasks.complete_task(id, NOW + 100).unwrap());
    assert!(!tasks.complete_task(424_242, NOW).unwrap());

    let events = tasks.advance(NOW + 60_000).unwrap();
    assert_eq!(
        events,
        vec![TaskEvent::FadeOutStarted(id), TaskEvent::Removed(id)]
    );
}

#[test]
fn deleting_a_fading_task_cancels_its_removal() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = service(&conn);
    let id = tasks.add_task("read", None, NOW).unwrap();
    tasks.complete_task(id, NOW).unwrap();

    tasks.delete_task(id).unwrap();

    assert!(tasks.advance(NOW + 60_000).unwrap().is_empty());
}

#[test]
fn edit_text_ignores_blank_input() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = service(&conn);
    let id = tasks.add_task("draft", None, NOW).unwrap();

    assert!(!tasks.edit_task_text(id, "   ").unwrap());
    assert_eq!(tasks.get(id).unwrap().text, "draft");

    assert!(tasks.edit_task_text(id, "  final  ").unwrap());
    assert_eq!(tasks.get(id).unwrap().text, "final");
    assert_eq!(stored_json(&conn)[0]["text"], "final");

    assert!(matches!(
        tasks.edit_task_text(1, "x"),
        Err(TaskError::NotFound(1))
    ));
}

#[test]
fn edit_date_sets_and_clears_due_date() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = service(&conn);
    let id = tasks.add_task("taxes", None, NOW).unwrap();

    tasks.edit_task_date(id, Some("2026-04-15")).unwrap();
    assert_eq!(tasks.get(id).unwrap().date.as_deref(), Some("2026-04-15"));

    tasks.edit_task_date(id, Some("  ")).unwrap();
    assert_eq!(tasks.get(id).unwrap().date, None);
    assert!(stored_json(&conn)[0]["date"].is_null());

    let err = tasks.edit_task_date(id, Some("2026-02-30")).unwrap_err();
    assert!(matches!(err, TaskError::InvalidDate(_)));
}

#[test]
fn timeline_survives_service_reload() {
    let conn = open_db_in_memory().unwrap();
    let id = {
        let mut tasks = service(&conn);
        let id = tasks.add_task("laundry", None, NOW).unwrap();
        tasks.complete_task(id, NOW).unwrap();
        let timeline: CompletionTimeline = tasks.into_timeline();
        assert!(timeline.is_scheduled(id));

        let repo = KvTaskRepository::new(SqliteKeyValueStore::new(&conn));
        let mut resumed = TaskListService::resume(repo, timeline).unwrap();
        resumed.advance(NOW + 5_000).unwrap();
        id
    };

    let reloaded = service(&conn);
    assert!(reloaded.get(id).is_none());
}

#[test]
fn corrupt_payload_is_rejected_on_load() {
    let conn = open_db_in_memory().unwrap();
    SqliteKeyValueStore::new(&conn)
        .set_item(TASKS_STORAGE_KEY, "{not json")
        .unwrap();

    let repo = KvTaskRepository::new(SqliteKeyValueStore::new(&conn));
    let err = repo.load_tasks().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));

    let err = TaskListService::load(repo).err().unwrap();
    assert!(matches!(err, TaskError::Repo(RepoError::InvalidData(_))));
}

#[test]
fn duplicate_ids_are_rejected_on_load() {
    let conn = open_db_in_memory().unwrap();
    SqliteKeyValueStore::new(&conn)
        .set_item(
            TASKS_STORAGE_KEY,
            r#"[{"id":1,"text":"a","completed":false,"date":null},
                {"id":1,"text":"b","completed":false,"date":null}]"#,
        )
        .unwrap();

    let repo = KvTaskRepository::new(SqliteKeyValueStore::new(&conn));
    let err = repo.load_tasks().unwrap_err();
    assert!(err.to_string().contains("duplicate task id"));
}

#[test]
fn invalid_stored_record_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    SqliteKeyValueStore::new(&conn)
        .set_item(
            TASKS_STORAGE_KEY,
            r#"[{"id":1,"text":"   ","completed":false,"date":null}]"#,
        )
        .unwrap();

    let repo = KvTaskRepository::new(SqliteKeyValueStore::new(&conn));
    let err = repo.load_tasks().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));

    let err = TaskListService::load(repo).err().unwrap();
    assert!(matches!(err, TaskError::Repo(RepoError::InvalidData(_))));
    assert_ne!(err.to_string(), "Please enter a task!");
    assert!(err.to_string().contains("stored task `1`"));
}

/// In-memory repository whose next `fail_saves` saves return an error.
#[derive(Clone, Default)]
struct FlakyRepo {
    saved: Rc<RefCell<Vec<Task>>>,
    fail_saves: Rc<Cell<u32>>,
}

impl TaskRepository for FlakyRepo {
    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        Ok(self.saved.borrow().clone())
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        let remaining = self.fail_saves.get();
        if remaining > 0 {
            self.fail_saves.set(remaining - 1);
            return Err(RepoError::InvalidData("disk full".to_string()));
        }
        *self.saved.borrow_mut() = tasks.to_vec();
        Ok(())
    }
}

#[test]
fn failed_save_on_complete_leaves_task_open_and_retry_schedules_removal() {
    let repo = FlakyRepo::default();
    let mut tasks = TaskListService::load(repo.clone()).unwrap();
    let id = tasks.add_task("water plants", None, NOW).unwrap();

    repo.fail_saves.set(1);
    let err = tasks.complete_task(id, NOW).unwrap_err();
    assert!(matches!(err, TaskError::Repo(_)));
    assert!(!tasks.get(id).unwrap().completed);
    assert!(!tasks.timeline().is_scheduled(id));
    assert!(!repo.saved.borrow()[0].completed);

    assert!(tasks.complete_task(id, NOW).unwrap());
    assert_eq!(
        tasks.advance(NOW + 60_000).unwrap(),
        vec![TaskEvent::FadeOutStarted(id), TaskEvent::Removed(id)]
    );
    assert!(tasks.tasks().is_empty());
    assert!(repo.saved.borrow().is_empty());
}

#[test]
fn failed_save_leaves_memory_unchanged_for_every_mutation() {
    let repo = FlakyRepo::default();
    let mut tasks = TaskListService::load(repo.clone()).unwrap();

    repo.fail_saves.set(1);
    assert!(tasks.add_task("lost", None, NOW).is_err());
    assert!(tasks.tasks().is_empty());

    let id = tasks.add_task("taxes", Some("2026-04-15"), NOW).unwrap();
    let before = tasks.tasks().to_vec();

    repo.fail_saves.set(3);
    assert!(tasks.edit_task_text(id, "renamed").is_err());
    assert!(tasks.edit_task_date(id, None).is_err());
    assert!(tasks.delete_task(id).is_err());

    assert_eq!(tasks.tasks(), before.as_slice());
    assert_eq!(repo.saved.borrow().as_slice(), before.as_slice());
}

#[test]
fn failed_save_during_removal_keeps_stages_pending() {
    let repo = FlakyRepo::default();
    let mut tasks = TaskListService::load(repo.clone()).unwrap();
    let id = tasks.add_task("read", None, NOW).unwrap();
    tasks.complete_task(id, NOW).unwrap();

    repo.fail_saves.set(1);
    assert!(tasks.advance(NOW + 60_000).is_err());
    assert!(tasks.get(id).is_some());
    assert!(tasks.timeline().is_scheduled(id));
    assert!(!tasks.timeline().is_fading(id));

    assert_eq!(
        tasks.advance(NOW + 60_000).unwrap(),
        vec![TaskEvent::FadeOutStarted(id), TaskEvent::Removed(id)]
    );
    assert!(tasks.get(id).is_none());
}
