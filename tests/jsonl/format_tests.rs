//! On-disk format tests for the JSON-lines repository.

use crate::jsonl::helpers::{JsonlStore, store};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;
use serde_json::{Value, json};
use tasknotes::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::TaskRepository,
};

struct OddClock(DateTime<Utc>);

impl Clock for OddClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_task_is_one_newline_terminated_record(store: JsonlStore) -> eyre::Result<()> {
    let base = Utc
        .with_ymd_and_hms(2025, 6, 30, 23, 59, 58)
        .single()
        .ok_or_else(|| eyre::eyre!("invalid base timestamp"))?;
    let clock = OddClock(base + Duration::microseconds(123_456));
    let first = Task::new(
        TaskId::new("t1"),
        "Café crème",
        Some("multi\nline".to_owned()),
        &clock,
    )
    .with_status(TaskStatus::InProgress);
    let second = Task::new(TaskId::new("t2"), "Plain", None, &clock);
    store.repo.add(&first).await?;
    store.repo.add(&second).await?;

    let raw = store.read_raw();
    assert!(raw.ends_with('\n'));
    assert!(!raw.contains("\r\n"));

    let records: Vec<Value> = raw
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(
        records,
        vec![
            json!({
                "task_id": "t1",
                "title": "Café crème",
                "description": "multi\nline",
                "created_at": "2025-06-30T23:59:58Z",
                "status": "In Progress",
            }),
            json!({
                "task_id": "t2",
                "title": "Plain",
                "description": null,
                "created_at": "2025-06-30T23:59:58Z",
                "status": "Open",
            }),
        ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hand_written_file_with_blank_lines_is_readable(store: JsonlStore) -> eyre::Result<()> {
    store.write_raw(concat!(
        "\n",
        r#"{"task_id":"t1","title":"One","description":null,"created_at":"2025-01-01T12:00:00Z","status":"Closed"}"#,
        "\n   \n",
        r#"{"task_id":"t2","title":"Two","created_at":"2025-01-01T12:00:01Z","status":"Open"}"#,
    ));

    assert_eq!(store.repo.count_all().await?, 2);
    let first = store.repo.get(&TaskId::new("t1")).await?;
    assert_eq!(first.status(), TaskStatus::Closed);
    let second = store.repo.get(&TaskId::new("t2")).await?;
    assert_eq!(second.description(), None);
    Ok(())
}
