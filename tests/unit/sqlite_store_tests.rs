//! Unit tests specific to the durable `SqliteStore`.
//!
//! The behavioural contract lives in `tests/contract`; these cover the
//! on-disk layout, reopen durability, and schema bootstrap.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use todont::clock::{Clock, ManualClock};
use todont::ids::SequenceIdGenerator;
use todont::persistence::{db, schema, ListStore, SqliteStore, StoreContext};
use todont::AppError;

fn store_on(pool: todont::persistence::SqlitePool, clock: Arc<ManualClock>) -> SqliteStore {
    let clock: Arc<dyn Clock> = clock;
    SqliteStore::new(
        Arc::new(pool),
        StoreContext::new(clock, Arc::new(SequenceIdGenerator::new("L"))),
    )
}

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
        .single()
        .expect("valid instant")
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("todont.db");
    let clock = Arc::new(ManualClock::new(start()));
    let deadline = start() + Duration::days(1);

    let (list_id, item_id) = {
        let store = store_on(db::connect(&path).await.expect("db"), Arc::clone(&clock));
        let list = store.create_list("Sweets").await.expect("create");
        let item = store
            .add_item(&list.id, "Eat candy", Some(deadline))
            .await
            .expect("add");
        store.close().await;
        (list.id, item.id)
    };

    let store = store_on(db::connect(&path).await.expect("reopen"), clock);
    let list = store.get_list(&list_id).await.expect("get").expect("exists");
    assert_eq!(list.name, "Sweets");
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].id, item_id);
    assert_eq!(list.items[0].avoid_until, Some(deadline));
    assert!(list.items[0].is_checked);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_on_file_pool_all_land() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("todont.db");
    let clock = Arc::new(ManualClock::new(start()));
    let store = Arc::new(store_on(db::connect(&path).await.expect("db"), clock));
    let list = store.create_list("Busy").await.expect("create");

    let tasks: Vec<_> = (0..64)
        .map(|n| {
            let store = Arc::clone(&store);
            let list_id = list.id.clone();
            tokio::spawn(async move { store.add_item(&list_id, &format!("item {n}"), None).await })
        })
        .collect();

    let mut failures = Vec::new();
    for task in tasks {
        if let Err(err) = task.await.expect("join") {
            failures.push(err.to_string());
        }
    }
    assert!(failures.is_empty(), "{} adds failed: {:?}", failures.len(), failures.first());

    let stored = store.get_list(&list.id).await.expect("get").expect("exists");
    assert_eq!(stored.items.len(), 64);
    store.close().await;
}

#[tokio::test]
async fn add_to_missing_list_on_file_pool_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = db::connect(&dir.path().join("todont.db")).await.expect("db");
    let store = store_on(pool.clone(), Arc::new(ManualClock::new(start())));

    let result = store.add_item("ghost", "Nothing", None).await;
    assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "list 'ghost'"));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Items")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(rows, 0);
    store.close().await;
}

#[tokio::test]
async fn rows_use_documented_layout() {
    let pool = db::connect_memory().await.expect("db");
    let clock = Arc::new(ManualClock::new(start()));
    let store = store_on(pool.clone(), clock);

    let list = store.create_list("Layout").await.expect("create");
    let item = store
        .add_item(&list.id, "Check phone", Some(start() + Duration::hours(2)))
        .await
        .expect("add");

    let (avoid_until, is_checked, created_at): (Option<String>, i64, String) = sqlx::query_as(
        "SELECT AvoidUntil, IsChecked, CreatedAt FROM Items WHERE Id = ?1 AND ListId = ?2",
    )
    .bind(&item.id)
    .bind(&list.id)
    .fetch_one(&pool)
    .await
    .expect("row");

    assert_eq!(avoid_until.as_deref(), Some("2025-06-01T11:00:00.000000Z"));
    assert_eq!(is_checked, 1);
    assert_eq!(created_at, "2025-06-01T09:00:00.000000Z");
}

#[tokio::test]
async fn schema_bootstrap_is_idempotent() {
    let pool = db::connect_memory().await.expect("db");
    schema::bootstrap_schema(&pool).await.expect("second run");

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('Lists', 'Items') ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .expect("tables");
    assert_eq!(tables, ["Items", "Lists"]);

    let index: Option<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND name = 'IX_Items_ListId'",
    )
    .fetch_optional(&pool)
    .await
    .expect("index");
    assert!(index.is_some());
}

#[tokio::test]
async fn deleting_a_list_row_cascades_to_items() {
    let pool = db::connect_memory().await.expect("db");
    let store = store_on(pool.clone(), Arc::new(ManualClock::new(start())));

    let list = store.create_list("Doomed").await.expect("create");
    store.add_item(&list.id, "One", None).await.expect("add");
    store.add_item(&list.id, "Two", None).await.expect("add");

    sqlx::query("DELETE FROM Lists WHERE Id = ?1")
        .bind(&list.id)
        .execute(&pool)
        .await
        .expect("delete list");

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Items WHERE ListId = ?1")
        .bind(&list.id)
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn orphan_items_are_rejected_by_foreign_key() {
    let pool = db::connect_memory().await.expect("db");
    let result = sqlx::query(
        "INSERT INTO Items (Id, ListId, Description, IsChecked, CreatedAt)
         VALUES ('i1', 'ghost', 'x', 1, '2025-06-01T09:00:00.000000Z')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn corrupt_timestamp_surfaces_as_db_error() {
    let pool = db::connect_memory().await.expect("db");
    let store = store_on(pool.clone(), Arc::new(ManualClock::new(start())));
    let list = store.create_list("Corrupt").await.expect("create");
    let item = store.add_item(&list.id, "x", None).await.expect("add");

    sqlx::query("UPDATE Items SET AvoidUntil = 'soon' WHERE Id = ?1")
        .bind(&item.id)
        .execute(&pool)
        .await
        .expect("corrupt");

    let err = store.get_list(&list.id).await.expect_err("corrupt row");
    assert!(err.to_string().starts_with("db: invalid avoid_until"), "{err}");
}
