//! Durable [`ListStore`] on `SQLite`.
//!
//! Every item mutation is a single statement scoped by both `Id` and
//! `ListId`, so `SQLite`'s per-statement atomicity covers concurrent
//! writers. When a statement touches no rows, a follow-up read decides
//! which "not found" (or precondition) error to report.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::models::item::Item;
use crate::models::list::List;
use crate::models::require_text;
use crate::{AppError, Result};

use super::db::Database;
use super::{
    format_timestamp, parse_timestamp, to_storage_precision, ListStore, StoreContext, StoreFuture,
};

/// Repository over the `Lists` and `Items` tables.
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Database>,
    ctx: StoreContext,
}

/// Internal row struct for `Lists`.
#[derive(sqlx::FromRow)]
struct ListRow {
    id: String,
    name: String,
    created_at: String,
}

/// Internal row struct for `Items`.
#[derive(sqlx::FromRow)]
struct ItemRow {
    id: String,
    description: String,
    avoid_until: Option<String>,
    is_checked: i64,
    created_at: String,
}

impl ItemRow {
    /// Convert a database row into the domain model.
    fn into_item(self) -> Result<Item> {
        let avoid_until = self
            .avoid_until
            .as_deref()
            .map(|raw| parse_timestamp("avoid_until", raw))
            .transpose()?;
        let is_checked = match self.is_checked {
            0 => false,
            1 => true,
            other => return Err(AppError::Db(format!("invalid is_checked: {other}"))),
        };

        Ok(Item {
            id: self.id,
            description: self.description,
            avoid_until,
            is_checked,
            created_at: parse_timestamp("created_at", &self.created_at)?,
        })
    }
}

const ITEM_COLUMNS: &str = "Id AS id, Description AS description, AvoidUntil AS avoid_until, \
                            IsChecked AS is_checked, CreatedAt AS created_at";

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

impl SqliteStore {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>, ctx: StoreContext) -> Self {
        Self { db, ctx }
    }

    async fn list_exists(&self, list_id: &str) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM Lists WHERE Id = ?1")
            .bind(list_id)
            .fetch_optional(self.db.as_ref())
            .await?;
        Ok(found.is_some())
    }

    /// Explain why a statement scoped to `(list_id, item_id)` matched nothing.
    async fn missing(&self, list_id: &str, item_id: &str) -> Result<AppError> {
        if self.list_exists(list_id).await? {
            Ok(AppError::NotFound(format!(
                "item '{item_id}' in list '{list_id}'"
            )))
        } else {
            Ok(AppError::NotFound(format!("list '{list_id}'")))
        }
    }
}

impl ListStore for SqliteStore {
    fn create_list(&self, name: &str) -> StoreFuture<'_, List> {
        let name = name.to_owned();
        Box::pin(async move {
            require_text("name", &name)?;
            let created_at = self.ctx.now();
            let created_at_s = format_timestamp(created_at);

            for _ in 0..self.ctx.max_id_attempts {
                let id = self.ctx.ids.next_id();
                let inserted = sqlx::query(
                    "INSERT INTO Lists (Id, Name, CreatedAt) VALUES (?1, ?2, ?3)
                     ON CONFLICT(Id) DO NOTHING",
                )
                .bind(&id)
                .bind(&name)
                .bind(&created_at_s)
                .execute(self.db.as_ref())
                .await?
                .rows_affected();

                if inserted == 0 {
                    debug!(list_id = %id, "list id collision, retrying");
                    continue;
                }
                info!(list_id = %id, "list created");
                return Ok(List::new(id, name, created_at));
            }
            Err(self.ctx.exhausted_ids())
        })
    }

    fn get_list(&self, list_id: &str) -> StoreFuture<'_, Option<List>> {
        let list_id = list_id.to_owned();
        Box::pin(async move {
            let row: Option<ListRow> = sqlx::query_as(
                "SELECT Id AS id, Name AS name, CreatedAt AS created_at FROM Lists WHERE Id = ?1",
            )
            .bind(&list_id)
            .fetch_optional(self.db.as_ref())
            .await?;

            let Some(row) = row else {
                return Ok(None);
            };

            let item_rows: Vec<ItemRow> = sqlx::query_as(&format!(
                "SELECT {ITEM_COLUMNS} FROM Items WHERE ListId = ?1 ORDER BY rowid"
            ))
            .bind(&list_id)
            .fetch_all(self.db.as_ref())
            .await?;

            let items = item_rows
                .into_iter()
                .map(ItemRow::into_item)
                .collect::<Result<Vec<_>>>()?;

            Ok(Some(List {
                id: row.id,
                name: row.name,
                items,
                created_at: parse_timestamp("created_at", &row.created_at)?,
            }))
        })
    }

    fn add_item(
        &self,
        list_id: &str,
        description: &str,
        avoid_until: Option<DateTime<Utc>>,
    ) -> StoreFuture<'_, Item> {
        let list_id = list_id.to_owned();
        let description = description.to_owned();
        Box::pin(async move {
            require_text("description", &description)?;
            let item = Item::new(
                description,
                avoid_until.map(to_storage_precision),
                self.ctx.now(),
            );

            // One write statement: the existence check and insert share the
            // write lock, so concurrent adds queue on busy_timeout.
            let inserted = sqlx::query(
                "INSERT INTO Items (Id, ListId, Description, AvoidUntil, IsChecked, CreatedAt)
                 SELECT ?1, ?2, ?3, ?4, ?5, ?6
                 WHERE EXISTS (SELECT 1 FROM Lists WHERE Id = ?2)",
            )
            .bind(&item.id)
            .bind(&list_id)
            .bind(&item.description)
            .bind(item.avoid_until.map(format_timestamp))
            .bind(bool_to_int(item.is_checked))
            .bind(format_timestamp(item.created_at))
            .execute(self.db.as_ref())
            .await?
            .rows_affected();

            if inserted == 0 {
                return Err(AppError::NotFound(format!("list '{list_id}'")));
            }

            debug!(list_id = %list_id, item_id = %item.id, "item added");
            Ok(item)
        })
    }

    fn set_item_checked(
        &self,
        list_id: &str,
        item_id: &str,
        is_checked: bool,
    ) -> StoreFuture<'_, ()> {
        let list_id = list_id.to_owned();
        let item_id = item_id.to_owned();
        Box::pin(async move {
            let now = format_timestamp(self.ctx.now());
            let changed = sqlx::query(
                "UPDATE Items SET IsChecked = ?1
                 WHERE Id = ?2 AND ListId = ?3
                   AND (?4 = 1 OR AvoidUntil IS NULL OR AvoidUntil <= ?5)",
            )
            .bind(bool_to_int(is_checked))
            .bind(&item_id)
            .bind(&list_id)
            .bind(bool_to_int(is_checked))
            .bind(&now)
            .execute(self.db.as_ref())
            .await?
            .rows_affected();

            if changed > 0 {
                debug!(list_id = %list_id, item_id = %item_id, is_checked, "item status set");
                return Ok(());
            }

            let item_present: Option<i64> =
                sqlx::query_scalar("SELECT 1 FROM Items WHERE Id = ?1 AND ListId = ?2")
                    .bind(&item_id)
                    .bind(&list_id)
                    .fetch_optional(self.db.as_ref())
                    .await?;
            if item_present.is_some() {
                return Err(AppError::PreconditionFailed(format!(
                    "item '{item_id}' cannot be unchecked before its avoid-until date"
                )));
            }
            Err(self.missing(&list_id, &item_id).await?)
        })
    }

    fn update_item(
        &self,
        list_id: &str,
        item_id: &str,
        description: &str,
        avoid_until: Option<DateTime<Utc>>,
    ) -> StoreFuture<'_, ()> {
        let list_id = list_id.to_owned();
        let item_id = item_id.to_owned();
        let description = description.to_owned();
        Box::pin(async move {
            require_text("description", &description)?;
            let avoid_until = avoid_until.map(|dt| format_timestamp(to_storage_precision(dt)));

            let changed = sqlx::query(
                "UPDATE Items SET Description = ?1, AvoidUntil = ?2
                 WHERE Id = ?3 AND ListId = ?4",
            )
            .bind(&description)
            .bind(&avoid_until)
            .bind(&item_id)
            .bind(&list_id)
            .execute(self.db.as_ref())
            .await?
            .rows_affected();

            if changed == 0 {
                return Err(self.missing(&list_id, &item_id).await?);
            }
            debug!(list_id = %list_id, item_id = %item_id, "item updated");
            Ok(())
        })
    }

    fn delete_item(&self, list_id: &str, item_id: &str) -> StoreFuture<'_, ()> {
        let list_id = list_id.to_owned();
        let item_id = item_id.to_owned();
        Box::pin(async move {
            let changed = sqlx::query("DELETE FROM Items WHERE Id = ?1 AND ListId = ?2")
                .bind(&item_id)
                .bind(&list_id)
                .execute(self.db.as_ref())
                .await?
                .rows_affected();

            if changed == 0 {
                return Err(self.missing(&list_id, &item_id).await?);
            }
            debug!(list_id = %list_id, item_id = %item_id, "item deleted");
            Ok(())
        })
    }

    fn close(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            self.db.close().await;
            info!("sqlite pool closed");
        })
    }
}
