//! Process-scoped in-memory [`ListStore`].

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::models::item::Item;
use crate::models::list::List;
use crate::models::require_text;
use crate::{AppError, Result};

use super::{to_storage_precision, ListStore, StoreContext, StoreFuture};

/// Keyed map of lists, each behind its own lock.
///
/// The map lock is held only long enough to find or insert a list; item
/// mutations serialize on the per-list mutex, so operations on different
/// lists never contend.
pub struct MemoryStore {
    lists: RwLock<HashMap<String, Arc<Mutex<List>>>>,
    ctx: StoreContext,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            ctx,
        }
    }

    async fn list_handle(&self, list_id: &str) -> Option<Arc<Mutex<List>>> {
        self.lists.read().await.get(list_id).map(Arc::clone)
    }

    async fn require_list(&self, list_id: &str) -> Result<Arc<Mutex<List>>> {
        self.list_handle(list_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("list '{list_id}'")))
    }
}

fn item_not_found(list_id: &str, item_id: &str) -> AppError {
    AppError::NotFound(format!("item '{item_id}' in list '{list_id}'"))
}

impl ListStore for MemoryStore {
    fn create_list(&self, name: &str) -> StoreFuture<'_, List> {
        let name = name.to_owned();
        Box::pin(async move {
            require_text("name", &name)?;

            let mut lists = self.lists.write().await;
            for _ in 0..self.ctx.max_id_attempts {
                let id = self.ctx.ids.next_id();
                if lists.contains_key(&id) {
                    debug!(list_id = %id, "list id collision, retrying");
                    continue;
                }
                let list = List::new(id.clone(), name, self.ctx.now());
                lists.insert(id, Arc::new(Mutex::new(list.clone())));
                info!(list_id = %list.id, "list created");
                return Ok(list);
            }
            Err(self.ctx.exhausted_ids())
        })
    }

    fn get_list(&self, list_id: &str) -> StoreFuture<'_, Option<List>> {
        let list_id = list_id.to_owned();
        Box::pin(async move {
            let Some(handle) = self.list_handle(&list_id).await else {
                return Ok(None);
            };
            let list = handle.lock().await.clone();
            Ok(Some(list))
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
            let handle = self.require_list(&list_id).await?;

            let item = Item::new(
                description,
                avoid_until.map(to_storage_precision),
                self.ctx.now(),
            );
            handle.lock().await.items.push(item.clone());
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
            let handle = self.require_list(&list_id).await?;
            let mut list = handle.lock().await;
            let item = list
                .item_mut(&item_id)
                .ok_or_else(|| item_not_found(&list_id, &item_id))?;

            if !is_checked && !item.can_uncheck(self.ctx.clock.now()) {
                return Err(AppError::PreconditionFailed(format!(
                    "item '{item_id}' cannot be unchecked before its avoid-until date"
                )));
            }
            item.is_checked = is_checked;
            debug!(list_id = %list_id, item_id = %item_id, is_checked, "item status set");
            Ok(())
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
            let handle = self.require_list(&list_id).await?;
            let mut list = handle.lock().await;
            let item = list
                .item_mut(&item_id)
                .ok_or_else(|| item_not_found(&list_id, &item_id))?;

            item.description = description;
            item.avoid_until = avoid_until.map(to_storage_precision);
            debug!(list_id = %list_id, item_id = %item_id, "item updated");
            Ok(())
        })
    }

    fn delete_item(&self, list_id: &str, item_id: &str) -> StoreFuture<'_, ()> {
        let list_id = list_id.to_owned();
        let item_id = item_id.to_owned();
        Box::pin(async move {
            let handle = self.require_list(&list_id).await?;
            let mut list = handle.lock().await;
            let position = list
                .items
                .iter()
                .position(|item| item.id == item_id)
                .ok_or_else(|| item_not_found(&list_id, &item_id))?;

            list.items.remove(position);
            debug!(list_id = %list_id, item_id = %item_id, "item deleted");
            Ok(())
        })
    }

    fn close(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async {})
    }
}
