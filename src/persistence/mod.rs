//! List/item storage contract and its two backends.
//!
//! [`ListStore`] is the single capability set every caller goes through.
//! [`memory_store::MemoryStore`] keeps state in a process-scoped map and
//! [`sqlite_store::SqliteStore`] persists to the `Lists` / `Items` tables.
//! Both must be observably identical; `tests/contract` runs one suite
//! against each.

pub mod db;
pub mod memory_store;
pub mod schema;
pub mod sqlite_store;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::info;

use crate::clock::Clock;
use crate::config::{GlobalConfig, StorageKind};
use crate::ids::{IdGenerator, ShortIdGenerator};
use crate::models::item::Item;
use crate::models::list::List;
use crate::{AppError, Result};

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

/// Re-export the database pool type for convenience.
pub use sqlx::SqlitePool;

/// Boxed future returned by [`ListStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Timestamp text format: fixed-width RFC 3339 in UTC, so string order
/// matches chronological order inside SQL comparisons.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Create, read, and mutate lists and their items.
///
/// Every per-list mutation is atomic with respect to concurrent calls on
/// the same list. "Not found" is reported as [`AppError::NotFound`].
pub trait ListStore: Send + Sync {
    /// Store a new, empty list under a freshly generated short id.
    ///
    /// # Errors
    ///
    /// `AppError::Validation` for a blank name; `AppError::Db` if no
    /// unused id is found within the configured attempts.
    fn create_list(&self, name: &str) -> StoreFuture<'_, List>;

    /// Fetch a list with all items in insertion order, or `None`.
    ///
    /// # Errors
    ///
    /// Only infrastructure failures; an unknown id is `Ok(None)`.
    fn get_list(&self, list_id: &str) -> StoreFuture<'_, Option<List>>;

    /// Append a new checked item to a list.
    ///
    /// # Errors
    ///
    /// `AppError::NotFound` if the list does not exist;
    /// `AppError::Validation` for a blank description.
    fn add_item(
        &self,
        list_id: &str,
        description: &str,
        avoid_until: Option<DateTime<Utc>>,
    ) -> StoreFuture<'_, Item>;

    /// Set an item's checkbox state.
    ///
    /// Unchecking re-validates the avoid-until deadline against the clock
    /// at call time.
    ///
    /// # Errors
    ///
    /// `AppError::NotFound` if the list or item is missing;
    /// `AppError::PreconditionFailed` if unchecking before the deadline.
    fn set_item_checked(
        &self,
        list_id: &str,
        item_id: &str,
        is_checked: bool,
    ) -> StoreFuture<'_, ()>;

    /// Overwrite an item's description and deadline, leaving
    /// `is_checked`, `created_at`, and `id` untouched.
    ///
    /// # Errors
    ///
    /// `AppError::NotFound` if the list or item is missing;
    /// `AppError::Validation` for a blank description.
    fn update_item(
        &self,
        list_id: &str,
        item_id: &str,
        description: &str,
        avoid_until: Option<DateTime<Utc>>,
    ) -> StoreFuture<'_, ()>;

    /// Remove an item from its list.
    ///
    /// # Errors
    ///
    /// `AppError::NotFound` if the list or item is missing.
    fn delete_item(&self, list_id: &str, item_id: &str) -> StoreFuture<'_, ()>;

    /// Release backend resources. Further calls may fail afterwards.
    fn close(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Injected capabilities shared by both store implementations.
#[derive(Clone)]
pub struct StoreContext {
    /// Source of "now" for timestamps and deadline checks.
    pub clock: Arc<dyn Clock>,
    /// Candidate list-id source.
    pub ids: Arc<dyn IdGenerator>,
    /// Ids tried before `create_list` gives up.
    pub max_id_attempts: u32,
}

impl StoreContext {
    /// Bundle a clock and id generator with the default retry budget.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            clock,
            ids,
            max_id_attempts: 8,
        }
    }

    /// Override the collision retry budget.
    #[must_use]
    pub fn with_max_id_attempts(mut self, attempts: u32) -> Self {
        self.max_id_attempts = attempts;
        self
    }

    /// Current instant at storage precision.
    pub(crate) fn now(&self) -> DateTime<Utc> {
        to_storage_precision(self.clock.now())
    }

    pub(crate) fn exhausted_ids(&self) -> AppError {
        AppError::Db(format!(
            "exhausted list id attempts after {} collisions",
            self.max_id_attempts
        ))
    }
}

/// Truncate to the microsecond precision the durable backend keeps.
///
/// Both backends apply this on write so values read back are identical.
#[must_use]
pub fn to_storage_precision(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(6)
}

/// Render an instant in [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a persisted RFC 3339 timestamp back into UTC.
///
/// # Errors
///
/// Returns `AppError::Db` naming `field` if the text is not RFC 3339.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Db(format!("invalid {field}: {e}")))
}

/// Open the backend selected by `config`.
///
/// # Errors
///
/// Returns `AppError::Db` if the durable backend cannot be opened.
pub async fn open_store(config: &GlobalConfig, clock: Arc<dyn Clock>) -> Result<Arc<dyn ListStore>> {
    let ctx = StoreContext::new(clock, Arc::new(ShortIdGenerator::new(config.ids.length)))
        .with_max_id_attempts(config.ids.max_attempts);

    match config.storage {
        StorageKind::Memory => {
            info!("using in-memory store");
            Ok(Arc::new(MemoryStore::new(ctx)))
        }
        StorageKind::Sqlite => {
            let pool = db::connect(&config.db_path).await?;
            info!(path = %config.db_path.display(), "sqlite store opened");
            Ok(Arc::new(SqliteStore::new(Arc::new(pool), ctx)))
        }
    }
}
