//! `SQLite` schema bootstrap logic.
//!
//! All definitions use `IF NOT EXISTS`, so this runs on every startup.

use sqlx::SqlitePool;

use crate::Result;

/// Apply the `Lists` / `Items` table definitions.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS Lists (
    Id          TEXT PRIMARY KEY NOT NULL,
    Name        TEXT NOT NULL,
    CreatedAt   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Items (
    Id          TEXT PRIMARY KEY NOT NULL,
    ListId      TEXT NOT NULL,
    Description TEXT NOT NULL,
    AvoidUntil  TEXT,
    IsChecked   INTEGER NOT NULL DEFAULT 1 CHECK(IsChecked IN (0, 1)),
    CreatedAt   TEXT NOT NULL,
    FOREIGN KEY (ListId) REFERENCES Lists(Id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS IX_Items_ListId ON Items(ListId);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
