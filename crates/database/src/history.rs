//! Suggestion history persistence.
//!
//! Entries are append-only; the only removal is clearing everything a user
//! has recorded.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::HistoryEntry;
use crate::Result;

/// Record a where/what pairing for a user.
pub async fn insert_entry(
    pool: &SqlitePool,
    user_id: &str,
    where_to_go: &str,
    what_to_do: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO suggestion_history (id, user_id, where_to_go, what_to_do)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(where_to_go)
    .bind(what_to_do)
    .execute(pool)
    .await?;

    Ok(())
}

/// List a user's history, newest first.
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<HistoryEntry>> {
    let rows = sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT id, user_id, where_to_go, what_to_do, created_at
        FROM suggestion_history
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count a user's history entries.
pub async fn count_for_user(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM suggestion_history
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Remove all of a user's history. Returns the number of rows removed.
pub async fn clear_for_user(pool: &SqlitePool, user_id: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM suggestion_history
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
