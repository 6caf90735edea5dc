//! Device user operations.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Get a user by device identifier.
pub async fn get_user_by_device(pool: &SqlitePool, device_id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, device_id, created_at
        FROM users
        WHERE device_id = ?
        "#,
    )
    .bind(device_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: device_id.to_string(),
    })
}

/// Get the user for a device, creating it on first access.
///
/// Overlapping calls for the same device resolve to the same row.
pub async fn ensure_user(pool: &SqlitePool, device_id: &str) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (id, device_id)
        VALUES (?, ?)
        ON CONFLICT(device_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(device_id)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        tracing::info!(device_id, "Created user for new device");
    }

    get_user_by_device(pool, device_id).await
}
