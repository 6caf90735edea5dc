//! Task group operations.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{NewTaskGroup, TaskGroup};
use crate::validation::{validate_description, validate_group_name};
use crate::visibility::Visibility;

const GROUP_COLUMNS: &str = "g.id, g.name, g.description, g.is_default, g.user_id, g.created_at";

/// List groups visible under `visibility`, newest first.
pub async fn list_visible(pool: &SqlitePool, visibility: &Visibility) -> Result<Vec<TaskGroup>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {GROUP_COLUMNS} FROM task_groups g WHERE "
    ));
    visibility.push_predicate(&mut qb, "g");
    qb.push(" ORDER BY g.created_at DESC, g.rowid DESC");

    let groups = qb.build_query_as::<TaskGroup>().fetch_all(pool).await?;
    Ok(groups)
}

/// List groups owned by a user, newest first.
pub async fn list_owned(pool: &SqlitePool, user_id: &str) -> Result<Vec<TaskGroup>> {
    let groups = sqlx::query_as::<_, TaskGroup>(&format!(
        r#"
        SELECT {GROUP_COLUMNS}
        FROM task_groups g
        WHERE g.user_id = ?
        ORDER BY g.created_at DESC, g.rowid DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(groups)
}

/// Get a group by ID.
pub async fn get_group(pool: &SqlitePool, id: &str) -> Result<TaskGroup> {
    sqlx::query_as::<_, TaskGroup>(&format!(
        r#"
        SELECT {GROUP_COLUMNS}
        FROM task_groups g
        WHERE g.id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "TaskGroup",
        id: id.to_string(),
    })
}

/// Create a user-owned group and return the stored row.
pub async fn create_group(pool: &SqlitePool, group: &NewTaskGroup) -> Result<TaskGroup> {
    validate_group_name(&group.name)?;
    validate_description(group.description.as_deref())?;

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO task_groups (id, name, description, is_default, user_id)
        VALUES (?, ?, ?, 0, ?)
        "#,
    )
    .bind(&id)
    .bind(group.name.trim())
    .bind(&group.description)
    .bind(&group.user_id)
    .execute(pool)
    .await?;

    get_group(pool, &id).await
}

/// Delete a group owned by `owner` together with all of its suggestions.
pub async fn delete_owned_group(pool: &SqlitePool, id: &str, owner: &str) -> Result<u64> {
    let mut tx = pool.begin().await?;

    let owned = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM task_groups
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(owner)
    .fetch_one(&mut *tx)
    .await?;

    if owned == 0 {
        return Err(DatabaseError::NotFound {
            entity: "TaskGroup",
            id: id.to_string(),
        });
    }

    let tasks = sqlx::query(
        r#"
        DELETE FROM suggestions
        WHERE group_id = ?
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM task_groups
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(owner)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(tasks.rows_affected())
}
