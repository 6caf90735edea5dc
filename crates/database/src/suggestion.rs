//! Suggestion operations.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{NewSuggestion, Suggestion, SuggestionKind};
use crate::validation::{validate_category, validate_content};
use crate::visibility::CandidateScope;

const SUGGESTION_COLUMNS: &str =
    "s.id, s.kind, s.content, s.category, s.is_active, s.group_id, s.user_id, s.created_at";

/// List active suggestions of `kind` within `scope`, in insertion order.
pub async fn list_candidates(
    pool: &SqlitePool,
    kind: SuggestionKind,
    scope: &CandidateScope,
) -> Result<Vec<Suggestion>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {SUGGESTION_COLUMNS} FROM suggestions s WHERE s.is_active = 1 AND s.kind = "
    ));
    qb.push_bind(kind);
    qb.push(" AND ");
    scope.push_predicate(&mut qb, "s");
    qb.push(" ORDER BY s.created_at, s.rowid");

    let rows = qb.build_query_as::<Suggestion>().fetch_all(pool).await?;
    Ok(rows)
}

/// List every suggestion in a group, active or not, in insertion order.
pub async fn list_for_group(pool: &SqlitePool, group_id: &str) -> Result<Vec<Suggestion>> {
    let rows = sqlx::query_as::<_, Suggestion>(&format!(
        r#"
        SELECT {SUGGESTION_COLUMNS}
        FROM suggestions s
        WHERE s.group_id = ?
        ORDER BY s.created_at, s.rowid
        "#
    ))
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get a suggestion by ID.
pub async fn get_suggestion(pool: &SqlitePool, id: &str) -> Result<Suggestion> {
    sqlx::query_as::<_, Suggestion>(&format!(
        r#"
        SELECT {SUGGESTION_COLUMNS}
        FROM suggestions s
        WHERE s.id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Suggestion",
        id: id.to_string(),
    })
}

/// Insert an active suggestion and return the stored row.
pub async fn create_suggestion(pool: &SqlitePool, new: &NewSuggestion) -> Result<Suggestion> {
    validate_content(&new.content)?;
    validate_category(new.category.as_deref())?;

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO suggestions (id, kind, content, category, is_active, group_id, user_id)
        VALUES (?, ?, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(new.kind)
    .bind(new.content.trim())
    .bind(&new.category)
    .bind(&new.group_id)
    .bind(&new.user_id)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::NotFound {
                    entity: "TaskGroup",
                    id: new.group_id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get_suggestion(pool, &id).await
}

/// Delete a suggestion created by `owner`.
pub async fn delete_owned_suggestion(pool: &SqlitePool, id: &str, owner: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM suggestions
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(owner)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Suggestion",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Enable or disable a suggestion created by `owner`.
pub async fn set_active(pool: &SqlitePool, id: &str, owner: &str, active: bool) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE suggestions
        SET is_active = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(active)
    .bind(id)
    .bind(owner)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Suggestion",
            id: id.to_string(),
        });
    }

    Ok(())
}
