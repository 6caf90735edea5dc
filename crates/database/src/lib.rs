//! SQLite persistence layer for Sanpo.
//!
//! This crate provides async database operations for device users, task
//! groups, suggestions and suggestion history using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, SuggestionKind, CandidateScope, suggestion, user};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:sanpo.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Resolve the device user and list what it may draw
//!     let me = user::ensure_user(db.pool(), "device-123").await?;
//!     let scope = CandidateScope::new(None, Some(me.id.as_str()));
//!     let places = suggestion::list_candidates(db.pool(), SuggestionKind::Where, &scope).await?;
//!     println!("{} places to go", places.len());
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod history;
pub mod models;
pub mod suggestion;
pub mod task_group;
pub mod user;
pub mod validation;
pub mod visibility;

pub use error::{DatabaseError, Result};
pub use models::{
    HistoryEntry, NewSuggestion, NewTaskGroup, Suggestion, SuggestionKind, TaskGroup,
    UnknownKind, User,
};
pub use validation::ValidationError;
pub use visibility::{CandidateScope, Visibility};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// ID of the shared group seeded by the migrations.
pub const DEFAULT_GROUP_ID: &str = "00000000-0000-4000-8000-000000000001";

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/sanpo.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing, use a single connection)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn own_group(db: &Database, owner: &str, name: &str) -> TaskGroup {
        task_group::create_group(
            db.pool(),
            &NewTaskGroup {
                name: name.to_string(),
                description: None,
                user_id: owner.to_string(),
            },
        )
        .await
        .unwrap()
    }

    async fn add(
        db: &Database,
        group: &str,
        owner: &str,
        kind: SuggestionKind,
        text: &str,
    ) -> Suggestion {
        suggestion::create_suggestion(
            db.pool(),
            &NewSuggestion {
                group_id: group.to_string(),
                user_id: Some(owner.to_string()),
                kind,
                content: text.to_string(),
                category: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let db = test_db().await;

        let first = user::ensure_user(db.pool(), "device-a").await.unwrap();
        let second = user::ensure_user(db.pool(), "device-a").await.unwrap();
        assert_eq!(first.id, second.id);
        let users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(users, 1);

        let other = user::ensure_user(db.pool(), "device-b").await.unwrap();
        assert_ne!(first.id, other.id);

        let missing = user::get_user_by_device(db.pool(), "device-z").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_seeded_default_pack() {
        let db = test_db().await;

        let groups = task_group::list_visible(db.pool(), &Visibility::DefaultOnly)
            .await
            .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, DEFAULT_GROUP_ID);
        assert!(groups[0].is_default);
        assert!(groups[0].user_id.is_none());

        let scope = CandidateScope::new(None, None);
        let wheres = suggestion::list_candidates(db.pool(), SuggestionKind::Where, &scope)
            .await
            .unwrap();
        assert!(!wheres.is_empty());
        assert!(wheres.iter().all(|s| s.kind == SuggestionKind::Where));
    }

    #[tokio::test]
    async fn test_group_visibility() {
        let db = test_db().await;
        let alice = user::ensure_user(db.pool(), "alice").await.unwrap();
        let bob = user::ensure_user(db.pool(), "bob").await.unwrap();

        let a = own_group(&db, &alice.id, "Alice's").await;
        let b = own_group(&db, &bob.id, "Bob's").await;

        let seen = task_group::list_visible(db.pool(), &Visibility::for_user(Some(alice.id.as_str())))
            .await
            .unwrap();
        let ids: Vec<&str> = seen.iter().map(|g| g.id.as_str()).collect();
        assert!(ids.contains(&a.id.as_str()));
        assert!(ids.contains(&DEFAULT_GROUP_ID));
        assert!(!ids.contains(&b.id.as_str()));
        // Newest first
        assert_eq!(ids[0], a.id);

        let anon = task_group::list_visible(db.pool(), &Visibility::for_user(None))
            .await
            .unwrap();
        assert!(anon.iter().all(|g| g.is_default));

        let owned = task_group::list_owned(db.pool(), &alice.id).await.unwrap();
        assert_eq!(owned, vec![a]);
    }

    #[tokio::test]
    async fn test_candidates_follow_group_visibility() {
        let db = test_db().await;
        let alice = user::ensure_user(db.pool(), "alice").await.unwrap();
        let bob = user::ensure_user(db.pool(), "bob").await.unwrap();

        let a = own_group(&db, &alice.id, "Alice's").await;
        let mine = add(&db, &a.id, &alice.id, SuggestionKind::Where, "Rooftop").await;
        add(&db, &a.id, &alice.id, SuggestionKind::What, "Sketch").await;

        // Bob can't see Alice's group without naming it.
        let bob_scope = CandidateScope::new(None, Some(bob.id.as_str()));
        let bob_sees = suggestion::list_candidates(db.pool(), SuggestionKind::Where, &bob_scope)
            .await
            .unwrap();
        assert!(bob_sees.iter().all(|s| s.id != mine.id));

        // Naming the group returns exactly its suggestions, whoever asks.
        let explicit = CandidateScope::new(Some(a.id.as_str()), Some(bob.id.as_str()));
        let rows = suggestion::list_candidates(db.pool(), SuggestionKind::Where, &explicit)
            .await
            .unwrap();
        assert_eq!(rows, vec![mine.clone()]);

        let alice_scope = CandidateScope::new(None, Some(alice.id.as_str()));
        let alice_sees = suggestion::list_candidates(db.pool(), SuggestionKind::Where, &alice_scope)
            .await
            .unwrap();
        assert!(alice_sees.iter().any(|s| s.id == mine.id));
        assert!(alice_sees
            .iter()
            .all(|s| s.group_id.as_deref() == Some(a.id.as_str())
                || s.group_id.as_deref() == Some(DEFAULT_GROUP_ID)));
    }

    #[tokio::test]
    async fn test_anonymous_candidates_are_default_only() {
        let db = test_db().await;
        let alice = user::ensure_user(db.pool(), "alice").await.unwrap();
        let g = own_group(&db, &alice.id, "Private").await;
        let hidden = add(&db, &g.id, &alice.id, SuggestionKind::Where, "Back garden").await;

        let scope = CandidateScope::new(None, None);
        let rows = suggestion::list_candidates(db.pool(), SuggestionKind::Where, &scope)
            .await
            .unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|s| s.id != hidden.id));
        assert!(rows
            .iter()
            .all(|s| s.group_id.as_deref() == Some(DEFAULT_GROUP_ID)));

        // Other users' groups stay hidden even with an owner in scope.
        let bob = user::ensure_user(db.pool(), "bob").await.unwrap();
        let scope = CandidateScope::new(None, Some(bob.id.as_str()));
        let rows = suggestion::list_candidates(db.pool(), SuggestionKind::Where, &scope)
            .await
            .unwrap();
        assert!(rows
            .iter()
            .all(|s| s.group_id.as_deref() == Some(DEFAULT_GROUP_ID)));
    }

    #[tokio::test]
    async fn test_inactive_suggestions_are_not_candidates() {
        let db = test_db().await;
        let alice = user::ensure_user(db.pool(), "alice").await.unwrap();
        let g = own_group(&db, &alice.id, "Quiet").await;
        let s = add(&db, &g.id, &alice.id, SuggestionKind::What, "Nap").await;

        suggestion::set_active(db.pool(), &s.id, &alice.id, false)
            .await
            .unwrap();

        let scope = CandidateScope::Group(g.id.clone());
        let rows = suggestion::list_candidates(db.pool(), SuggestionKind::What, &scope)
            .await
            .unwrap();
        assert!(rows.is_empty());

        // Still listed in the group itself.
        let all = suggestion::list_for_group(db.pool(), &g.id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_active);
    }

    #[tokio::test]
    async fn test_delete_group_cascades() {
        let db = test_db().await;
        let alice = user::ensure_user(db.pool(), "alice").await.unwrap();
        let bob = user::ensure_user(db.pool(), "bob").await.unwrap();
        let g = own_group(&db, &alice.id, "Temp").await;
        add(&db, &g.id, &alice.id, SuggestionKind::Where, "Pier").await;
        add(&db, &g.id, &alice.id, SuggestionKind::What, "Fish").await;

        // Only the owner may delete.
        let denied = task_group::delete_owned_group(db.pool(), &g.id, &bob.id).await;
        assert!(matches!(denied, Err(DatabaseError::NotFound { .. })));
        assert_eq!(suggestion::list_for_group(db.pool(), &g.id).await.unwrap().len(), 2);

        let removed = task_group::delete_owned_group(db.pool(), &g.id, &alice.id)
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(suggestion::list_for_group(db.pool(), &g.id).await.unwrap().is_empty());
        assert!(matches!(
            task_group::get_group(db.pool(), &g.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_default_group_cannot_be_deleted() {
        let db = test_db().await;
        let alice = user::ensure_user(db.pool(), "alice").await.unwrap();

        let result = task_group::delete_owned_group(db.pool(), DEFAULT_GROUP_ID, &alice.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_suggestion_requires_owner() {
        let db = test_db().await;
        let alice = user::ensure_user(db.pool(), "alice").await.unwrap();
        let bob = user::ensure_user(db.pool(), "bob").await.unwrap();
        let g = own_group(&db, &alice.id, "Mine").await;
        let s = add(&db, &g.id, &alice.id, SuggestionKind::Where, "Bridge").await;

        let denied = suggestion::delete_owned_suggestion(db.pool(), &s.id, &bob.id).await;
        assert!(matches!(denied, Err(DatabaseError::NotFound { .. })));

        suggestion::delete_owned_suggestion(db.pool(), &s.id, &alice.id)
            .await
            .unwrap();
        assert!(suggestion::list_for_group(db.pool(), &g.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_missing_group() {
        let db = test_db().await;
        let result = suggestion::create_suggestion(
            db.pool(),
            &NewSuggestion {
                group_id: "no-such-group".to_string(),
                user_id: None,
                kind: SuggestionKind::Where,
                content: "Nowhere".to_string(),
                category: None,
            },
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::NotFound { entity: "TaskGroup", .. })));
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected() {
        let db = test_db().await;
        let alice = user::ensure_user(db.pool(), "alice").await.unwrap();

        let result = task_group::create_group(
            db.pool(),
            &NewTaskGroup {
                name: "  ".to_string(),
                description: None,
                user_id: alice.id.clone(),
            },
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::Invalid(ValidationError::Empty(_)))));
    }

    #[tokio::test]
    async fn test_history_is_per_user() {
        let db = test_db().await;
        let alice = user::ensure_user(db.pool(), "alice").await.unwrap();
        let bob = user::ensure_user(db.pool(), "bob").await.unwrap();

        history::insert_entry(db.pool(), &alice.id, "Park", "Read").await.unwrap();
        history::insert_entry(db.pool(), &alice.id, "Pier", "Fish").await.unwrap();
        history::insert_entry(db.pool(), &bob.id, "Market", "Eat").await.unwrap();

        let entries = history::list_for_user(db.pool(), &alice.id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].where_to_go, "Pier");
        assert_eq!(entries[1].what_to_do, "Read");

        let removed = history::clear_for_user(db.pool(), &alice.id).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(history::count_for_user(db.pool(), &alice.id).await.unwrap(), 0);
        assert_eq!(history::count_for_user(db.pool(), &bob.id).await.unwrap(), 1);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("where".parse::<SuggestionKind>(), Ok(SuggestionKind::Where));
        assert_eq!(" WHAT ".parse::<SuggestionKind>(), Ok(SuggestionKind::What));
        assert!("when".parse::<SuggestionKind>().is_err());
        assert_eq!(SuggestionKind::Where.counterpart(), SuggestionKind::What);
    }
}
