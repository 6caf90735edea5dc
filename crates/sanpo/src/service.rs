//! Session-level operations for one device.
//!
//! Database failures are logged and turned into empty results here: callers
//! get `None`, an empty list or `false` and may simply retry the action.
//! A device whose user cannot be resolved is treated as anonymous and only
//! sees default groups.

use std::sync::Arc;

use database::{
    history, suggestion, task_group, user, CandidateScope, Database, HistoryEntry, NewSuggestion,
    NewTaskGroup, Suggestion, SuggestionKind, TaskGroup, Visibility,
};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ImportError, Result};
use crate::local_state::LocalState;
use crate::selection::{self, Pairing, Selection};
use crate::share::{self, ExportData, ShareError};

/// Outcome of drawing a suggestion.
#[derive(Debug)]
pub struct Draw {
    /// The drawn suggestion, `None` when nothing is eligible.
    pub suggestion: Option<Suggestion>,
    /// Background history write, present when a full pair was formed.
    pub recording: Option<JoinHandle<bool>>,
}

/// Result of an import that created its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// The newly created group.
    pub group: TaskGroup,
    /// Tasks inserted.
    pub imported: usize,
    /// Tasks that failed to insert. Earlier inserts are kept.
    pub failed: usize,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Client for one device identity.
#[derive(Debug, Clone)]
pub struct Sanpo {
    db: Database,
    device_id: String,
    user_id: Arc<RwLock<Option<String>>>,
}

impl Sanpo {
    /// Create a client over an already migrated database.
    pub fn new(db: Database, device_id: impl Into<String>) -> Self {
        Self {
            db,
            device_id: device_id.into(),
            user_id: Arc::new(RwLock::new(None)),
        }
    }

    /// Connect to the configured database, run migrations and bind to a device.
    pub async fn connect(config: &Config, device_id: impl Into<String>) -> Result<Self> {
        let db = Database::connect_with_pool_size(&config.database_url, config.pool_size).await?;
        db.migrate().await?;
        Ok(Self::new(db, device_id))
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Resolve the device's user ID, creating the user on first access.
    ///
    /// Returns `None` when the user can't be resolved; the caller then acts
    /// anonymously.
    pub async fn ensure_user(&self) -> Option<String> {
        if let Some(id) = self.user_id.read().await.clone() {
            return Some(id);
        }

        match user::ensure_user(self.db.pool(), &self.device_id).await {
            Ok(user) => {
                *self.user_id.write().await = Some(user.id.clone());
                Some(user.id)
            }
            Err(err) => {
                warn!(device_id = %self.device_id, "Failed to resolve user: {}", err);
                None
            }
        }
    }

    /// Draw one active suggestion of `kind` uniformly at random.
    ///
    /// With `group_id` the candidates are that group's suggestions; otherwise
    /// they come from every group visible to the device user.
    pub async fn random_suggestion(
        &self,
        kind: SuggestionKind,
        group_id: Option<&str>,
    ) -> Option<Suggestion> {
        let user_id = self.ensure_user().await;
        let scope = CandidateScope::new(group_id, user_id.as_deref());

        let candidates = match suggestion::list_candidates(self.db.pool(), kind, &scope).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(%kind, "Failed to fetch suggestions: {}", err);
                return None;
            }
        };

        debug!(%kind, candidates = candidates.len(), "Drawing suggestion");
        selection::choose(candidates, &mut rand::thread_rng())
    }

    /// Draw a suggestion, hold it in `selection` and record the pair if one forms.
    ///
    /// The history write runs in the background and never fails the draw.
    pub async fn draw(
        &self,
        selection: &mut Selection,
        kind: SuggestionKind,
        group_id: Option<&str>,
    ) -> Draw {
        let drawn = self.random_suggestion(kind, group_id).await;
        let recording = selection
            .set(kind, drawn.clone())
            .map(|pairing| self.record_in_background(pairing));

        Draw {
            suggestion: drawn,
            recording,
        }
    }

    /// Draw into a device's local state using its active group.
    pub async fn draw_into(&self, state: &mut LocalState, kind: SuggestionKind) -> Draw {
        let group_id = state.active_group_id.clone();
        self.draw(&mut state.selection, kind, group_id.as_deref()).await
    }

    fn record_in_background(&self, pairing: Pairing) -> JoinHandle<bool> {
        let this = self.clone();
        tokio::spawn(async move {
            this.save_history(&pairing.where_to_go, &pairing.what_to_do)
                .await
        })
    }

    /// Record a where/what pairing for the device user.
    pub async fn save_history(&self, where_to_go: &str, what_to_do: &str) -> bool {
        let Some(user_id) = self.ensure_user().await else {
            return false;
        };

        match history::insert_entry(self.db.pool(), &user_id, where_to_go, what_to_do).await {
            Ok(()) => true,
            Err(err) => {
                warn!("Failed to save history: {}", err);
                false
            }
        }
    }

    /// The device user's history, newest first.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        let Some(user_id) = self.ensure_user().await else {
            return Vec::new();
        };

        history::list_for_user(self.db.pool(), &user_id)
            .await
            .unwrap_or_else(|err| {
                warn!("Failed to fetch history: {}", err);
                Vec::new()
            })
    }

    /// Remove all of the device user's history.
    pub async fn clear_history(&self) -> bool {
        let Some(user_id) = self.ensure_user().await else {
            return false;
        };

        match history::clear_for_user(self.db.pool(), &user_id).await {
            Ok(removed) => {
                info!(removed, "Cleared history");
                true
            }
            Err(err) => {
                warn!("Failed to clear history: {}", err);
                false
            }
        }
    }

    /// Default groups plus the device user's own, newest first.
    pub async fn available_groups(&self) -> Vec<TaskGroup> {
        let user_id = self.ensure_user().await;
        let visibility = Visibility::for_user(user_id.as_deref());

        task_group::list_visible(self.db.pool(), &visibility)
            .await
            .unwrap_or_else(|err| {
                warn!("Failed to fetch available task groups: {}", err);
                Vec::new()
            })
    }

    /// Refresh the cached group list in local state.
    pub async fn refresh_groups(&self, state: &mut LocalState) {
        let groups = self.available_groups().await;
        state.replace_groups(groups);
    }

    /// Groups owned by the device user, newest first.
    pub async fn user_groups(&self) -> Vec<TaskGroup> {
        let Some(user_id) = self.ensure_user().await else {
            return Vec::new();
        };

        task_group::list_owned(self.db.pool(), &user_id)
            .await
            .unwrap_or_else(|err| {
                warn!("Failed to fetch task groups: {}", err);
                Vec::new()
            })
    }

    /// Create a group owned by the device user.
    pub async fn create_group(&self, name: &str, description: Option<&str>) -> Option<TaskGroup> {
        let user_id = self.ensure_user().await?;

        let new = NewTaskGroup {
            name: name.to_string(),
            description: description.map(str::to_string),
            user_id,
        };

        match task_group::create_group(self.db.pool(), &new).await {
            Ok(group) => {
                info!(group_id = %group.id, name = %group.name, "Created task group");
                Some(group)
            }
            Err(err) => {
                warn!("Failed to create task group: {}", err);
                None
            }
        }
    }

    /// Add a task to a group.
    pub async fn add_task(
        &self,
        group_id: &str,
        kind: SuggestionKind,
        content: &str,
        category: Option<&str>,
    ) -> Option<Suggestion> {
        let user_id = self.ensure_user().await?;

        let new = NewSuggestion {
            group_id: group_id.to_string(),
            user_id: Some(user_id),
            kind,
            content: content.to_string(),
            category: category.map(str::to_string),
        };

        match suggestion::create_suggestion(self.db.pool(), &new).await {
            Ok(task) => Some(task),
            Err(err) => {
                warn!(group_id, "Failed to add task: {}", err);
                None
            }
        }
    }

    /// Every task in a group.
    pub async fn group_tasks(&self, group_id: &str) -> Vec<Suggestion> {
        suggestion::list_for_group(self.db.pool(), group_id)
            .await
            .unwrap_or_else(|err| {
                warn!(group_id, "Failed to fetch group tasks: {}", err);
                Vec::new()
            })
    }

    /// Delete a task the device user created.
    pub async fn delete_task(&self, task_id: &str) -> bool {
        let Some(user_id) = self.ensure_user().await else {
            return false;
        };

        match suggestion::delete_owned_suggestion(self.db.pool(), task_id, &user_id).await {
            Ok(()) => true,
            Err(err) => {
                warn!(task_id, "Failed to delete task: {}", err);
                false
            }
        }
    }

    /// Enable or disable a task the device user created.
    pub async fn set_task_active(&self, task_id: &str, active: bool) -> bool {
        let Some(user_id) = self.ensure_user().await else {
            return false;
        };

        match suggestion::set_active(self.db.pool(), task_id, &user_id, active).await {
            Ok(()) => true,
            Err(err) => {
                warn!(task_id, active, "Failed to update task: {}", err);
                false
            }
        }
    }

    /// Delete a group the device user owns, with its tasks.
    pub async fn delete_group(&self, group_id: &str) -> bool {
        let Some(user_id) = self.ensure_user().await else {
            return false;
        };

        match task_group::delete_owned_group(self.db.pool(), group_id, &user_id).await {
            Ok(tasks) => {
                info!(group_id, tasks, "Deleted task group");
                true
            }
            Err(err) => {
                warn!(group_id, "Failed to delete task group: {}", err);
                false
            }
        }
    }

    /// Snapshot a group for sharing.
    pub async fn export_data(&self, group_id: &str) -> Option<ExportData> {
        let group = match task_group::get_group(self.db.pool(), group_id).await {
            Ok(group) => group,
            Err(err) => {
                warn!(group_id, "Failed to load task group for export: {}", err);
                return None;
            }
        };

        match suggestion::list_for_group(self.db.pool(), group_id).await {
            Ok(tasks) => Some(ExportData::from_group(&group, &tasks)),
            Err(err) => {
                warn!(group_id, "Failed to load tasks for export: {}", err);
                None
            }
        }
    }

    /// Snapshot a group as clipboard text.
    pub async fn export_group(&self, group_id: &str) -> Option<String> {
        let data = self.export_data(group_id).await?;
        data.to_text()
            .map_err(|err| warn!(group_id, "Failed to serialize export: {}", err))
            .ok()
    }

    /// Snapshot a group as QR code text.
    pub async fn export_group_qr(&self, group_id: &str) -> std::result::Result<String, ShareError> {
        let data = self
            .export_data(group_id)
            .await
            .ok_or_else(|| ShareError::GroupUnavailable(group_id.to_string()))?;
        share::qr_payload(&data)
    }

    /// Import a snapshot as a new group owned by the device user.
    ///
    /// Nothing is written unless the text parses and the group is created.
    /// After that each task is inserted on its own; a failed insert is
    /// counted and the tasks already inserted stay.
    pub async fn import_group(&self, text: &str) -> std::result::Result<ImportReport, ImportError> {
        let data = ExportData::parse(text)?;

        let user_id = self.ensure_user().await.ok_or(ImportError::NoUser)?;

        let new = NewTaskGroup {
            name: data.imported_name(),
            description: data.group.description.clone(),
            user_id: user_id.clone(),
        };
        let group = task_group::create_group(self.db.pool(), &new)
            .await
            .map_err(ImportError::GroupCreation)?;

        let mut imported = 0;
        let mut failed = 0;
        for task in &data.tasks {
            let new = NewSuggestion {
                group_id: group.id.clone(),
                user_id: Some(user_id.clone()),
                kind: task.kind,
                content: task.content.clone(),
                category: Some(task.import_category().to_string()),
            };
            match suggestion::create_suggestion(self.db.pool(), &new).await {
                Ok(_) => imported += 1,
                Err(err) => {
                    warn!(group_id = %group.id, content = %task.content, "Failed to import task: {}", err);
                    failed += 1;
                }
            }
        }

        info!(group_id = %group.id, imported, failed, "Imported task group");
        Ok(ImportReport {
            group,
            imported,
            failed,
        })
    }
}
