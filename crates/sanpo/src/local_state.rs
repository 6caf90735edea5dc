//! State kept on the device between runs.
//!
//! The file holds the device identifier, the last drawn suggestions, the
//! chosen group and the last fetched group list. It is overwritten as a whole
//! on every save and never expires.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use database::TaskGroup;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Result, SanpoError};
use crate::selection::Selection;

/// Persisted on-device state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalState {
    /// Stable device identifier, the only key to the remote user.
    pub device_id: String,
    /// Last drawn suggestions.
    #[serde(default)]
    pub selection: Selection,
    /// Group chosen for drawing, `None` for every visible group.
    #[serde(default)]
    pub active_group_id: Option<String>,
    /// Groups from the most recent listing.
    #[serde(default)]
    pub cached_groups: Vec<TaskGroup>,
}

impl Default for LocalState {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalState {
    /// Fresh state with a newly generated device identifier.
    pub fn new() -> Self {
        Self {
            device_id: Uuid::new_v4().to_string(),
            selection: Selection::default(),
            active_group_id: None,
            cached_groups: Vec::new(),
        }
    }

    /// Load state from `path`.
    ///
    /// A missing file yields fresh state. An unreadable document is logged and
    /// replaced with fresh state, which means a new device identity.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No state file, starting fresh");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(SanpoError::StateIo {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        match serde_json::from_str::<Self>(&text) {
            Ok(state) if !state.device_id.trim().is_empty() => Ok(state),
            Ok(_) => {
                warn!(path = %path.display(), "State file has no device id, starting fresh");
                Ok(Self::new())
            }
            Err(err) => {
                warn!(path = %path.display(), "Discarding unreadable state file: {}", err);
                Ok(Self::new())
            }
        }
    }

    /// Write state to `path`, replacing any previous file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let io_err = |source: io::Error| SanpoError::StateIo {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let text = serde_json::to_string_pretty(self)?;
        let tmp = tmp_path(path);
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;

        debug!(path = %path.display(), "Saved local state");
        Ok(())
    }

    /// Replace the cached group list and keep the active group valid.
    ///
    /// If the active group is no longer listed, the default group (or else the
    /// first listed group) becomes active. Drawing from every visible group
    /// (`None`) is left alone.
    pub fn replace_groups(&mut self, groups: Vec<TaskGroup>) {
        if let Some(active) = self.active_group_id.as_deref() {
            if !groups.iter().any(|g| g.id == active) {
                let fallback = groups
                    .iter()
                    .find(|g| g.is_default)
                    .or_else(|| groups.first())
                    .map(|g| g.id.clone());
                debug!(stale = active, fallback = ?fallback, "Active group no longer listed");
                self.active_group_id = fallback;
            }
        }

        self.cached_groups = groups;
    }

    /// Choose the group to draw from. `None` draws from every visible group.
    pub fn set_active_group(&mut self, group_id: Option<String>) {
        self.active_group_id = group_id;
    }

    /// The cached entry for the active group, if it is cached.
    pub fn active_group(&self) -> Option<&TaskGroup> {
        let id = self.active_group_id.as_deref()?;
        self.cached_groups.iter().find(|g| g.id == id)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
