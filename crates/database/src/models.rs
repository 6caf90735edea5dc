//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A device-identified user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Row ID (UUID v4).
    pub id: String,
    /// Stable identifier generated on the device.
    pub device_id: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Which half of a pairing a suggestion answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SuggestionKind {
    /// Where to go.
    Where,
    /// What to do there.
    What,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Where => "where",
            SuggestionKind::What => "what",
        }
    }

    /// The other kind of the pair.
    pub fn counterpart(&self) -> Self {
        match self {
            SuggestionKind::Where => SuggestionKind::What,
            SuggestionKind::What => SuggestionKind::Where,
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown suggestion kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown suggestion kind '{}' (expected 'where' or 'what')", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for SuggestionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "where" => Ok(SuggestionKind::Where),
            "what" => Ok(SuggestionKind::What),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// A named collection of suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TaskGroup {
    /// Row ID (UUID v4).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Shared with every user. Default groups have no owner.
    pub is_default: bool,
    /// Owning user, `None` for default groups.
    pub user_id: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Fields needed to create a user-owned task group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskGroup {
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
}

/// A single candidate value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Suggestion {
    /// Row ID (UUID v4).
    pub id: String,
    /// Where or what.
    pub kind: SuggestionKind,
    /// Text shown to the user.
    pub content: String,
    /// Optional category tag.
    pub category: Option<String>,
    /// Inactive suggestions are never drawn.
    pub is_active: bool,
    /// Parent group. Visibility follows the group, not `user_id`.
    pub group_id: Option<String>,
    /// Creating user.
    pub user_id: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Fields needed to add a suggestion to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestion {
    pub group_id: String,
    pub user_id: Option<String>,
    pub kind: SuggestionKind,
    pub content: String,
    pub category: Option<String>,
}

/// A recorded where/what pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    /// Row ID (UUID v4).
    pub id: String,
    /// Owning user.
    pub user_id: Option<String>,
    /// The "where" half.
    pub where_to_go: String,
    /// The "what" half.
    pub what_to_do: String,
    /// Creation timestamp.
    pub created_at: String,
}
