//! Task group snapshots for sharing as text or QR codes.
//!
//! A snapshot carries the group's name and description and the ordered
//! `(type, content, category)` of its tasks. IDs, ownership and timestamps are
//! left out so the text can be imported on any device.

use database::validation::MAX_GROUP_NAME_LENGTH;
use database::{Suggestion, SuggestionKind, TaskGroup};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Appended to the name of an imported group.
pub const IMPORT_SUFFIX: &str = " (imported)";

/// Category given to imported tasks that have none.
pub const IMPORTED_CATEGORY: &str = "imported";

/// Byte-mode capacity of a version 40 QR symbol at error correction level L.
pub const QR_MAX_BYTES: usize = 2953;

/// Errors producing or reading a snapshot.
#[derive(Debug, Error)]
pub enum ShareError {
    /// Text is not a snapshot.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Snapshot does not fit in a single QR code.
    #[error("snapshot is {size} bytes, a QR code holds at most {max}")]
    TooLargeForQr { size: usize, max: usize },

    /// The group could not be loaded.
    #[error("task group unavailable: {0}")]
    GroupUnavailable(String),
}

/// Group header of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportGroup {
    pub name: String,
    pub description: Option<String>,
}

/// One task of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportTask {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub content: String,
    pub category: Option<String>,
}

impl ExportTask {
    /// The category to store on import.
    pub fn import_category(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => IMPORTED_CATEGORY,
        }
    }
}

/// A shareable task group snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportData {
    pub group: ExportGroup,
    pub tasks: Vec<ExportTask>,
}

impl ExportData {
    /// Build a snapshot from a stored group and its tasks, keeping task order.
    pub fn from_group(group: &TaskGroup, tasks: &[Suggestion]) -> Self {
        Self {
            group: ExportGroup {
                name: group.name.clone(),
                description: group.description.clone(),
            },
            tasks: tasks
                .iter()
                .map(|t| ExportTask {
                    kind: t.kind,
                    content: t.content.clone(),
                    category: t.category.clone(),
                })
                .collect(),
        }
    }

    /// Serialize to compact UTF-8 JSON.
    pub fn to_text(&self) -> Result<String, ShareError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot from clipboard or scanned text.
    pub fn parse(text: &str) -> Result<Self, ShareError> {
        Ok(serde_json::from_str(text.trim())?)
    }

    /// Name for the group created by importing this snapshot.
    ///
    /// The original name is shortened as needed so the suffixed name still
    /// fits the group name limit.
    pub fn imported_name(&self) -> String {
        let room = MAX_GROUP_NAME_LENGTH - IMPORT_SUFFIX.chars().count();
        let base: String = self.group.name.trim().chars().take(room).collect();
        format!("{}{}", base.trim_end(), IMPORT_SUFFIX)
    }
}

/// Serialize a snapshot for a QR code, rejecting payloads that won't fit.
pub fn qr_payload(data: &ExportData) -> Result<String, ShareError> {
    let text = data.to_text()?;
    if text.len() > QR_MAX_BYTES {
        return Err(ShareError::TooLargeForQr {
            size: text.len(),
            max: QR_MAX_BYTES,
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExportData {
        ExportData {
            group: ExportGroup {
                name: "Rainy day".to_string(),
                description: None,
            },
            tasks: vec![
                ExportTask {
                    kind: SuggestionKind::Where,
                    content: "Covered arcade".to_string(),
                    category: Some("indoor".to_string()),
                },
                ExportTask {
                    kind: SuggestionKind::What,
                    content: "Count umbrellas".to_string(),
                    category: None,
                },
            ],
        }
    }

    #[test]
    fn test_wire_shape() {
        let text = sample().to_text().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["group"]["name"], "Rainy day");
        assert!(value["group"]["description"].is_null());
        assert_eq!(value["tasks"][0]["type"], "where");
        assert_eq!(value["tasks"][1]["type"], "what");
        assert!(value["tasks"][1]["category"].is_null());
        assert!(value["tasks"][0].get("id").is_none());
    }

    #[test]
    fn test_parse_accepts_missing_optionals() {
        let text = r#"
            {"group": {"name": "Mini"},
             "tasks": [{"type": "what", "content": "Whistle"}]}
        "#;
        let data = ExportData::parse(text).unwrap();
        assert_eq!(data.group.description, None);
        assert_eq!(data.tasks[0].category, None);
        assert_eq!(data.tasks[0].import_category(), IMPORTED_CATEGORY);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in [
            "",
            "not json",
            r#"{"tasks": []}"#,
            r#"{"group": {"name": "X"}, "tasks": [{"type": "when", "content": "Y"}]}"#,
        ] {
            assert!(matches!(ExportData::parse(text), Err(ShareError::Malformed(_))));
        }
    }

    #[test]
    fn test_import_category_defaults_empty_tags() {
        let task = ExportTask {
            kind: SuggestionKind::Where,
            content: "Hill".to_string(),
            category: Some(String::new()),
        };
        assert_eq!(task.import_category(), IMPORTED_CATEGORY);
    }

    #[test]
    fn test_imported_name() {
        assert_eq!(sample().imported_name(), "Rainy day (imported)");
    }

    #[test]
    fn test_imported_name_fits_limit() {
        let mut data = sample();
        for len in [MAX_GROUP_NAME_LENGTH - 5, MAX_GROUP_NAME_LENGTH] {
            data.group.name = "散".repeat(len);
            let name = data.imported_name();
            assert!(name.ends_with(IMPORT_SUFFIX));
            assert_eq!(name.chars().count(), MAX_GROUP_NAME_LENGTH);
        }

        // Importing an import again still fits.
        data.group.name = data.imported_name();
        assert_eq!(data.imported_name().chars().count(), MAX_GROUP_NAME_LENGTH);
    }

    #[test]
    fn test_qr_payload_limit() {
        assert!(qr_payload(&sample()).is_ok());

        let mut big = sample();
        big.tasks = (0..200)
            .map(|i| ExportTask {
                kind: SuggestionKind::What,
                content: format!("Task number {i} with some padding text"),
                category: None,
            })
            .collect();
        assert!(matches!(
            qr_payload(&big),
            Err(ShareError::TooLargeForQr { max: QR_MAX_BYTES, .. })
        ));
    }
}
