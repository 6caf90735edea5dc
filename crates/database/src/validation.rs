//! Input validation for user-supplied text fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for group names.
pub const MAX_GROUP_NAME_LENGTH: usize = 80;

/// Maximum allowed length for group descriptions.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Maximum allowed length for suggestion content.
pub const MAX_CONTENT_LENGTH: usize = 200;

/// Maximum allowed length for category tags.
pub const MAX_CATEGORY_LENGTH: usize = 40;

fn require(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    check_len(field, value, max)
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }
    Ok(())
}

/// Validate a task group name.
pub fn validate_group_name(name: &str) -> Result<(), ValidationError> {
    require("group name", name, MAX_GROUP_NAME_LENGTH)
}

/// Validate an optional group description. Empty descriptions are allowed.
pub fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    match description {
        Some(d) => check_len("description", d, MAX_DESCRIPTION_LENGTH),
        None => Ok(()),
    }
}

/// Validate suggestion content.
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    require("content", content, MAX_CONTENT_LENGTH)
}

/// Validate an optional category tag.
pub fn validate_category(category: Option<&str>) -> Result<(), ValidationError> {
    match category {
        Some(c) => check_len("category", c, MAX_CATEGORY_LENGTH),
        None => Ok(()),
    }
}
