//! Error taxonomy for forum operations.

use serde::Serialize;
use std::fmt;

use crate::ids::EntityKind;

/// One failing input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field that failed validation for one operation.
///
/// Never empty when carried by [`ForumError::Validation`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any collected error concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected, otherwise the validation error.
    pub fn into_result(self) -> Result<(), ForumError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ForumError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, error) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

/// Errors raised by stores, rules, and queries.
///
/// All of them are reported before any write happens.
#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    /// An entity id did not resolve.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// The actor may not perform this mutation.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Input failed shape, length, or cardinality checks.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
}

impl ForumError {
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.push(field, message);
        Self::Validation(errors)
    }

    /// Stable machine-readable class, used by `--json` payloads.
    pub fn class(&self) -> &'static str {
        match self {
            ForumError::NotFound { .. } => "not_found",
            ForumError::Permission(_) => "permission",
            ForumError::Validation(_) => "validation",
        }
    }
}
