//! # Error Types
//!
//! Structured error types for cable_core. Terminal failures of the sizing
//! pipeline (bad input, unsupported construction, missing reference table)
//! come back as a [`SizingError`]. Shortfalls found while sizing (no size
//! large enough, voltage drop over the limit, missing drop data) are not
//! errors: they travel as status fields inside a returned result.
//!
//! ## Example
//!
//! ```rust
//! use cable_core::errors::{SizingError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if length_m <= 0.0 {
//!         return Err(SizingError::InvalidInput {
//!             field: "cable_length_m".to_string(),
//!             value: length_m.to_string(),
//!             reason: "Length must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cable_core operations
pub type CalcResult<T> = Result<T, SizingError>;

/// Broad error category, used by consumers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    InvalidInput,
    KeyResolutionGap,
    TableNotFound,
    ReferenceData,
    Configuration,
    Internal,
}

/// Structured error type for sizing operations.
///
/// Each variant carries enough context to tell the caller which field or
/// which catalog path was involved.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SizingError {
    /// An input value is invalid (NaN, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The construction combination is known to have no table coverage
    #[error("Unsupported construction '{attempted_key}': {reason}")]
    KeyResolutionGap {
        attempted_key: String,
        reason: String,
    },

    /// A resolved key has no table after aliasing and fallback
    #[error("No reference table for '{attempted_key}' (tried: {})", .attempted_paths.join(", "))]
    TableNotFound {
        attempted_key: String,
        attempted_paths: Vec<String>,
    },

    /// Reference catalog could not be parsed or failed validation
    #[error("Invalid reference catalog: {reason}")]
    CatalogInvalid { reason: String },

    /// Engine settings could not be read or parsed
    #[error("Settings error: {reason}")]
    SettingsError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SizingError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        SizingError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a KeyResolutionGap error
    pub fn resolution_gap(attempted_key: impl Into<String>, reason: impl Into<String>) -> Self {
        SizingError::KeyResolutionGap {
            attempted_key: attempted_key.into(),
            reason: reason.into(),
        }
    }

    /// Create a TableNotFound error
    pub fn table_not_found(attempted_key: impl Into<String>, attempted_paths: Vec<String>) -> Self {
        SizingError::TableNotFound {
            attempted_key: attempted_key.into(),
            attempted_paths,
        }
    }

    /// Create a CatalogInvalid error
    pub fn catalog_invalid(reason: impl Into<String>) -> Self {
        SizingError::CatalogInvalid {
            reason: reason.into(),
        }
    }

    /// Create a SettingsError
    pub fn settings(reason: impl Into<String>) -> Self {
        SizingError::SettingsError {
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        SizingError::Internal {
            message: message.into(),
        }
    }

    /// Broad category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            SizingError::InvalidInput { .. } => ErrorCategory::InvalidInput,
            SizingError::KeyResolutionGap { .. } => ErrorCategory::KeyResolutionGap,
            SizingError::TableNotFound { .. } => ErrorCategory::TableNotFound,
            SizingError::CatalogInvalid { .. } => ErrorCategory::ReferenceData,
            SizingError::SettingsError { .. } => ErrorCategory::Configuration,
            SizingError::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// The construction key or catalog path that failed, when there is one
    pub fn attempted_key(&self) -> Option<&str> {
        match self {
            SizingError::KeyResolutionGap { attempted_key, .. }
            | SizingError::TableNotFound { attempted_key, .. } => Some(attempted_key),
            _ => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SizingError::InvalidInput { .. } => "INVALID_INPUT",
            SizingError::KeyResolutionGap { .. } => "KEY_RESOLUTION_GAP",
            SizingError::TableNotFound { .. } => "TABLE_NOT_FOUND",
            SizingError::CatalogInvalid { .. } => "CATALOG_INVALID",
            SizingError::SettingsError { .. } => "SETTINGS_ERROR",
            SizingError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = SizingError::invalid_input("cable_length_m", "-5", "Length must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: SizingError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
        assert!(json.contains("\"type\":\"InvalidInput\""));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SizingError::resolution_gap("pvc/armoured", "x").error_code(),
            "KEY_RESOLUTION_GAP"
        );
        assert_eq!(
            SizingError::table_not_found("k", vec![]).error_code(),
            "TABLE_NOT_FOUND"
        );
        assert_eq!(SizingError::catalog_invalid("bad").error_code(), "CATALOG_INVALID");
    }

    #[test]
    fn test_attempted_key_and_category() {
        let err = SizingError::table_not_found(
            "capacity.a.b",
            vec!["capacity.a.b".to_string(), "capacity.a.c".to_string()],
        );
        assert_eq!(err.attempted_key(), Some("capacity.a.b"));
        assert_eq!(err.category(), ErrorCategory::TableNotFound);
        assert!(err.to_string().contains("capacity.a.c"));

        let err = SizingError::invalid_input("f", "1", "r");
        assert_eq!(err.attempted_key(), None);
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
    }
}
