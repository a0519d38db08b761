//! # Loadstructure Errors
//!
//! Error taxonomy shared by the configuration tree and its boundary.
//!
//! Follows Microsoft Pragmatic Rust Guidelines:
//! - Uses `thiserror` for structured error definitions
//! - Named fields on every variant so callers can branch on the cause
//! - Includes the offending key path for debugging

use thiserror::Error;

/// Path used in errors raised against the node an operation was invoked on.
pub const ROOT_PATH: &str = "<root>";

/// Schema and addressing errors raised by the configuration tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("'{path}' is not allowed by the schema")]
    UnknownKey { path: String },

    #[error("invalid type for '{path}': expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String
    },

    #[error("cannot auto-create '{path}': schema expects {expected}")]
    CannotAutoCreate { path: String, expected: String },

    #[error("invalid dotted path: '{raw}'")]
    InvalidPath { raw: String },

    #[error("unknown schema rule '{rule}' for '{path}'")]
    InvalidRule { path: String, rule: String }
}

impl SchemaError {
    pub fn unknown_key(path: impl Into<String>) -> Self {
        Self::UnknownKey { path: path.into() }
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into()
        }
    }

    pub fn cannot_auto_create(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::CannotAutoCreate {
            path: path.into(),
            expected: expected.into()
        }
    }

    pub fn invalid_path(raw: impl Into<String>) -> Self {
        Self::InvalidPath { raw: raw.into() }
    }

    /// The key path the error refers to (the raw input for `InvalidPath`).
    pub fn path(&self) -> &str {
        match self {
            Self::UnknownKey { path }
            | Self::TypeMismatch { path, .. }
            | Self::CannotAutoCreate { path, .. }
            | Self::InvalidRule { path, .. } => path,
            Self::InvalidPath { raw } => raw
        }
    }

    /// Re-anchors the error under `prefix`, so a failure inside child `age`
    /// of `user` reports `user.age`.
    #[must_use]
    pub fn within(self, prefix: &str) -> Self {
        let join = |path: String| {
            if prefix.is_empty() || prefix == ROOT_PATH {
                path
            } else if path == ROOT_PATH {
                prefix.to_string()
            } else {
                format!("{prefix}.{path}")
            }
        };
        match self {
            Self::UnknownKey { path } => Self::UnknownKey { path: join(path) },
            Self::TypeMismatch {
                path,
                expected,
                actual
            } => Self::TypeMismatch {
                path: join(path),
                expected,
                actual
            },
            Self::CannotAutoCreate { path, expected } => Self::CannotAutoCreate {
                path: join(path),
                expected
            },
            Self::InvalidRule { path, rule } => Self::InvalidRule {
                path: join(path),
                rule
            },
            invalid @ Self::InvalidPath { .. } => invalid
        }
    }
}

pub type SchemaResult<T> = Result<T, SchemaError>;
