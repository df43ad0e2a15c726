// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Error types for the diff engine.

use thiserror::Error;

/// A specialized `Result` type for diff operations.
pub type Result<T> = std::result::Result<T, DiffError>;

/// Errors raised when two trees cannot be compared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The two roots do not describe the same entity.
    #[error("Cannot diff unrelated entities: '{current}' vs '{proposed}'")]
    IdentityMismatch {
        /// Path of the current entity.
        current: String,
        /// Path of the proposed entity.
        proposed: String,
    },

    /// The two roots are different kinds of entity.
    #[error("Cannot diff a {current} against a {proposed} at '{path}'")]
    KindMismatch {
        /// Shared path.
        path: String,
        /// Kind of the current entity.
        current: &'static str,
        /// Kind of the proposed entity.
        proposed: &'static str,
    },

    /// A schema field is not exposed by the entity.
    #[error("{kind} does not expose {field_kind} field '{field}'")]
    UnknownField {
        /// Entity kind.
        kind: &'static str,
        /// Field name from the schema.
        field: &'static str,
        /// Declared field kind.
        field_kind: &'static str,
    },
}

impl DiffError {
    /// Returns true if the error comes from comparing unrelated inputs rather
    /// than from an inconsistent schema.
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::IdentityMismatch { .. } | Self::KindMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DiffError::IdentityMismatch { current: "DC1".into(), proposed: "DC2".into() };
        assert_eq!(err.to_string(), "Cannot diff unrelated entities: 'DC1' vs 'DC2'");
        assert!(err.is_usage_error());

        let err = DiffError::UnknownField { kind: "Bucket", field: "labels", field_kind: "value" };
        assert_eq!(err.to_string(), "Bucket does not expose value field 'labels'");
        assert!(!err.is_usage_error());
    }
}
