// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Error types for couchplan core operations.

use thiserror::Error;

/// A specialized `Result` type for couchplan core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading definitions, documents or configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be decoded.
    #[error("Malformed {format} document: {message}")]
    Malformed {
        /// Format the document was decoded as.
        format: &'static str,
        /// Decoder error message.
        message: String,
    },

    /// The document format could not be inferred.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A definition is structurally invalid.
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),
}

impl Error {
    /// Create a malformed document error.
    pub fn malformed(format: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Malformed { format, message: message.to_string() }
    }

    /// Returns true if this error comes from unparsable input.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::UnsupportedFormat(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::malformed("yaml", "unexpected end of stream");
        assert_eq!(err.to_string(), "Malformed yaml document: unexpected end of stream");

        let err = Error::UnsupportedFormat("topo.txt".to_string());
        assert_eq!(err.to_string(), "Unsupported document format: topo.txt");
    }

    #[test]
    fn test_is_malformed() {
        assert!(Error::malformed("json", "eof").is_malformed());
        assert!(Error::UnsupportedFormat("x".to_string()).is_malformed());
        assert!(!Error::Config("bad".to_string()).is_malformed());
    }
}
