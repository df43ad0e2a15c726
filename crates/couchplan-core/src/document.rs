// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Decoding and encoding of definition documents.
//!
//! Documents are JSON or YAML, selected by file extension. A document may be
//! paired with an environment file whose replacements are applied to the raw
//! text before decoding:
//!
//! ```yaml
//! replacements:
//!   __SITE__: Paris
//!   __QUOTA__: "512"
//! ```

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::labels::Labels;

/// Document serialization format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl Format {
    /// Infer the format from a file extension (`json`, `yaml`, `yml`).
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Format name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Decode a document.
    pub fn decode<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| Error::malformed("json", e)),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| Error::malformed("yaml", e)),
        }
    }

    /// Encode a value, pretty-printed.
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            Self::Json => {
                serde_json::to_string_pretty(value).map_err(|e| Error::malformed("json", e))
            }
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| Error::malformed("yaml", e)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment file: textual replacements applied before decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvData {
    /// Raw text to search for, mapped to its replacement.
    #[serde(default)]
    pub replacements: Labels,
}

impl EnvData {
    /// Load an environment file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        format.decode(&content)
    }

    /// Replace every occurrence of each key by its value, keys in lexicographic order.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        self.replacements.iter().fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}

/// Read and decode a document, applying optional environment replacements.
pub fn read_document<T: DeserializeOwned>(path: &Path, env: Option<&EnvData>) -> Result<T> {
    let format = Format::from_path(path)?;
    let mut content = std::fs::read_to_string(path)?;
    if let Some(env) = env {
        content = env.apply(&content);
        debug!(
            path = %path.display(),
            replacements = env.replacements.len(),
            "Applied environment replacements"
        );
    }
    format.decode(&content)
}
