// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! XDCR rule vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape of the links built for a replication group.
///
/// The vocabulary is closed: a document naming any other rule (including the
/// retired `chain`) fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XdcrRule {
    /// Cycle through the sources, sorted by path.
    Ring,
    /// Parent to child fan-out between adjacent `Level` values.
    Tree,
    /// Child to parent fan-in between adjacent `Level` values.
    Uptree,
    /// Every source to every destination.
    Custom,
}

impl XdcrRule {
    /// Every rule kind.
    pub const ALL: [XdcrRule; 4] = [Self::Ring, Self::Tree, Self::Uptree, Self::Custom];

    /// Parse from string representation (case-sensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ring" => Some(Self::Ring),
            "tree" => Some(Self::Tree),
            "uptree" => Some(Self::Uptree),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    /// Convert to string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ring => "ring",
            Self::Tree => "tree",
            Self::Uptree => "uptree",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for XdcrRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for rule in XdcrRule::ALL {
            assert_eq!(XdcrRule::parse(rule.as_str()), Some(rule));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(XdcrRule::parse("Ring"), None);
        assert_eq!(XdcrRule::parse("chain"), None);
        assert_eq!(XdcrRule::parse(""), None);
    }

    #[test]
    fn test_serde_rejects_unknown_rule() {
        let rule: XdcrRule = serde_json::from_str(r#""uptree""#).unwrap();
        assert_eq!(rule, XdcrRule::Uptree);

        let err = serde_json::from_str::<XdcrRule>(r#""chain""#).unwrap_err();
        assert!(err.to_string().contains("chain"));
    }
}
