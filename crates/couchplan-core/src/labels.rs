// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Labels, selectors and grouping keys.
//!
//! Labels are free-form key/value tags attached to entities. A [`Selector`] picks
//! entities by label: every key of the selector must be present on the entity and
//! its value must equal one of the `|`-delimited alternatives, e.g.
//! `Company: "Hyatt|Campanile"`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Delimiter between the alternatives of a selector value.
pub const ALTERNATIVE_DELIMITER: char = '|';

/// Free-form key/value tags.
///
/// Cloning a `Labels` produces an independent copy: mutating the clone never
/// affects the original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    /// Create an empty label set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a label.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Set a label, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a label.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Set a label, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns true if the label is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate labels in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        write!(f, "}}")
    }
}

/// Label-based filter.
///
/// An empty selector matches everything. An absent selector (`None`) matches
/// nothing, see [`LabelSource::matches`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(BTreeMap<String, String>);

impl Selector {
    /// Create an empty selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a requirement, builder style. `value` may hold `|`-delimited alternatives.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns true if the selector has no requirement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate requirements in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check whether the labels exposed by `source` satisfy every requirement.
    pub fn matches<L: LabelSource + ?Sized>(&self, source: &L) -> bool {
        self.0.iter().all(|(key, wanted)| match source.label(key) {
            Some(actual) => wanted.split(ALTERNATIVE_DELIMITER).any(|alt| alt == actual),
            None => false,
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Selector {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Anything that exposes labels to selectors and grouping.
pub trait LabelSource {
    /// Look up the value of a label.
    fn label(&self, key: &str) -> Option<&str>;

    /// Check an optional selector. `None` never matches, so an absent
    /// exclusion selector never excludes anything.
    fn matches(&self, selector: Option<&Selector>) -> bool {
        selector.is_some_and(|s| s.matches(self))
    }

    /// Grouping key under `group_on`, see [`group_hash`].
    fn group_hash(&self, group_on: &[String]) -> String {
        group_hash(self, group_on)
    }
}

impl LabelSource for Labels {
    fn label(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

/// Build the grouping key `#k1:v1#k2:v2#` for `source`.
///
/// Keys are visited in the given order; a missing label yields an empty value.
/// The result is only meant for equality comparison.
pub fn group_hash<L: LabelSource + ?Sized>(source: &L, group_on: &[String]) -> String {
    let mut hash = String::from("#");
    for key in group_on {
        hash.push_str(key);
        hash.push(':');
        hash.push_str(source.label(key).unwrap_or_default());
        hash.push('#');
    }
    hash
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn hyatt() -> Labels {
        Labels::new().with("Company", "Hyatt").with("Role", "Booking")
    }

    #[test]
    fn test_labels_copy_is_independent() {
        let original = hyatt();
        let mut copy = original.clone();
        copy.insert("Company", "Campanile");
        copy.insert("Extra", "yes");

        assert_eq!(original.get("Company"), Some("Hyatt"));
        assert!(!original.contains_key("Extra"));
        assert_eq!(copy.get("Company"), Some("Campanile"));
    }

    #[test]
    fn test_labels_display() {
        assert_eq!(hyatt().to_string(), "{Company=Hyatt, Role=Booking}");
        assert_eq!(Labels::new().to_string(), "{}");
    }

    #[test]
    fn test_selector_single_value() {
        let selector = Selector::new().with("Company", "Hyatt");
        assert!(selector.matches(&hyatt()));
        assert!(!selector.matches(&Labels::new().with("Company", "Campanile")));
        assert!(!selector.matches(&Labels::new()));
    }

    #[test]
    fn test_selector_alternatives() {
        let selector = Selector::new().with("Company", "Hyatt|Campanile");
        assert!(selector.matches(&hyatt()));
        assert!(selector.matches(&Labels::new().with("Company", "Campanile")));
        assert!(!selector.matches(&Labels::new().with("Company", "Ibis")));
    }

    #[test]
    fn test_selector_and_across_keys() {
        let selector = Selector::new().with("Company", "Hyatt").with("ReadOnly", "true");
        assert!(!selector.matches(&hyatt()));
        assert!(selector.matches(&hyatt().with("ReadOnly", "true")));
    }

    #[test]
    fn test_empty_selector_matches_everything() {
        assert!(Selector::new().matches(&Labels::new()));
        assert!(hyatt().matches(Some(&Selector::new())));
    }

    #[test]
    fn test_absent_selector_matches_nothing() {
        assert!(!hyatt().matches(None));
        assert!(!Labels::new().matches(None));
    }

    #[test]
    fn test_group_hash() {
        let labels = hyatt();
        assert_eq!(labels.group_hash(&[]), "#");
        assert_eq!(
            labels.group_hash(&["Role".to_string(), "Company".to_string()]),
            "#Role:Booking#Company:Hyatt#"
        );
        assert_eq!(labels.group_hash(&["Missing".to_string()]), "#Missing:#");
    }

    #[test]
    fn test_selector_deserialize() {
        let selector: Selector =
            serde_json::from_str(r#"{"Company": "Hyatt|Campanile"}"#).unwrap();
        assert!(selector.matches(&hyatt()));
    }

    fn label_map() -> impl Strategy<Value = BTreeMap<String, String>> {
        prop::collection::btree_map("[a-c]", "[x-z]", 0..4)
    }

    proptest! {
        #[test]
        fn prop_selector_matches_iff_every_key_intersects(
            labels in label_map(),
            selector in prop::collection::btree_map("[a-c]", prop::collection::vec("[x-z]", 1..3), 0..3),
        ) {
            let source: Labels = labels.clone().into_iter().collect();
            let sel: Selector = selector
                .iter()
                .map(|(k, alts)| (k.clone(), alts.join("|")))
                .collect();

            let expected = selector
                .iter()
                .all(|(k, alts)| labels.get(k).is_some_and(|v| alts.contains(v)));
            prop_assert_eq!(sel.matches(&source), expected);
            prop_assert!(!source.matches(None));
        }

        #[test]
        fn prop_group_hash_ignores_other_labels(
            labels in label_map(),
            noise in "[x-z]{1,3}",
        ) {
            let group_on = vec!["a".to_string(), "b".to_string()];
            let source: Labels = labels.into_iter().collect();
            let noisy = source.clone().with("unrelated", noise);
            prop_assert_eq!(source.group_hash(&group_on), noisy.group_hash(&group_on));
        }
    }
}
