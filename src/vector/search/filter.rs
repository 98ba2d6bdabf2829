//! Search filters.
//!
//! Absent filters are `None` / empty maps, never empty strings: filtering on
//! the empty namespace or on an empty metadata value is a real filter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::vector::core::record::{Metadata, Record};

/// Required metadata key/value equalities. Every entry must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MetadataFilter {
    #[serde(default)]
    pub equals: HashMap<String, String>,
}

impl MetadataFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required key/value pair.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.equals.insert(key.into(), value.into());
        self
    }

    /// A record lacking a filtered key never matches, even for an empty
    /// expected value.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.equals.iter().all(|(key, expected)| {
            metadata
                .get(key)
                .map(|actual| actual == expected)
                .unwrap_or(false)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.equals.is_empty()
    }
}

/// Namespace and metadata restrictions applied during a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SearchFilter {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub metadata: MetadataFilter,
}

impl SearchFilter {
    /// A filter that admits every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to records in `namespace`.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Require `metadata[key] == value`.
    pub fn metadata_equals(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata = self.metadata.with(key, value);
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        if let Some(namespace) = &self.namespace
            && record.namespace != *namespace
        {
            return false;
        }
        self.metadata.matches(&record.metadata)
    }

    pub fn is_empty(&self) -> bool {
        self.namespace.is_none() && self.metadata.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(namespace: &str, pairs: &[(&str, &str)]) -> Record {
        let metadata = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Record::from_raw("r", &[1.0, 0.0], metadata, namespace)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = SearchFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&record("", &[])));
        assert!(filter.matches(&record("ns1", &[("a", "b")])));
    }

    #[test]
    fn test_namespace_filter() {
        let filter = SearchFilter::new().namespace("ns1");
        assert!(filter.matches(&record("ns1", &[])));
        assert!(!filter.matches(&record("ns2", &[])));
        assert!(!filter.matches(&record("", &[])));
    }

    #[test]
    fn test_empty_namespace_is_a_real_filter() {
        let filter = SearchFilter::new().namespace("");
        assert!(filter.matches(&record("", &[])));
        assert!(!filter.matches(&record("ns1", &[])));
    }

    #[test]
    fn test_metadata_filter() {
        let filter = SearchFilter::new().metadata_equals("lang", "en");
        assert!(filter.matches(&record("", &[("lang", "en")])));
        assert!(!filter.matches(&record("", &[("lang", "de")])));
        assert!(!filter.matches(&record("", &[])));
    }

    #[test]
    fn test_missing_key_does_not_match_empty_value() {
        let filter = SearchFilter::new().metadata_equals("tag", "");
        assert!(!filter.matches(&record("", &[])));
        assert!(filter.matches(&record("", &[("tag", "")])));
    }

    #[test]
    fn test_combined_filters_require_all() {
        let filter = SearchFilter::new()
            .namespace("docs")
            .metadata_equals("lang", "en")
            .metadata_equals("kind", "faq");
        assert!(filter.matches(&record("docs", &[("lang", "en"), ("kind", "faq")])));
        assert!(!filter.matches(&record("docs", &[("lang", "en")])));
        assert!(!filter.matches(&record("blog", &[("lang", "en"), ("kind", "faq")])));
    }
}
