//! Result type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One provider record as received, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord(serde_json::Value);

impl RawRecord {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Field lookup; `None` if the record is not an object or lacks the key
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.as_object()?.get(key)
    }
}

impl From<serde_json::Value> for RawRecord {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

/// A single normalized search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// 1-based position in the result set
    pub rank: u32,
    pub title: String,
    pub description: String,
    /// Empty when the provider omitted it
    pub url: String,
}

/// Ordered results of one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub fetched_at: DateTime<Utc>,
}

impl ResultSet {
    pub fn new(query: impl Into<String>, results: Vec<SearchResult>) -> Self {
        Self {
            query: query.into(),
            results,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_record_lookup() {
        let record = RawRecord::new(json!({"title": "t"}));
        assert_eq!(record.get("title"), Some(&json!("t")));
        assert_eq!(record.get("url"), None);

        let scalar = RawRecord::new(json!("just a string"));
        assert_eq!(scalar.get("title"), None);
    }

    #[test]
    fn test_result_set_len() {
        let set = ResultSet::new("q", vec![]);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.query, "q");
    }
}
