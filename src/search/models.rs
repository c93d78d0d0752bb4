//! Search query and outcome models

use crate::error::ValidationError;
use crate::results::ResultSet;
use serde::Serialize;
use std::sync::Arc;

/// A validated search request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    text: String,
    count: u32,
}

impl SearchQuery {
    /// Validate user input. `max` is the largest count the provider
    /// binding allows.
    pub fn new(text: impl Into<String>, count: u32, max: u32) -> Result<Self, ValidationError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if count == 0 || count > max {
            return Err(ValidationError::CountOutOfRange {
                requested: count,
                max,
            });
        }
        Ok(Self { text, count })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of results the user asked for
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// What a successful search produced
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// At least one result
    Found(Arc<ResultSet>),
    /// The provider had nothing for this query
    NoResults { query: String },
}

impl SearchOutcome {
    pub fn result_count(&self) -> usize {
        match self {
            Self::Found(set) => set.len(),
            Self::NoResults { .. } => 0,
        }
    }
}
