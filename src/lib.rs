//! search-exporter: fetch ranked web search results and export them
//!
//! A query goes to the Brave Search API, the organic results are normalized
//! into ranked rows and kept per browser session, and the rows can be
//! downloaded as CSV or XLSX.

pub mod config;
pub mod error;
pub mod export;
pub mod network;
pub mod provider;
pub mod results;
pub mod search;
pub mod session;
pub mod web;

pub use config::Settings;
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use results::{ResultSet, SearchResult};
pub use search::{SearchOutcome, SearchQuery, SearchService};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
