//! Search pipeline module
//!
//! Validates queries, calls the provider, normalizes the results and keeps
//! them in the session store for export.

mod executor;
mod models;

pub use executor::SearchService;
pub use models::*;
