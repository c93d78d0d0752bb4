//! Result types and normalization
//!
//! Raw provider records go in, ranked [`SearchResult`]s come out.

mod normalizer;
mod types;

pub use normalizer::{normalize, MISSING_URL};
pub use types::*;
