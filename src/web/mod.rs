//! Web server module
//!
//! Serves the search form, the results table and the export downloads.

mod handlers;
mod routes;
mod state;
mod templates;

pub use handlers::{content_disposition, SearchResponse, Session, SESSION_COOKIE};
pub use routes::create_router;
pub use state::{AppState, Readiness};
pub use templates::Templates;
