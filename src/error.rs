//! Error types for the search/export pipeline
//!
//! Each variant maps to one user-visible failure class. Messages are safe to
//! render in the UI: the API key never appears in any of them.

use thiserror::Error;

/// Startup-time misconfiguration. Fatal for the pipeline: no query may be
/// issued while one of these is outstanding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no API key found (looked in: {})", tried.join(", "))]
    MissingCredential { tried: Vec<String> },

    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}

/// Rejected user input. Recoverable, blocks only the current submission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("search text must not be empty")]
    EmptyQuery,

    #[error("result count must be between 1 and {max}, got {requested}")]
    CountOutOfRange { requested: u32, max: u32 },

    #[error("result count must be a whole number, got `{0}`")]
    InvalidCount(String),

    #[error("there are no search results to export yet")]
    NothingToExport,

    #[error("unknown export format: {0}")]
    UnknownFormat(String),
}

/// Failure talking to the search provider. Never retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("request to provider failed: {0}")]
    Transport(String),

    #[error("request to provider timed out")]
    Timeout,

    #[error("provider response could not be parsed: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Whether the provider rejected the request for rate limiting
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { status: 429, .. })
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Serialization fault while building an export file.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet encoding failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("export buffer error: {0}")]
    Buffer(String),
}

/// Any failure a user action can end in.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl Error {
    /// Short label for the failure class, used as the banner heading
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Validation(_) => "validation",
            Self::Provider(_) => "provider",
            Self::Encoding(_) => "encoding",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
