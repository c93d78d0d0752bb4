//! Per-session result storage
//!
//! Each browser session keeps the most recent result set so that choosing an
//! export format does not re-run the query. Entries expire after the
//! configured idle time.

use crate::config::SessionSettings;
use crate::results::ResultSet;
use async_trait::async_trait;
use moka::future::Cache;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Opaque session identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Holds the latest result set for each session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Replace whatever the session held before
    async fn put(&self, session: SessionId, results: Arc<ResultSet>);

    /// Most recent result set, if any
    async fn get(&self, session: SessionId) -> Option<Arc<ResultSet>>;

    /// Forget the session's results
    async fn clear(&self, session: SessionId);
}

/// In-process store with idle expiry
pub struct MemorySessionStore {
    cache: Cache<SessionId, Arc<ResultSet>>,
}

impl MemorySessionStore {
    pub fn new(idle_seconds: u64, max_sessions: u64) -> Self {
        let cache = Cache::builder()
            .time_to_idle(Duration::from_secs(idle_seconds))
            .max_capacity(max_sessions)
            .build();

        Self { cache }
    }

    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self::new(settings.ttl_seconds, settings.max_sessions)
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::from_settings(&SessionSettings::default())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, session: SessionId, results: Arc<ResultSet>) {
        self.cache.insert(session, results).await;
    }

    async fn get(&self, session: SessionId) -> Option<Arc<ResultSet>> {
        self.cache.get(&session).await
    }

    async fn clear(&self, session: SessionId) {
        self.cache.invalidate(&session).await;
    }
}
