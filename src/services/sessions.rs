//! Per-session data and the home-page visit counter

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;

/// Session key holding the number of home-page visits
pub const NUM_VISITS: &str = "num_visits";

/// Storage for named integers scoped to a session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_int(&self, session_id: &str, name: &str) -> AppResult<Option<i64>>;

    async fn set_int(&self, session_id: &str, name: &str, value: i64) -> AppResult<()>;
}

#[derive(Clone)]
pub struct SessionsService {
    store: Arc<dyn SessionStore>,
}

impl SessionsService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Fresh random session identifier
    pub fn new_session_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Count a home-page visit and return the total for this session
    pub async fn record_visit(&self, session_id: &str) -> AppResult<i64> {
        let visits = self.store.get_int(session_id, NUM_VISITS).await?.unwrap_or(0) + 1;
        self.store.set_int(session_id, NUM_VISITS, visits).await?;
        tracing::debug!(session_id, visits, "home page visit");
        Ok(visits)
    }
}
