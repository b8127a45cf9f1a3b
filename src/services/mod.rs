//! Business logic services

pub mod auth;
pub mod catalog;
pub mod loans;
pub mod redis;
pub mod renewal;
pub mod sessions;

use std::sync::Arc;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub sessions: sessions::SessionsService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository and session store
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        session_store: Arc<dyn sessions::SessionStore>,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            sessions: sessions::SessionsService::new(session_store),
            repository,
        }
    }
}
