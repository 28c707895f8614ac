use std::sync::Arc;

use chrono::Duration;

use crate::auth::TokenService;
use crate::config::{Config, StoreBackend};
use crate::error::AppError;
use crate::store::{MemoryStore, PgStore, TaskStore, UserStore};

/// Everything a handler needs, constructed once at startup and shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub tokens: TokenService,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub async fn init(config: &Config) -> Result<Self, AppError> {
        let ttl = Duration::try_hours(config.token_ttl_hours).ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Token TTL of {} hours is out of range",
                config.token_ttl_hours
            ))
        })?;
        let tokens = TokenService::new(&config.jwt_secret, ttl)?;

        match &config.store {
            StoreBackend::Postgres { database_url } => {
                let store = Arc::new(PgStore::connect(database_url).await?);
                Ok(Self::from_parts(store.clone(), store, tokens, config.bcrypt_cost))
            }
            StoreBackend::Memory => {
                log::warn!("Using the in-memory store; data will not survive a restart");
                Ok(Self::in_memory(tokens, config.bcrypt_cost))
            }
        }
    }

    pub fn from_parts(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        tokens: TokenService,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            tasks,
            tokens,
            bcrypt_cost,
        }
    }

    pub fn in_memory(tokens: TokenService, bcrypt_cost: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(store.clone(), store, tokens, bcrypt_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_out_of_range_ttl_fails_startup() {
        let config = Config {
            server_port: 0,
            server_host: "127.0.0.1".into(),
            jwt_secret: "s3cret".into(),
            token_ttl_hours: i64::MAX,
            bcrypt_cost: 4,
            store: StoreBackend::Memory,
        };
        assert!(matches!(
            AppState::init(&config).await,
            Err(AppError::InternalServerError(_))
        ));
    }
}
