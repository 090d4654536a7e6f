use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use bullana_auth_types::{OriginPolicy, TokenKeys};
use bullana_crypto::DeterministicCipher;

use crate::domain::repository::SystemClock;
use crate::infra::cache::RedisAuthCache;
use crate::infra::db::{DbAdminRepository, DbPlayerRepository};
use crate::infra::mail::TracingMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub token_keys: TokenKeys,
    pub cipher: DeterministicCipher,
    pub origin_policy: OriginPolicy,
    pub clock: SystemClock,
    pub totp_issuer: String,
}

impl AppState {
    pub fn player_repo(&self) -> DbPlayerRepository {
        DbPlayerRepository {
            db: self.db.clone(),
        }
    }

    pub fn admin_repo(&self) -> DbAdminRepository {
        DbAdminRepository {
            db: self.db.clone(),
        }
    }

    pub fn auth_cache(&self) -> RedisAuthCache {
        RedisAuthCache {
            pool: self.redis.clone(),
        }
    }

    pub fn mailer(&self) -> TracingMailer {
        TracingMailer
    }
}
