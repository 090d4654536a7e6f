use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;
use uuid::Uuid;

use crate::domain::repository::AuthCache;
use crate::domain::types::TFA_CHALLENGE_TTL_SECS;
use crate::error::AuthServiceError;

#[derive(Clone)]
pub struct RedisAuthCache {
    pub pool: Pool,
}

fn tfa_challenge_key(player_id: Uuid, challenge_id: &str) -> String {
    format!("tfa_challenge:{}:{}", player_id, challenge_id)
}

fn revoked_key(jti: &str) -> String {
    format!("revoked_token:{}", jti)
}

impl AuthCache for RedisAuthCache {
    async fn set_tfa_challenge(
        &self,
        player_id: Uuid,
        challenge_id: &str,
    ) -> Result<(), AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let key = tfa_challenge_key(player_id, challenge_id);
        let (): () = conn
            .set_ex(&key, 1u8, TFA_CHALLENGE_TTL_SECS)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }

    async fn take_tfa_challenge(
        &self,
        player_id: Uuid,
        challenge_id: &str,
    ) -> Result<bool, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let key = tfa_challenge_key(player_id, challenge_id);
        // GETDEL makes redemption single-shot even under concurrent requests.
        let value: Option<u8> = conn
            .get_del(&key)
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        Ok(value.is_some())
    }

    async fn revoke_token(&self, jti: &str, ttl_secs: u64) -> Result<(), AuthServiceError> {
        if ttl_secs == 0 {
            return Ok(());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(&revoked_key(jti), 1u8, ttl_secs)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let revoked: bool = conn
            .exists(&revoked_key(jti))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(revoked)
    }
}
