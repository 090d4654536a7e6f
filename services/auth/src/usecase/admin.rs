use anyhow::anyhow;
use uuid::Uuid;

use bullana_auth_types::token::{AdminClaims, Claims, TokenKeys, sign};

use crate::domain::repository::{AdminRepository, Clock};
use crate::domain::types::AccountStatus;
use crate::error::AuthServiceError;

pub struct AdminLoginInput {
    pub email: String,
    pub owner_key: String,
}

#[derive(Debug)]
pub struct AdminLoginOutput {
    pub token: String,
    pub expires_at: u64,
    pub admin_id: Uuid,
    pub username: String,
    pub role: i16,
    pub access_modules: Vec<String>,
}

pub struct AdminLoginUseCase<A: AdminRepository, K: Clock> {
    pub admins: A,
    pub clock: K,
    pub token_keys: TokenKeys,
}

impl<A: AdminRepository, K: Clock> AdminLoginUseCase<A, K> {
    pub async fn execute(
        &self,
        input: AdminLoginInput,
    ) -> Result<AdminLoginOutput, AuthServiceError> {
        let admin = self
            .admins
            .find_login(&input.email.trim().to_lowercase())
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !bullana_crypto::password::verify(&input.owner_key, &admin.owner_key) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        if admin.status != AccountStatus::Active {
            return Err(AuthServiceError::AccountBlocked);
        }

        let claims = Claims::Admin(AdminClaims::new(
            admin.id,
            admin.email,
            admin.username.clone(),
            admin.role,
            admin.access_modules.clone(),
            self.clock.now_secs(),
        ));
        let token =
            sign(&claims, &self.token_keys).map_err(|e| AuthServiceError::Internal(anyhow!(e)))?;

        Ok(AdminLoginOutput {
            token,
            expires_at: claims.exp(),
            admin_id: admin.id,
            username: admin.username,
            role: admin.role,
            access_modules: admin.access_modules,
        })
    }
}
