use anyhow::anyhow;
use axum::http::HeaderMap;
use uuid::Uuid;

use bullana_auth_types::token::{Claims, PlayerClaims, TokenKeys, sign, verify_token};
use bullana_auth_types::{OriginPolicy, extract_bearer};
use bullana_crypto::{DeterministicCipher, split_email};

use crate::domain::repository::{AuthCache, Clock, PlayerRepository};
use crate::domain::types::AccountStatus;
use crate::error::AuthServiceError;
use crate::middleware::authenticate_player;

/// A freshly issued player session.
#[derive(Debug)]
pub struct SessionOutput {
    pub token: String,
    pub expires_at: u64,
    pub player_id: Uuid,
    pub username: String,
    pub email: String,
}

pub(crate) fn issue_player_session(
    id: Uuid,
    email: String,
    username: String,
    keys: &TokenKeys,
    now: u64,
) -> Result<SessionOutput, AuthServiceError> {
    let claims = Claims::User(PlayerClaims::new(id, email.clone(), username.clone(), now));
    let token = sign(&claims, keys).map_err(|e| AuthServiceError::Internal(anyhow!(e)))?;
    Ok(SessionOutput {
        token,
        expires_at: claims.exp(),
        player_id: id,
        username,
        email,
    })
}

// ── Login ─────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub enum LoginOutput {
    /// Password accepted but the account has 2FA: no session token yet. The
    /// temp token is the encrypted `{player_id}:{challenge_id}` pair.
    TwoFactorRequired { temp_token: String },
    Authenticated(SessionOutput),
}

pub struct LoginUseCase<P: PlayerRepository, C: AuthCache, K: Clock> {
    pub players: P,
    pub cache: C,
    pub clock: K,
    pub cipher: DeterministicCipher,
    pub token_keys: TokenKeys,
}

impl<P: PlayerRepository, C: AuthCache, K: Clock> LoginUseCase<P, C, K> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        let (head, tail) = split_email(&input.email);
        let email_head = self.cipher.encrypt(&head)?;
        let email_tail = self.cipher.encrypt(&tail)?;

        // Unknown email and wrong password are indistinguishable to callers.
        let player = self
            .players
            .find_login(&email_head, &email_tail)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        // Password first: a blocked-account response must not leak whether
        // the password was right.
        if !bullana_crypto::password::verify(&input.password, &player.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        match player.status {
            AccountStatus::Pending => return Err(AuthServiceError::AccountPending),
            AccountStatus::Blocked => return Err(AuthServiceError::AccountBlocked),
            AccountStatus::Active => {}
        }

        if player.tfa_enabled {
            let challenge_id = Uuid::new_v4().to_string();
            self.cache
                .set_tfa_challenge(player.id, &challenge_id)
                .await?;
            let temp_token = self
                .cipher
                .encrypt(&format!("{}:{}", player.id, challenge_id))?;
            return Ok(LoginOutput::TwoFactorRequired { temp_token });
        }

        let email = format!("{}{}", head, tail);
        let session = issue_player_session(
            player.id,
            email,
            player.username,
            &self.token_keys,
            self.clock.now_secs(),
        )?;
        Ok(LoginOutput::Authenticated(session))
    }
}

// ── Logout ────────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<P: PlayerRepository, C: AuthCache, K: Clock> {
    pub players: P,
    pub cache: C,
    pub clock: K,
    pub token_keys: TokenKeys,
}

impl<P: PlayerRepository, C: AuthCache, K: Clock> LogoutUseCase<P, C, K> {
    /// Revoke the presented token's jti for the remainder of its lifetime.
    /// Logout is itself an authenticated route: the full player pipeline
    /// (origin, token, revocation, live status) runs before the marker is
    /// written.
    pub async fn execute(
        &self,
        headers: &HeaderMap,
        policy: &OriginPolicy,
    ) -> Result<(), AuthServiceError> {
        authenticate_player(
            headers,
            policy,
            &self.token_keys,
            &self.players,
            &self.cache,
            &self.clock,
        )
        .await?;
        let token = extract_bearer(headers).ok_or(AuthServiceError::CredentialMissing)?;
        let now = self.clock.now_secs();
        let claims = verify_token(&token, &self.token_keys, now)
            .map_err(|_| AuthServiceError::CredentialInvalid)?;
        let ttl = claims.exp().saturating_sub(now);
        self.cache.revoke_token(claims.jti(), ttl).await
    }
}
