use anyhow::anyhow;
use uuid::Uuid;

use bullana_auth_types::token::TokenKeys;
use bullana_crypto::DeterministicCipher;

use crate::domain::repository::{AuthCache, Clock, PlayerRepository};
use crate::domain::types::AccountStatus;
use crate::error::AuthServiceError;
use crate::usecase::login::{SessionOutput, issue_player_session};

pub struct VerifyTwoFactorInput {
    pub temp_token: String,
    pub tfa_code: String,
}

pub struct VerifyTwoFactorUseCase<P: PlayerRepository, C: AuthCache, K: Clock> {
    pub players: P,
    pub cache: C,
    pub clock: K,
    pub cipher: DeterministicCipher,
    pub token_keys: TokenKeys,
}

impl<P: PlayerRepository, C: AuthCache, K: Clock> VerifyTwoFactorUseCase<P, C, K> {
    pub async fn execute(
        &self,
        input: VerifyTwoFactorInput,
    ) -> Result<SessionOutput, AuthServiceError> {
        // The temp token is attacker-suppliable: every decode failure is the
        // same uniform rejection.
        let plaintext = self
            .cipher
            .decrypt(&input.temp_token)
            .map_err(|_| AuthServiceError::TwoFactorInvalid)?;
        let (player_id, challenge_id) = plaintext
            .split_once(':')
            .ok_or(AuthServiceError::TwoFactorInvalid)?;
        let player_id = player_id
            .parse::<Uuid>()
            .map_err(|_| AuthServiceError::TwoFactorInvalid)?;

        // One-shot: a second redemption of the same temp token finds nothing.
        if !self.cache.take_tfa_challenge(player_id, challenge_id).await? {
            return Err(AuthServiceError::TwoFactorInvalid);
        }

        let player = self
            .players
            .find_login_by_id(player_id)
            .await?
            .ok_or(AuthServiceError::TwoFactorInvalid)?;

        match player.status {
            AccountStatus::Pending => return Err(AuthServiceError::AccountPending),
            AccountStatus::Blocked => return Err(AuthServiceError::AccountBlocked),
            AccountStatus::Active => {}
        }

        let secret_enc = player
            .tfa_secret
            .as_deref()
            .ok_or_else(|| AuthServiceError::Internal(anyhow!("2FA challenge for player without secret")))?;
        let secret = self.cipher.decrypt(secret_enc)?;

        if !bullana_crypto::totp::verify_code(&secret, &input.tfa_code, self.clock.now_secs()) {
            return Err(AuthServiceError::TwoFactorInvalid);
        }

        let head = self.cipher.decrypt(&player.email_head)?;
        let tail = self.cipher.decrypt(&player.email_tail)?;
        issue_player_session(
            player.id,
            format!("{}{}", head, tail),
            player.username,
            &self.token_keys,
            self.clock.now_secs(),
        )
    }
}
