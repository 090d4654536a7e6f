use chrono::Duration;
use rand::Rng as _;
use uuid::Uuid;

use bullana_auth_types::token::TokenKeys;
use bullana_crypto::{DeterministicCipher, split_email, totp};

use crate::domain::repository::{Clock, MailPort, PlayerRepository};
use crate::domain::types::{
    AccountStatus, NewPlayer, VERIFICATION_CODE_LEN, VERIFICATION_CODE_TTL_SECS,
};
use crate::error::AuthServiceError;
use crate::usecase::login::{SessionOutput, issue_player_session};

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..VERIFICATION_CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

fn validate_email(email: &str) -> Result<(), AuthServiceError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthServiceError::InvalidInput);
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AuthServiceError::InvalidInput);
    }
    Ok(())
}

// ── Register ──────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub player_id: Uuid,
    /// True when the account already existed unverified and only the code
    /// was re-issued.
    pub code_resent: bool,
}

pub struct RegisterUseCase<P: PlayerRepository, M: MailPort, K: Clock> {
    pub players: P,
    pub mailer: M,
    pub clock: K,
    pub cipher: DeterministicCipher,
    pub totp_issuer: String,
}

impl<P: PlayerRepository, M: MailPort, K: Clock> RegisterUseCase<P, M, K> {
    pub async fn execute(&self, input: RegisterInput) -> Result<RegisterOutput, AuthServiceError> {
        validate_email(&input.email)?;
        if input.username.trim().is_empty() || input.password.len() < 6 {
            return Err(AuthServiceError::InvalidInput);
        }

        let (head, tail) = split_email(&input.email);
        let email_head = self.cipher.encrypt(&head)?;
        let email_tail = self.cipher.encrypt(&tail)?;

        let code = generate_code();
        let expires_at = self.clock.now() + Duration::seconds(VERIFICATION_CODE_TTL_SECS);

        // A registered-but-unverified duplicate just gets a fresh code; an
        // active or blocked one is a hard conflict.
        if let Some(existing) = self.players.find_registration(&email_head, &email_tail).await? {
            if existing.status != AccountStatus::Pending {
                return Err(AuthServiceError::AlreadyRegistered);
            }
            self.players
                .set_verification_code(existing.id, &code, expires_at)
                .await?;
            self.mailer
                .send_verification_code(&input.email, &existing.username, &code)
                .await?;
            return Ok(RegisterOutput {
                player_id: existing.id,
                code_resent: true,
            });
        }

        if self.players.username_taken(&input.username).await? {
            return Err(AuthServiceError::AlreadyRegistered);
        }

        let password_hash = bullana_crypto::password::hash(&input.password)
            .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("password hash: {e}")))?;

        // Provision a TOTP secret up front; it stays dormant until the
        // player enables 2FA.
        let secret = totp::generate_secret(&self.totp_issuer, &input.email)
            .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("totp provision: {e}")))?;
        let tfa_secret = self.cipher.encrypt(&secret.base32)?;

        let player = NewPlayer {
            id: Uuid::new_v4(),
            username: input.username.trim().to_owned(),
            email_head,
            email_tail,
            password_hash,
            tfa_secret: Some(tfa_secret),
            verification_code: code.clone(),
            verification_expires_at: expires_at,
            created_at: self.clock.now(),
        };
        self.players.create(&player).await?;

        self.mailer
            .send_verification_code(&input.email, &player.username, &code)
            .await?;

        Ok(RegisterOutput {
            player_id: player.id,
            code_resent: false,
        })
    }
}

// ── Verify registration ───────────────────────────────────────────────────────

pub struct VerifyRegistrationInput {
    pub email: String,
    pub code: String,
}

pub struct VerifyRegistrationUseCase<P: PlayerRepository, K: Clock> {
    pub players: P,
    pub clock: K,
    pub cipher: DeterministicCipher,
    pub token_keys: TokenKeys,
}

impl<P: PlayerRepository, K: Clock> VerifyRegistrationUseCase<P, K> {
    /// Activate the account and log the player straight in.
    pub async fn execute(
        &self,
        input: VerifyRegistrationInput,
    ) -> Result<SessionOutput, AuthServiceError> {
        let (head, tail) = split_email(&input.email);
        let email_head = self.cipher.encrypt(&head)?;
        let email_tail = self.cipher.encrypt(&tail)?;

        let registration = self
            .players
            .find_registration(&email_head, &email_tail)
            .await?
            .ok_or(AuthServiceError::PrincipalNotFound)?;

        if registration.status == AccountStatus::Active {
            return Err(AuthServiceError::AlreadyVerified);
        }
        if registration.status == AccountStatus::Blocked {
            return Err(AuthServiceError::AccountBlocked);
        }

        let stored = registration
            .verification_code
            .as_deref()
            .ok_or(AuthServiceError::VerificationInvalid)?;
        if stored != input.code {
            return Err(AuthServiceError::VerificationInvalid);
        }
        let expires_at = registration
            .verification_expires_at
            .ok_or(AuthServiceError::VerificationInvalid)?;
        if self.clock.now() > expires_at {
            return Err(AuthServiceError::VerificationExpired);
        }

        self.players.activate(registration.id).await?;

        issue_player_session(
            registration.id,
            format!("{}{}", head, tail),
            registration.username,
            &self.token_keys,
            self.clock.now_secs(),
        )
    }
}

// ── Resend verification ───────────────────────────────────────────────────────

pub struct ResendVerificationInput {
    pub email: String,
}

pub struct ResendVerificationUseCase<P: PlayerRepository, M: MailPort, K: Clock> {
    pub players: P,
    pub mailer: M,
    pub clock: K,
    pub cipher: DeterministicCipher,
}

impl<P: PlayerRepository, M: MailPort, K: Clock> ResendVerificationUseCase<P, M, K> {
    /// Issue a fresh code; the previous one stops matching.
    pub async fn execute(&self, input: ResendVerificationInput) -> Result<(), AuthServiceError> {
        let (head, tail) = split_email(&input.email);
        let email_head = self.cipher.encrypt(&head)?;
        let email_tail = self.cipher.encrypt(&tail)?;

        let registration = self
            .players
            .find_registration(&email_head, &email_tail)
            .await?
            .ok_or(AuthServiceError::PrincipalNotFound)?;

        if registration.status == AccountStatus::Active {
            return Err(AuthServiceError::AlreadyVerified);
        }
        if registration.status == AccountStatus::Blocked {
            return Err(AuthServiceError::AccountBlocked);
        }

        let code = generate_code();
        let expires_at = self.clock.now() + Duration::seconds(VERIFICATION_CODE_TTL_SECS);
        self.players
            .set_verification_code(registration.id, &code, expires_at)
            .await?;
        self.mailer
            .send_verification_code(&input.email, &registration.username, &code)
            .await
    }
}
