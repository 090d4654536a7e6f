#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{
    AdminAccount, AdminLoginRecord, NewPlayer, PlayerAccount, PlayerLoginRecord,
    RegistrationRecord,
};
use crate::error::AuthServiceError;

/// Store of player accounts. Lookups by email take the two encrypted halves;
/// the deterministic codec makes them exact-match keys.
pub trait PlayerRepository: Send + Sync {
    /// Full credential record for the password check at login.
    async fn find_login(
        &self,
        email_head: &str,
        email_tail: &str,
    ) -> Result<Option<PlayerLoginRecord>, AuthServiceError>;

    /// Same record by id, for the 2FA step-up second leg.
    async fn find_login_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<PlayerLoginRecord>, AuthServiceError>;

    /// Projected record (no secrets) for middleware and profile reads.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PlayerAccount>, AuthServiceError>;

    async fn username_taken(&self, username: &str) -> Result<bool, AuthServiceError>;

    /// Signup state by encrypted email halves.
    async fn find_registration(
        &self,
        email_head: &str,
        email_tail: &str,
    ) -> Result<Option<RegistrationRecord>, AuthServiceError>;

    async fn create(&self, player: &NewPlayer) -> Result<(), AuthServiceError>;

    /// Replace the pending verification code; the old one stops matching.
    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError>;

    /// Flip the account active and clear the verification code.
    async fn activate(&self, id: Uuid) -> Result<(), AuthServiceError>;
}

/// Store of admin accounts. Admin emails are plaintext.
pub trait AdminRepository: Send + Sync {
    async fn find_login(&self, email: &str)
    -> Result<Option<AdminLoginRecord>, AuthServiceError>;

    /// Projected record (no owner key) for middleware lookups.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>, AuthServiceError>;
}

/// Short-lived auth state (Redis): one-shot 2FA challenges and token
/// revocation markers. Deployments without the revocation store lose only
/// logout-before-expiry; everything else stays stateless.
pub trait AuthCache: Send + Sync {
    /// Store a step-up challenge for [`TFA_CHALLENGE_TTL_SECS`].
    ///
    /// [`TFA_CHALLENGE_TTL_SECS`]: crate::domain::types::TFA_CHALLENGE_TTL_SECS
    async fn set_tfa_challenge(
        &self,
        player_id: Uuid,
        challenge_id: &str,
    ) -> Result<(), AuthServiceError>;

    /// Atomically consume a challenge. `false` means absent, expired, or
    /// already redeemed; a replayed temp token lands here.
    async fn take_tfa_challenge(
        &self,
        player_id: Uuid,
        challenge_id: &str,
    ) -> Result<bool, AuthServiceError>;

    /// Mark a token id revoked for the remainder of its lifetime.
    async fn revoke_token(&self, jti: &str, ttl_secs: u64) -> Result<(), AuthServiceError>;

    async fn is_revoked(&self, jti: &str) -> Result<bool, AuthServiceError>;
}

/// Outbound mail. The default implementation only traces; rendering and
/// delivery belong to the mail service.
pub trait MailPort: Send + Sync {
    async fn send_verification_code(
        &self,
        email: &str,
        username: &str,
        code: &str,
    ) -> Result<(), AuthServiceError>;
}

/// Injectable time source so expiry checks are testable at a pinned instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn now_secs(&self) -> u64 {
        self.now().timestamp().max(0) as u64
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
