use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use bullana_auth::domain::repository::{
    AdminRepository, AuthCache, Clock, MailPort, PlayerRepository,
};
use bullana_auth::domain::types::{
    AccountStatus, AdminAccount, AdminLoginRecord, NewPlayer, PlayerAccount, PlayerLoginRecord,
    RegistrationRecord,
};
use bullana_auth::error::AuthServiceError;
use bullana_auth_types::{OriginPolicy, TokenKeys};
use bullana_crypto::{DeterministicCipher, split_email};

/// Pinned instant for every clock-sensitive test.
pub const NOW: u64 = 1_750_000_000;

pub const PLAYER_SECRET: &str = "player-domain-test-secret";
pub const ADMIN_SECRET: &str = "admin-domain-test-secret";
pub const EMAIL_SECRET: &str = "email-codec-test-secret";

pub fn keys() -> TokenKeys {
    TokenKeys {
        player: PLAYER_SECRET.to_owned(),
        admin: ADMIN_SECRET.to_owned(),
    }
}

pub fn cipher() -> DeterministicCipher {
    DeterministicCipher::new(EMAIL_SECRET)
}

pub fn policy() -> OriginPolicy {
    OriginPolicy::new(vec!["https://play.example.com".to_owned()])
}

// ── FixedClock ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.0 as i64, 0).unwrap()
    }
}

// ── MockPlayerRepo ───────────────────────────────────────────────────────────

/// Full backing row; trait methods project out of it the way the database
/// repository projects out of the entity.
#[derive(Clone)]
pub struct PlayerRow {
    pub id: Uuid,
    pub username: String,
    pub email_head: String,
    pub email_tail: String,
    pub password_hash: String,
    pub status: AccountStatus,
    pub tfa_enabled: bool,
    pub tfa_secret: Option<String>,
    pub verification_code: Option<String>,
    pub verification_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct MockPlayerRepo {
    pub rows: Arc<Mutex<Vec<PlayerRow>>>,
}

impl MockPlayerRepo {
    pub fn new(rows: Vec<PlayerRow>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row(&self, id: Uuid) -> Option<PlayerRow> {
        self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }
}

fn login_record(row: &PlayerRow) -> PlayerLoginRecord {
    PlayerLoginRecord {
        id: row.id,
        username: row.username.clone(),
        email_head: row.email_head.clone(),
        email_tail: row.email_tail.clone(),
        password_hash: row.password_hash.clone(),
        status: row.status,
        tfa_enabled: row.tfa_enabled,
        tfa_secret: row.tfa_secret.clone(),
    }
}

impl PlayerRepository for MockPlayerRepo {
    async fn find_login(
        &self,
        email_head: &str,
        email_tail: &str,
    ) -> Result<Option<PlayerLoginRecord>, AuthServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.email_head == email_head && r.email_tail == email_tail)
            .map(login_record))
    }

    async fn find_login_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<PlayerLoginRecord>, AuthServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(login_record))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PlayerAccount>, AuthServiceError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).map(|r| {
            PlayerAccount {
                id: r.id,
                username: r.username.clone(),
                email_head: r.email_head.clone(),
                email_tail: r.email_tail.clone(),
                status: r.status,
                tfa_enabled: r.tfa_enabled,
                favourites: vec![],
                liked_games: vec![],
                created_at: r.created_at,
            }
        }))
    }

    async fn username_taken(&self, username: &str) -> Result<bool, AuthServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.username == username))
    }

    async fn find_registration(
        &self,
        email_head: &str,
        email_tail: &str,
    ) -> Result<Option<RegistrationRecord>, AuthServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.email_head == email_head && r.email_tail == email_tail)
            .map(|r| RegistrationRecord {
                id: r.id,
                username: r.username.clone(),
                status: r.status,
                verification_code: r.verification_code.clone(),
                verification_expires_at: r.verification_expires_at,
            }))
    }

    async fn create(&self, player: &NewPlayer) -> Result<(), AuthServiceError> {
        let mut rows = self.rows.lock().unwrap();
        // Same constraints the players table enforces: jointly unique email
        // halves, unique username.
        if rows.iter().any(|r| {
            (r.email_head == player.email_head && r.email_tail == player.email_tail)
                || r.username == player.username
        }) {
            return Err(AuthServiceError::AlreadyRegistered);
        }
        rows.push(PlayerRow {
            id: player.id,
            username: player.username.clone(),
            email_head: player.email_head.clone(),
            email_tail: player.email_tail.clone(),
            password_hash: player.password_hash.clone(),
            status: AccountStatus::Pending,
            tfa_enabled: false,
            tfa_secret: player.tfa_secret.clone(),
            verification_code: Some(player.verification_code.clone()),
            verification_expires_at: Some(player.verification_expires_at),
            created_at: player.created_at,
        });
        Ok(())
    }

    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(r) = rows.iter_mut().find(|r| r.id == id) {
            r.verification_code = Some(code.to_owned());
            r.verification_expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn activate(&self, id: Uuid) -> Result<(), AuthServiceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(r) = rows.iter_mut().find(|r| r.id == id) {
            r.status = AccountStatus::Active;
            r.verification_code = None;
            r.verification_expires_at = None;
        }
        Ok(())
    }
}

/// Wraps a [`MockPlayerRepo`] so duplicate checks report clear while the
/// store still enforces uniqueness. Models the window where a second signup's
/// checks run before the first signup's insert lands.
#[derive(Clone)]
pub struct RacingPlayerRepo(pub MockPlayerRepo);

impl PlayerRepository for RacingPlayerRepo {
    async fn find_login(
        &self,
        email_head: &str,
        email_tail: &str,
    ) -> Result<Option<PlayerLoginRecord>, AuthServiceError> {
        self.0.find_login(email_head, email_tail).await
    }

    async fn find_login_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<PlayerLoginRecord>, AuthServiceError> {
        self.0.find_login_by_id(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PlayerAccount>, AuthServiceError> {
        self.0.find_by_id(id).await
    }

    async fn username_taken(&self, _username: &str) -> Result<bool, AuthServiceError> {
        Ok(false)
    }

    async fn find_registration(
        &self,
        _email_head: &str,
        _email_tail: &str,
    ) -> Result<Option<RegistrationRecord>, AuthServiceError> {
        Ok(None)
    }

    async fn create(&self, player: &NewPlayer) -> Result<(), AuthServiceError> {
        self.0.create(player).await
    }

    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        self.0.set_verification_code(id, code, expires_at).await
    }

    async fn activate(&self, id: Uuid) -> Result<(), AuthServiceError> {
        self.0.activate(id).await
    }
}

// ── MockAdminRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAdminRepo {
    pub admins: Arc<Mutex<Vec<AdminLoginRecord>>>,
}

impl MockAdminRepo {
    pub fn new(admins: Vec<AdminLoginRecord>) -> Self {
        Self {
            admins: Arc::new(Mutex::new(admins)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl AdminRepository for MockAdminRepo {
    async fn find_login(
        &self,
        email: &str,
    ) -> Result<Option<AdminLoginRecord>, AuthServiceError> {
        Ok(self
            .admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>, AuthServiceError> {
        Ok(self.admins.lock().unwrap().iter().find(|a| a.id == id).map(|a| {
            AdminAccount {
                id: a.id,
                username: a.username.clone(),
                email: a.email.clone(),
                role: a.role,
                access_modules: a.access_modules.clone(),
                status: a.status,
            }
        }))
    }
}

// ── MockAuthCache ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAuthCache {
    pub challenges: Arc<Mutex<HashSet<String>>>,
    pub revoked: Arc<Mutex<HashSet<String>>>,
}

impl MockAuthCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthCache for MockAuthCache {
    async fn set_tfa_challenge(
        &self,
        player_id: Uuid,
        challenge_id: &str,
    ) -> Result<(), AuthServiceError> {
        self.challenges
            .lock()
            .unwrap()
            .insert(format!("{player_id}:{challenge_id}"));
        Ok(())
    }

    async fn take_tfa_challenge(
        &self,
        player_id: Uuid,
        challenge_id: &str,
    ) -> Result<bool, AuthServiceError> {
        Ok(self
            .challenges
            .lock()
            .unwrap()
            .remove(&format!("{player_id}:{challenge_id}")))
    }

    async fn revoke_token(&self, jti: &str, ttl_secs: u64) -> Result<(), AuthServiceError> {
        if ttl_secs > 0 {
            self.revoked.lock().unwrap().insert(jti.to_owned());
        }
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, AuthServiceError> {
        Ok(self.revoked.lock().unwrap().contains(jti))
    }
}

/// Cache whose reads fail, for exercising infrastructure-error paths.
#[derive(Clone, Copy, Default)]
pub struct FailingCache;

impl AuthCache for FailingCache {
    async fn set_tfa_challenge(&self, _: Uuid, _: &str) -> Result<(), AuthServiceError> {
        Err(AuthServiceError::Internal(anyhow::anyhow!("redis down")))
    }

    async fn take_tfa_challenge(&self, _: Uuid, _: &str) -> Result<bool, AuthServiceError> {
        Err(AuthServiceError::Internal(anyhow::anyhow!("redis down")))
    }

    async fn revoke_token(&self, _: &str, _: u64) -> Result<(), AuthServiceError> {
        Err(AuthServiceError::Internal(anyhow::anyhow!("redis down")))
    }

    async fn is_revoked(&self, _: &str) -> Result<bool, AuthServiceError> {
        Err(AuthServiceError::Internal(anyhow::anyhow!("redis down")))
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_code(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, _, code)| code.clone())
    }
}

impl MailPort for MockMailer {
    async fn send_verification_code(
        &self,
        email: &str,
        username: &str,
        code: &str,
    ) -> Result<(), AuthServiceError> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_owned(), username.to_owned(), code.to_owned()));
        Ok(())
    }
}

// ── Fixture builders ─────────────────────────────────────────────────────────

pub const TEST_PASSWORD: &str = "correct horse battery";

/// Build a player row with real Argon2 and codec material so the flows run
/// end to end. Returns the row plus the provisioned base32 TOTP secret.
pub fn player_row(email: &str, username: &str, status: AccountStatus, tfa: bool) -> (PlayerRow, String) {
    let cipher = cipher();
    let (head, tail) = split_email(email);
    let secret = bullana_crypto::totp::generate_secret("BullanaTest", email).unwrap();
    let row = PlayerRow {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        email_head: cipher.encrypt(&head).unwrap(),
        email_tail: cipher.encrypt(&tail).unwrap(),
        password_hash: bullana_crypto::password::hash(TEST_PASSWORD).unwrap(),
        status,
        tfa_enabled: tfa,
        tfa_secret: Some(cipher.encrypt(&secret.base32).unwrap()),
        verification_code: None,
        verification_expires_at: None,
        created_at: Utc.timestamp_opt(NOW as i64, 0).unwrap(),
    };
    (row, secret.base32)
}

pub const TEST_OWNER_KEY: &str = "owner-key-123456";

pub fn admin_row(email: &str, role: i16, modules: &[&str]) -> AdminLoginRecord {
    AdminLoginRecord {
        id: Uuid::new_v4(),
        username: "ops".to_owned(),
        email: email.to_owned(),
        owner_key: bullana_crypto::password::hash(TEST_OWNER_KEY).unwrap(),
        role,
        access_modules: modules.iter().map(|m| m.to_string()).collect(),
        status: AccountStatus::Active,
    }
}

// ── Header builders ──────────────────────────────────────────────────────────

pub fn bearer_headers(token: &str) -> axum::http::HeaderMap {
    let mut headers = axum::http::HeaderMap::new();
    headers.insert(
        axum::http::header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    headers
}

pub fn headers_with_origin(token: &str, origin: &str) -> axum::http::HeaderMap {
    let mut headers = bearer_headers(token);
    headers.insert(axum::http::header::ORIGIN, origin.parse().unwrap());
    headers
}
