use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Lifecycle state of a player or admin account.
///
/// Stored as an i16 status code. Code 100 is a legacy alias for 0 left over
/// from an older signup flow; both gate identically as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Pending,
    Active,
    Blocked,
}

impl AccountStatus {
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => Self::Active,
            2 => Self::Blocked,
            _ => Self::Pending,
        }
    }

    pub fn code(self) -> i16 {
        match self {
            Self::Pending => 0,
            Self::Active => 1,
            Self::Blocked => 2,
        }
    }
}

/// Player record as seen by middleware and profile reads. Projected: no
/// password hash, no TOTP secret. The email halves are ciphertexts and only
/// decrypt inside the auth service.
#[derive(Debug, Clone)]
pub struct PlayerAccount {
    pub id: Uuid,
    pub username: String,
    pub email_head: String,
    pub email_tail: String,
    pub status: AccountStatus,
    pub tfa_enabled: bool,
    pub favourites: Vec<String>,
    pub liked_games: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Player record for credential checks. Carries the secrets the projected
/// view deliberately omits; only the login and 2FA usecases fetch this.
#[derive(Debug, Clone)]
pub struct PlayerLoginRecord {
    pub id: Uuid,
    pub username: String,
    pub email_head: String,
    pub email_tail: String,
    pub password_hash: String,
    pub status: AccountStatus,
    pub tfa_enabled: bool,
    /// Encrypted base32 TOTP secret, if provisioned.
    pub tfa_secret: Option<String>,
}

/// Signup state for the verification flow.
#[derive(Debug, Clone)]
pub struct RegistrationRecord {
    pub id: Uuid,
    pub username: String,
    pub status: AccountStatus,
    pub verification_code: Option<String>,
    pub verification_expires_at: Option<DateTime<Utc>>,
}

/// A player row to insert at signup.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub id: Uuid,
    pub username: String,
    pub email_head: String,
    pub email_tail: String,
    pub password_hash: String,
    pub tfa_secret: Option<String>,
    pub verification_code: String,
    pub verification_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Admin record as seen by middleware. Projected: no owner key.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Lower value = more privileged; 1 is super-admin.
    pub role: i16,
    pub access_modules: Vec<String>,
    pub status: AccountStatus,
}

/// Admin record for the owner-key check at login.
#[derive(Debug, Clone)]
pub struct AdminLoginRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub owner_key: String,
    pub role: i16,
    pub access_modules: Vec<String>,
    pub status: AccountStatus,
}

/// Either kind of authenticated caller, for routes that accept both or none.
#[derive(Debug, Clone)]
pub enum Principal {
    Player(PlayerAccount),
    Admin(AdminAccount),
}

impl Principal {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Player(p) => p.id,
            Self::Admin(a) => a.id,
        }
    }
}

/// Registration verification code length in digits.
pub const VERIFICATION_CODE_LEN: usize = 4;

/// Registration verification code time-to-live in seconds.
pub const VERIFICATION_CODE_TTL_SECS: i64 = 600;

/// 2FA step-up challenge time-to-live in seconds.
pub const TFA_CHALLENGE_TTL_SECS: u64 = 600;

/// Role value that bypasses the module gate entirely.
pub const SUPER_ADMIN_ROLE: i16 = 1;
