//! JWT issuance and validation for the two principal domains.

use jsonwebtoken::{DecodingKey, Validation, decode};
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// Player token lifetime in seconds (24 hours).
pub const PLAYER_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Admin token lifetime in seconds (12 hours).
pub const ADMIN_TOKEN_TTL_SECS: u64 = 12 * 60 * 60;

/// Errors returned by [`verify_token`].
///
/// Middleware collapses every variant into one uniform "invalid token"
/// rejection — the split exists for logs and tests, not for clients.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("claims tag does not match signing domain")]
    DomainMismatch,
    #[error("token signing failed")]
    Sign,
}

/// Which trust domain a set of claims belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalKind {
    User,
    Admin,
}

/// Per-domain HMAC signing secrets.
///
/// Player and admin tokens are signed with independent keys so that one
/// domain's key leaking cannot forge the other's tokens. The `type` tag inside
/// the claims is kept as a secondary check on top of the key split. Both keys
/// may be configured equal for legacy single-secret deployments; the secondary
/// check is skipped in that case because the domain cannot be inferred from
/// the signature.
#[derive(Debug, Clone)]
pub struct TokenKeys {
    pub player: String,
    pub admin: String,
}

/// Claims carried by a player session token.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct PlayerClaims {
    /// Player ID (UUID string).
    pub sub: String,
    pub email: String,
    pub username: String,
    /// Token ID, the unit of revocation.
    pub jti: String,
    /// Issued-at (seconds since epoch).
    pub iat: u64,
    /// Expiry (seconds since epoch), `iat` + 24h.
    pub exp: u64,
}

/// Claims carried by an admin session token. Richer than player claims: the
/// admin panel renders menus from `role` and `access_modules` without a
/// second lookup. Authorization decisions still re-read the live record.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct AdminClaims {
    pub sub: String,
    pub email: String,
    pub username: String,
    /// Lower value = more privileged; 1 is super-admin.
    pub role: i16,
    pub access_modules: Vec<String>,
    pub jti: String,
    pub iat: u64,
    /// Expiry (seconds since epoch), `iat` + 12h.
    pub exp: u64,
}

/// Decoded token payload, tagged by principal domain.
///
/// The `type` tag is part of the wire format: `"user"` or `"admin"`. Adding a
/// third principal kind is a compile-time-checked change at every match site.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
#[serde(tag = "type")]
pub enum Claims {
    #[serde(rename = "user")]
    User(PlayerClaims),
    #[serde(rename = "admin")]
    Admin(AdminClaims),
}

impl Claims {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Claims::User(_) => PrincipalKind::User,
            Claims::Admin(_) => PrincipalKind::Admin,
        }
    }

    pub fn exp(&self) -> u64 {
        match self {
            Claims::User(c) => c.exp,
            Claims::Admin(c) => c.exp,
        }
    }

    pub fn jti(&self) -> &str {
        match self {
            Claims::User(c) => &c.jti,
            Claims::Admin(c) => &c.jti,
        }
    }

    /// Parse the `sub` claim as the principal's UUID.
    pub fn principal_id(&self) -> Result<Uuid, TokenError> {
        let sub = match self {
            Claims::User(c) => &c.sub,
            Claims::Admin(c) => &c.sub,
        };
        sub.parse::<Uuid>().map_err(|_| TokenError::Malformed)
    }
}

#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
impl PlayerClaims {
    pub fn new(id: Uuid, email: String, username: String, now: u64) -> Self {
        Self {
            sub: id.to_string(),
            email,
            username,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + PLAYER_TOKEN_TTL_SECS,
        }
    }
}

#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
impl AdminClaims {
    pub fn new(
        id: Uuid,
        email: String,
        username: String,
        role: i16,
        access_modules: Vec<String>,
        now: u64,
    ) -> Self {
        Self {
            sub: id.to_string(),
            email,
            username,
            role,
            access_modules,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ADMIN_TOKEN_TTL_SECS,
        }
    }
}

// ── Core decode (private) ────────────────────────────────────────────────

/// Decode a JWT and validate its signature against one domain key.
///
/// Expiry is deliberately NOT validated here: callers check `exp` against
/// their own clock so tests can pin time. `exp` and `sub` must still be
/// present in the payload.
fn decode_with(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(data.claims)
}

// ── Public: all consumers ────────────────────────────────────────────────

/// Validate a bearer token and return its claims.
///
/// Tries the player-domain key first, then the admin-domain key; when the
/// keys differ, the claims tag must agree with whichever key validated the
/// signature. Expiry is checked against the supplied `now` (seconds since
/// epoch) — a token is dead once `now` reaches its `exp`.
pub fn verify_token(token: &str, keys: &TokenKeys, now: u64) -> Result<Claims, TokenError> {
    let (claims, signed_with) = match decode_with(token, &keys.player) {
        Ok(claims) => (claims, PrincipalKind::User),
        Err(TokenError::InvalidSignature) => {
            (decode_with(token, &keys.admin)?, PrincipalKind::Admin)
        }
        Err(e) => return Err(e),
    };

    if keys.player != keys.admin && claims.kind() != signed_with {
        return Err(TokenError::DomainMismatch);
    }

    if now >= claims.exp() {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

// ── Feature-gated: auth service only ─────────────────────────────────────

/// Sign claims with the key of their own domain.
///
/// Requires the `USE_ONLY_IN_AUTH_SERVICE` feature — the auth service is the
/// sole token issuer.
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
pub fn sign(claims: &Claims, keys: &TokenKeys) -> Result<String, TokenError> {
    let secret = match claims.kind() {
        PrincipalKind::User => &keys.player,
        PrincipalKind::Admin => &keys.admin,
    };
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| TokenError::Sign)
}
