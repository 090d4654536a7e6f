//! Request authentication pipeline and the admin authorization gate.
//!
//! Every authenticated route runs the same stage order, terminal on first
//! failure: origin check, bearer extraction, token verification (including
//! the revocation lookup), principal-type check, live principal lookup
//! (projected, no secrets), status check. The generic functions take the
//! ports by reference so tests drive them with mocks; the axum extractors
//! bind them to [`AppState`].

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};

use bullana_auth_types::{Claims, OriginPolicy, TokenKeys, extract_bearer, verify_token};

use crate::domain::repository::{AdminRepository, AuthCache, Clock, PlayerRepository};
use crate::domain::types::{AccountStatus, AdminAccount, PlayerAccount, Principal, SUPER_ADMIN_ROLE};
use crate::error::AuthServiceError;
use crate::state::AppState;

/// Shared front half of the pipeline: everything up to and including claims
/// verification. Type-specific stages continue in the callers.
async fn verified_claims<C: AuthCache, K: Clock>(
    headers: &HeaderMap,
    policy: &OriginPolicy,
    keys: &TokenKeys,
    cache: &C,
    clock: &K,
) -> Result<Claims, AuthServiceError> {
    if !policy.allows_request(headers) {
        return Err(AuthServiceError::OriginRejected);
    }
    let token = extract_bearer(headers).ok_or(AuthServiceError::CredentialMissing)?;
    let claims = verify_token(&token, keys, clock.now_secs())
        .map_err(|_| AuthServiceError::CredentialInvalid)?;
    // A revoked jti is indistinguishable from an expired token on the wire.
    if cache.is_revoked(claims.jti()).await? {
        return Err(AuthServiceError::CredentialInvalid);
    }
    Ok(claims)
}

pub async fn authenticate_player<P, C, K>(
    headers: &HeaderMap,
    policy: &OriginPolicy,
    keys: &TokenKeys,
    players: &P,
    cache: &C,
    clock: &K,
) -> Result<PlayerAccount, AuthServiceError>
where
    P: PlayerRepository,
    C: AuthCache,
    K: Clock,
{
    let claims = verified_claims(headers, policy, keys, cache, clock).await?;
    let Claims::User(_) = &claims else {
        return Err(AuthServiceError::PrincipalTypeMismatch);
    };
    let id = claims
        .principal_id()
        .map_err(|_| AuthServiceError::CredentialInvalid)?;
    // Live lookup: the account state at request time wins over the claims.
    let player = players
        .find_by_id(id)
        .await?
        .ok_or(AuthServiceError::PrincipalNotFound)?;
    if player.status != AccountStatus::Active {
        return Err(AuthServiceError::PrincipalInactive);
    }
    Ok(player)
}

pub async fn authenticate_admin<A, C, K>(
    headers: &HeaderMap,
    policy: &OriginPolicy,
    keys: &TokenKeys,
    admins: &A,
    cache: &C,
    clock: &K,
) -> Result<AdminAccount, AuthServiceError>
where
    A: AdminRepository,
    C: AuthCache,
    K: Clock,
{
    let claims = verified_claims(headers, policy, keys, cache, clock).await?;
    let Claims::Admin(_) = &claims else {
        return Err(AuthServiceError::PrincipalTypeMismatch);
    };
    let id = claims
        .principal_id()
        .map_err(|_| AuthServiceError::CredentialInvalid)?;
    let admin = admins
        .find_by_id(id)
        .await?
        .ok_or(AuthServiceError::PrincipalNotFound)?;
    if admin.status != AccountStatus::Active {
        return Err(AuthServiceError::PrincipalInactive);
    }
    Ok(admin)
}

/// Best-effort authentication for routes that merely personalise output.
/// Every failure, including infrastructure errors, degrades to `None`.
pub async fn authenticate_optional<P, A, C, K>(
    headers: &HeaderMap,
    policy: &OriginPolicy,
    keys: &TokenKeys,
    players: &P,
    admins: &A,
    cache: &C,
    clock: &K,
) -> Option<Principal>
where
    P: PlayerRepository,
    A: AdminRepository,
    C: AuthCache,
    K: Clock,
{
    let claims = verified_claims(headers, policy, keys, cache, clock)
        .await
        .ok()?;
    let id = claims.principal_id().ok()?;
    let principal = match claims {
        Claims::User(_) => Principal::Player(players.find_by_id(id).await.ok()??),
        Claims::Admin(_) => Principal::Admin(admins.find_by_id(id).await.ok()??),
    };
    let status = match &principal {
        Principal::Player(p) => p.status,
        Principal::Admin(a) => a.status,
    };
    (status == AccountStatus::Active).then_some(principal)
}

// ── Extractors ────────────────────────────────────────────────────────────────

/// An authenticated, active player.
#[derive(Debug, Clone)]
pub struct AuthenticatedPlayer {
    pub player_id: uuid::Uuid,
    pub player: PlayerAccount,
}

impl FromRequestParts<AppState> for AuthenticatedPlayer {
    type Rejection = AuthServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let player = authenticate_player(
            &parts.headers,
            &state.origin_policy,
            &state.token_keys,
            &state.player_repo(),
            &state.auth_cache(),
            &state.clock,
        )
        .await?;
        Ok(Self {
            player_id: player.id,
            player,
        })
    }
}

/// An authenticated, active admin. Carries both `admin_id` and the generic
/// `principal_id` (equal by construction); downstream consumers historically
/// read either name.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub admin_id: uuid::Uuid,
    pub principal_id: uuid::Uuid,
    pub admin: AdminAccount,
}

impl AuthenticatedAdmin {
    pub fn new(admin: AdminAccount) -> Self {
        Self {
            admin_id: admin.id,
            principal_id: admin.id,
            admin,
        }
    }

    /// Pass iff the admin's role is at most `max_role` (lower = more
    /// privileged).
    pub fn require_role(&self, max_role: i16) -> Result<(), AuthServiceError> {
        if self.admin.role <= max_role {
            Ok(())
        } else {
            Err(AuthServiceError::PermissionDenied)
        }
    }

    /// Pass iff the admin may act on `module`. Super-admins bypass the
    /// membership check.
    pub fn require_module(&self, module: &str) -> Result<(), AuthServiceError> {
        if self.admin.role == SUPER_ADMIN_ROLE {
            return Ok(());
        }
        if self.admin.access_modules.iter().any(|m| m == module) {
            Ok(())
        } else {
            Err(AuthServiceError::ModuleDenied(module.to_owned()))
        }
    }
}

impl FromRequestParts<AppState> for AuthenticatedAdmin {
    type Rejection = AuthServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = authenticate_admin(
            &parts.headers,
            &state.origin_policy,
            &state.token_keys,
            &state.admin_repo(),
            &state.auth_cache(),
            &state.clock,
        )
        .await?;
        Ok(Self::new(admin))
    }
}

/// Optional authentication; never rejects.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<Principal>);

impl FromRequestParts<AppState> for MaybePrincipal {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = authenticate_optional(
            &parts.headers,
            &state.origin_policy,
            &state.token_keys,
            &state.player_repo(),
            &state.admin_repo(),
            &state.auth_cache(),
            &state.clock,
        )
        .await;
        Ok(Self(principal))
    }
}
