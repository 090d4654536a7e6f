//! Token claims, bearer extraction, and origin policy shared by every
//! Bullana service that consumes authentication.
//!
//! Token *verification* is available to all consumers; token *signing* is
//! gated behind the `USE_ONLY_IN_AUTH_SERVICE` cargo feature because the auth
//! service is the sole issuer.

pub mod bearer;
pub mod origin;
pub mod token;

pub use bearer::extract_bearer;
pub use origin::OriginPolicy;
pub use token::{
    ADMIN_TOKEN_TTL_SECS, AdminClaims, Claims, PLAYER_TOKEN_TTL_SECS, PlayerClaims, PrincipalKind,
    TokenError, TokenKeys, verify_token,
};
