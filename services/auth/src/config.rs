use serde::Deserialize;

use bullana_auth_types::{OriginPolicy, TokenKeys};
use bullana_core::config::EnvConfig;

fn default_auth_port() -> u16 {
    3113
}

fn default_totp_issuer() -> String {
    "Bullana".to_owned()
}

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL.
    pub redis_url: String,
    /// HMAC secret for player-domain tokens.
    pub player_token_secret: String,
    /// HMAC secret for admin-domain tokens. May equal the player secret for
    /// legacy single-secret deployments.
    pub admin_token_secret: String,
    /// Secret behind the deterministic credential codec (email halves, temp
    /// tokens, stored TOTP secrets).
    pub email_secret: String,
    /// Comma-separated origin allow-list. Empty means no origin passes the
    /// guard except requests that carry no Origin header at all.
    #[serde(default)]
    pub allowed_origins: String,
    /// TCP port to listen on. Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    /// Issuer label in provisioned otpauth URLs. Env var: `TOTP_ISSUER`.
    #[serde(default = "default_totp_issuer")]
    pub totp_issuer: String,
}

impl EnvConfig for AuthConfig {}

impl AuthConfig {
    pub fn origin_policy(&self) -> OriginPolicy {
        let allowed = self
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        OriginPolicy::new(allowed)
    }

    pub fn token_keys(&self) -> TokenKeys {
        TokenKeys {
            player: self.player_token_secret.clone(),
            admin: self.admin_token_secret.clone(),
        }
    }
}
