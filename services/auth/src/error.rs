use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
///
/// Token-verification failures (expired, bad signature, malformed) all
/// surface as `CredentialInvalid`; the distinction lives in logs and tests,
/// never in a response a forger could learn from.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("origin not allowed")]
    OriginRejected,
    #[error("authentication credential missing")]
    CredentialMissing,
    #[error("invalid or expired token")]
    CredentialInvalid,
    #[error("wrong principal type for this route")]
    PrincipalTypeMismatch,
    #[error("principal not found")]
    PrincipalNotFound,
    #[error("account is not active")]
    PrincipalInactive,
    #[error("permission denied")]
    PermissionDenied,
    #[error("access to module {0} denied")]
    ModuleDenied(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account pending verification")]
    AccountPending,
    #[error("account blocked")]
    AccountBlocked,
    #[error("invalid two-factor code")]
    TwoFactorInvalid,
    #[error("invalid verification code")]
    VerificationInvalid,
    #[error("verification code expired")]
    VerificationExpired,
    #[error("account already verified")]
    AlreadyVerified,
    #[error("account already registered")]
    AlreadyRegistered,
    #[error("invalid input")]
    InvalidInput,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OriginRejected => "ORIGIN_REJECTED",
            Self::CredentialMissing => "CREDENTIAL_MISSING",
            Self::CredentialInvalid => "CREDENTIAL_INVALID",
            Self::PrincipalTypeMismatch => "PRINCIPAL_TYPE_MISMATCH",
            Self::PrincipalNotFound => "PRINCIPAL_NOT_FOUND",
            Self::PrincipalInactive => "PRINCIPAL_INACTIVE",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ModuleDenied(_) => "MODULE_DENIED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountPending => "ACCOUNT_PENDING",
            Self::AccountBlocked => "ACCOUNT_BLOCKED",
            Self::TwoFactorInvalid => "TWO_FACTOR_INVALID",
            Self::VerificationInvalid => "VERIFICATION_INVALID",
            Self::VerificationExpired => "VERIFICATION_EXPIRED",
            Self::AlreadyVerified => "ALREADY_VERIFIED",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::InvalidInput => "INVALID_INPUT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::OriginRejected
            | Self::CredentialMissing
            | Self::CredentialInvalid
            | Self::PrincipalNotFound
            | Self::InvalidCredentials
            | Self::TwoFactorInvalid => StatusCode::UNAUTHORIZED,
            Self::PrincipalTypeMismatch
            | Self::PrincipalInactive
            | Self::PermissionDenied
            | Self::ModuleDenied(_)
            | Self::AccountPending
            | Self::AccountBlocked => StatusCode::FORBIDDEN,
            Self::VerificationInvalid
            | Self::VerificationExpired
            | Self::AlreadyVerified
            | Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::AlreadyRegistered => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Codec failures on service-side data (email halves, stored TOTP secrets)
// are internal. User-supplied ciphertexts map their errors explicitly.
impl From<bullana_crypto::CodecError> for AuthServiceError {
    fn from(e: bullana_crypto::CodecError) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
