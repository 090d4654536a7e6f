use thiserror::Error;
use totp_rs::{Algorithm, Secret, TOTP};

/// TOTP parameters match what authenticator apps expect: SHA-1, 6 digits,
/// 30-second step. Skew 1 accepts the previous and next step alongside the
/// current one.
const DIGITS: usize = 6;
const SKEW: u8 = 1;
const STEP: u64 = 30;

#[derive(Debug, Error)]
pub enum TotpError {
    #[error("invalid totp parameters")]
    Invalid,
}

/// A freshly generated two-factor secret, ready for provisioning.
#[derive(Debug, Clone)]
pub struct GeneratedSecret {
    /// Base32-encoded secret, the form stored (encrypted) per account.
    pub base32: String,
    /// otpauth:// URL for QR provisioning.
    pub otpauth_url: String,
}

/// Generate a new TOTP secret labelled for the given issuer and account.
pub fn generate_secret(issuer: &str, account: &str) -> Result<GeneratedSecret, TotpError> {
    let secret = Secret::generate_secret();
    let bytes = secret.to_bytes().map_err(|_| TotpError::Invalid)?;
    let totp = TOTP::new(
        Algorithm::SHA1,
        DIGITS,
        SKEW,
        STEP,
        bytes,
        Some(issuer.to_owned()),
        account.to_owned(),
    )
    .map_err(|_| TotpError::Invalid)?;
    Ok(GeneratedSecret {
        base32: secret.to_encoded().to_string(),
        otpauth_url: totp.get_url(),
    })
}

/// Check a submitted 6-digit code against a base32 secret at `now_secs`
/// (seconds since the UNIX epoch). Unparseable secrets or codes yield `false`
/// rather than an error — callers treat any failure as a bad code.
pub fn verify_code(base32: &str, code: &str, now_secs: u64) -> bool {
    let Ok(bytes) = Secret::Encoded(base32.to_owned()).to_bytes() else {
        return false;
    };
    let Ok(totp) = TOTP::new(
        Algorithm::SHA1,
        DIGITS,
        SKEW,
        STEP,
        bytes,
        None,
        String::new(),
    ) else {
        return false;
    };
    totp.check(code, now_secs)
}

/// Compute the current code for a secret. Exposed for tests and provisioning
/// previews only — production verification goes through [`verify_code`].
pub fn current_code(base32: &str, now_secs: u64) -> Option<String> {
    let bytes = Secret::Encoded(base32.to_owned()).to_bytes().ok()?;
    let totp = TOTP::new(
        Algorithm::SHA1,
        DIGITS,
        SKEW,
        STEP,
        bytes,
        None,
        String::new(),
    )
    .ok()?;
    Some(totp.generate(now_secs))
}
