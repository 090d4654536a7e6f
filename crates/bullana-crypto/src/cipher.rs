use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chacha20poly1305::aead::Aead;
use chacha20poly1305::{ChaCha20Poly1305, Key, KeyInit, Nonce};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors returned by [`DeterministicCipher`].
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("ciphertext is not valid base64")]
    Encoding,
    #[error("ciphertext is truncated")]
    Truncated,
    #[error("decryption failed")]
    Decrypt,
    #[error("encryption failed")]
    Encrypt,
    #[error("decrypted value is not valid UTF-8")]
    Utf8,
}

const NONCE_LEN: usize = 12;

/// Deterministic reversible encryption over short strings.
///
/// The nonce is synthesized from SHA-256(key ‖ plaintext), so equal plaintexts
/// under the same key always produce identical ciphertexts. That property is
/// required: encrypted email halves are stored as-is and looked up by exact
/// match, so the codec must be a pure function of (key, plaintext).
///
/// Output layout: base64url(nonce ‖ aead ciphertext), unpadded — safe to embed
/// in URLs and JSON without further escaping.
#[derive(Clone)]
pub struct DeterministicCipher {
    key: [u8; 32],
}

impl DeterministicCipher {
    /// Derive the 256-bit cipher key from a configured secret string.
    pub fn new(secret: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        Self {
            key: hasher.finalize().into(),
        }
    }

    fn synthetic_nonce(&self, plaintext: &[u8]) -> [u8; NONCE_LEN] {
        let mut hasher = Sha256::new();
        hasher.update(self.key);
        hasher.update(plaintext);
        let digest = hasher.finalize();
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&digest[..NONCE_LEN]);
        nonce
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CodecError> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.key));
        let nonce = self.synthetic_nonce(plaintext.as_bytes());
        let ct = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| CodecError::Encrypt)?;
        let mut out = Vec::with_capacity(NONCE_LEN + ct.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ct);
        Ok(URL_SAFE_NO_PAD.encode(out))
    }

    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CodecError> {
        let raw = URL_SAFE_NO_PAD
            .decode(ciphertext)
            .map_err(|_| CodecError::Encoding)?;
        if raw.len() <= NONCE_LEN {
            return Err(CodecError::Truncated);
        }
        let (nonce, ct) = raw.split_at(NONCE_LEN);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.key));
        let plain = cipher
            .decrypt(Nonce::from_slice(nonce), ct)
            .map_err(|_| CodecError::Decrypt)?;
        String::from_utf8(plain).map_err(|_| CodecError::Utf8)
    }
}

/// Split an email address into the two halves stored as independently
/// encrypted fields: the local part and the `@`-prefixed domain part.
/// Both halves are required for a match, so neither field alone decrypts to
/// the full address. The address is lowercased first — lookups and storage
/// must agree on case.
pub fn split_email(email: &str) -> (String, String) {
    let email = email.to_lowercase();
    match email.find('@') {
        Some(at) => (email[..at].to_owned(), email[at..].to_owned()),
        None => (email, String::new()),
    }
}
