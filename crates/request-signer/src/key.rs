//! HMAC key material.
//!
//! Key bytes live in a `SecretBox` so they never show up in `Debug` output and
//! are zeroed when the key is dropped.

use crate::error::SignerError;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use configuration::{KeyEncoding, SigningSettings};
use secrecy::{ExposeSecret, SecretBox};
use sha2::{Digest, Sha256};

// Standard alphabet, padding optional. Surplus trailing `=` are trimmed before decoding.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The key requests are signed with.
pub struct SigningKey {
    bytes: SecretBox<[u8]>,
}

impl SigningKey {
    /// Uses raw bytes as the key.
    ///
    /// # Errors
    /// Returns `SignerError::EmptyKey` if `bytes` is empty.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SignerError> {
        if bytes.is_empty() {
            return Err(SignerError::EmptyKey);
        }

        Ok(Self {
            bytes: SecretBox::new(bytes.into_boxed_slice()),
        })
    }

    /// Uses the UTF-8 bytes of `text` as the key, the way the web client keys its HMAC.
    pub fn from_text(text: &str) -> Result<Self, SignerError> {
        Self::from_bytes(text.as_bytes().to_vec())
    }

    /// Decodes `text` as standard base64 and uses the result as the key.
    ///
    /// Missing or surplus trailing padding is tolerated.
    pub fn from_base64(text: &str) -> Result<Self, SignerError> {
        let decoded = LENIENT_STANDARD.decode(text.trim().trim_end_matches('='))?;
        Self::from_bytes(decoded)
    }

    /// Builds the key described by the `[signing]` configuration section.
    pub fn from_settings(settings: &SigningSettings) -> Result<Self, SignerError> {
        match settings.key_encoding {
            KeyEncoding::Text => Self::from_text(&settings.key),
            KeyEncoding::Base64 => Self::from_base64(&settings.key),
        }
    }

    /// First 8 hex characters of SHA-256 of the key bytes.
    ///
    /// Identifies which key is in use without revealing it.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.expose_bytes());
        hex::encode(&digest[..4])
    }

    /// Exposes the key bytes for MAC computation only. Never log the return value.
    pub(crate) fn expose_bytes(&self) -> &[u8] {
        self.bytes.expose_secret()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("fingerprint", &self.fingerprint())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
