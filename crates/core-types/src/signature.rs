use crate::error::CoreError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Length in bytes of an HMAC-SHA256 digest.
pub const SIGNATURE_LEN: usize = 32;

/// A request signature: standard, padded base64 text of an HMAC-SHA256 digest.
///
/// A `Signature` is pure derived data. Two signatures are equal exactly when
/// their text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Encodes raw MAC output as a signature.
    pub fn from_mac_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Decodes the signature back into the raw digest bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        STANDARD
            .decode(&self.0)
            .map_err(|e| CoreError::InvalidSignature(e.to_string()))
    }
}

/// Parses signature text received from elsewhere (a header, the command line).
///
/// The text must be standard base64 with padding and decode to exactly
/// [`SIGNATURE_LEN`] bytes.
impl FromStr for Signature {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = STANDARD
            .decode(s)
            .map_err(|e| CoreError::InvalidSignature(e.to_string()))?;

        let len = bytes.len();
        if len != SIGNATURE_LEN {
            let reason = format!("expected {SIGNATURE_LEN} bytes, got {len}");
            return Err(CoreError::InvalidSignature(reason));
        }

        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
