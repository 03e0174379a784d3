use serde::Deserialize;
use std::path::PathBuf;

/// The key the public web client signs its API calls with.
///
/// Used when no `signing.key` is configured.
pub const WEB_CLIENT_KEY: &str =
    "Tm93IHRoYXQgeW91J3ZlIGZvdW5kIHRoaXMsIGFyZSB5b3UgcmVhZHkgdG8gam9pbiB1cz8gam9ic0B3YWxsYXBvcC5jb20==";

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub signing: SigningSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// How the configured key text is turned into HMAC key bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum KeyEncoding {
    /// The UTF-8 bytes of the text are the key.
    #[default]
    Text,
    /// The text is base64 and its decoded bytes are the key.
    Base64,
}

/// Contains the key material used to sign requests.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SigningSettings {
    pub key: String,
    pub key_encoding: KeyEncoding,
}

impl Default for SigningSettings {
    fn default() -> Self {
        Self {
            key: WEB_CLIENT_KEY.to_string(),
            key_encoding: KeyEncoding::Text,
        }
    }
}

impl std::fmt::Debug for SigningSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSettings")
            .field("key", &"[REDACTED]")
            .field("key_encoding", &self.key_encoding)
            .finish()
    }
}

/// Contains parameters for log output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set (e.g., "info", "request_signer=debug").
    pub level: String,
    /// When set, logs are appended to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
