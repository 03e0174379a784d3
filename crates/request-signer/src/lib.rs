//! Request signing for the marketplace web API.
//!
//! Every API call carries an HMAC-SHA256 signature over the text
//! `METHOD|PATH|TIMESTAMP|`, sent base64-encoded in the `X-Signature` header
//! next to the `Timestamp` it was computed for. Registration endpoints are
//! signed without their query string.
//!
//! # Example
//!
//! ```rust
//! use request_signer::{RequestSigner, SigningKey};
//!
//! let key = SigningKey::from_text("my-key").unwrap();
//! let signer = RequestSigner::new(key);
//!
//! let signature = signer.sign("/api/v3/general/search", "GET", 1566081935924);
//! assert!(signer
//!     .verify("/api/v3/general/search", "GET", 1566081935924, signature.as_str())
//!     .is_ok());
//! ```

pub mod error;
mod headers;
mod key;
mod normalize;
mod signer;

// --- Public API ---
pub use error::SignerError;
pub use headers::{SIGNATURE_HEADER, SignedHeaders, TIMESTAMP_HEADER};
pub use key::SigningKey;
pub use normalize::{REGISTRATION_MARKER, normalize_path};
pub use signer::{FIELD_SEPARATOR, RequestSigner, canonical_message, sign_request};
