use crate::error::SignerError;
use crate::headers::SignedHeaders;
use crate::key::SigningKey;
use crate::normalize::normalize_path;
use core_types::{Signature, SignedRequest, SigningInput};
use hmac::{Hmac, Mac};
use sha2::Sha256;

// Create a type alias for the HMAC-SHA256 implementation.
type HmacSha256 = Hmac<Sha256>;

/// Separates the fields of the canonical message and terminates the last one.
pub const FIELD_SEPARATOR: char = '|';

/// Builds the exact text that gets signed: `METHOD|PATH|TIMESTAMP|`.
///
/// `path` is used as given; callers normalize it first.
pub fn canonical_message(method: &str, path: &str, timestamp_ms: u64) -> String {
    format!(
        "{method}{sep}{path}{sep}{timestamp_ms}{sep}",
        sep = FIELD_SEPARATOR
    )
}

/// Signs one request with `key`.
///
/// This is the whole signing scheme: normalize the path, build the canonical
/// message, HMAC-SHA256 it and base64-encode the digest.
///
/// # Arguments
///
/// * `key` - The signing key.
/// * `url` - The request path, with or without a query string.
/// * `method` - The HTTP verb, used verbatim.
/// * `timestamp_ms` - Milliseconds since the Unix epoch.
pub fn sign_request(key: &SigningKey, url: &str, method: &str, timestamp_ms: u64) -> Signature {
    let message = canonical_message(method, normalize_path(url), timestamp_ms);
    Signature::from_mac_bytes(&compute_mac(key, &message))
}

fn keyed_mac(key: &SigningKey) -> HmacSha256 {
    HmacSha256::new_from_slice(key.expose_bytes())
        .expect("HMAC can take key of any size")
}

fn compute_mac(key: &SigningKey, message: &str) -> Vec<u8> {
    let mut mac = keyed_mac(key);
    mac.update(message.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Signs and verifies requests with a single injected key.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug)]
pub struct RequestSigner {
    key: SigningKey,
}

impl RequestSigner {
    /// Create a new request signer with the given key.
    pub fn new(key: SigningKey) -> Self {
        tracing::debug!(key_fingerprint = %key.fingerprint(), "Request signer ready.");
        Self { key }
    }

    /// Fingerprint of the key this signer uses.
    pub fn key_fingerprint(&self) -> String {
        self.key.fingerprint()
    }

    /// Signs a request and returns the base64 signature.
    pub fn sign(&self, url: &str, method: &str, timestamp_ms: u64) -> Signature {
        let input = SigningInput::new(url, method, timestamp_ms);
        self.sign_input(&input).signature
    }

    /// Signs a request and returns the full record of what was signed.
    pub fn sign_input(&self, input: &SigningInput) -> SignedRequest {
        let path = normalize_path(&input.url);
        if path.len() != input.url.len() {
            tracing::debug!(url = %input.url, path, "Dropped query string before signing.");
        }

        let message = canonical_message(&input.method, path, input.timestamp_ms);
        tracing::trace!(%message, "Canonical message.");

        let signature = Signature::from_mac_bytes(&compute_mac(&self.key, &message));
        tracing::debug!(
            method = %input.method,
            path,
            timestamp_ms = input.timestamp_ms,
            "Signed request."
        );

        SignedRequest {
            method: input.method.clone(),
            path: path.to_string(),
            timestamp_ms: input.timestamp_ms,
            message,
            signature,
        }
    }

    /// Signs a request and returns the headers to attach to it.
    pub fn signed_headers(&self, url: &str, method: &str, timestamp_ms: u64) -> SignedHeaders {
        SignedHeaders::new(self.sign(url, method, timestamp_ms), timestamp_ms)
    }

    /// Checks `signature` against the one this signer would produce for the request.
    ///
    /// The digests are compared in constant time.
    ///
    /// # Errors
    /// `SignerError::Core` if `signature` is not base64 of a 32-byte digest,
    /// `SignerError::SignatureMismatch` if it is well formed but wrong.
    pub fn verify(
        &self,
        url: &str,
        method: &str,
        timestamp_ms: u64,
        signature: &str,
    ) -> Result<(), SignerError> {
        let expected: Signature = signature.parse()?;
        let digest = expected.to_bytes()?;

        let message = canonical_message(method, normalize_path(url), timestamp_ms);
        let mut mac = keyed_mac(&self.key);
        mac.update(message.as_bytes());

        mac.verify_slice(&digest).map_err(|_| {
            tracing::warn!(method, url, timestamp_ms, "Signature mismatch.");
            SignerError::SignatureMismatch
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use core_types::{CoreError, SIGNATURE_LEN};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    const SEARCH: &str = "/api/v3/general/search";
    const REGISTRATION: &str = "/api/v3/registration?foo=bar";

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn logs_at(level: tracing::Level, f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(logs.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);
        logs.text()
    }

    fn signer(key: &str) -> RequestSigner {
        RequestSigner::new(SigningKey::from_text(key).unwrap())
    }

    fn expected(key: &str, message: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes()).unwrap();
        mac.update(message.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_canonical_message_format() {
        assert_eq!(
            canonical_message("GET", SEARCH, 1566081935924),
            "GET|/api/v3/general/search|1566081935924|"
        );
        assert_eq!(canonical_message("POST", "", 0), "POST||0|");
    }

    #[test]
    fn test_sign_matches_hmac_of_canonical_message() {
        let signer = signer("secret");
        let signature = signer.sign(SEARCH, "GET", 1566081935924);
        let message = "GET|/api/v3/general/search|1566081935924|";

        assert_eq!(signature.as_str(), expected("secret", message));
    }

    #[test]
    fn test_sign_is_deterministic() {
        let signer = signer("secret");
        let first = signer.sign("/api/v3/items?x=1", "GET", 42);
        let second = signer.sign("/api/v3/items?x=1", "GET", 42);

        assert_eq!(first, second);
    }

    #[test]
    fn test_free_function_agrees_with_signer() {
        let key = SigningKey::from_text("secret").unwrap();
        let from_fn = sign_request(&key, REGISTRATION, "POST", 1000);
        let from_signer = signer("secret").sign(REGISTRATION, "POST", 1000);

        assert_eq!(from_fn, from_signer);
    }

    #[test]
    fn test_sign_input_records_signed_path() {
        let signer = signer("secret");
        let input = SigningInput::new(REGISTRATION, "POST", 1000);
        let record = signer.sign_input(&input);

        assert_eq!(record.path, "/api/v3/registration");
        assert_eq!(record.message, "POST|/api/v3/registration|1000|");
        assert_eq!(
            record.signature.as_str(),
            expected("secret", &record.message)
        );
    }

    #[test]
    fn test_different_keys_give_different_signatures() {
        let a = signer("secret").sign("/a", "GET", 1);
        let b = signer("other").sign("/a", "GET", 1);

        assert_ne!(a, b);
    }

    #[test]
    fn test_output_is_digest_sized() {
        let signature = signer("secret").sign("", "", 0);
        assert_eq!(signature.to_bytes().unwrap().len(), SIGNATURE_LEN);
    }

    #[test]
    fn test_verify_accepts_own_signature() {
        let signer = signer("secret");
        let url = "/api/v3/other?foo=bar";
        let signature = signer.sign(url, "GET", 1000);

        let result = signer.verify(url, "GET", 1000, signature.as_str());
        assert!(result.is_ok());
    }

    #[test]
    fn test_verify_applies_normalization() {
        let signer = signer("secret");
        let sig = signer.sign("/api/v3/registration", "POST", 1000);

        let result = signer.verify(REGISTRATION, "POST", 1000, sig.as_str());
        assert!(result.is_ok());
    }

    #[test]
    fn test_verify_rejects_changed_request() {
        let signer = signer("secret");
        let signature = signer.sign("/a", "GET", 1000);
        let changed = [
            ("/a", "GET", 1001),
            ("/a", "get", 1000),
            ("/b", "GET", 1000),
        ];

        for (url, method, ts) in changed {
            let result = signer.verify(url, method, ts, signature.as_str());
            assert!(matches!(result, Err(SignerError::SignatureMismatch)));
        }
    }

    #[test]
    fn test_verify_rejects_other_key() {
        let signature = signer("other").sign("/a", "GET", 1000);
        let signer = signer("secret");

        let result = signer.verify("/a", "GET", 1000, signature.as_str());
        assert!(matches!(result, Err(SignerError::SignatureMismatch)));
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        let signer = signer("secret");

        let result = signer.verify("/a", "GET", 1000, "not-a-signature");
        assert!(matches!(
            result,
            Err(SignerError::Core(CoreError::InvalidSignature(_)))
        ));
    }

    #[test]
    fn test_signed_headers_carry_signature_and_timestamp() {
        let signer = signer("secret");
        let headers = signer.signed_headers("/a", "GET", 1000);

        assert_eq!(headers.signature, signer.sign("/a", "GET", 1000));
        assert_eq!(headers.timestamp, "1000");
    }

    #[test]
    fn test_signing_is_silent_at_info_level() {
        let output = logs_at(tracing::Level::INFO, || {
            let signer = signer("secret");
            signer.sign("/api/v3/registration?foo=bar", "POST", 1000);
        });

        assert!(output.is_empty());
    }

    #[test]
    fn test_construction_logs_fingerprint_at_debug_level() {
        let output = logs_at(tracing::Level::DEBUG, || {
            signer("secret");
        });

        assert!(output.contains("Request signer ready."));
        assert!(!output.contains("secret"));
    }
}
