use core_types::Signature;

/// Header carrying the base64 request signature.
pub const SIGNATURE_HEADER: &str = "X-Signature";
/// Header carrying the signed timestamp, in decimal milliseconds.
pub const TIMESTAMP_HEADER: &str = "Timestamp";

/// The headers a signed request is sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub signature: Signature,
    pub timestamp: String,
}

impl SignedHeaders {
    pub fn new(signature: Signature, timestamp_ms: u64) -> Self {
        Self {
            signature,
            timestamp: timestamp_ms.to_string(),
        }
    }

    /// Name/value pairs ready to be inserted into a request's header map.
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [
            (SIGNATURE_HEADER, self.signature.as_str()),
            (TIMESTAMP_HEADER, self.timestamp.as_str()),
        ]
    }
}
