use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Signing key is not valid base64: {0}")]
    InvalidKey(#[from] base64::DecodeError),

    #[error("Signing key must not be empty")]
    EmptyKey,

    #[error("Signature does not match the request")]
    SignatureMismatch,

    #[error(transparent)]
    Core(#[from] CoreError),
}
