//! Errors returned by wallet operations.

use passkey_credentials::{KeyFormatError, SignatureFormatError, VerifyError};
use passkey_encoding::{DecodingError, EncodingError};
use serde::Serialize;
use thiserror::Error;

/// Why an action, registration or lookup was refused.
///
/// Every variant carries a stable numeric [`code`](ActionError::code) so
/// hosts can surface the same value a contract would. A failed call never
/// mutates account state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionError {
    /// The signature does not verify for the reconstructed message.
    #[error("invalid signature")]
    InvalidSignature,

    /// The submitted signature could not be decoded.
    #[error("malformed signature")]
    MalformedSignature,

    /// The candidate public key has the wrong length or marker byte.
    #[error("invalid public key format")]
    InvalidKeyFormat,

    /// The account already has a registered key.
    #[error("account is already initialized")]
    AlreadyInitialized,

    /// The account has no registered key.
    #[error("account is not initialized")]
    NotInitialized,

    /// The action payload could not be encoded or decoded.
    #[error("malformed action payload")]
    MalformedPayload,

    /// The account nonce cannot be advanced any further.
    #[error("account nonce is exhausted")]
    NonceExhausted,
}

impl ActionError {
    /// Numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            ActionError::InvalidSignature => 100,
            ActionError::MalformedSignature => 101,
            ActionError::InvalidKeyFormat => 102,
            ActionError::AlreadyInitialized => 103,
            ActionError::NotInitialized => 104,
            ActionError::MalformedPayload => 105,
            ActionError::NonceExhausted => 106,
        }
    }
}

impl From<SignatureFormatError> for ActionError {
    fn from(_: SignatureFormatError) -> Self {
        ActionError::MalformedSignature
    }
}

impl From<KeyFormatError> for ActionError {
    fn from(_: KeyFormatError) -> Self {
        ActionError::InvalidKeyFormat
    }
}

impl From<VerifyError> for ActionError {
    fn from(_: VerifyError) -> Self {
        ActionError::InvalidSignature
    }
}

impl From<EncodingError> for ActionError {
    fn from(_: EncodingError) -> Self {
        ActionError::MalformedPayload
    }
}

impl From<DecodingError> for ActionError {
    fn from(_: DecodingError) -> Self {
        ActionError::MalformedPayload
    }
}
