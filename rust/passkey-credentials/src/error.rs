//! Error types for passkey key and signature operations.

use thiserror::Error;

/// Errors from decoding a signature into its raw 64-byte form.
///
/// The DER variant is deliberately coarse: it does not say which field was
/// at fault, since the remedy (produce a fresh signature) is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SignatureFormatError {
    /// The bytes are not a well-formed DER `SEQUENCE(INTEGER r, INTEGER s)`
    /// with both integers fitting in 32 bytes.
    #[error("malformed DER signature")]
    MalformedDer,

    /// A raw signature was not exactly 64 bytes long.
    #[error("raw signature must be 64 bytes, got {0}")]
    InvalidLength(usize),
}

/// Errors from parsing or compressing a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum KeyFormatError {
    /// An uncompressed key was not exactly 65 bytes long.
    #[error("uncompressed public key must be 65 bytes, got {0}")]
    UncompressedLength(usize),

    /// An uncompressed key did not start with the `0x04` marker.
    #[error("uncompressed public key must start with 0x04, got {0:#04x}")]
    UncompressedMarker(u8),

    /// A compressed key was not exactly 33 bytes long.
    #[error("compressed public key must be 33 bytes, got {0}")]
    CompressedLength(usize),

    /// A compressed key did not start with `0x02` or `0x03`.
    #[error("compressed public key must start with 0x02 or 0x03, got {0:#04x}")]
    CompressedMarker(u8),

    /// The text form of a key is not valid hex.
    #[error("public key is not valid hex")]
    InvalidHex,
}

/// Errors from verifying a signature against a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum VerifyError {
    /// The stored key bytes do not decode to a point on P-256.
    #[error("public key is not a point on P-256")]
    InvalidPoint,

    /// `r` or `s` is zero or not below the group order.
    #[error("signature scalars are out of range")]
    InvalidScalars,

    /// `s` is in the upper half of the group order and low-S is required.
    #[error("signature is not in low-S form")]
    HighS,

    /// The signature does not verify for the digest and key.
    #[error("signature does not verify")]
    Mismatch,
}

/// Errors from the software authenticator.
#[derive(Debug, Clone, Error)]
pub enum AuthenticatorError {
    /// The seed is not a valid P-256 secret scalar.
    #[error("seed is not a valid P-256 secret key")]
    InvalidSeed,

    /// Random number generation failed.
    #[error("RNG error: {0}")]
    Rng(getrandom::Error),

    /// The signing primitive failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

impl From<getrandom::Error> for AuthenticatorError {
    fn from(value: getrandom::Error) -> Self {
        Self::Rng(value)
    }
}
