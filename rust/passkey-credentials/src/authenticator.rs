//! Software stand-in for a passkey authenticator.
//!
//! Real authenticators keep the private key in hardware and only ever hand
//! out an uncompressed public key and DER signatures over a challenge. The
//! [`SoftwareAuthenticator`] exposes the same surface backed by an in-memory
//! P-256 key so that wallets can be exercised without a device.

use super::{
    error::AuthenticatorError,
    key::{PublicKey, UNCOMPRESSED_KEY_LEN},
    signature::{DerSignature, RAW_SIGNATURE_LEN, RawSignature},
};
use p256::ecdsa::{Signature, SigningKey, signature::hazmat::PrehashSigner};
use std::fmt;

/// A P-256 signing key that signs 32-byte challenges as-is.
#[derive(Clone)]
pub struct SoftwareAuthenticator {
    key: SigningKey,
}

impl SoftwareAuthenticator {
    /// Create an authenticator from a 32-byte secret scalar.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticatorError::InvalidSeed`] if the seed is zero or not
    /// below the group order.
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, AuthenticatorError> {
        let key = SigningKey::from_slice(seed).map_err(|_| AuthenticatorError::InvalidSeed)?;
        Ok(Self { key })
    }

    /// Generate a fresh authenticator with random bytes from `getrandom`.
    ///
    /// # Errors
    ///
    /// Returns an error if the RNG fails.
    pub fn generate() -> Result<Self, AuthenticatorError> {
        loop {
            let mut seed = [0u8; 32];
            getrandom::getrandom(&mut seed)?;
            // Out-of-range scalars are astronomically rare; draw again.
            if let Ok(authenticator) = Self::from_seed(&seed) {
                return Ok(authenticator);
            }
        }
    }

    /// The public key as a 65-byte uncompressed SEC1 point.
    #[must_use]
    pub fn uncompressed_public_key(&self) -> [u8; UNCOMPRESSED_KEY_LEN] {
        let point = self.key.verifying_key().to_encoded_point(false);
        let mut bytes = [0u8; UNCOMPRESSED_KEY_LEN];
        bytes.copy_from_slice(point.as_bytes());
        bytes
    }

    /// The public key in compressed form.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(self.key.verifying_key())
    }

    /// Get the inner P-256 signing key.
    #[must_use]
    pub const fn signing_key(&self) -> &SigningKey {
        &self.key
    }

    /// Sign a 32-byte digest, returning the raw `r || s` form.
    ///
    /// The signature is returned exactly as produced; its `s` is not
    /// normalized to the low half.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticatorError::Signing`] if the signing primitive fails.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<RawSignature, AuthenticatorError> {
        let signature: Signature = self
            .key
            .sign_prehash(digest)
            .map_err(|error| AuthenticatorError::Signing(error.to_string()))?;
        let mut bytes = [0u8; RAW_SIGNATURE_LEN];
        bytes.copy_from_slice(&signature.to_bytes());
        Ok(RawSignature::new(bytes))
    }

    /// Sign a 32-byte challenge the way a passkey does, returning DER.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticatorError::Signing`] if the signing primitive fails.
    pub fn sign_der(&self, challenge: &[u8; 32]) -> Result<DerSignature, AuthenticatorError> {
        Ok(self.sign_digest(challenge)?.to_der())
    }
}

impl PrehashSigner<RawSignature> for SoftwareAuthenticator {
    fn sign_prehash(&self, prehash: &[u8]) -> Result<RawSignature, ::signature::Error> {
        let digest: &[u8; 32] = prehash
            .try_into()
            .map_err(|_| ::signature::Error::new())?;
        self.sign_digest(digest)
            .map_err(|_| ::signature::Error::new())
    }
}

impl fmt::Debug for SoftwareAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareAuthenticator")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl From<SigningKey> for SoftwareAuthenticator {
    fn from(key: SigningKey) -> Self {
        Self { key }
    }
}
