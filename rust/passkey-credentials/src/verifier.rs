//! P-256 prehash verifier.
//!
//! Verifies a raw `r || s` signature over a 32-byte digest against a
//! compressed public key. The digest is used as-is (the authenticator is
//! asked to sign the digest, not the message it was computed from).

use super::{
    error::VerifyError,
    key::PublicKey,
    signature::RawSignature,
};
use p256::ecdsa::{Signature, VerifyingKey, signature::hazmat::PrehashVerifier};

/// A P-256 ECDSA verifier bound to one public key.
#[derive(Debug, Clone)]
pub struct P256Verifier {
    public_key: PublicKey,
    key: VerifyingKey,
}

impl P256Verifier {
    /// Create a verifier for a compressed public key.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidPoint`] if the x-coordinate does not
    /// correspond to a point on the curve.
    pub fn new(public_key: PublicKey) -> Result<Self, VerifyError> {
        let key = VerifyingKey::from_sec1_bytes(public_key.as_bytes())
            .map_err(|_| VerifyError::InvalidPoint)?;
        Ok(Self { public_key, key })
    }

    /// The compressed public key this verifier checks against.
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Get the inner P-256 verifying key.
    #[must_use]
    pub const fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }

    /// Verify `signature` over the 32-byte `digest`.
    ///
    /// With `require_low_s` set, signatures whose `s` lies in the upper half
    /// of the group order are refused even if they would otherwise verify.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidScalars`] if `r` or `s` is out of
    /// range, [`VerifyError::HighS`] if low-S is required and not met, and
    /// [`VerifyError::Mismatch`] if the signature does not verify.
    pub fn verify_digest(
        &self,
        digest: &[u8],
        signature: &RawSignature,
        require_low_s: bool,
    ) -> Result<(), VerifyError> {
        let signature = Signature::from_slice(signature.as_bytes())
            .map_err(|_| VerifyError::InvalidScalars)?;
        if require_low_s && signature.normalize_s().is_some() {
            return Err(VerifyError::HighS);
        }
        self.key
            .verify_prehash(digest, &signature)
            .map_err(|_| VerifyError::Mismatch)
    }
}

impl PrehashVerifier<RawSignature> for P256Verifier {
    fn verify_prehash(
        &self,
        prehash: &[u8],
        signature: &RawSignature,
    ) -> Result<(), ::signature::Error> {
        self.verify_digest(prehash, signature, false)
            .map_err(|_| ::signature::Error::new())
    }
}

impl PartialEq for P256Verifier {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for P256Verifier {}
