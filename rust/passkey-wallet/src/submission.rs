//! Signatures as submitted by a client.

use crate::{ActionError, WalletConfig};
use passkey_credentials::{DerSignature, RawSignature};

/// A signature in the form the client chose to send it.
///
/// Authenticators produce DER; clients that already converted it send the
/// fixed-width `r || s` bytes. Both are normalized to a [`RawSignature`]
/// before verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmittedSignature {
    /// Raw `r || s` bytes, expected to be exactly 64 bytes long.
    Raw(Vec<u8>),
    /// ASN.1 DER as returned by an authenticator.
    Der(Vec<u8>),
}

impl SubmittedSignature {
    /// Normalize to the raw form under `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MalformedSignature`] if a raw signature is not
    /// 64 bytes, if DER is malformed, or if DER is submitted while
    /// [`WalletConfig::accept_der`] is off.
    pub fn to_raw(&self, config: &WalletConfig) -> Result<RawSignature, ActionError> {
        match self {
            SubmittedSignature::Raw(bytes) => Ok(RawSignature::from_slice(bytes)?),
            SubmittedSignature::Der(_) if !config.accept_der => {
                Err(ActionError::MalformedSignature)
            }
            SubmittedSignature::Der(bytes) => Ok(passkey_credentials::decode_der(bytes)?),
        }
    }
}

impl From<RawSignature> for SubmittedSignature {
    fn from(signature: RawSignature) -> Self {
        SubmittedSignature::Raw(signature.as_bytes().to_vec())
    }
}

impl From<DerSignature> for SubmittedSignature {
    fn from(signature: DerSignature) -> Self {
        SubmittedSignature::Der(signature.as_bytes().to_vec())
    }
}
