//! ECDSA P-256 signature encodings.
//!
//! Platform authenticators return ASN.1 DER signatures:
//!
//! ```text
//! 0x30 len | 0x02 len_r r | 0x02 len_s s
//! ```
//!
//! where each integer is big-endian, minimal, and carries one leading
//! `0x00` when its top bit would otherwise read as a sign bit. The verifier
//! consumes the fixed-width form `r (32 bytes) | s (32 bytes)`, each
//! left-padded with zeros.

use super::error::SignatureFormatError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a raw `r || s` signature.
pub const RAW_SIGNATURE_LEN: usize = 64;

/// Width of a single P-256 scalar.
pub const SCALAR_LEN: usize = 32;

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

/// A fixed-width `r || s` ECDSA signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawSignature([u8; RAW_SIGNATURE_LEN]);

impl RawSignature {
    /// Wrap 64 raw signature bytes.
    #[must_use]
    pub const fn new(bytes: [u8; RAW_SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a raw signature from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureFormatError::InvalidLength`] unless the slice is
    /// exactly 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureFormatError> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| SignatureFormatError::InvalidLength(bytes.len()))
    }

    /// Get the signature bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; RAW_SIGNATURE_LEN] {
        &self.0
    }

    /// The big-endian `r` scalar.
    #[must_use]
    pub fn r(&self) -> &[u8] {
        &self.0[..SCALAR_LEN]
    }

    /// The big-endian `s` scalar.
    #[must_use]
    pub fn s(&self) -> &[u8] {
        &self.0[SCALAR_LEN..]
    }

    /// Re-encode as a DER signature.
    #[must_use]
    pub fn to_der(&self) -> DerSignature {
        encode_der(self)
    }
}

impl TryFrom<&[u8]> for RawSignature {
    type Error = SignatureFormatError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl From<RawSignature> for [u8; RAW_SIGNATURE_LEN] {
    fn from(signature: RawSignature) -> Self {
        signature.0
    }
}

impl AsRef<[u8]> for RawSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl ::signature::SignatureEncoding for RawSignature {
    type Repr = [u8; RAW_SIGNATURE_LEN];
}

impl fmt::Display for RawSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for RawSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawSignature({self})")
    }
}

/// A DER-encoded ECDSA signature as produced by an authenticator.
///
/// Holding the bytes does not imply they are well formed; call
/// [`DerSignature::decode`] to validate and normalize them.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DerSignature(Vec<u8>);

impl DerSignature {
    /// Wrap DER bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Get the DER bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decode to the fixed-width form.
    ///
    /// # Errors
    ///
    /// See [`decode_der`].
    pub fn decode(&self) -> Result<RawSignature, SignatureFormatError> {
        decode_der(&self.0)
    }
}

impl From<Vec<u8>> for DerSignature {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for DerSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for DerSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerSignature({})", hex::encode(&self.0))
    }
}

/// Bounds-checked reader over a DER buffer.
struct DerReader<'a> {
    bytes: &'a [u8],
}

impl<'a> DerReader<'a> {
    fn byte(&mut self) -> Result<u8, SignatureFormatError> {
        let (first, rest) = self
            .bytes
            .split_first()
            .ok_or(SignatureFormatError::MalformedDer)?;
        self.bytes = rest;
        Ok(*first)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], SignatureFormatError> {
        if len > self.bytes.len() {
            return Err(SignatureFormatError::MalformedDer);
        }
        let (taken, rest) = self.bytes.split_at(len);
        self.bytes = rest;
        Ok(taken)
    }

    fn expect_tag(&mut self, tag: u8) -> Result<(), SignatureFormatError> {
        if self.byte()? == tag {
            Ok(())
        } else {
            Err(SignatureFormatError::MalformedDer)
        }
    }

    /// P-256 signatures never exceed 72 bytes, so only short-form lengths
    /// are accepted.
    fn length(&mut self) -> Result<usize, SignatureFormatError> {
        match self.byte()? {
            len if len < 0x80 => Ok(len as usize),
            _ => Err(SignatureFormatError::MalformedDer),
        }
    }

    /// Read an INTEGER and strip a single leading sign-padding zero.
    fn integer(&mut self) -> Result<&'a [u8], SignatureFormatError> {
        self.expect_tag(INTEGER_TAG)?;
        let len = self.length()?;
        let value = self.take(len)?;
        let value = match value {
            [] => return Err(SignatureFormatError::MalformedDer),
            [0x00, rest @ ..] => rest,
            value => value,
        };
        if value.len() > SCALAR_LEN {
            return Err(SignatureFormatError::MalformedDer);
        }
        Ok(value)
    }
}

/// Decode a DER `SEQUENCE(INTEGER r, INTEGER s)` into a raw signature.
///
/// Every declared length is checked against the bytes actually present,
/// and the outer sequence length must cover the rest of the input exactly.
///
/// # Errors
///
/// Returns [`SignatureFormatError::MalformedDer`] if a tag is missing, a
/// length runs past the buffer or disagrees with it, an integer is empty,
/// or an integer is wider than 32 bytes after removing sign padding.
pub fn decode_der(der: &[u8]) -> Result<RawSignature, SignatureFormatError> {
    let mut reader = DerReader { bytes: der };

    reader.expect_tag(SEQUENCE_TAG)?;
    if reader.length()? != reader.bytes.len() {
        return Err(SignatureFormatError::MalformedDer);
    }
    let r = reader.integer()?;
    let s = reader.integer()?;
    if !reader.bytes.is_empty() {
        return Err(SignatureFormatError::MalformedDer);
    }

    let mut raw = [0u8; RAW_SIGNATURE_LEN];
    raw[SCALAR_LEN - r.len()..SCALAR_LEN].copy_from_slice(r);
    raw[RAW_SIGNATURE_LEN - s.len()..].copy_from_slice(s);
    Ok(RawSignature(raw))
}

fn encode_integer(out: &mut Vec<u8>, scalar: &[u8]) {
    let start = scalar
        .iter()
        .position(|byte| *byte != 0)
        .unwrap_or(scalar.len() - 1);
    let trimmed = &scalar[start..];
    let pad = trimmed[0] & 0x80 != 0;

    out.push(INTEGER_TAG);
    out.push((trimmed.len() + usize::from(pad)) as u8);
    if pad {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
}

/// Encode a raw signature as minimal DER.
#[must_use]
pub fn encode_der(raw: &RawSignature) -> DerSignature {
    let mut body = Vec::with_capacity(70);
    encode_integer(&mut body, raw.r());
    encode_integer(&mut body, raw.s());

    let mut der = Vec::with_capacity(body.len() + 2);
    der.push(SEQUENCE_TAG);
    // At most 2 * (2 + 33) = 70 bytes, always a short-form length.
    der.push(body.len() as u8);
    der.extend_from_slice(&body);
    DerSignature(der)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn der(r: &[u8], s: &[u8]) -> Vec<u8> {
        let mut body = vec![INTEGER_TAG, r.len() as u8];
        body.extend_from_slice(r);
        body.push(INTEGER_TAG);
        body.push(s.len() as u8);
        body.extend_from_slice(s);

        let mut out = vec![SEQUENCE_TAG, body.len() as u8];
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn it_decodes_full_width_integers() {
        let r = [0x11u8; 32];
        let s = [0x22u8; 32];
        let raw = decode_der(&der(&r, &s)).unwrap();

        assert_eq!(raw.r(), &r);
        assert_eq!(raw.s(), &s);
    }

    #[test]
    fn it_strips_sign_padding() {
        let mut padded = vec![0x00];
        padded.extend_from_slice(&[0x80u8; 32]);
        let raw = decode_der(&der(&padded, &[0x7fu8; 32])).unwrap();

        assert_eq!(raw.r(), &[0x80u8; 32]);
        assert_eq!(raw.s(), &[0x7fu8; 32]);
    }

    #[test]
    fn it_left_pads_short_integers() {
        let raw = decode_der(&der(&[0x01, 0x02], &[0x03])).unwrap();

        let mut expected = [0u8; 64];
        expected[30] = 0x01;
        expected[31] = 0x02;
        expected[63] = 0x03;
        assert_eq!(raw.as_bytes(), &expected);
    }

    #[test]
    fn it_rejects_a_missing_sequence_tag() {
        let mut bytes = der(&[1], &[2]);
        bytes[0] = 0x31;
        assert_eq!(decode_der(&bytes), Err(SignatureFormatError::MalformedDer));
    }

    #[test]
    fn it_rejects_missing_integer_tags() {
        let mut bytes = der(&[1], &[2]);
        bytes[2] = 0x03;
        assert_eq!(decode_der(&bytes), Err(SignatureFormatError::MalformedDer));

        let mut bytes = der(&[1], &[2]);
        bytes[5] = 0x04;
        assert_eq!(decode_der(&bytes), Err(SignatureFormatError::MalformedDer));
    }

    #[test]
    fn it_rejects_integers_wider_than_a_scalar() {
        let mut wide = vec![0x00];
        wide.extend_from_slice(&[0x01u8; 33]);
        assert_eq!(
            decode_der(&der(&wide, &[1])),
            Err(SignatureFormatError::MalformedDer)
        );
        assert_eq!(
            decode_der(&der(&[1], &[0x01u8; 33])),
            Err(SignatureFormatError::MalformedDer)
        );
    }

    #[test]
    fn it_rejects_lengths_that_overrun_the_buffer() {
        let mut bytes = der(&[1, 2, 3], &[4]);
        // Claim r is longer than what follows.
        bytes[3] = 0x40;
        assert_eq!(decode_der(&bytes), Err(SignatureFormatError::MalformedDer));

        let truncated = &der(&[0x11u8; 32], &[0x22u8; 32])[..40];
        assert_eq!(decode_der(truncated), Err(SignatureFormatError::MalformedDer));
    }

    #[test]
    fn it_rejects_a_sequence_length_that_disagrees_with_the_input() {
        let mut bytes = der(&[1], &[2]);
        bytes.push(0x00);
        assert_eq!(decode_der(&bytes), Err(SignatureFormatError::MalformedDer));

        let mut bytes = der(&[1], &[2]);
        bytes[1] += 1;
        assert_eq!(decode_der(&bytes), Err(SignatureFormatError::MalformedDer));
    }

    #[test]
    fn it_rejects_empty_and_long_form_input() {
        assert_eq!(decode_der(&[]), Err(SignatureFormatError::MalformedDer));
        assert_eq!(decode_der(&[0x30]), Err(SignatureFormatError::MalformedDer));
        assert_eq!(
            decode_der(&[0x30, 0x81, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01]),
            Err(SignatureFormatError::MalformedDer)
        );
        assert_eq!(
            decode_der(&der(&[], &[1])),
            Err(SignatureFormatError::MalformedDer)
        );
    }

    #[test]
    fn it_encodes_minimal_der() {
        let mut bytes = [0u8; 64];
        bytes[31] = 0x80;
        bytes[63] = 0x01;
        let der = encode_der(&RawSignature::new(bytes));

        assert_eq!(
            der.as_bytes(),
            &[0x30, 0x07, 0x02, 0x02, 0x00, 0x80, 0x02, 0x01, 0x01]
        );
        assert_eq!(der.decode().unwrap(), RawSignature::new(bytes));
    }

    #[test]
    fn it_encodes_zero_scalars_as_a_single_byte() {
        let der = encode_der(&RawSignature::new([0u8; 64]));
        assert_eq!(
            der.as_bytes(),
            &[0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00]
        );
    }

    #[test]
    fn it_requires_exactly_64_raw_bytes() {
        assert_eq!(
            RawSignature::from_slice(&[0u8; 63]),
            Err(SignatureFormatError::InvalidLength(63))
        );
        assert!(RawSignature::from_slice(&[0u8; 64]).is_ok());
    }
}
