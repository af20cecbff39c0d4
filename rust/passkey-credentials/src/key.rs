//! P-256 public key encodings.
//!
//! Authenticators hand out public keys as 65-byte uncompressed SEC1 points
//! (`0x04 | x | y`). Accounts store the 33-byte compressed form
//! (`0x02 | x` for even `y`, `0x03 | x` for odd `y`).

use super::error::KeyFormatError;
use p256::ecdsa::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Length of an uncompressed SEC1 point.
pub const UNCOMPRESSED_KEY_LEN: usize = 65;

/// Length of a compressed SEC1 point.
pub const COMPRESSED_KEY_LEN: usize = 33;

const UNCOMPRESSED_MARKER: u8 = 0x04;
const EVEN_Y_MARKER: u8 = 0x02;
const ODD_Y_MARKER: u8 = 0x03;

/// A compressed P-256 public key.
///
/// Construction only checks the shape (length and marker byte). Whether the
/// x-coordinate is actually on the curve is left to verification, which
/// rejects keys that are not.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; COMPRESSED_KEY_LEN]);

impl PublicKey {
    /// Parse a 33-byte compressed key.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is not 33 or the first byte is not
    /// `0x02` or `0x03`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyFormatError> {
        let key: [u8; COMPRESSED_KEY_LEN] = bytes
            .try_into()
            .map_err(|_| KeyFormatError::CompressedLength(bytes.len()))?;
        match key[0] {
            EVEN_Y_MARKER | ODD_Y_MARKER => Ok(Self(key)),
            marker => Err(KeyFormatError::CompressedMarker(marker)),
        }
    }

    /// Get the compressed key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; COMPRESSED_KEY_LEN] {
        &self.0
    }

    /// Get the x-coordinate.
    #[must_use]
    pub fn x(&self) -> &[u8] {
        &self.0[1..]
    }

    /// Whether the y-coordinate is odd.
    #[must_use]
    pub const fn is_y_odd(&self) -> bool {
        self.0[0] == ODD_Y_MARKER
    }
}

/// Compress a 65-byte uncompressed P-256 public key.
///
/// This is a pure byte transform: it does not check that the point lies on
/// the curve.
///
/// # Errors
///
/// Returns an error if the input is not 65 bytes or does not start with
/// `0x04`.
pub fn compress(uncompressed: &[u8]) -> Result<PublicKey, KeyFormatError> {
    if uncompressed.len() != UNCOMPRESSED_KEY_LEN {
        return Err(KeyFormatError::UncompressedLength(uncompressed.len()));
    }
    if uncompressed[0] != UNCOMPRESSED_MARKER {
        return Err(KeyFormatError::UncompressedMarker(uncompressed[0]));
    }

    let x = &uncompressed[1..33];
    let y_is_odd = uncompressed[64] & 1 == 1;

    let mut compressed = [0u8; COMPRESSED_KEY_LEN];
    compressed[0] = if y_is_odd { ODD_Y_MARKER } else { EVEN_Y_MARKER };
    compressed[1..].copy_from_slice(x);
    Ok(PublicKey(compressed))
}

impl From<&VerifyingKey> for PublicKey {
    fn from(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(true);
        let mut compressed = [0u8; COMPRESSED_KEY_LEN];
        compressed.copy_from_slice(point.as_bytes());
        Self(compressed)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = KeyFormatError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl FromStr for PublicKey {
    type Err = KeyFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim()).map_err(|_| KeyFormatError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PublicKeyVisitor;

        impl serde::de::Visitor<'_> for PublicKeyVisitor {
            type Value = PublicKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a hex string containing a compressed P-256 public key")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(PublicKeyVisitor)
    }
}
