//! The message an authenticator signs to authorize a wallet action.

use crate::{Codec, ConsensusCodec, DecodingError, EncodingError, Tuple, Value};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    fmt,
    io::{BufRead, Write},
};

/// The size of a SHA-256 digest in bytes.
pub const MESSAGE_DIGEST_SIZE: usize = 32;

const NONCE_FIELD: &str = "nonce";
const PAYLOAD_FIELD: &str = "payload";

/// A SHA-256 digest of an encoded [`ActionMessage`].
///
/// This is the 32-byte challenge handed to the authenticator and the
/// prehash the verifier checks the signature against.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MessageDigest([u8; MESSAGE_DIGEST_SIZE]);

impl MessageDigest {
    /// Computes the SHA-256 digest of the given bytes.
    pub fn hash(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    /// Get the digest bytes.
    pub fn bytes(&self) -> &[u8; MESSAGE_DIGEST_SIZE] {
        &self.0
    }
}

impl From<[u8; MESSAGE_DIGEST_SIZE]> for MessageDigest {
    fn from(value: [u8; MESSAGE_DIGEST_SIZE]) -> Self {
        Self(value)
    }
}

impl AsRef<[u8]> for MessageDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for MessageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for MessageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageDigest({self})")
    }
}

/// The logical tuple `{ nonce, payload }` that binds an action payload to
/// the account's current nonce.
///
/// Binding the nonce is what prevents replay: once the account advances to
/// `nonce + 1`, a signature over the message for `nonce` no longer matches
/// the message the verifier reconstructs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMessage {
    /// The account nonce at the time of signing.
    pub nonce: u128,
    /// Caller-supplied action payload.
    pub payload: Vec<u8>,
}

impl ActionMessage {
    /// Create a message for `payload` at `nonce`.
    pub fn new(nonce: u128, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            nonce,
            payload: payload.into(),
        }
    }

    /// The message as a consensus tuple value.
    pub fn to_value(&self) -> Value {
        let mut tuple = Tuple::new();
        tuple.insert_unchecked(NONCE_FIELD, Value::UInt(self.nonce));
        tuple.insert_unchecked(PAYLOAD_FIELD, Value::Buffer(self.payload.clone()));
        tuple.into()
    }

    /// Encode the message with `codec`.
    ///
    /// # Errors
    ///
    /// Returns the codec's encoding error.
    pub fn encode_with<C: Codec<ActionMessage>>(&self, codec: &C) -> Result<Vec<u8>, C::EncodingError> {
        codec.encode_to_vec(self)
    }

    /// Encode the message with `codec` and hash the result.
    ///
    /// # Errors
    ///
    /// Returns the codec's encoding error.
    pub fn digest_with<C: Codec<ActionMessage>>(
        &self,
        codec: &C,
    ) -> Result<MessageDigest, C::EncodingError> {
        Ok(MessageDigest::hash(&self.encode_with(codec)?))
    }

    /// Hash the consensus encoding of the message.
    ///
    /// # Errors
    ///
    /// Fails only if the payload is longer than a `u32` length prefix allows.
    pub fn digest(&self) -> Result<MessageDigest, EncodingError> {
        self.digest_with(&ConsensusCodec)
    }
}

impl TryFrom<&Value> for ActionMessage {
    type Error = DecodingError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        const SHAPE: &str = "tuple { nonce: uint, payload: buff }";

        let tuple = value.as_tuple().ok_or(DecodingError::UnexpectedShape(SHAPE))?;
        if tuple.len() != 2 {
            return Err(DecodingError::UnexpectedShape(SHAPE));
        }
        let nonce = tuple
            .get(NONCE_FIELD)
            .and_then(Value::as_uint)
            .ok_or(DecodingError::UnexpectedShape(SHAPE))?;
        let payload = tuple
            .get(PAYLOAD_FIELD)
            .and_then(Value::as_buffer)
            .ok_or(DecodingError::UnexpectedShape(SHAPE))?;

        Ok(Self::new(nonce, payload))
    }
}

impl Codec<ActionMessage> for ConsensusCodec {
    type EncodingError = EncodingError;
    type DecodingError = DecodingError;

    fn encode_payload<W: Write>(
        &self,
        payload: &ActionMessage,
        buffer: &mut W,
    ) -> Result<(), EncodingError> {
        <Self as Codec<Value>>::encode_payload(self, &payload.to_value(), buffer)
    }

    fn decode_payload<R: BufRead>(&self, reader: &mut R) -> Result<ActionMessage, DecodingError> {
        let value = <Self as Codec<Value>>::decode_payload(self, reader)?;
        ActionMessage::try_from(&value)
    }
}
