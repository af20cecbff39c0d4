//! Codec trait for encoding/decoding signed payloads.

use std::{
    error::Error,
    io::{BufRead, Write},
};

/// Codec trait for encoding and decoding payloads.
///
/// The bytes a signer signs and the bytes a verifier reconstructs must be
/// identical, so both sides go through the same codec. The consensus codec
/// ([`crate::ConsensusCodec`]) is the convention of the host chain; a host
/// with a different serialization convention can supply its own
/// implementation.
pub trait Codec<T> {
    /// Encoding error type.
    type EncodingError: Error;

    /// Decoding error type.
    type DecodingError: Error;

    /// Encode the payload to the given buffer.
    ///
    /// ## Errors
    ///
    /// If the encoding fails, it returns an error of type `Self::EncodingError`.
    fn encode_payload<W: Write>(
        &self,
        payload: &T,
        buffer: &mut W,
    ) -> Result<(), Self::EncodingError>;

    /// Decode the payload from the given reader.
    ///
    /// ## Errors
    ///
    /// If the decoding fails, it returns an error of type `Self::DecodingError`.
    fn decode_payload<R: BufRead>(&self, reader: &mut R) -> Result<T, Self::DecodingError>;

    /// Encode the payload into a fresh byte vector.
    ///
    /// ## Errors
    ///
    /// If the encoding fails, it returns an error of type `Self::EncodingError`.
    fn encode_to_vec(&self, payload: &T) -> Result<Vec<u8>, Self::EncodingError> {
        let mut buffer = Vec::new();
        self.encode_payload(payload, &mut buffer)?;
        Ok(buffer)
    }
}
