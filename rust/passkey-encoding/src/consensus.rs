//! The host chain's consensus value encoding.
//!
//! # Binary Format
//!
//! Every value starts with a one byte type prefix:
//!
//! ```text
//! int          0x00 | i128 big-endian (16 bytes, two's complement)
//! uint         0x01 | u128 big-endian (16 bytes)
//! buff         0x02 | u32 big-endian length | bytes
//! true         0x03
//! false        0x04
//! tuple        0x0c | u32 big-endian field count
//!                   | (u8 name length | name | value)*   ascending by name
//! string-ascii 0x0d | u32 big-endian length | bytes
//! ```

use crate::{
    Codec, DecodingError, EncodingError,
    value::{FieldName, Tuple, Value, is_printable_ascii},
};
use std::io::{BufRead, Read, Write};

/// Deepest tuple nesting accepted by the decoder.
pub const MAX_DEPTH: usize = 32;

const PREFIX_INT: u8 = 0x00;
const PREFIX_UINT: u8 = 0x01;
const PREFIX_BUFFER: u8 = 0x02;
const PREFIX_TRUE: u8 = 0x03;
const PREFIX_FALSE: u8 = 0x04;
const PREFIX_TUPLE: u8 = 0x0c;
const PREFIX_STRING_ASCII: u8 = 0x0d;

/// Codec for the consensus value encoding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsensusCodec;

impl Codec<Value> for ConsensusCodec {
    type EncodingError = EncodingError;
    type DecodingError = DecodingError;

    fn encode_payload<W: Write>(&self, payload: &Value, buffer: &mut W) -> Result<(), EncodingError> {
        write_value(payload, buffer)
    }

    fn decode_payload<R: BufRead>(&self, reader: &mut R) -> Result<Value, DecodingError> {
        read_value(reader, 0)
    }
}

impl ConsensusCodec {
    /// Decode exactly one value from `bytes`.
    ///
    /// # Errors
    ///
    /// Fails if the value is malformed or if any bytes remain after it.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value, DecodingError> {
        let mut reader = bytes;
        let value = self.decode_payload(&mut reader)?;
        if !reader.is_empty() {
            return Err(DecodingError::TrailingBytes(reader.len()));
        }
        Ok(value)
    }
}

fn length_prefix(len: usize) -> Result<[u8; 4], EncodingError> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| EncodingError::TooLong(len))
}

fn write_value<W: Write>(value: &Value, out: &mut W) -> Result<(), EncodingError> {
    match value {
        Value::Int(int) => {
            out.write_all(&[PREFIX_INT])?;
            out.write_all(&int.to_be_bytes())?;
        }
        Value::UInt(uint) => {
            out.write_all(&[PREFIX_UINT])?;
            out.write_all(&uint.to_be_bytes())?;
        }
        Value::Bool(true) => out.write_all(&[PREFIX_TRUE])?,
        Value::Bool(false) => out.write_all(&[PREFIX_FALSE])?,
        Value::Buffer(bytes) => {
            out.write_all(&[PREFIX_BUFFER])?;
            out.write_all(&length_prefix(bytes.len())?)?;
            out.write_all(bytes)?;
        }
        Value::StringAscii(string) => {
            if !is_printable_ascii(string.as_bytes()) {
                return Err(EncodingError::InvalidAscii);
            }
            out.write_all(&[PREFIX_STRING_ASCII])?;
            out.write_all(&length_prefix(string.len())?)?;
            out.write_all(string.as_bytes())?;
        }
        Value::Tuple(tuple) => {
            out.write_all(&[PREFIX_TUPLE])?;
            out.write_all(&length_prefix(tuple.len())?)?;
            for (name, field) in tuple.iter() {
                // FieldName guarantees 1..=128 bytes.
                out.write_all(&[name.as_str().len() as u8])?;
                out.write_all(name.as_str().as_bytes())?;
                write_value(field, out)?;
            }
        }
    }
    Ok(())
}

fn read_array<const N: usize, R: Read>(reader: &mut R) -> Result<[u8; N], DecodingError> {
    let mut bytes = [0u8; N];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

/// Read exactly `len` bytes without trusting `len` for the allocation.
fn read_bytes<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>, DecodingError> {
    let mut bytes = Vec::new();
    reader.by_ref().take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(DecodingError::UnexpectedEnd);
    }
    Ok(bytes)
}

fn read_value<R: BufRead>(reader: &mut R, depth: usize) -> Result<Value, DecodingError> {
    if depth > MAX_DEPTH {
        return Err(DecodingError::DepthExceeded);
    }

    let [prefix] = read_array::<1, _>(reader)?;
    let value = match prefix {
        PREFIX_INT => Value::Int(i128::from_be_bytes(read_array(reader)?)),
        PREFIX_UINT => Value::UInt(u128::from_be_bytes(read_array(reader)?)),
        PREFIX_TRUE => Value::Bool(true),
        PREFIX_FALSE => Value::Bool(false),
        PREFIX_BUFFER => {
            let len = u32::from_be_bytes(read_array(reader)?) as usize;
            Value::Buffer(read_bytes(reader, len)?)
        }
        PREFIX_STRING_ASCII => {
            let len = u32::from_be_bytes(read_array(reader)?) as usize;
            let bytes = read_bytes(reader, len)?;
            if !is_printable_ascii(&bytes) {
                return Err(DecodingError::InvalidAscii);
            }
            Value::StringAscii(String::from_utf8(bytes).map_err(|_| DecodingError::InvalidAscii)?)
        }
        PREFIX_TUPLE => {
            let count = u32::from_be_bytes(read_array(reader)?);
            let mut tuple = Tuple::new();
            let mut previous: Option<FieldName> = None;
            for _ in 0..count {
                let [name_len] = read_array::<1, _>(reader)?;
                let name = String::from_utf8(read_bytes(reader, name_len as usize)?)
                    .ok()
                    .and_then(|name| FieldName::new(name).ok())
                    .ok_or(DecodingError::InvalidFieldName)?;
                if previous.as_ref().is_some_and(|previous| *previous >= name) {
                    return Err(DecodingError::NonCanonicalTuple);
                }
                let field = read_value(reader, depth + 1)?;
                previous = Some(name.clone());
                tuple.insert(name, field);
            }
            Value::Tuple(tuple)
        }
        other => return Err(DecodingError::UnknownPrefix(other)),
    };
    Ok(value)
}
