//! Consensus value model.
//!
//! Only the value types that signed wallet actions use are modelled: signed
//! and unsigned 128-bit integers, booleans, byte buffers, ASCII strings and
//! tuples of named fields.

use crate::EncodingError;
use std::{borrow::Borrow, collections::BTreeMap, fmt, str::FromStr};

/// Longest permitted tuple field name, in bytes.
pub const MAX_FIELD_NAME_LEN: usize = 128;

/// A value that can be written with the consensus encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed 128-bit integer.
    Int(i128),
    /// Unsigned 128-bit integer.
    UInt(u128),
    /// Boolean.
    Bool(bool),
    /// Opaque byte buffer.
    Buffer(Vec<u8>),
    /// Printable ASCII string.
    StringAscii(String),
    /// Named fields, kept in canonical (ascending name) order.
    Tuple(Tuple),
}

impl Value {
    /// Returns the unsigned integer if this is a [`Value::UInt`].
    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Value::UInt(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the bytes if this is a [`Value::Buffer`].
    pub fn as_buffer(&self) -> Option<&[u8]> {
        match self {
            Value::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the string if this is a [`Value::StringAscii`].
    pub fn as_ascii(&self) -> Option<&str> {
        match self {
            Value::StringAscii(string) => Some(string),
            _ => None,
        }
    }

    /// Returns the tuple if this is a [`Value::Tuple`].
    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            Value::Tuple(tuple) => Some(tuple),
            _ => None,
        }
    }
}

impl From<u128> for Value {
    fn from(value: u128) -> Self {
        Value::UInt(value)
    }
}

impl From<i128> for Value {
    fn from(value: i128) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Buffer(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Buffer(value.to_vec())
    }
}

impl From<Tuple> for Value {
    fn from(value: Tuple) -> Self {
        Value::Tuple(value)
    }
}

/// Checks that `bytes` only holds printable ASCII (plus tab, newline and
/// carriage return).
pub fn is_printable_ascii(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|byte| matches!(byte, 0x20..=0x7e | b'\t' | b'\n' | b'\r'))
}

/// The name of a tuple field.
///
/// Names are 1 to [`MAX_FIELD_NAME_LEN`] bytes drawn from ASCII letters,
/// digits and `-_!?+<>=/*`, and must not start with a digit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldName(String);

impl FieldName {
    /// Validate and wrap a field name.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidFieldName`] if the name is empty,
    /// too long or uses characters outside the name alphabet.
    pub fn new(name: impl Into<String>) -> Result<Self, EncodingError> {
        let name = name.into();
        if Self::is_valid(name.as_bytes()) {
            Ok(Self(name))
        } else {
            Err(EncodingError::InvalidFieldName(name))
        }
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(bytes: &[u8]) -> bool {
        let Some(first) = bytes.first() else {
            return false;
        };
        if bytes.len() > MAX_FIELD_NAME_LEN || first.is_ascii_digit() {
            return false;
        }
        bytes.iter().all(|byte| {
            byte.is_ascii_alphanumeric()
                || matches!(byte, b'-' | b'_' | b'!' | b'?' | b'+' | b'<' | b'>' | b'=' | b'/' | b'*')
        })
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for FieldName {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A tuple of named values.
///
/// Fields are held in a [`BTreeMap`] so iteration is always in ascending
/// byte order of the name, which is the order the encoding requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tuple(BTreeMap<FieldName, Value>);

impl Tuple {
    /// Create an empty tuple.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous value with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidFieldName`] for an invalid name.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, EncodingError> {
        self.0.insert(FieldName::new(name)?, value.into());
        Ok(self)
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tuple has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &Value)> {
        self.0.iter()
    }

    pub(crate) fn insert(&mut self, name: FieldName, value: Value) {
        self.0.insert(name, value);
    }

    /// Insert a field whose name is a known-valid constant.
    pub(crate) fn insert_unchecked(&mut self, name: &'static str, value: Value) {
        debug_assert!(FieldName::is_valid(name.as_bytes()));
        self.0.insert(FieldName(name.to_owned()), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_rejects_invalid_field_names() {
        assert!(FieldName::new("").is_err());
        assert!(FieldName::new("1nonce").is_err());
        assert!(FieldName::new("has space").is_err());
        assert!(FieldName::new("x".repeat(MAX_FIELD_NAME_LEN + 1)).is_err());
        assert!(FieldName::new("owner-pubkey").is_ok());
        assert!(FieldName::new("is-valid?").is_ok());
    }

    #[test]
    fn it_keeps_fields_in_canonical_order() {
        let tuple = Tuple::new()
            .with("payload", vec![1u8, 2])
            .unwrap()
            .with("nonce", 7u128)
            .unwrap();

        let names: Vec<&str> = tuple.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["nonce", "payload"]);
        assert_eq!(tuple.get("nonce").and_then(Value::as_uint), Some(7));
    }

    #[test]
    fn it_looks_up_fields_by_name() {
        let tuple = Tuple::new()
            .with("amount", 10u128)
            .unwrap()
            .with("recipient", Value::StringAscii("ST1".into()))
            .unwrap()
            .with("memo", vec![0xabu8])
            .unwrap();

        assert_eq!(tuple.get("amount"), Some(&Value::UInt(10)));
        assert_eq!(tuple.get("memo").and_then(Value::as_buffer), Some(&[0xab][..]));
        assert_eq!(tuple.get("recipient").and_then(Value::as_ascii), Some("ST1"));
        assert_eq!(tuple.get("missing"), None);
        assert_eq!(tuple.get(""), None);
    }

    #[test]
    fn it_recognizes_printable_ascii() {
        assert!(is_printable_ascii(b"ST1SJ3 YPD5\n"));
        assert!(!is_printable_ascii(&[0x00]));
        assert!(!is_printable_ascii("caf\u{e9}".as_bytes()));
    }
}
