use thiserror::Error;

/// Errors that can occur while producing a consensus encoding.
///
/// Encoding only fails when a value cannot be represented on the wire at
/// all; a value that encodes successfully always decodes back to itself.
#[derive(Error, Debug)]
pub enum EncodingError {
    /// A tuple field name is empty, too long, or contains a character
    /// outside the allowed name alphabet.
    #[error("Invalid tuple field name: {0:?}")]
    InvalidFieldName(String),

    /// An ASCII string contains a byte outside the printable range.
    #[error("String is not printable ASCII")]
    InvalidAscii,

    /// A buffer, string or tuple is longer than a `u32` length prefix allows.
    #[error("Value of length {0} exceeds the maximum encodable length")]
    TooLong(usize),

    /// Writing to the output buffer failed.
    #[error("Failed to write encoded value: {0}")]
    Write(#[from] std::io::Error),
}

/// Errors that can occur while decoding a consensus encoding.
///
/// Every length prefix is checked against the bytes that are actually
/// available, so a truncated or hostile input is reported here rather than
/// read out of bounds.
#[derive(Error, Debug)]
pub enum DecodingError {
    /// The input ended before the declared value was complete.
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// The type prefix byte does not name a supported value type.
    #[error("Unknown type prefix {0:#04x}")]
    UnknownPrefix(u8),

    /// A tuple field name is not a valid name.
    #[error("Invalid tuple field name")]
    InvalidFieldName,

    /// Tuple fields are not in strictly ascending order.
    #[error("Tuple fields are not in canonical order")]
    NonCanonicalTuple,

    /// An ASCII string contains a byte outside the printable range.
    #[error("String is not printable ASCII")]
    InvalidAscii,

    /// Values are nested deeper than [`crate::MAX_DEPTH`].
    #[error("Value nesting exceeds the maximum depth")]
    DepthExceeded,

    /// Input remained after a complete value was decoded.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    /// The value decoded but does not have the expected shape.
    #[error("Unexpected value shape: expected {0}")]
    UnexpectedShape(&'static str),

    /// Reading from the input failed.
    #[error("Failed to read encoded value: {0}")]
    Read(std::io::Error),
}

impl From<std::io::Error> for DecodingError {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            std::io::ErrorKind::UnexpectedEof => DecodingError::UnexpectedEnd,
            _ => DecodingError::Read(value),
        }
    }
}
