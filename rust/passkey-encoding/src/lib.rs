#![warn(missing_docs)]

//! Canonical encoding of signed wallet actions.
//!
//! An authenticator signs `SHA-256(encode({ nonce, payload }))` and the
//! verifier rebuilds exactly the same bytes from its own account state.
//! Both sides must agree bit for bit, so the encoding lives in one place:
//!
//! - [`Codec`] is the seam a host plugs its serialization convention into.
//! - [`ConsensusCodec`] implements the host chain's consensus value
//!   encoding for the small set of value types actions use.
//! - [`ActionMessage`] and [`MessageDigest`] are the message and the
//!   32-byte challenge derived from it.
//!
//! ```rust
//! use passkey_encoding::ActionMessage;
//!
//! let digest = ActionMessage::new(0, vec![0xaa; 128]).digest().unwrap();
//! assert_eq!(digest.bytes().len(), 32);
//! ```

mod codec;
pub use codec::*;

mod consensus;
pub use consensus::*;

mod error;
pub use error::*;

mod message;
pub use message::*;

mod value;
pub use value::*;
