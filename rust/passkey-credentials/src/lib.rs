#![warn(missing_docs)]

//! P-256 passkey credentials.
//!
//! Passkey authenticators export their public key as an uncompressed SEC1
//! point and sign challenges with ECDSA P-256, returning ASN.1 DER. This
//! crate holds the pieces needed to accept those artifacts:
//!
//! - [`compress`] turns the 65-byte exported key into the 33-byte
//!   [`PublicKey`] accounts store.
//! - [`decode_der`] and [`encode_der`] convert between DER and the
//!   fixed-width [`RawSignature`].
//! - [`P256Verifier`] checks a raw signature over a 32-byte digest.
//! - [`SoftwareAuthenticator`] plays the device's role in tests and tools.
//!
//! ```rust
//! use passkey_credentials::{P256Verifier, SoftwareAuthenticator, compress};
//!
//! let authenticator = SoftwareAuthenticator::from_seed(&[7u8; 32]).unwrap();
//! let key = compress(&authenticator.uncompressed_public_key()).unwrap();
//!
//! let challenge = [0x42u8; 32];
//! let der = authenticator.sign_der(&challenge).unwrap();
//! let raw = der.decode().unwrap();
//!
//! let verifier = P256Verifier::new(key).unwrap();
//! assert!(verifier.verify_digest(&challenge, &raw, false).is_ok());
//! ```

mod authenticator;
pub use authenticator::*;

mod error;
pub use error::*;

pub mod key;
pub use self::key::{COMPRESSED_KEY_LEN, PublicKey, UNCOMPRESSED_KEY_LEN, compress};

pub mod signature;
pub use self::signature::{
    DerSignature, RAW_SIGNATURE_LEN, RawSignature, SCALAR_LEN, decode_der, encode_der,
};

mod verifier;
pub use verifier::*;
