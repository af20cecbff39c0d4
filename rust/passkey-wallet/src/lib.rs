#![warn(missing_docs)]

//! Passkey-controlled wallet accounts.
//!
//! An account is bound to one P-256 passkey at registration. Every action
//! afterwards carries a signature over `SHA-256(encode({ nonce, payload }))`
//! where `nonce` is the account's current nonce, so each signature is good
//! for exactly one action:
//!
//! - [`ActionState`] is the per-account record (key and nonce).
//! - [`ActionVerifier`] drives that record through registration and
//!   signed actions under a [`WalletConfig`].
//! - [`AccountRegistry`] holds many accounts for concurrent hosts.
//! - [`ActionError`] carries the stable numeric error codes.

mod action;
pub use action::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod receipt;
pub use receipt::*;

mod registry;
pub use registry::*;

mod state;
pub use state::*;

mod submission;
pub use submission::*;

mod verifier;
pub use verifier::*;
