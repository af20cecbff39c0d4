//! Receipts for executed actions.

use passkey_encoding::MessageDigest;
use serde::{Serialize, Serializer};

/// Message carried by every successful receipt.
pub const ACTION_EXECUTED: &str = "Action executed successfully";

/// Proof that an action was verified and its nonce consumed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionReceipt {
    /// The nonce the action was signed with.
    pub nonce: u128,

    /// The nonce the next action must be signed with.
    pub next_nonce: u128,

    /// The digest that was verified.
    #[serde(serialize_with = "serialize_display")]
    pub digest: MessageDigest,

    /// The executed payload.
    #[serde(serialize_with = "serialize_hex")]
    pub payload: Vec<u8>,

    /// Human-readable outcome.
    pub message: &'static str,
}

impl ActionReceipt {
    pub(crate) fn new(nonce: u128, next_nonce: u128, digest: MessageDigest, payload: &[u8]) -> Self {
        Self {
            nonce,
            next_nonce,
            digest,
            payload: payload.to_vec(),
            message: ACTION_EXECUTED,
        }
    }
}

fn serialize_display<S>(digest: &MessageDigest, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(digest)
}

fn serialize_hex<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}
