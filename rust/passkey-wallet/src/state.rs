//! Per-account wallet state.

use crate::ActionError;
use passkey_credentials::PublicKey;
use serde::{Deserialize, Serialize};

/// The state of one passkey-controlled account.
///
/// An account starts uninitialized with nonce `0`. Registration stores its
/// compressed public key exactly once; each successful action advances the
/// nonce by one. The key and the nonce are only changed through
/// [`ActionVerifier`](crate::ActionVerifier), which keeps both transitions
/// all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    public_key: Option<PublicKey>,
    nonce: u128,
}

impl ActionState {
    /// Create an uninitialized account.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a public key has been registered.
    pub fn is_initialized(&self) -> bool {
        self.public_key.is_some()
    }

    /// The registered public key.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NotInitialized`] if no key has been registered.
    pub fn public_key(&self) -> Result<&PublicKey, ActionError> {
        self.public_key.as_ref().ok_or(ActionError::NotInitialized)
    }

    /// The nonce the next action must be signed with.
    pub fn nonce(&self) -> u128 {
        self.nonce
    }

    pub(crate) fn initialize(&mut self, public_key: PublicKey) -> Result<(), ActionError> {
        if self.public_key.is_some() {
            return Err(ActionError::AlreadyInitialized);
        }
        self.public_key = Some(public_key);
        Ok(())
    }

    pub(crate) fn set_nonce(&mut self, nonce: u128) {
        self.nonce = nonce;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_starts_uninitialized_at_nonce_zero() {
        let state = ActionState::new();
        assert!(!state.is_initialized());
        assert_eq!(state.nonce(), 0);
        assert_eq!(state.public_key(), Err(ActionError::NotInitialized));
    }

    #[test]
    fn it_never_overwrites_the_key() {
        let first = PublicKey::from_bytes(&[0x02; 33]).unwrap();
        let second = PublicKey::from_bytes(&[0x03; 33]).unwrap();

        let mut state = ActionState::new();
        state.initialize(first).unwrap();
        assert_eq!(
            state.initialize(second),
            Err(ActionError::AlreadyInitialized)
        );
        assert_eq!(state.public_key(), Ok(&first));
    }

    #[test]
    fn it_serializes_the_key_as_hex() {
        let mut state = ActionState::new();
        state
            .initialize(PublicKey::from_bytes(&[0x02; 33]).unwrap())
            .unwrap();
        state.set_nonce(3);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["nonce"], 3);
        assert_eq!(json["public_key"], "02".repeat(33));
        assert_eq!(serde_json::from_value::<ActionState>(json).unwrap(), state);
    }
}
