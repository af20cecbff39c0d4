//! Registration and nonce-bound action verification.

use crate::{ActionError, ActionReceipt, ActionState, SubmittedSignature, TransferAction, WalletConfig};
use passkey_credentials::{P256Verifier, PublicKey};
use passkey_encoding::{ActionMessage, Codec, ConsensusCodec};

/// Drives an [`ActionState`] through registration and signed actions.
///
/// The verifier itself holds no account state, only policy
/// ([`WalletConfig`]) and the codec that turns `{ nonce, payload }` into the
/// bytes the authenticator signed. Callers pass the account state in by
/// `&mut`, so one verifier can serve any number of accounts.
///
/// ```rust
/// use passkey_credentials::SoftwareAuthenticator;
/// use passkey_encoding::ActionMessage;
/// use passkey_wallet::{ActionState, ActionVerifier, SubmittedSignature};
///
/// let authenticator = SoftwareAuthenticator::from_seed(&[1u8; 32]).unwrap();
/// let verifier = ActionVerifier::default();
/// let mut state = ActionState::new();
///
/// verifier
///     .register(&mut state, authenticator.public_key().as_bytes())
///     .unwrap();
///
/// let payload = b"hello".to_vec();
/// let digest = ActionMessage::new(state.nonce(), payload.clone()).digest().unwrap();
/// let signature = authenticator.sign_der(digest.bytes()).unwrap();
///
/// let receipt = verifier
///     .execute_action(&mut state, &payload, &SubmittedSignature::from(signature))
///     .unwrap();
/// assert_eq!(receipt.nonce, 0);
/// assert_eq!(state.nonce(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct ActionVerifier<C = ConsensusCodec> {
    config: WalletConfig,
    codec: C,
}

impl ActionVerifier<ConsensusCodec> {
    /// Create a verifier that uses the consensus codec.
    pub fn new(config: WalletConfig) -> Self {
        Self::with_codec(config, ConsensusCodec)
    }
}

impl Default for ActionVerifier<ConsensusCodec> {
    fn default() -> Self {
        Self::new(WalletConfig::default())
    }
}

impl<C> ActionVerifier<C>
where
    C: Codec<ActionMessage>,
{
    /// Create a verifier with a custom message codec.
    pub fn with_codec(config: WalletConfig, codec: C) -> Self {
        Self { config, codec }
    }

    /// The active policy.
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Register `candidate` (a 33-byte compressed key) as the account's key.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::AlreadyInitialized`] if the account already
    /// has a key, and [`ActionError::InvalidKeyFormat`] if the candidate is
    /// not a compressed key. The stored key is never replaced.
    pub fn register(&self, state: &mut ActionState, candidate: &[u8]) -> Result<(), ActionError> {
        if state.is_initialized() {
            tracing::warn!("registration refused: account already initialized");
            return Err(ActionError::AlreadyInitialized);
        }
        let public_key = PublicKey::from_bytes(candidate).map_err(|error| {
            tracing::warn!(%error, "registration refused");
            ActionError::from(error)
        })?;
        state.initialize(public_key)?;
        tracing::debug!(y_odd = public_key.is_y_odd(), "registered passkey");
        Ok(())
    }

    /// The registered public key.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NotInitialized`] before registration.
    pub fn public_key<'a>(&self, state: &'a ActionState) -> Result<&'a PublicKey, ActionError> {
        state.public_key()
    }

    /// The nonce the next action must be signed with.
    pub fn nonce(&self, state: &ActionState) -> u128 {
        state.nonce()
    }

    /// Verify `signature` over `{ nonce: state.nonce(), payload }` and, if it
    /// holds, consume the nonce.
    ///
    /// On any error the state is left untouched.
    ///
    /// # Errors
    ///
    /// - [`ActionError::NotInitialized`] if no key is registered.
    /// - [`ActionError::MalformedSignature`] if the signature cannot be
    ///   normalized to raw form.
    /// - [`ActionError::InvalidSignature`] if it does not verify, including
    ///   when it was made for an earlier nonce.
    pub fn execute_action(
        &self,
        state: &mut ActionState,
        payload: &[u8],
        signature: &SubmittedSignature,
    ) -> Result<ActionReceipt, ActionError> {
        let nonce = state.nonce();
        let result = self.verify(state, payload, signature);
        match result {
            Ok(receipt) => {
                state.set_nonce(receipt.next_nonce);
                tracing::debug!(nonce, "executed action");
                Ok(receipt)
            }
            Err(error) => {
                tracing::warn!(nonce, code = error.code(), %error, "rejected action");
                Err(error)
            }
        }
    }

    /// Encode `transfer` with the consensus codec and execute it.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MalformedPayload`] if the transfer cannot be
    /// encoded, otherwise the errors of [`ActionVerifier::execute_action`].
    pub fn execute_transfer(
        &self,
        state: &mut ActionState,
        transfer: &TransferAction,
        signature: &SubmittedSignature,
    ) -> Result<ActionReceipt, ActionError> {
        let payload = transfer.to_payload()?;
        self.execute_action(state, &payload, signature)
    }

    fn verify(
        &self,
        state: &ActionState,
        payload: &[u8],
        signature: &SubmittedSignature,
    ) -> Result<ActionReceipt, ActionError> {
        let public_key = *state.public_key()?;
        let signature = signature.to_raw(&self.config)?;

        let nonce = state.nonce();
        let next_nonce = nonce.checked_add(1).ok_or(ActionError::NonceExhausted)?;

        let digest = ActionMessage::new(nonce, payload)
            .digest_with(&self.codec)
            .map_err(|_| ActionError::MalformedPayload)?;
        tracing::trace!(nonce, %digest, "reconstructed action digest");

        P256Verifier::new(public_key)?.verify_digest(
            digest.bytes(),
            &signature,
            self.config.enforce_low_s,
        )?;

        Ok(ActionReceipt::new(nonce, next_nonce, digest, payload))
    }
}
