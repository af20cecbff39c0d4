//! Concurrent registry of passkey accounts.

use crate::{
    ActionError, ActionReceipt, ActionState, ActionVerifier, SubmittedSignature, TransferAction,
};
use parking_lot::{Mutex, RwLock};
use passkey_credentials::PublicKey;
use passkey_encoding::{ActionMessage, Codec, ConsensusCodec};
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, hash_map::Entry},
    fmt,
    sync::Arc,
};

/// Identifies an account in an [`AccountRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Many accounts behind one [`ActionVerifier`], safe to share across
/// threads.
///
/// The map is guarded by a [`RwLock`] and every account by its own
/// [`Mutex`], so actions on different accounts proceed in parallel while
/// the verify-then-increment of a single account is serialized. Two threads
/// racing the same signature for the same nonce therefore see exactly one
/// success.
///
/// Unknown accounts behave like uninitialized ones: lookups and actions
/// fail with [`ActionError::NotInitialized`], report nonce `0`, and never
/// create an entry.
pub struct AccountRegistry<C = ConsensusCodec> {
    verifier: ActionVerifier<C>,
    accounts: RwLock<HashMap<AccountId, Arc<Mutex<ActionState>>>>,
}

impl AccountRegistry<ConsensusCodec> {
    /// Create an empty registry using `verifier`.
    pub fn new(verifier: ActionVerifier<ConsensusCodec>) -> Self {
        Self::with_verifier(verifier)
    }
}

impl Default for AccountRegistry<ConsensusCodec> {
    fn default() -> Self {
        Self::new(ActionVerifier::default())
    }
}

impl<C> AccountRegistry<C>
where
    C: Codec<ActionMessage>,
{
    /// Create an empty registry around a verifier with any codec.
    pub fn with_verifier(verifier: ActionVerifier<C>) -> Self {
        Self {
            verifier,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// The verifier every account is checked with.
    pub fn verifier(&self) -> &ActionVerifier<C> {
        &self.verifier
    }

    /// Register `candidate` for `account`, creating the account on first
    /// successful registration.
    ///
    /// # Errors
    ///
    /// See [`ActionVerifier::register`]. A failed registration of a new
    /// account leaves no trace in the registry.
    pub fn register(&self, account: &AccountId, candidate: &[u8]) -> Result<(), ActionError> {
        if let Ok(existing) = self.account(account) {
            return self.verifier.register(&mut existing.lock(), candidate);
        }

        let mut state = ActionState::new();
        self.verifier.register(&mut state, candidate)?;

        let existing = match self.accounts.write().entry(account.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(Mutex::new(state)));
                tracing::debug!(%account, "created account");
                return Ok(());
            }
        };
        // Another caller created the account first.
        self.verifier.register(&mut existing.lock(), candidate)
    }

    /// Execute a signed action on `account`.
    ///
    /// # Errors
    ///
    /// See [`ActionVerifier::execute_action`].
    pub fn execute_action(
        &self,
        account: &AccountId,
        payload: &[u8],
        signature: &SubmittedSignature,
    ) -> Result<ActionReceipt, ActionError> {
        let state = self.account(account)?;
        let mut state = state.lock();
        let span = tracing::debug_span!("account", %account);
        let _guard = span.enter();
        self.verifier.execute_action(&mut state, payload, signature)
    }

    /// Execute a signed transfer on `account`.
    ///
    /// # Errors
    ///
    /// See [`ActionVerifier::execute_transfer`].
    pub fn execute_transfer(
        &self,
        account: &AccountId,
        transfer: &TransferAction,
        signature: &SubmittedSignature,
    ) -> Result<ActionReceipt, ActionError> {
        let payload = transfer.to_payload()?;
        self.execute_action(account, &payload, signature)
    }

    /// The public key registered for `account`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NotInitialized`] for unknown accounts.
    pub fn public_key(&self, account: &AccountId) -> Result<PublicKey, ActionError> {
        let state = self.account(account)?;
        let state = state.lock();
        state.public_key().copied()
    }

    /// The nonce the next action on `account` must be signed with.
    pub fn nonce(&self, account: &AccountId) -> u128 {
        self.account(account)
            .map(|state| state.lock().nonce())
            .unwrap_or_default()
    }

    /// A copy of the state of `account`, if it exists.
    pub fn snapshot(&self, account: &AccountId) -> Option<ActionState> {
        self.account(account).ok().map(|state| state.lock().clone())
    }

    /// All registered account ids, sorted.
    pub fn accounts(&self) -> Vec<AccountId> {
        let mut accounts: Vec<_> = self.accounts.read().keys().cloned().collect();
        accounts.sort();
        accounts
    }

    fn account(&self, account: &AccountId) -> Result<Arc<Mutex<ActionState>>, ActionError> {
        self.accounts
            .read()
            .get(account)
            .cloned()
            .ok_or(ActionError::NotInitialized)
    }
}

impl<C> fmt::Debug for AccountRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRegistry")
            .field("accounts", &self.accounts.read().len())
            .finish_non_exhaustive()
    }
}
