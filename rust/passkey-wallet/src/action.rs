//! Typed action payloads.

use passkey_encoding::{Codec, ConsensusCodec, DecodingError, EncodingError, Tuple, Value};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

const AMOUNT_FIELD: &str = "amount";
const RECIPIENT_FIELD: &str = "recipient";

/// A transfer of `amount` to `recipient`.
///
/// Encoded as the consensus tuple `{ amount: uint, recipient: string-ascii }`;
/// the encoded bytes are the action payload that gets signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferAction {
    /// Amount to transfer.
    pub amount: u128,
    /// Recipient address as printable ASCII.
    pub recipient: String,
}

impl TransferAction {
    /// Create a transfer.
    pub fn new(amount: u128, recipient: impl Into<String>) -> Self {
        Self {
            amount,
            recipient: recipient.into(),
        }
    }

    /// Encode as an action payload.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidAscii`] if the recipient is not
    /// printable ASCII.
    pub fn to_payload(&self) -> Result<Vec<u8>, EncodingError> {
        ConsensusCodec.encode_to_vec(self)
    }

    /// Decode from an action payload.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are not exactly one transfer tuple.
    pub fn from_payload(payload: &[u8]) -> Result<Self, DecodingError> {
        Self::try_from(&ConsensusCodec.decode(payload)?)
    }

    fn to_value(&self) -> Result<Value, EncodingError> {
        Ok(Tuple::new()
            .with(AMOUNT_FIELD, self.amount)?
            .with(RECIPIENT_FIELD, Value::StringAscii(self.recipient.clone()))?
            .into())
    }
}

impl TryFrom<&Value> for TransferAction {
    type Error = DecodingError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        const SHAPE: &str = "tuple { amount: uint, recipient: string-ascii }";

        let tuple = value
            .as_tuple()
            .filter(|tuple| tuple.len() == 2)
            .ok_or(DecodingError::UnexpectedShape(SHAPE))?;
        let amount = tuple
            .get(AMOUNT_FIELD)
            .and_then(Value::as_uint)
            .ok_or(DecodingError::UnexpectedShape(SHAPE))?;
        let recipient = tuple
            .get(RECIPIENT_FIELD)
            .and_then(Value::as_ascii)
            .ok_or(DecodingError::UnexpectedShape(SHAPE))?;

        Ok(Self::new(amount, recipient))
    }
}

impl Codec<TransferAction> for ConsensusCodec {
    type EncodingError = EncodingError;
    type DecodingError = DecodingError;

    fn encode_payload<W: Write>(
        &self,
        payload: &TransferAction,
        buffer: &mut W,
    ) -> Result<(), EncodingError> {
        <Self as Codec<Value>>::encode_payload(self, &payload.to_value()?, buffer)
    }

    fn decode_payload<R: BufRead>(&self, reader: &mut R) -> Result<TransferAction, DecodingError> {
        let value = <Self as Codec<Value>>::decode_payload(self, reader)?;
        TransferAction::try_from(&value)
    }
}
