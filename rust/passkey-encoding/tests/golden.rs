//! Golden vectors for the action message encoding.
//!
//! Registered accounts depend on the signer and the verifier producing the
//! same bytes forever. These vectors pin the encoding and digest so a
//! change to either fails here instead of silently invalidating every
//! signature produced against an earlier build.

use passkey_encoding::{ActionMessage, Codec, ConsensusCodec};
use pretty_assertions::assert_eq;
use testresult::TestResult;

const ENCODED_PREFIX: &str =
    "0c00000002056e6f6e63650100000000000000000000000000000000077061796c6f616402";

#[test]
fn digest_of_first_action_with_reference_payload() -> TestResult {
    let message = ActionMessage::new(0, vec![0xaa; 128]);

    let encoded = ConsensusCodec.encode_to_vec(&message)?;
    assert_eq!(encoded.len(), 37 + 4 + 128);
    assert_eq!(hex::encode(&encoded[..37]), ENCODED_PREFIX);
    assert_eq!(hex::encode(&encoded[37..41]), "00000080");

    assert_eq!(
        message.digest()?.to_string(),
        "b6ba225a599f7ab0db61bf84b63a32b6d9a6cb28ab97503be3b35e5c3109b736"
    );
    Ok(())
}

#[test]
fn digest_of_second_action_with_reference_payload() -> TestResult {
    let message = ActionMessage::new(1, vec![0xaa; 128]);
    assert_eq!(
        message.digest()?.to_string(),
        "9c643fac00bd6a94bdd3dda6e3a653c2858a384d21a5a96edd0240079d259476"
    );
    Ok(())
}

#[test]
fn digest_of_empty_payload() -> TestResult {
    let message = ActionMessage::new(0, Vec::new());
    assert_eq!(
        message.digest()?.to_string(),
        "347dc9b99f8b7f7ffc8e44855f90c345b2361a421c36c2aa3ac44a0566fb40b2"
    );
    Ok(())
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn distinct_nonces_never_share_a_digest(nonce in 0u128..u128::MAX, payload in prop::collection::vec(any::<u8>(), 0..64)) {
            let current = ActionMessage::new(nonce, payload.clone()).digest().unwrap();
            let next = ActionMessage::new(nonce + 1, payload).digest().unwrap();
            prop_assert_ne!(current, next);
        }
    }
}
