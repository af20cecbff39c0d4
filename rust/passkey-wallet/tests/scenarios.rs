//! End-to-end account lifecycles: register, act, replay, tamper.

use passkey_credentials::{SoftwareAuthenticator, compress};
use passkey_encoding::ActionMessage;
use passkey_wallet::{
    ActionError, ActionState, ActionVerifier, SubmittedSignature, TransferAction, WalletConfig,
};
use pretty_assertions::assert_eq;
use testresult::TestResult;

struct Wallet {
    authenticator: SoftwareAuthenticator,
    verifier: ActionVerifier,
    state: ActionState,
}

impl Wallet {
    fn register(seed: u8, config: WalletConfig) -> TestResult<Self> {
        let authenticator = SoftwareAuthenticator::from_seed(&[seed; 32])?;
        let verifier = ActionVerifier::new(config);
        let mut state = ActionState::new();

        let key = compress(&authenticator.uncompressed_public_key())?;
        verifier.register(&mut state, key.as_bytes())?;
        Ok(Self {
            authenticator,
            verifier,
            state,
        })
    }

    fn sign(&self, nonce: u128, payload: &[u8]) -> TestResult<SubmittedSignature> {
        let digest = ActionMessage::new(nonce, payload).digest()?;
        Ok(self.authenticator.sign_der(digest.bytes())?.into())
    }

    fn execute(&mut self, payload: &[u8], signature: &SubmittedSignature) -> Result<u128, ActionError> {
        self.verifier
            .execute_action(&mut self.state, payload, signature)
            .map(|receipt| receipt.nonce)
    }
}

#[test]
fn it_rejects_a_replayed_signature() -> TestResult {
    let mut wallet = Wallet::register(1, WalletConfig::default())?;
    let payload = vec![0xaa; 128];
    let signature = wallet.sign(0, &payload)?;

    assert_eq!(wallet.execute(&payload, &signature), Ok(0));
    assert_eq!(wallet.state.nonce(), 1);

    assert_eq!(
        wallet.execute(&payload, &signature),
        Err(ActionError::InvalidSignature)
    );
    assert_eq!(wallet.state.nonce(), 1);
    Ok(())
}

#[test]
fn it_refuses_to_act_before_registration_whatever_the_signature() -> TestResult {
    let verifier = ActionVerifier::default();
    let mut state = ActionState::new();
    let authenticator = SoftwareAuthenticator::from_seed(&[2; 32])?;
    let digest = ActionMessage::new(0, b"p".to_vec()).digest()?;

    for signature in [
        SubmittedSignature::from(authenticator.sign_der(digest.bytes())?),
        SubmittedSignature::from(authenticator.sign_digest(digest.bytes())?),
        SubmittedSignature::Raw(vec![]),
        SubmittedSignature::Der(vec![0xff; 80]),
    ] {
        assert_eq!(
            verifier.execute_action(&mut state, b"p", &signature),
            Err(ActionError::NotInitialized)
        );
    }
    assert_eq!(verifier.public_key(&state), Err(ActionError::NotInitialized));
    Ok(())
}

#[test]
fn it_counts_only_successful_actions() -> TestResult {
    let mut wallet = Wallet::register(3, WalletConfig::default())?;
    let mut successes = 0u128;

    for round in 0..6u8 {
        let payload = vec![round; 4];
        let nonce = wallet.state.nonce();

        // A signature for the wrong nonce, a tampered payload and garbage.
        let stale = wallet.sign(nonce + 1, &payload)?;
        assert_eq!(wallet.execute(&payload, &stale), Err(ActionError::InvalidSignature));
        let signed = wallet.sign(nonce, &payload)?;
        assert_eq!(wallet.execute(b"other", &signed), Err(ActionError::InvalidSignature));
        assert_eq!(
            wallet.execute(&payload, &SubmittedSignature::Der(vec![0x30, 0x00])),
            Err(ActionError::MalformedSignature)
        );
        assert_eq!(wallet.state.nonce(), successes);

        assert_eq!(wallet.execute(&payload, &signed), Ok(nonce));
        successes += 1;
        assert_eq!(wallet.state.nonce(), successes);
    }
    Ok(())
}

#[test]
fn it_rejects_signatures_from_another_passkey() -> TestResult {
    let mut wallet = Wallet::register(4, WalletConfig::default())?;
    let intruder = SoftwareAuthenticator::from_seed(&[5; 32])?;

    let digest = ActionMessage::new(0, b"drain".to_vec()).digest()?;
    let signature = SubmittedSignature::from(intruder.sign_der(digest.bytes())?);
    assert_eq!(
        wallet.execute(b"drain", &signature),
        Err(ActionError::InvalidSignature)
    );
    Ok(())
}

#[test]
fn it_accepts_raw_and_der_forms_of_the_same_signature() -> TestResult {
    let mut wallet = Wallet::register(6, WalletConfig::default())?;

    let digest = ActionMessage::new(0, b"a".to_vec()).digest()?;
    let raw = wallet.authenticator.sign_digest(digest.bytes())?;
    assert_eq!(wallet.execute(b"a", &raw.into()), Ok(0));

    let digest = ActionMessage::new(1, b"b".to_vec()).digest()?;
    let der = wallet.authenticator.sign_der(digest.bytes())?;
    assert_eq!(wallet.execute(b"b", &der.into()), Ok(1));
    Ok(())
}

#[test]
fn it_enforces_low_s_when_configured() -> TestResult {
    let mut lenient = Wallet::register(7, WalletConfig::default())?;
    let mut strict = Wallet::register(7, WalletConfig::default().with_enforce_low_s(true))?;

    // Find a payload whose signature at nonce 0 has a high s.
    let (payload, signature) = (0u8..=255)
        .map(|byte| vec![byte])
        .find_map(|payload| {
            let digest = ActionMessage::new(0, payload.clone()).digest().ok()?;
            let raw = strict.authenticator.sign_digest(digest.bytes()).ok()?;
            let parsed = p256::ecdsa::Signature::from_slice(raw.as_bytes()).ok()?;
            parsed.normalize_s().map(|_| (payload, SubmittedSignature::from(raw)))
        })
        .ok_or("no high-S signature among 256 payloads")?;

    assert_eq!(
        strict.execute(&payload, &signature),
        Err(ActionError::InvalidSignature)
    );
    assert_eq!(strict.state.nonce(), 0);
    assert_eq!(lenient.execute(&payload, &signature), Ok(0));
    Ok(())
}

#[test]
fn it_executes_a_signed_transfer() -> TestResult {
    let mut wallet = Wallet::register(8, WalletConfig::default())?;
    let transfer = TransferAction::new(250, "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM");
    let signature = wallet.sign(0, &transfer.to_payload()?)?;

    let receipt = wallet
        .verifier
        .execute_transfer(&mut wallet.state, &transfer, &signature)?;
    assert_eq!(receipt.next_nonce, 1);

    let json = serde_json::to_value(&receipt)?;
    assert_eq!(json["message"], "Action executed successfully");
    assert_eq!(json["digest"], receipt.digest.to_string());
    assert_eq!(json["payload"], hex::encode(transfer.to_payload()?));
    Ok(())
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Copy, Debug)]
    enum Submission {
        Valid,
        StaleNonce,
        Tampered,
        MalformedDer,
        ForeignKey,
    }

    fn submission() -> impl Strategy<Value = Submission> {
        prop_oneof![
            Just(Submission::Valid),
            Just(Submission::StaleNonce),
            Just(Submission::Tampered),
            Just(Submission::MalformedDer),
            Just(Submission::ForeignKey),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn nonce_counts_exactly_the_successful_actions(
            submissions in prop::collection::vec(submission(), 0..16)
        ) {
            let mut wallet = Wallet::register(12, WalletConfig::default()).unwrap();
            let intruder = SoftwareAuthenticator::from_seed(&[13; 32]).unwrap();
            let mut successes = 0u128;

            for (step, submission) in submissions.into_iter().enumerate() {
                let payload = vec![step as u8; 8];
                let nonce = wallet.state.nonce();

                let result = match submission {
                    Submission::Valid => {
                        let signature = wallet.sign(nonce, &payload).unwrap();
                        wallet.execute(&payload, &signature)
                    }
                    Submission::StaleNonce => {
                        let signature = wallet.sign(nonce.wrapping_sub(1), &payload).unwrap();
                        wallet.execute(&payload, &signature)
                    }
                    Submission::Tampered => {
                        let signature = wallet.sign(nonce, &payload).unwrap();
                        wallet.execute(b"tampered", &signature)
                    }
                    Submission::MalformedDer => {
                        wallet.execute(&payload, &SubmittedSignature::Der(vec![0x30, 0x02, 0x02]))
                    }
                    Submission::ForeignKey => {
                        let digest = ActionMessage::new(nonce, payload.clone()).digest().unwrap();
                        let signature = SubmittedSignature::from(intruder.sign_der(digest.bytes()).unwrap());
                        wallet.execute(&payload, &signature)
                    }
                };

                match submission {
                    Submission::Valid => {
                        prop_assert_eq!(result, Ok(nonce));
                        successes += 1;
                    }
                    Submission::MalformedDer => {
                        prop_assert_eq!(result, Err(ActionError::MalformedSignature));
                    }
                    _ => prop_assert_eq!(result, Err(ActionError::InvalidSignature)),
                }
                prop_assert_eq!(wallet.state.nonce(), successes);
            }
        }
    }
}
