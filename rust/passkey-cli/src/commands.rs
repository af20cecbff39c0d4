//! Subcommand implementations.
//!
//! Every command writes one pretty-printed JSON document to the output.

use crate::cli::{Command, GlobalOptions, PasskeyCli};
use anyhow::{Context, Result, anyhow, bail};
use passkey_credentials::{RawSignature, SoftwareAuthenticator, compress, decode_der};
use passkey_encoding::{ActionMessage, Codec, ConsensusCodec};
use passkey_wallet::{
    AccountId, AccountRegistry, ActionVerifier, SubmittedSignature, TransferAction, WalletConfig,
};
use serde_json::{Value, json};
use std::{fs, io::Write};

/// Run a parsed command line, writing its result to `out`.
pub fn run<W: Write>(cli: PasskeyCli, out: &mut W) -> Result<()> {
    let config = load_config(&cli.options)?;
    tracing::debug!(?config, "loaded wallet configuration");

    let report = match cli.command {
        Command::Keygen { seed } => keygen(seed.as_deref())?,
        Command::Compress { key } => {
            let key = compress(&decode_hex("key", &key)?)?;
            json!({ "compressed": key.to_string() })
        }
        Command::DerToRaw { der } => {
            let raw = decode_der(&decode_hex("der", &der)?)?;
            json!({ "raw": raw.to_string() })
        }
        Command::RawToDer { raw } => {
            let raw = RawSignature::from_slice(&decode_hex("raw", &raw)?)?;
            json!({ "der": hex::encode(raw.to_der()) })
        }
        Command::Digest { nonce, payload } => {
            let message = ActionMessage::new(nonce, decode_hex("payload", &payload)?);
            json!({
                "encoded": hex::encode(ConsensusCodec.encode_to_vec(&message)?),
                "digest": message.digest()?.to_string(),
            })
        }
        Command::Sign {
            seed,
            nonce,
            payload,
            der,
        } => {
            let authenticator = authenticator(Some(&seed))?;
            let digest = ActionMessage::new(nonce, decode_hex("payload", &payload)?).digest()?;
            let signature = if der {
                hex::encode(authenticator.sign_der(digest.bytes())?)
            } else {
                authenticator.sign_digest(digest.bytes())?.to_string()
            };
            json!({ "digest": digest.to_string(), "signature": signature })
        }
        Command::Simulate { actions, seed } => simulate(config, actions, seed.as_deref())?,
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// Resolve the wallet configuration from `--config` and the override flags.
pub fn load_config(options: &GlobalOptions) -> Result<WalletConfig> {
    let mut config = match &options.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => WalletConfig::default(),
    };
    if options.reject_der {
        config = config.with_accept_der(false);
    }
    if options.enforce_low_s {
        config = config.with_enforce_low_s(true);
    }
    Ok(config)
}

fn decode_hex(name: &str, text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(text).with_context(|| format!("{name} is not valid hex"))
}

fn authenticator(seed: Option<&str>) -> Result<SoftwareAuthenticator> {
    match seed {
        Some(seed) => {
            let seed: [u8; 32] = decode_hex("seed", seed)?
                .try_into()
                .map_err(|bytes: Vec<u8>| anyhow!("seed must be 32 bytes, got {}", bytes.len()))?;
            Ok(SoftwareAuthenticator::from_seed(&seed)?)
        }
        None => Ok(SoftwareAuthenticator::generate()?),
    }
}

fn keygen(seed: Option<&str>) -> Result<Value> {
    let authenticator = authenticator(seed)?;
    Ok(json!({
        "seed": hex::encode(authenticator.signing_key().to_bytes()),
        "uncompressed": hex::encode(authenticator.uncompressed_public_key()),
        "compressed": authenticator.public_key().to_string(),
    }))
}

fn simulate(config: WalletConfig, actions: u32, seed: Option<&str>) -> Result<Value> {
    let authenticator = authenticator(seed)?;
    let registry = AccountRegistry::new(ActionVerifier::new(config));
    let account = AccountId::from("simulated");

    let key = compress(&authenticator.uncompressed_public_key())?;
    registry.register(&account, key.as_bytes())?;
    tracing::info!(%account, %key, "registered software passkey");

    let mut receipts = Vec::new();
    let mut last = None;
    for index in 0..actions {
        let transfer = TransferAction::new(u128::from(index + 1) * 100, format!("recipient-{index}"));
        let nonce = registry.nonce(&account);
        let digest = ActionMessage::new(nonce, transfer.to_payload()?).digest()?;
        let signature = if config.accept_der {
            SubmittedSignature::from(authenticator.sign_der(digest.bytes())?)
        } else {
            SubmittedSignature::from(authenticator.sign_digest(digest.bytes())?)
        };

        receipts.push(registry.execute_transfer(&account, &transfer, &signature)?);
        last = Some((transfer, signature));
    }

    let replay = match last {
        Some((transfer, signature)) => {
            match registry.execute_transfer(&account, &transfer, &signature) {
                Ok(_) => bail!("replayed signature was accepted"),
                Err(error) => json!({ "error": error, "code": error.code() }),
            }
        }
        None => Value::Null,
    };

    Ok(json!({
        "account": account,
        "public_key": key,
        "receipts": receipts,
        "replay": replay,
        "nonce": registry.nonce(&account),
    }))
}
