use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "passkey")]
#[command(bin_name = "passkey")]
#[command(about = "Passkey key, signature and wallet tools", long_about = None)]
pub struct PasskeyCli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// Load a JSON wallet configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Refuse DER signatures regardless of the configuration
    #[arg(long, global = true)]
    pub reject_der: bool,

    /// Require low-S signatures regardless of the configuration
    #[arg(long, global = true)]
    pub enforce_low_s: bool,

    /// Log more (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a key pair and print its public keys
    Keygen {
        /// 32-byte secret as hex; random when omitted
        #[arg(long)]
        seed: Option<String>,
    },
    /// Compress a 65-byte uncompressed public key
    Compress {
        /// Uncompressed key as hex
        key: String,
    },
    /// Convert a DER signature to raw r || s
    DerToRaw {
        /// DER signature as hex
        der: String,
    },
    /// Convert a raw r || s signature to DER
    RawToDer {
        /// Raw signature as hex
        raw: String,
    },
    /// Print the encoded action message and its digest
    Digest {
        #[arg(long)]
        nonce: u128,

        /// Payload as hex
        #[arg(long)]
        payload: String,
    },
    /// Sign the digest of an action message
    Sign {
        /// 32-byte secret as hex
        #[arg(long)]
        seed: String,

        #[arg(long)]
        nonce: u128,

        /// Payload as hex
        #[arg(long)]
        payload: String,

        /// Print the DER form instead of raw r || s
        #[arg(long)]
        der: bool,
    },
    /// Register a software passkey and run signed transfers against it
    Simulate {
        /// Number of transfers to execute
        #[arg(long, default_value_t = 3)]
        actions: u32,

        /// 32-byte secret as hex; random when omitted
        #[arg(long)]
        seed: Option<String>,
    },
}
