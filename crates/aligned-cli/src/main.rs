//! Aligned CLI - tools around batcher submissions
//!
//! Commands:
//! - `commitment`: compute the commitment and batch hash of proof artifacts
//! - `vk-commitment`: hash a verification key
//! - `verify-inclusion`: re-check a saved inclusion proof locally
//! - `verify-onchain`: ask the service manager contract about a saved proof
//! - `explorer-link`: print the explorer page for a batch root
//! - `mock-batcher`: run a local batcher double

mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use aligned_client::{
    explorer_link, AlignedVerificationData, MockBatcher, MockBatcherConfig, Network,
    OnchainConfig, OnchainVerifier,
};
use aligned_primitives::{verification_key_commitment, Hash256, ProvingSystemId, VerificationData};

/// Aligned - submit proofs to a batcher and check their inclusion
#[derive(Parser)]
#[command(name = "aligned")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tools for Aligned batcher submissions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the commitment of a proof and its artifacts
    Commitment {
        /// Proving system (e.g. SP1, Groth16Bn254)
        #[arg(short = 's', long)]
        proving_system: ProvingSystemId,

        /// Path to the proof bytes
        #[arg(short, long)]
        proof: PathBuf,

        /// Path to the public input bytes
        #[arg(long)]
        pub_input: Option<PathBuf>,

        /// Path to the verification key
        #[arg(long)]
        vk: Option<PathBuf>,

        /// Path to the VM program code
        #[arg(long)]
        vm_program: Option<PathBuf>,

        /// Proof generator address
        #[arg(short, long)]
        address: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the commitment of a verification key
    VkCommitment {
        /// Path to the verification key
        file: PathBuf,
    },

    /// Verify a saved inclusion proof against its batch root
    VerifyInclusion {
        /// Path to aligned verification data JSON
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Check batch inclusion against the service manager contract
    VerifyOnchain {
        /// Path to aligned verification data JSON
        #[arg(short, long)]
        file: PathBuf,

        /// Network (devnet or holesky)
        #[arg(short, long, default_value = "holesky")]
        network: Network,

        /// Ethereum JSON-RPC endpoint (defaults to the network's public node)
        #[arg(long)]
        rpc_url: Option<String>,
    },

    /// Print the explorer link for a batch
    ExplorerLink {
        /// Batch Merkle root as hex
        root: String,
    },

    /// Run a local batcher double
    MockBatcher {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// Protocol version announced in the handshake
        #[arg(long, default_value = "0")]
        protocol_version: u16,

        /// Seal a batch after this many submissions
        #[arg(long)]
        batch_size: Option<usize>,

        /// Without a batch size, seal after this many idle milliseconds
        #[arg(long, default_value = "250")]
        batch_window_ms: u64,

        /// Close the connection after this many responses
        #[arg(long)]
        close_after: Option<usize>,

        /// Batch positions that get a wrong root (comma-separated)
        #[arg(long, value_delimiter = ',')]
        corrupt: Vec<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Commitment {
            proving_system,
            proof,
            pub_input,
            vk,
            vm_program,
            address,
            json,
        } => commitment(proving_system, proof, pub_input, vk, vm_program, address, json),

        Commands::VkCommitment { file } => vk_commitment(&file),

        Commands::VerifyInclusion { file } => verify_inclusion(&file),

        Commands::VerifyOnchain {
            file,
            network,
            rpc_url,
        } => verify_onchain(&file, network, rpc_url).await,

        Commands::ExplorerLink { root } => {
            let root = Hash256::from_hex(&root).context("Invalid batch root")?;
            println!("{}", explorer_link(&root));
            Ok(())
        }

        Commands::MockBatcher {
            listen,
            protocol_version,
            batch_size,
            batch_window_ms,
            close_after,
            corrupt,
        } => {
            let mut config = MockBatcherConfig::default()
                .with_protocol_version(protocol_version)
                .with_batch_window(Duration::from_millis(batch_window_ms))
                .with_corrupt_indices(corrupt);
            if let Some(size) = batch_size {
                config = config.with_batch_size(size);
            }
            if let Some(count) = close_after {
                config = config.with_responses_before_close(count);
            }
            mock_batcher(&listen, config).await
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_aligned_data(path: &Path) -> Result<AlignedVerificationData> {
    let bytes = read_file(path)?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse aligned verification data from {}", path.display()))
}

fn commitment(
    proving_system: ProvingSystemId,
    proof: PathBuf,
    pub_input: Option<PathBuf>,
    vk: Option<PathBuf>,
    vm_program: Option<PathBuf>,
    address: String,
    json: bool,
) -> Result<()> {
    let mut data = VerificationData::new(proving_system, read_file(&proof)?, address);
    if let Some(path) = pub_input {
        data = data.with_pub_input(read_file(&path)?);
    }
    if let Some(path) = vk {
        data = data.with_verification_key(read_file(&path)?);
    }
    if let Some(path) = vm_program {
        data = data.with_vm_program_code(read_file(&path)?);
    }

    let commitment = data.commitment().context("Failed to compute commitment")?;
    let batch_hash = commitment.batch_hash();

    if json {
        let output = serde_json::json!({
            "proving_system": proving_system.as_str(),
            "proof_commitment": commitment.proof_commitment.to_prefixed_hex(),
            "public_input_commitment": commitment.public_input_commitment.to_prefixed_hex(),
            "proving_system_aux_data_commitment":
                commitment.proving_system_aux_data_commitment.to_prefixed_hex(),
            "proof_generator_addr": commitment.proof_generator_addr.to_hex(),
            "batch_hash": batch_hash.to_prefixed_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Commitment:");
        println!("  Proving System: {}", proving_system);
        println!("  Proof: {}", commitment.proof_commitment);
        println!("  Public Input: {}", commitment.public_input_commitment);
        println!("  Aux Data: {}", commitment.proving_system_aux_data_commitment);
        println!("  Generator: {}", commitment.proof_generator_addr);
        println!("  Batch Hash: {}", batch_hash);
    }
    Ok(())
}

fn vk_commitment(file: &Path) -> Result<()> {
    let vk = read_file(file)?;
    println!("{}", verification_key_commitment(&vk));
    Ok(())
}

fn verify_inclusion(file: &Path) -> Result<()> {
    let data = load_aligned_data(file)?;

    eprintln!("Verifying inclusion...");
    eprintln!("  Batch root: {}", data.batch_merkle_root);
    eprintln!("  Index in batch: {}", data.index_in_batch);
    eprintln!("  Path length: {}", data.batch_inclusion_proof.depth());

    if data.verify_inclusion() {
        println!("VALID");
        Ok(())
    } else {
        println!("INVALID");
        std::process::exit(1);
    }
}

async fn verify_onchain(file: &Path, network: Network, rpc_url: Option<String>) -> Result<()> {
    let data = load_aligned_data(file)?;

    let mut config = match network {
        Network::Devnet => OnchainConfig::devnet(),
        Network::Holesky => OnchainConfig::holesky(),
    };
    if let Some(url) = rpc_url {
        config = config.with_rpc_url(url);
    }

    eprintln!("Checking batch inclusion on {}...", network);
    eprintln!("  Contract: {}", network.contract_address());
    eprintln!("  RPC: {}", config.rpc_url);

    let verifier = OnchainVerifier::try_new(config).context("Failed to build RPC client")?;
    let included = verifier
        .verify_batch_inclusion(&data)
        .await
        .context("verifyBatchInclusion call failed")?;

    if included {
        println!("INCLUDED");
        eprintln!("  {}", data.explorer_link());
        Ok(())
    } else {
        println!("NOT INCLUDED");
        std::process::exit(1);
    }
}

async fn mock_batcher(listen: &str, config: MockBatcherConfig) -> Result<()> {
    let mut batcher = MockBatcher::bind(listen, config)
        .await
        .with_context(|| format!("Failed to listen on {}", listen))?;

    eprintln!("Mock batcher listening on {}", batcher.url());
    eprintln!("Press Ctrl+C to stop");

    tokio::select! {
        _ = batcher.wait() => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl+C")?;
            eprintln!("Shutting down");
        }
    }
    Ok(())
}
