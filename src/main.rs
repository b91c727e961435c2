//! hello-ledger command-line client.
//!
//! One-off reads and writes of the `HelloHedera` message.
//!
//! ```text
//! hello-ledger [--config FILE] [--contract ADDR] read
//! hello-ledger [--config FILE] [--contract ADDR] write <MESSAGE>
//! hello-ledger [--config FILE] status
//! ```
//!
//! Connection parameters come from the config file and the environment
//! (`TESTNET_ENDPOINT`, `CONTRACT_ADDRESS`, `HEX_PRIVATE_KEY`).

use std::path::PathBuf;
use std::process::ExitCode;

use alloy::primitives::utils::format_ether;
use clap::{Parser, Subcommand};

use hello_ledger::blockchain::{BlockchainClient, EndpointBinding};
use hello_ledger::config::{self, ClientConfig};
use hello_ledger::error::{ClientError, ClientResult};
use hello_ledger::observability::logging;
use hello_ledger::session::{explorer_link, RequestStatus, Session};

#[derive(Parser)]
#[command(name = "hello-ledger")]
#[command(about = "Read and update the message stored in a HelloHedera contract", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Contract address, overriding config and CONTRACT_ADDRESS
    #[arg(long, global = true)]
    contract: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current message
    Read,
    /// Replace the message and wait for confirmation
    Write {
        /// New message
        message: String,
    },
    /// Check connectivity, chain ID and signer balance
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => return report(&ClientError::from(e)),
    };
    if let Some(address) = cli.contract {
        config.contract.address = address;
    }

    logging::init(&config.observability.log_level);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            report(&e)
        }
    }
}

/// Print the error; configuration problems exit with 2, everything else 1.
fn report(err: &ClientError) -> ExitCode {
    eprintln!("Error: {}", err);
    if err.is_fatal() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config(path),
        None => config::load_from_env(),
    }
}

async fn run(command: Commands, config: &ClientConfig) -> ClientResult<()> {
    let endpoint = EndpointBinding::from_config(config);

    match command {
        Commands::Read => {
            let session = Session::establish(config, &endpoint)?;
            println!("Reading message from contract {}", session.contract().address());
            let value = session.load_value().await?;
            println!("Current message: {}", value);
        }
        Commands::Write { message } => {
            let session = Session::establish(config, &endpoint)?;
            println!("Updating message in contract {}", session.contract().address());

            let mut updates = session.subscribe();
            let explorer_prefix = config.network.explorer_tx_url.clone();
            let announcer = tokio::spawn(async move {
                let tx_hash = updates
                    .wait_for(|s| s.transaction_id.is_some())
                    .await
                    .ok()
                    .and_then(|s| s.transaction_id);
                if let Some(tx_hash) = tx_hash {
                    println!("Transaction submitted: {}", tx_hash);
                    println!("Track it at {}", explorer_link(&explorer_prefix, &tx_hash));
                }
            });

            let result = session.submit_update(&message).await;

            let state = session.snapshot();
            if state.transaction_id.is_some() {
                let _ = announcer.await;
            } else {
                announcer.abort();
            }

            match result {
                Ok(value) => println!("Message updated successfully: {}", value),
                // Finalized on the ledger; only the read-back failed.
                Err(ClientError::RemoteCall(e))
                    if state.last_status == Some(RequestStatus::Confirmed) =>
                {
                    println!("Message updated successfully");
                    tracing::warn!(error = %e, "Read-back after confirmation failed");
                    eprintln!("Warning: could not read back the new value: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
        Commands::Status => {
            let client = BlockchainClient::connect(&endpoint, &config.network)?;
            let signer = client.wallet().address();
            println!("Endpoint: {}", config.network.rpc_url);
            println!("Signer:   {}", signer);

            client.verify_chain_id().await.map_err(ClientError::RemoteCall)?;
            println!("Chain ID: {} (matches)", config.network.chain_id);

            let block = client.get_block_number().await.map_err(ClientError::RemoteCall)?;
            println!("Block:    {}", block);

            let balance = client.get_balance(signer).await.map_err(ClientError::RemoteCall)?;
            println!("Balance:  {}", format_ether(balance));
        }
    }

    Ok(())
}
