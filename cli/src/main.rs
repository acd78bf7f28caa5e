use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use freeze_wallet_lib::config::WalletConfig;

mod commands;

#[derive(Parser)]
#[command(name = "freeze-wallet")]
#[command(about = "Wallet for managing multisig freeze proposals on a test network")]
struct Cli {
    /// Path to the wallet configuration file
    #[arg(short, long, global = true, default_value = "wallet.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the most recent multisig proposals, newest first
    Proposals,
    /// Submit a freeze or unfreeze proposal through the multisig
    Submit {
        #[command(subcommand)]
        action: commands::submit::SubmitAction,
    },
    /// Confirm a pending proposal
    Confirm {
        /// Proposal id
        id: String,
    },
    /// Execute a fully-confirmed proposal
    Execute {
        /// Proposal id
        id: String,
    },
    /// Show owners, proposal counts, and optional per-account state
    Status {
        /// Also check whether this account is frozen
        #[arg(long)]
        account: Option<String>,

        /// Also show per-owner confirmations for this proposal id
        #[arg(long)]
        proposal: Option<String>,
    },
    /// Show the backend risk policy
    Policy,
    /// Show backend payment metrics
    Metrics,
    /// Send a payment through the backend
    Pay {
        /// Recipient address
        #[arg(long)]
        to: String,

        /// Amount in ETH, e.g. 0.5
        #[arg(long)]
        amount: String,
    },
    /// AI-assisted payment parsing and chat
    Ai {
        #[command(subcommand)]
        action: commands::ai::AiAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = WalletConfig::load(&cli.config)?;

    match cli.command {
        Commands::Proposals => commands::proposals::run(&config).await,
        Commands::Submit { action } => commands::submit::run(&config, action).await,
        Commands::Confirm { id } => commands::confirm::run(&config, &id).await,
        Commands::Execute { id } => commands::execute::run(&config, &id).await,
        Commands::Status { account, proposal } => {
            commands::status::run(&config, account.as_deref(), proposal.as_deref()).await
        }
        Commands::Policy => commands::policy::run(&config).await,
        Commands::Metrics => commands::metrics::run(&config).await,
        Commands::Pay { to, amount } => commands::pay::run(&config, &to, &amount).await,
        Commands::Ai { action } => commands::ai::run(&config, action).await,
    }
}
