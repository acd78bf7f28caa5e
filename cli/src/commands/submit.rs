use anyhow::Result;
use clap::Subcommand;
use ethereum_types::U256;
use freeze_wallet_lib::config::WalletConfig;
use freeze_wallet_lib::contracts::{self, MultisigContract};
use freeze_wallet_lib::rpc::RpcClient;
use freeze_wallet_lib::validation;

#[derive(Subcommand)]
pub enum SubmitAction {
    /// Propose freezing an account
    Freeze {
        /// Account to freeze
        account: String,
    },
    /// Propose unfreezing an account
    Unfreeze {
        /// Account to unfreeze
        account: String,
    },
}

pub async fn run(config: &WalletConfig, action: SubmitAction) -> Result<()> {
    let sender = config.require_sender()?;
    let rpc = RpcClient::new(config.rpc_url.clone());
    let multisig = MultisigContract::new(&rpc, config.multisig_address);

    let (label, call) = match &action {
        SubmitAction::Freeze { account } => {
            let target = validation::parse_address(account)?;
            ("freeze", contracts::freeze_calldata(&target))
        }
        SubmitAction::Unfreeze { account } => {
            let target = validation::parse_address(account)?;
            ("unfreeze", contracts::unfreeze_calldata(&target))
        }
    };

    let tx_hash = multisig
        .submit_and_confirm(&sender, &config.freeze_address, U256::zero(), &call)
        .await?;
    println!("✓ {label} proposal submitted: {tx_hash}");
    super::settle_and_refetch(config, &rpc, &tx_hash).await
}
