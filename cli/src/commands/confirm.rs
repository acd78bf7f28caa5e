use anyhow::Result;
use freeze_wallet_lib::config::WalletConfig;
use freeze_wallet_lib::contracts::MultisigContract;
use freeze_wallet_lib::rpc::RpcClient;
use freeze_wallet_lib::validation;

pub async fn run(config: &WalletConfig, id: &str) -> Result<()> {
    let id = validation::parse_tx_id(id)?;
    let sender = config.require_sender()?;
    let rpc = RpcClient::new(config.rpc_url.clone());
    let multisig = MultisigContract::new(&rpc, config.multisig_address);

    let tx_hash = multisig.confirm_transaction(&sender, id).await?;
    println!("✓ confirmation for proposal {id} submitted: {tx_hash}");
    super::settle_and_refetch(config, &rpc, &tx_hash).await
}
