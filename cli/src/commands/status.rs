use anyhow::Result;
use freeze_wallet_lib::config::WalletConfig;
use freeze_wallet_lib::contracts::{FreezeContract, MultisigContract, MultisigReader};
use freeze_wallet_lib::rpc::RpcClient;
use freeze_wallet_lib::validation;

pub async fn run(
    config: &WalletConfig,
    account: Option<&str>,
    proposal: Option<&str>,
) -> Result<()> {
    let rpc = RpcClient::new(config.rpc_url.clone());

    let chain_id = rpc.chain_id().await?;
    if chain_id != config.chain_id {
        log::warn!(
            "node reports chain id {chain_id}, configuration expects {}",
            config.chain_id
        );
    }

    let multisig = MultisigContract::new(&rpc, config.multisig_address);
    let owners = multisig.owners().await?;
    let total = multisig.transaction_count().await?;

    println!("multisig   {}", config.multisig_address);
    println!("freeze     {}", config.freeze_address);
    println!("chain id   {chain_id}");
    println!("proposals  {total}");
    println!("owners:");
    for owner in &owners {
        println!("  {owner}");
    }

    if let Some(sender) = config.sender {
        let is_owner = multisig.is_owner(&sender).await?;
        println!(
            "sender {sender} {}",
            if is_owner { "is an owner ✓" } else { "is not an owner ✗" }
        );
    }

    if let Some(raw) = proposal {
        let id = validation::parse_tx_id(raw)?;
        println!("confirmations for proposal {id}:");
        for owner in &owners {
            let confirmed = multisig.is_confirmed(id, owner).await?;
            println!("  {owner} {}", if confirmed { "✓" } else { "-" });
        }
    }

    if let Some(raw) = account {
        let account = validation::parse_address(raw)?;
        let freeze = FreezeContract::new(&rpc, config.freeze_address);
        let frozen = freeze.is_frozen(&account).await?;
        println!(
            "{account} is {}",
            if frozen { "FROZEN" } else { "not frozen" }
        );
    }

    Ok(())
}
