use std::time::Duration;

use anyhow::Result;
use freeze_wallet_lib::aggregator::ProposalAggregator;
use freeze_wallet_lib::config::WalletConfig;
use freeze_wallet_lib::contracts::MultisigContract;
use freeze_wallet_lib::rpc::RpcClient;

pub mod ai;
pub mod confirm;
pub mod execute;
pub mod metrics;
pub mod pay;
pub mod policy;
pub mod proposals;
pub mod status;
pub mod submit;

/// Shared post-write flow: wait (bounded) for the write to land, then
/// re-read the proposal feed so the user sees the updated chain state.
pub(crate) async fn settle_and_refetch(
    config: &WalletConfig,
    rpc: &RpcClient,
    tx_hash: &str,
) -> Result<()> {
    let interval = Duration::from_millis(config.poll_interval_ms);
    let landed = rpc
        .await_receipt(tx_hash, interval, config.poll_attempts)
        .await?;
    if !landed {
        println!("✗ {tx_hash} not yet mined; run `freeze-wallet proposals` later");
        return Ok(());
    }
    let multisig = MultisigContract::new(rpc, config.multisig_address);
    let aggregator = ProposalAggregator::new(multisig, config.freeze_address, config.page_size);
    let feed = aggregator.aggregate().await?;
    println!("✓ mined; {} proposals on chain", feed.total_count);
    Ok(())
}
