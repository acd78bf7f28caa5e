use anyhow::Result;
use freeze_wallet_lib::aggregator::ProposalAggregator;
use freeze_wallet_lib::config::WalletConfig;
use freeze_wallet_lib::contracts::MultisigContract;
use freeze_wallet_lib::rpc::RpcClient;
use freeze_wallet_lib::validation;

pub async fn run(config: &WalletConfig) -> Result<()> {
    let rpc = RpcClient::new(config.rpc_url.clone());
    let multisig = MultisigContract::new(&rpc, config.multisig_address);
    let aggregator = ProposalAggregator::new(multisig, config.freeze_address, config.page_size);
    let feed = aggregator.aggregate().await?;

    println!(
        "{} proposals on chain, showing {}",
        feed.total_count,
        feed.proposals.len()
    );
    if feed.proposals.is_empty() {
        return Ok(());
    }

    println!(
        "{:<6} {:<9} {:<44} {:>14} {:>9}  {}",
        "id", "kind", "target", "value (ETH)", "confirms", "executed"
    );
    for proposal in &feed.proposals {
        // unknown calls have no decoded target; show the raw call target
        let target = proposal
            .kind
            .target()
            .map(|t| t.to_string())
            .unwrap_or_else(|| proposal.to.to_string());
        println!(
            "{:<6} {:<9} {:<44} {:>14} {:>9}  {}",
            proposal.id,
            proposal.kind.label(),
            target,
            validation::format_eth(proposal.value),
            proposal.num_confirmations,
            if proposal.executed { "✓" } else { "-" }
        );
    }
    Ok(())
}
