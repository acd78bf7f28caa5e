use anyhow::Result;
use freeze_wallet_lib::api::{ApiClient, PayRequest};
use freeze_wallet_lib::config::WalletConfig;
use freeze_wallet_lib::validation;

pub async fn run(config: &WalletConfig, to: &str, amount: &str) -> Result<()> {
    let to = validation::parse_address(to)?;
    let amount_wei = validation::parse_eth_amount(amount)?;

    let api = ApiClient::new(config.api_base_url.clone());
    let receipt = api.pay(&PayRequest::new(to, amount_wei)).await?;

    println!("✓ payment of {amount} ETH to {to} accepted");
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}
