use anyhow::Result;
use freeze_wallet_lib::api::ApiClient;
use freeze_wallet_lib::config::WalletConfig;

pub async fn run(config: &WalletConfig) -> Result<()> {
    let api = ApiClient::new(config.api_base_url.clone());
    let policy = api.policy().await?;
    println!("policy (fetched {})", chrono::Utc::now().to_rfc3339());
    println!("{}", serde_json::to_string_pretty(&policy)?);
    Ok(())
}
