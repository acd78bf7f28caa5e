use anyhow::Result;
use clap::Subcommand;
use freeze_wallet_lib::api::{ApiClient, ChatMessage};
use freeze_wallet_lib::config::WalletConfig;

#[derive(Subcommand)]
pub enum AiAction {
    /// Parse a natural-language payment instruction
    Pay {
        /// Instruction, e.g. "send half an ETH to 0xabc..."
        prompt: Vec<String>,
    },
    /// One-shot chat turn with the wallet assistant
    Chat {
        /// Message to send
        message: Vec<String>,
    },
}

pub async fn run(config: &WalletConfig, action: AiAction) -> Result<()> {
    let api = ApiClient::new(config.api_base_url.clone());

    match action {
        AiAction::Pay { prompt } => {
            let prompt = prompt.join(" ");
            if prompt.trim().is_empty() {
                anyhow::bail!("empty payment instruction");
            }
            let parsed = api.ai_pay(&prompt).await?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        AiAction::Chat { message } => {
            let message = message.join(" ");
            if message.trim().is_empty() {
                anyhow::bail!("empty message");
            }
            let reply = api.ai_chat(&[ChatMessage::user(message)]).await?;
            // backends commonly wrap the text; fall back to raw JSON
            match reply.get("reply").and_then(|v| v.as_str()) {
                Some(text) => println!("{text}"),
                None => println!("{}", serde_json::to_string_pretty(&reply)?),
            }
        }
    }
    Ok(())
}
