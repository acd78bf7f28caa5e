//! Thin client for the backend payment/policy API.
//!
//! The endpoints are opaque JSON: requests have fixed shapes, responses are
//! passed through for display without interpretation. No retry, no backoff;
//! failures come back as-is.

use ethereum_types::U256;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{Result, WalletError};
use crate::types::Address;

#[derive(Debug, Clone, Serialize)]
pub struct PayRequest {
    pub to: Address,
    /// Decimal wei string; wei amounts do not fit a JSON number.
    pub amount_wei: String,
}

impl PayRequest {
    pub fn new(to: Address, amount_wei: U256) -> Self {
        Self {
            to,
            amount_wei: amount_wei.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get(&self, path: &str) -> Result<Value> {
        log::debug!("GET {}", self.url(path));
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(WalletError::Api)?;
        Self::into_json(response).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        log::debug!("POST {}", self.url(path));
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(WalletError::Api)?;
        Self::into_json(response).await
    }

    async fn into_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WalletError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }
        response.json().await.map_err(WalletError::Api)
    }

    pub async fn policy(&self) -> Result<Value> {
        self.get("/api/policy").await
    }

    pub async fn metrics(&self) -> Result<Value> {
        self.get("/api/metrics").await
    }

    pub async fn pay(&self, request: &PayRequest) -> Result<Value> {
        self.post("/api/pay", request).await
    }

    pub async fn ai_pay(&self, prompt: &str) -> Result<Value> {
        self.post("/api/ai-pay", &json!({ "prompt": prompt })).await
    }

    pub async fn ai_chat(&self, messages: &[ChatMessage]) -> Result<Value> {
        self.post("/api/ai-chat", &json!({ "messages": messages }))
            .await
    }
}
