//! JSON-RPC 2.0 transport for contract reads and writes.
//!
//! Deliberately thin: no retry loop, no explicit timeout beyond the
//! transport defaults. Failures surface to the caller, which decides what
//! stays on screen.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use ethereum_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::abi;
use crate::error::{Result, WalletError};
use crate::types::Address;

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: Value,
    pub id: u64,
}

/// JSON-RPC 2.0 response. A pending or absent result arrives as JSON
/// `null`, which is a legitimate value (e.g. an unmined receipt), so
/// `result` stays a plain `Value` rather than an `Option`.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    fn reserve_ids(&self, count: u64) -> u64 {
        self.next_id.fetch_add(count, Ordering::Relaxed)
    }

    fn build(&self, method: &str, params: Value, id: u64) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0",
            method: method.to_string(),
            params,
            id,
        }
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let req = self.build(method, params, self.reserve_ids(1));
        log::debug!("rpc {} -> {}", req.method, self.url);
        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(WalletError::Rpc)?
            .json()
            .await
            .map_err(WalletError::Rpc)?;
        unwrap_response(response)
    }

    /// Read-only contract call against the latest block.
    pub async fn eth_call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>> {
        let result = self
            .request(
                "eth_call",
                json!([{ "to": to.to_string(), "data": abi::to_hex(data) }, "latest"]),
            )
            .await?;
        decode_call_result(&result)
    }

    /// Batched read-only calls in a single HTTP round trip.
    ///
    /// Each position resolves independently: one failed entry does not fail
    /// the batch, and the output preserves the request order even if the
    /// node answers out of order.
    pub async fn eth_call_batch(
        &self,
        calls: &[(Address, Vec<u8>)],
    ) -> Result<Vec<Result<Vec<u8>>>> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }
        let base_id = self.reserve_ids(calls.len() as u64);
        let requests: Vec<JsonRpcRequest> = calls
            .iter()
            .enumerate()
            .map(|(i, (to, data))| {
                self.build(
                    "eth_call",
                    json!([{ "to": to.to_string(), "data": abi::to_hex(data) }, "latest"]),
                    base_id + i as u64,
                )
            })
            .collect();
        log::debug!("rpc batch of {} eth_call -> {}", requests.len(), self.url);
        let responses: Vec<JsonRpcResponse> = self
            .http
            .post(&self.url)
            .json(&requests)
            .send()
            .await
            .map_err(WalletError::Rpc)?
            .json()
            .await
            .map_err(WalletError::Rpc)?;
        let ids: Vec<u64> = requests.iter().map(|r| r.id).collect();
        Ok(align_batch(&ids, responses)
            .into_iter()
            .map(|entry| entry.and_then(|value| decode_call_result(&value)))
            .collect())
    }

    /// Submits a transaction through the node's managed account. On this
    /// test network signing is the node's job; the wallet never holds keys.
    pub async fn send_transaction(
        &self,
        from: &Address,
        to: &Address,
        value: U256,
        data: &[u8],
    ) -> Result<String> {
        let result = self
            .request(
                "eth_sendTransaction",
                json!([{
                    "from": from.to_string(),
                    "to": to.to_string(),
                    "value": format!("{value:#x}"),
                    "data": abi::to_hex(data),
                }]),
            )
            .await?;
        result
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| node_shape_error("eth_sendTransaction result is not a string"))
    }

    /// Receipt of a submitted transaction, or `None` while it is pending.
    pub async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<Value>> {
        let result = self
            .request("eth_getTransactionReceipt", json!([tx_hash]))
            .await?;
        if result.is_null() {
            Ok(None)
        } else {
            Ok(Some(result))
        }
    }

    pub async fn chain_id(&self) -> Result<u64> {
        let result = self.request("eth_chainId", json!([])).await?;
        parse_quantity(&result)
    }

    /// Bounded poll for a write's receipt: fixed interval, fixed attempt
    /// cap, no backoff. Returns `false` if the receipt never showed up
    /// within the allotted attempts.
    pub async fn await_receipt(
        &self,
        tx_hash: &str,
        interval: std::time::Duration,
        attempts: u32,
    ) -> Result<bool> {
        for attempt in 1..=attempts {
            if self.transaction_receipt(tx_hash).await?.is_some() {
                return Ok(true);
            }
            log::debug!("no receipt for {tx_hash} yet (attempt {attempt}/{attempts})");
            tokio::time::sleep(interval).await;
        }
        Ok(false)
    }
}

fn unwrap_response(response: JsonRpcResponse) -> Result<Value> {
    if let Some(err) = response.error {
        return Err(WalletError::Node {
            code: err.code,
            message: err.message,
        });
    }
    Ok(response.result)
}

fn node_shape_error(message: &str) -> WalletError {
    WalletError::Node {
        code: -32603,
        message: message.to_string(),
    }
}

fn decode_call_result(result: &Value) -> Result<Vec<u8>> {
    let hex_str = result
        .as_str()
        .ok_or_else(|| node_shape_error("eth_call result is not a string"))?;
    abi::from_hex(hex_str).map_err(WalletError::Contract)
}

/// Matches batch responses back to their requests by id, yielding one entry
/// per requested id in request order.
fn align_batch(ids: &[u64], responses: Vec<JsonRpcResponse>) -> Vec<Result<Value>> {
    let mut by_id: HashMap<u64, JsonRpcResponse> = responses
        .into_iter()
        .filter_map(|r| r.id.map(|id| (id, r)))
        .collect();
    ids.iter()
        .map(|id| match by_id.remove(id) {
            Some(response) => unwrap_response(response),
            None => Err(node_shape_error("missing response for batch entry")),
        })
        .collect()
}

/// Parses a hex quantity like `"0x539"`.
fn parse_quantity(value: &Value) -> Result<u64> {
    let raw = value
        .as_str()
        .ok_or_else(|| node_shape_error("quantity is not a string"))?;
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16)
        .map_err(|_| node_shape_error("quantity is not valid hex"))
}
