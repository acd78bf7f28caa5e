use thiserror::Error;

use crate::abi::AbiError;

pub type Result<T> = std::result::Result<T, WalletError>;

/// Failure classes surfaced by the wallet client.
///
/// Calldata that fails to classify is not an error; it degrades to
/// `ProposalKind::Unknown` inside the decoder.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Transport-level failure talking to the node.
    #[error("rpc transport error")]
    Rpc(#[source] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("node error {code}: {message}")]
    Node { code: i64, message: String },

    /// A contract read returned data the caller could not decode.
    #[error("malformed contract return data")]
    Contract(#[from] AbiError),

    /// Transport-level failure talking to the backend API.
    #[error("backend api request failed")]
    Api(#[source] reqwest::Error),

    /// The backend API answered with a non-success status.
    #[error("backend api returned {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),
}
