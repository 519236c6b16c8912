use chain_xlm::XlmError;
use thiserror::Error;

/// Soroban RPC errors.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON-RPC error object returned by the endpoint.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("xdr error: {0}")]
    Xdr(String),

    #[error(transparent)]
    Xlm(#[from] XlmError),
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        RpcError::Transport(e.to_string())
    }
}

impl From<stellar_xdr::curr::Error> for RpcError {
    fn from(e: stellar_xdr::curr::Error) -> Self {
        RpcError::Xdr(e.to_string())
    }
}
