//! JSON-RPC 2.0 client for a Soroban RPC endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use stellar_xdr::curr::{LedgerEntryData, LedgerKey, LedgerKeyAccount, Limits, ReadXdr, WriteXdr};

use crate::error::RpcError;
use crate::types::{
    AccountState, GetLedgerEntriesResponse, GetNetworkResponse, GetTransactionResponse,
    SendTransactionResponse, SimulateTransactionResponse,
};

/// The endpoint operations the payment pipeline depends on.
///
/// Transactions cross this boundary as base64 `TransactionEnvelope` XDR.
#[async_trait]
pub trait SorobanRpc: Send + Sync {
    async fn get_account(&self, account_id: &str) -> Result<AccountState, RpcError>;

    async fn simulate_transaction(
        &self,
        envelope_xdr: &str,
    ) -> Result<SimulateTransactionResponse, RpcError>;

    async fn send_transaction(&self, envelope_xdr: &str)
        -> Result<SendTransactionResponse, RpcError>;

    async fn get_transaction(&self, hash: &str) -> Result<GetTransactionResponse, RpcError>;

    async fn get_network(&self) -> Result<GetNetworkResponse, RpcError>;
}

/// Connection options for [`RpcClient`].
#[derive(Debug, Clone)]
pub struct RpcOptions {
    /// Permit plain `http://` endpoints (local sandboxes).
    pub allow_http: bool,
    pub timeout: Duration,
}

impl Default for RpcOptions {
    fn default() -> Self {
        Self {
            allow_http: false,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct JsonRpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct JsonRpcResponse<R> {
    result: Option<R>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

pub struct RpcClient {
    url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str) -> Result<Self, RpcError> {
        Self::with_options(url, RpcOptions::default())
    }

    pub fn with_options(url: &str, options: RpcOptions) -> Result<Self, RpcError> {
        if url.starts_with("http://") {
            if !options.allow_http {
                return Err(RpcError::InvalidUrl(format!(
                    "refusing insecure endpoint {url}; enable allow_http"
                )));
            }
        } else if !url.starts_with("https://") {
            return Err(RpcError::InvalidUrl(format!("unsupported scheme in {url}")));
        }

        let http = reqwest::Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            url: url.to_string(),
            http,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request<P, R>(&self, method: &str, params: P) -> Result<R, RpcError>
    where
        P: Serialize + Send + Sync,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        log::debug!("rpc #{id} -> {method}");

        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        let response = self.http.post(&self.url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Transport(format!("{method}: HTTP {status}")));
        }

        let envelope: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("{method}: {e}")))?;

        if let Some(err) = envelope.error {
            log::debug!("rpc #{id} <- {method} error {}", err.code);
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        envelope
            .result
            .ok_or_else(|| RpcError::InvalidResponse(format!("{method}: missing result")))
    }
}

#[async_trait]
impl SorobanRpc for RpcClient {
    async fn get_account(&self, account_id: &str) -> Result<AccountState, RpcError> {
        let key = LedgerKey::Account(LedgerKeyAccount {
            account_id: chain_xlm::address::to_account_id(account_id)?,
        });
        let key_xdr = key.to_xdr_base64(Limits::none())?;

        let resp: GetLedgerEntriesResponse = self
            .request("getLedgerEntries", json!({ "keys": [key_xdr] }))
            .await?;

        let entry = resp
            .entries
            .first()
            .ok_or_else(|| RpcError::AccountNotFound(account_id.to_string()))?;

        match LedgerEntryData::from_xdr_base64(&entry.xdr, Limits::none())? {
            LedgerEntryData::Account(account) => Ok(AccountState {
                account_id: account_id.to_string(),
                sequence: account.seq_num.0,
            }),
            _ => Err(RpcError::InvalidResponse(format!(
                "ledger entry for {account_id} is not an account"
            ))),
        }
    }

    async fn simulate_transaction(
        &self,
        envelope_xdr: &str,
    ) -> Result<SimulateTransactionResponse, RpcError> {
        self.request("simulateTransaction", json!({ "transaction": envelope_xdr }))
            .await
    }

    async fn send_transaction(
        &self,
        envelope_xdr: &str,
    ) -> Result<SendTransactionResponse, RpcError> {
        self.request("sendTransaction", json!({ "transaction": envelope_xdr }))
            .await
    }

    async fn get_transaction(&self, hash: &str) -> Result<GetTransactionResponse, RpcError> {
        self.request("getTransaction", json!({ "hash": hash })).await
    }

    async fn get_network(&self) -> Result<GetNetworkResponse, RpcError> {
        self.request("getNetwork", json!({})).await
    }
}
