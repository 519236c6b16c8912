//! Soroban RPC request and response payloads.
//!
//! Field names follow the RPC's camelCase JSON. Numeric fields that some RPC
//! versions send as strings (`minResourceFee`, `latestLedger`, `ledger`) are
//! accepted in either form.

use serde::{Deserialize, Deserializer, Serialize};

/// The parts of an account ledger entry a transaction builder needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountState {
    pub account_id: String,
    /// Current sequence number; the next transaction uses `sequence + 1`.
    pub sequence: i64,
}

// ---------------------------------------------------------------------------
// simulateTransaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateTransactionResponse {
    /// Set when the simulated invocation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Base64 `SorobanTransactionData`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_data: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_resource_fee: Option<u64>,
    #[serde(default)]
    pub results: Vec<SimulateHostFunctionResult>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub latest_ledger: Option<u64>,
}

impl SimulateTransactionResponse {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulateHostFunctionResult {
    /// Base64 `ScVal` return value.
    pub xdr: String,
    /// Base64 `SorobanAuthorizationEntry` values.
    #[serde(default)]
    pub auth: Vec<String>,
}

// ---------------------------------------------------------------------------
// sendTransaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendTxStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResponse {
    pub status: SendTxStatus,
    pub hash: String,
    /// Base64 `TransactionResult` when the endpoint rejected the envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_result_xdr: Option<String>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub latest_ledger: Option<u64>,
}

// ---------------------------------------------------------------------------
// getTransaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GetTxStatus {
    Success,
    NotFound,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResponse {
    pub status: GetTxStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_xdr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_meta_xdr: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub ledger: Option<u64>,
}

// ---------------------------------------------------------------------------
// getNetwork / getLedgerEntries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNetworkResponse {
    pub passphrase: String,
    pub protocol_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendbot_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLedgerEntriesResponse {
    #[serde(default)]
    pub entries: Vec<LedgerEntryResult>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryResult {
    #[serde(default)]
    pub key: String,
    /// Base64 `LedgerEntryData`.
    pub xdr: String,
}

fn de_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrOrNum {
        Num(u64),
        Str(String),
    }

    match Option::<StrOrNum>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StrOrNum::Num(n)) => Ok(Some(n)),
        Some(StrOrNum::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
