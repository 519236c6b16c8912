//! Scripted in-memory Soroban RPC endpoint for pipeline tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chain_xlm::{SorobanTransaction, FUTURENET_PASSPHRASE};
use rpc_client::{
    AccountState, GetNetworkResponse, GetTransactionResponse, GetTxStatus, RpcError,
    SendTransactionResponse, SendTxStatus, SimulateHostFunctionResult,
    SimulateTransactionResponse, SorobanRpc,
};
use stellar_xdr::curr::{HostFunction, Limits, OperationBody, ScVal, WriteXdr};
use tokio::time::Instant;

/// 32 zero bytes: an empty `SorobanTransactionData`.
pub fn empty_transaction_data() -> String {
    format!("{}=", "A".repeat(43))
}

/// A successful simulation returning `value`.
pub fn sim_ok(value: ScVal, min_resource_fee: u64) -> SimulateTransactionResponse {
    SimulateTransactionResponse {
        results: vec![SimulateHostFunctionResult {
            xdr: value.to_xdr_base64(Limits::none()).unwrap(),
            auth: vec![],
        }],
        transaction_data: Some(empty_transaction_data()),
        min_resource_fee: Some(min_resource_fee),
        latest_ledger: Some(1000),
        ..Default::default()
    }
}

pub fn string_val(s: &str) -> ScVal {
    ScVal::String(stellar_xdr::curr::ScString(s.try_into().unwrap()))
}

pub fn status(status: GetTxStatus, result_xdr: Option<&str>) -> GetTransactionResponse {
    GetTransactionResponse {
        status,
        result_xdr: result_xdr.map(str::to_string),
        result_meta_xdr: None,
        ledger: (status != GetTxStatus::NotFound).then_some(1001),
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Name of the contract function a transaction envelope invokes.
pub fn invoked_function(envelope_xdr: &str) -> Option<String> {
    let tx = SorobanTransaction::from_envelope_xdr(envelope_xdr, FUTURENET_PASSPHRASE).ok()?;
    match &tx.operation()?.body {
        OperationBody::InvokeHostFunction(op) => match &op.host_function {
            HostFunction::InvokeContract(args) => Some(
                String::from_utf8_lossy(args.function_name.0.as_slice()).into_owned(),
            ),
            _ => None,
        },
        _ => None,
    }
}

pub struct MockRpc {
    accounts: Mutex<HashMap<String, i64>>,
    simulations: Mutex<HashMap<String, SimulateTransactionResponse>>,
    send_status: Mutex<SendTxStatus>,
    send_error_xdr: Mutex<Option<String>>,
    statuses: Mutex<VecDeque<GetTransactionResponse>>,
    calls: Mutex<Vec<String>>,
    sent: Mutex<Vec<String>>,
    polls: Mutex<Vec<Instant>>,
}

impl Default for MockRpc {
    fn default() -> Self {
        Self {
            accounts: Mutex::default(),
            simulations: Mutex::default(),
            send_status: Mutex::new(SendTxStatus::Pending),
            send_error_xdr: Mutex::default(),
            statuses: Mutex::default(),
            calls: Mutex::default(),
            sent: Mutex::default(),
            polls: Mutex::default(),
        }
    }
}

impl MockRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, account_id: &str, sequence: i64) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(account_id.to_string(), sequence);
        self
    }

    /// Answer simulations of `function` with `response`.
    pub fn with_simulation(self, function: &str, response: SimulateTransactionResponse) -> Self {
        self.simulations
            .lock()
            .unwrap()
            .insert(function.to_string(), response);
        self
    }

    pub fn with_send_status(self, status: SendTxStatus) -> Self {
        *self.send_status.lock().unwrap() = status;
        self
    }

    pub fn with_send_error(self, result_xdr: &str) -> Self {
        *self.send_error_xdr.lock().unwrap() = Some(result_xdr.to_string());
        self
    }

    /// Queue `getTransaction` answers; once drained every poll is `NOT_FOUND`.
    pub fn with_statuses(self, statuses: Vec<GetTransactionResponse>) -> Self {
        self.statuses.lock().unwrap().extend(statuses);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == method)
            .count()
    }

    /// Envelopes passed to `sendTransaction`.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// When each `getTransaction` call arrived.
    pub fn poll_times(&self) -> Vec<Instant> {
        self.polls.lock().unwrap().clone()
    }

    fn record(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }
}

#[async_trait]
impl SorobanRpc for MockRpc {
    async fn get_account(&self, account_id: &str) -> Result<AccountState, RpcError> {
        self.record("getAccount");
        let sequence = self
            .accounts
            .lock()
            .unwrap()
            .get(account_id)
            .copied()
            .ok_or_else(|| RpcError::AccountNotFound(account_id.to_string()))?;
        Ok(AccountState {
            account_id: account_id.to_string(),
            sequence,
        })
    }

    async fn simulate_transaction(
        &self,
        envelope_xdr: &str,
    ) -> Result<SimulateTransactionResponse, RpcError> {
        self.record("simulateTransaction");
        let function = invoked_function(envelope_xdr)
            .ok_or_else(|| RpcError::InvalidResponse("not a contract call".into()))?;
        let scripted = self.simulations.lock().unwrap().get(&function).cloned();
        Ok(scripted.unwrap_or_else(|| SimulateTransactionResponse {
            error: Some(format!("no simulation scripted for {function}")),
            ..Default::default()
        }))
    }

    async fn send_transaction(
        &self,
        envelope_xdr: &str,
    ) -> Result<SendTransactionResponse, RpcError> {
        self.record("sendTransaction");
        self.sent.lock().unwrap().push(envelope_xdr.to_string());
        let hash =
            SorobanTransaction::from_envelope_xdr(envelope_xdr, FUTURENET_PASSPHRASE)?.hash_hex()?;
        Ok(SendTransactionResponse {
            status: *self.send_status.lock().unwrap(),
            hash,
            error_result_xdr: self.send_error_xdr.lock().unwrap().clone(),
            latest_ledger: Some(1000),
        })
    }

    async fn get_transaction(&self, _hash: &str) -> Result<GetTransactionResponse, RpcError> {
        self.record("getTransaction");
        self.polls.lock().unwrap().push(Instant::now());
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| status(GetTxStatus::NotFound, None)))
    }

    async fn get_network(&self) -> Result<GetNetworkResponse, RpcError> {
        self.record("getNetwork");
        Ok(GetNetworkResponse {
            passphrase: FUTURENET_PASSPHRASE.to_string(),
            protocol_version: 20,
            friendbot_url: None,
        })
    }
}
