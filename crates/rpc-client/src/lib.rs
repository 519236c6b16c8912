//! Soroban RPC access for the payment client.
//!
//! [`SorobanRpc`] is the seam the payment pipeline is written against;
//! [`RpcClient`] implements it over JSON-RPC 2.0 with `reqwest`. Tests swap
//! in an in-memory implementation.

pub mod client;
pub mod error;
pub mod types;

pub use client::{RpcClient, RpcOptions, SorobanRpc};
pub use error::RpcError;
pub use types::{
    AccountState, GetNetworkResponse, GetTransactionResponse, GetTxStatus,
    SendTransactionResponse, SendTxStatus, SimulateHostFunctionResult,
    SimulateTransactionResponse,
};
