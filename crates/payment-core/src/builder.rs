//! Endpoint and transaction builder factories.

use chain_xlm::{NetworkDetails, TxBuilder};
use rpc_client::{RpcClient, RpcOptions, SorobanRpc};

use crate::error::PaymentError;

/// An RPC client for `network`. Plain `http://` endpoints are allowed so a
/// local sandbox can be targeted.
pub fn get_server(network: &NetworkDetails) -> Result<RpcClient, PaymentError> {
    let options = RpcOptions {
        allow_http: network.rpc_url.starts_with("http://"),
        ..RpcOptions::default()
    };
    Ok(RpcClient::with_options(&network.rpc_url, options)?)
}

/// A builder for `pub_key` at its current on-chain sequence number.
///
/// Fails with `AccountNotFound` when the account does not exist yet.
pub async fn get_tx_builder(
    rpc: &dyn SorobanRpc,
    pub_key: &str,
    fee: u32,
    network: &NetworkDetails,
) -> Result<TxBuilder, PaymentError> {
    let account = rpc.get_account(pub_key).await?;
    log::debug!("{} at sequence {}", account.account_id, account.sequence);
    Ok(TxBuilder::new(
        &account.account_id,
        account.sequence,
        fee,
        &network.network_passphrase,
    )?)
}
