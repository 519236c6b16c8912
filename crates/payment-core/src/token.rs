//! Token introspection reads.
//!
//! Each read consumes its own builder, so independent reads can run
//! concurrently without sharing a sequence number.

use chain_xlm::{
    balance_op, check_decimals, decimals_op, decode_bytes, decode_i128, decode_u32,
    format_token_amount, name_op, parse_i128, symbol_op, DecodeFallback, NetworkDetails,
    SorobanTransaction, Timeout, TxBuilder, XlmError, BASE_FEE,
};
use rpc_client::SorobanRpc;
use stellar_xdr::curr::Operation;

use crate::builder::get_tx_builder;
use crate::error::PaymentError;
use crate::simulate::simulate_tx;

/// What the payment form shows about the selected token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub token_id: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    /// Holder balance in base units, as a decimal string.
    pub balance: String,
}

impl TokenInfo {
    /// Balance formatted with the token's decimals.
    pub fn display_balance(&self) -> Result<String, XlmError> {
        let decimals = check_decimals(self.decimals)?;
        Ok(format_token_amount(parse_i128(&self.balance)?, decimals))
    }
}

fn read_tx(builder: TxBuilder, op: Operation) -> Result<SorobanTransaction, XlmError> {
    builder
        .add_operation(op)?
        .set_timeout(Timeout::Infinite)
        .build()
}

pub async fn get_token_symbol(
    rpc: &dyn SorobanRpc,
    builder: TxBuilder,
    token_id: &str,
) -> Result<String, PaymentError> {
    let tx = read_tx(builder, symbol_op(token_id)?)?;
    simulate_tx(rpc, &tx, decode_bytes).await
}

pub async fn get_token_name(
    rpc: &dyn SorobanRpc,
    builder: TxBuilder,
    token_id: &str,
) -> Result<String, PaymentError> {
    let tx = read_tx(builder, name_op(token_id)?)?;
    simulate_tx(rpc, &tx, decode_bytes).await
}

pub async fn get_token_decimals(
    rpc: &dyn SorobanRpc,
    builder: TxBuilder,
    token_id: &str,
) -> Result<u32, PaymentError> {
    let tx = read_tx(builder, decimals_op(token_id)?)?;
    simulate_tx(rpc, &tx, |xdr| decode_u32(xdr).and_then(check_decimals)).await
}

/// Balance of `holder` in base units. `fallback` decides whether a malformed
/// result reads as zero or fails.
pub async fn get_token_balance(
    rpc: &dyn SorobanRpc,
    builder: TxBuilder,
    token_id: &str,
    holder: &str,
    fallback: DecodeFallback,
) -> Result<String, PaymentError> {
    let tx = read_tx(builder, balance_op(token_id, holder)?)?;
    simulate_tx(rpc, &tx, |xdr| decode_i128(xdr, fallback)).await
}

/// Run all four reads concurrently on behalf of `holder`.
pub async fn load_token_info(
    rpc: &dyn SorobanRpc,
    token_id: &str,
    holder: &str,
    network: &NetworkDetails,
    fallback: DecodeFallback,
) -> Result<TokenInfo, PaymentError> {
    let symbol = async {
        let builder = get_tx_builder(rpc, holder, BASE_FEE, network).await?;
        get_token_symbol(rpc, builder, token_id).await
    };
    let name = async {
        let builder = get_tx_builder(rpc, holder, BASE_FEE, network).await?;
        get_token_name(rpc, builder, token_id).await
    };
    let decimals = async {
        let builder = get_tx_builder(rpc, holder, BASE_FEE, network).await?;
        get_token_decimals(rpc, builder, token_id).await
    };
    let balance = async {
        let builder = get_tx_builder(rpc, holder, BASE_FEE, network).await?;
        get_token_balance(rpc, builder, token_id, holder, fallback).await
    };

    let (symbol, name, decimals, balance) = tokio::try_join!(symbol, name, decimals, balance)?;
    log::debug!("token {token_id}: {symbol} ({decimals} decimals)");

    Ok(TokenInfo {
        token_id: token_id.to_string(),
        symbol,
        name,
        decimals,
        balance,
    })
}
