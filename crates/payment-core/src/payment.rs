//! Payment construction and fee estimation.
//!
//! A payment is one `transfer(from, to, amount)` call on the token contract,
//! optionally carrying a text memo. Making the payment prepares it against
//! the endpoint so the envelope handed to the signer already carries its
//! resource footprint and fee.

use chain_xlm::{transfer_op, SorobanTransaction, Timeout, TxBuilder, XlmError, BASE_FEE};
use rpc_client::SorobanRpc;

use crate::error::PaymentError;
use crate::simulate::{prepare_transaction, simulate_raw};

/// One token transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub token_id: String,
    /// Amount in token base units.
    pub amount: i128,
    pub from: String,
    pub to: String,
    /// Attached as a text memo when non-empty.
    pub memo: String,
}

/// Build (but do not prepare) the transfer transaction.
pub fn build_payment_tx(
    builder: TxBuilder,
    request: &PaymentRequest,
) -> Result<SorobanTransaction, XlmError> {
    let op = transfer_op(&request.token_id, &request.from, &request.to, request.amount)?;
    let mut builder = builder.add_operation(op)?.set_timeout(Timeout::Infinite);
    if !request.memo.is_empty() {
        builder = builder.add_memo(&request.memo)?;
    }
    builder.build()
}

/// Build and prepare the transfer, returning the base64 envelope to sign.
pub async fn make_payment(
    rpc: &dyn SorobanRpc,
    builder: TxBuilder,
    request: &PaymentRequest,
) -> Result<String, PaymentError> {
    let tx = build_payment_tx(builder, request)?;
    let prepared = prepare_transaction(rpc, &tx).await?;
    log::info!(
        "prepared payment of {} from {} to {} (fee {})",
        request.amount,
        request.from,
        request.to,
        prepared.fee()
    );
    Ok(prepared.to_envelope_xdr()?)
}

/// Total fee in stroops: the builder's classic fee plus the minimum resource
/// fee reported by simulation.
pub async fn get_estimated_fee(
    rpc: &dyn SorobanRpc,
    builder: TxBuilder,
    request: &PaymentRequest,
) -> Result<u64, PaymentError> {
    let tx = build_payment_tx(builder, request)?;
    let response = simulate_raw(rpc, &tx).await?;
    if response.results.is_empty() {
        return Err(PaymentError::SimulationFailed(
            "transaction simulation failed".into(),
        ));
    }
    let resource_fee = response.min_resource_fee.unwrap_or(0);
    u64::from(tx.fee()).checked_add(resource_fee).ok_or_else(|| {
        PaymentError::SimulationFailed(format!("resource fee {resource_fee} overflows"))
    })
}

/// [`get_estimated_fee`], falling back to [`BASE_FEE`] on any failure so
/// that a fee estimate never blocks a payment.
pub async fn estimate_fee_or_base(
    rpc: &dyn SorobanRpc,
    builder: TxBuilder,
    request: &PaymentRequest,
) -> u64 {
    match get_estimated_fee(rpc, builder, request).await {
        Ok(fee) => fee,
        Err(e) => {
            log::warn!("fee estimate failed, using base fee {BASE_FEE}: {e}");
            u64::from(BASE_FEE)
        }
    }
}
