//! Read-only execution against current ledger state.

use chain_xlm::{assemble_transaction, AssemblyData, SorobanTransaction, XlmError};
use rpc_client::{SimulateTransactionResponse, SorobanRpc};

use crate::error::PaymentError;

/// Simulate `tx` and return the raw response, failing if the invocation
/// itself failed.
pub async fn simulate_raw(
    rpc: &dyn SorobanRpc,
    tx: &SorobanTransaction,
) -> Result<SimulateTransactionResponse, PaymentError> {
    let response = rpc.simulate_transaction(&tx.to_envelope_xdr()?).await?;
    if let Some(error) = response.error {
        return Err(PaymentError::SimulationFailed(error));
    }
    Ok(response)
}

/// Simulate a single-operation transaction and decode its one result.
///
/// Zero or several results are a protocol violation and are not retried.
pub async fn simulate_tx<T, F>(
    rpc: &dyn SorobanRpc,
    tx: &SorobanTransaction,
    decoder: F,
) -> Result<T, PaymentError>
where
    F: FnOnce(&str) -> Result<T, XlmError>,
{
    let response = simulate_raw(rpc, tx).await?;
    let [result] = response.results.as_slice() else {
        return Err(PaymentError::UnexpectedResultCount(response.results.len()));
    };
    Ok(decoder(&result.xdr)?)
}

/// Simulate `tx` and install the resulting footprint, resource fee and auth
/// entries so it can be signed and submitted.
pub async fn prepare_transaction(
    rpc: &dyn SorobanRpc,
    tx: &SorobanTransaction,
) -> Result<SorobanTransaction, PaymentError> {
    let response = simulate_raw(rpc, tx).await?;
    let [result] = response.results.as_slice() else {
        return Err(PaymentError::UnexpectedResultCount(response.results.len()));
    };
    let transaction_data = response.transaction_data.clone().ok_or_else(|| {
        PaymentError::SimulationFailed("response carries no transactionData".into())
    })?;

    let data = AssemblyData {
        transaction_data,
        min_resource_fee: response.min_resource_fee.unwrap_or(0),
        auth: result.auth.clone(),
    };
    let prepared = assemble_transaction(tx, &data)?;
    log::debug!(
        "prepared transaction: fee {} -> {}",
        tx.fee(),
        prepared.fee()
    );
    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chain_xlm::{decode_u32, symbol_op, Timeout, TxBuilder};
    use rpc_client::{
        AccountState, GetNetworkResponse, GetTransactionResponse, RpcError,
        SendTransactionResponse, SimulateHostFunctionResult,
    };

    /// Answers every simulation with the same response.
    struct Canned(SimulateTransactionResponse);

    #[async_trait]
    impl SorobanRpc for Canned {
        async fn get_account(&self, account_id: &str) -> Result<AccountState, RpcError> {
            Err(RpcError::AccountNotFound(account_id.into()))
        }
        async fn simulate_transaction(
            &self,
            _: &str,
        ) -> Result<SimulateTransactionResponse, RpcError> {
            Ok(self.0.clone())
        }
        async fn send_transaction(&self, _: &str) -> Result<SendTransactionResponse, RpcError> {
            Err(RpcError::Transport("not used".into()))
        }
        async fn get_transaction(&self, _: &str) -> Result<GetTransactionResponse, RpcError> {
            Err(RpcError::Transport("not used".into()))
        }
        async fn get_network(&self) -> Result<GetNetworkResponse, RpcError> {
            Err(RpcError::Transport("not used".into()))
        }
    }

    fn tx() -> SorobanTransaction {
        TxBuilder::new(
            "GCGORBD5DB4JDIKVIA536CJE3EWMWZ6KBUBWZWRQM7Y3NHFRCLOKYVAL",
            1,
            100,
            chain_xlm::FUTURENET_PASSPHRASE,
        )
        .unwrap()
        .add_operation(symbol_op(&chain_xlm::bytes_to_contract_id(&[3u8; 32])).unwrap())
        .unwrap()
        .set_timeout(Timeout::Infinite)
        .build()
        .unwrap()
    }

    fn results(n: usize) -> SimulateTransactionResponse {
        SimulateTransactionResponse {
            // U32(0)
            results: vec![
                SimulateHostFunctionResult {
                    xdr: "AAAAAwAAAAA=".into(),
                    auth: vec![],
                };
                n
            ],
            transaction_data: Some(format!("{}=", "A".repeat(43))),
            min_resource_fee: Some(1000),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn exactly_one_result_is_decoded() {
        let rpc = Canned(results(1));
        assert_eq!(simulate_tx(&rpc, &tx(), decode_u32).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn zero_or_two_results_fail() {
        for n in [0, 2] {
            let rpc = Canned(results(n));
            let err = simulate_tx(&rpc, &tx(), decode_u32).await.unwrap_err();
            assert!(matches!(err, PaymentError::UnexpectedResultCount(c) if c == n));
        }
    }

    #[tokio::test]
    async fn simulation_error_is_surfaced() {
        let rpc = Canned(SimulateTransactionResponse {
            error: Some("HostError: Error(Contract, #10)".into()),
            ..Default::default()
        });
        let err = simulate_tx(&rpc, &tx(), decode_u32).await.unwrap_err();
        assert!(matches!(err, PaymentError::SimulationFailed(_)));
    }

    #[tokio::test]
    async fn decoder_failure_propagates() {
        let rpc = Canned(results(1));
        let err = simulate_tx(&rpc, &tx(), chain_xlm::decode_bytes)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Xlm(_)));
    }

    #[tokio::test]
    async fn prepare_adds_resource_fee() {
        let rpc = Canned(results(1));
        let prepared = prepare_transaction(&rpc, &tx()).await.unwrap();
        assert_eq!(prepared.fee(), 1100);
        assert!(prepared.is_assembled());
    }

    #[tokio::test]
    async fn prepare_requires_transaction_data() {
        let mut response = results(1);
        response.transaction_data = None;
        let err = prepare_transaction(&Canned(response), &tx())
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::SimulationFailed(_)));
    }
}
