//! Step-by-step payment flow for a UI wizard.
//!
//! ```text
//! connect -> token_info -> estimate_fee -> build -> sign -> submit
//! ```
//!
//! Token selection and fee estimation may be repeated until the payment is
//! built. From then on each step runs exactly once, in order.

use std::sync::Arc;

use chain_xlm::{
    parse_token_amount, stroop_to_xlm, to_sc_address, validate_account_id, BASE_FEE,
};
use rpc_client::SorobanRpc;

use crate::builder::get_tx_builder;
use crate::config::PaymentConfig;
use crate::error::PaymentError;
use crate::payment::{estimate_fee_or_base, make_payment, PaymentRequest};
use crate::signer::{connect_signer, sign_tx, TransactionSigner};
use crate::submit::{submit_tx, CancelToken};
use crate::token::{load_token_info, TokenInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FlowStep {
    Connected,
    TokenLoaded,
    FeeEstimated,
    Built,
    Signed,
    Submitted,
}

pub struct PaymentFlow {
    rpc: Arc<dyn SorobanRpc>,
    config: PaymentConfig,
    source: String,
    step: FlowStep,
    token: Option<TokenInfo>,
    request: Option<PaymentRequest>,
    estimated_fee: Option<u64>,
    prepared_xdr: Option<String>,
    signed_xdr: Option<String>,
    result_xdr: Option<String>,
}

impl PaymentFlow {
    /// Start a flow paying from `source`.
    pub fn new(
        rpc: Arc<dyn SorobanRpc>,
        config: PaymentConfig,
        source: &str,
    ) -> Result<Self, PaymentError> {
        validate_account_id(source)?;
        Ok(Self {
            rpc,
            config,
            source: source.to_string(),
            step: FlowStep::Connected,
            token: None,
            request: None,
            estimated_fee: None,
            prepared_xdr: None,
            signed_xdr: None,
            result_xdr: None,
        })
    }

    /// Start a flow paying from the signer's account.
    pub async fn connect(
        rpc: Arc<dyn SorobanRpc>,
        config: PaymentConfig,
        signer: &dyn TransactionSigner,
    ) -> Result<Self, PaymentError> {
        let source = connect_signer(signer, &config.network).await?;
        Self::new(rpc, config, &source)
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn config(&self) -> &PaymentConfig {
        &self.config
    }

    pub fn token(&self) -> Option<&TokenInfo> {
        self.token.as_ref()
    }

    pub fn request(&self) -> Option<&PaymentRequest> {
        self.request.as_ref()
    }

    pub fn estimated_fee(&self) -> Option<u64> {
        self.estimated_fee
    }

    /// Estimated fee as a display XLM value.
    pub fn estimated_fee_xlm(&self) -> Option<String> {
        self.estimated_fee.map(stroop_to_xlm)
    }

    pub fn result_xdr(&self) -> Option<&str> {
        self.result_xdr.as_deref()
    }

    fn require(&self, allowed: &[FlowStep], action: &str) -> Result<(), PaymentError> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(PaymentError::OutOfOrder(format!(
                "cannot {action} at step {:?}",
                self.step
            )))
        }
    }

    /// Select the token to pay with and load its metadata and balance.
    pub async fn token_info(&mut self, token_id: &str) -> Result<&TokenInfo, PaymentError> {
        self.require(&[FlowStep::Connected, FlowStep::TokenLoaded], "load token")?;

        let info = load_token_info(
            &*self.rpc,
            token_id,
            &self.source,
            &self.config.network,
            self.config.decode_fallback,
        )
        .await?;

        self.request = None;
        self.estimated_fee = None;
        self.step = FlowStep::TokenLoaded;
        Ok(&*self.token.insert(info))
    }

    /// Fix destination, display amount and memo, and estimate the fee.
    ///
    /// Estimation failures fall back to the base fee.
    pub async fn estimate_fee(
        &mut self,
        destination: &str,
        amount: &str,
        memo: &str,
    ) -> Result<u64, PaymentError> {
        self.require(&[FlowStep::TokenLoaded, FlowStep::FeeEstimated], "estimate fee")?;
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| PaymentError::OutOfOrder("no token selected".into()))?;

        to_sc_address(destination)?;
        let request = PaymentRequest {
            token_id: token.token_id.clone(),
            amount: parse_token_amount(amount, token.decimals)?,
            from: self.source.clone(),
            to: destination.to_string(),
            memo: memo.to_string(),
        };

        let builder =
            get_tx_builder(&*self.rpc, &self.source, BASE_FEE, &self.config.network).await?;
        let fee = estimate_fee_or_base(&*self.rpc, builder, &request).await;

        self.request = Some(request);
        self.estimated_fee = Some(fee);
        self.step = FlowStep::FeeEstimated;
        Ok(fee)
    }

    /// Build and prepare the payment with the chosen classic `fee`.
    pub async fn build(&mut self, fee: u32) -> Result<&str, PaymentError> {
        self.require(&[FlowStep::FeeEstimated], "build")?;
        let request = self
            .request
            .as_ref()
            .ok_or_else(|| PaymentError::OutOfOrder("no payment details".into()))?;

        let builder = get_tx_builder(&*self.rpc, &self.source, fee, &self.config.network).await?;
        let xdr = make_payment(&*self.rpc, builder, request).await?;

        self.step = FlowStep::Built;
        Ok(self.prepared_xdr.insert(xdr).as_str())
    }

    pub async fn sign(&mut self, signer: &dyn TransactionSigner) -> Result<&str, PaymentError> {
        self.require(&[FlowStep::Built], "sign")?;
        let prepared = self
            .prepared_xdr
            .as_deref()
            .ok_or_else(|| PaymentError::OutOfOrder("nothing to sign".into()))?;

        let signed = sign_tx(signer, prepared, &self.config.network, &self.source).await?;

        self.step = FlowStep::Signed;
        Ok(self.signed_xdr.insert(signed).as_str())
    }

    /// Submit the signed payment and wait for its result.
    pub async fn submit(&mut self, cancel: Option<&CancelToken>) -> Result<&str, PaymentError> {
        self.require(&[FlowStep::Signed], "submit")?;
        let signed = self
            .signed_xdr
            .as_deref()
            .ok_or_else(|| PaymentError::OutOfOrder("nothing to submit".into()))?;

        let result = submit_tx(
            &*self.rpc,
            signed,
            &self.config.network.network_passphrase,
            &self.config.poll,
            cancel,
        )
        .await?;

        self.step = FlowStep::Submitted;
        Ok(self.result_xdr.insert(result).as_str())
    }
}
