//! Soroban token payment pipeline.
//!
//! Everything between a UI and the network: builder factory, read-only
//! simulation, token introspection, payment construction and fee estimate,
//! the signer seam, and submission with bounded, cancellable polling.
//!
//! Every call takes the network explicitly; nothing here holds session
//! state except [`PaymentFlow`], which drives one payment at a time.

pub mod builder;
pub mod config;
pub mod error;
pub mod flow;
pub mod payment;
pub mod signer;
pub mod simulate;
pub mod submit;
pub mod token;

pub use builder::{get_server, get_tx_builder};
pub use config::PaymentConfig;
pub use error::{PaymentError, SignerError};
pub use flow::{FlowStep, PaymentFlow};
pub use payment::{
    build_payment_tx, estimate_fee_or_base, get_estimated_fee, make_payment, PaymentRequest,
};
pub use signer::{connect_signer, sign_tx, LocalKeySigner, TransactionSigner};
pub use simulate::{prepare_transaction, simulate_raw, simulate_tx};
pub use submit::{poll_transaction, submit_tx, CancelHandle, CancelToken, PollPolicy};
pub use token::{
    get_token_balance, get_token_decimals, get_token_name, get_token_symbol, load_token_info,
    TokenInfo,
};
