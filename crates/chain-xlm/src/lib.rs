//! Stellar / Soroban chain support for the payment client.
//!
//! This crate handles strkey addresses, token amount conversion, the 128-bit
//! contract integer encoding, contract value decoding and the transaction
//! lifecycle up to a signed envelope. All wire types come from
//! `stellar-xdr`; nothing here talks to the network.

pub mod address;
pub mod amount;
pub mod error;
pub mod int128;
pub mod network;
pub mod scval;
pub mod token;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{
    account_id_to_bytes, bytes_to_account_id, bytes_to_contract_id, bytes_to_secret_seed,
    contract_id_to_bytes, to_sc_address, validate_account_id, validate_contract_id,
};
pub use amount::{
    check_decimals, format_token_amount, parse_token_amount, stroop_to_xlm, truncate_string,
    xlm_to_stroop, BASE_FEE, DEFAULT_TRUNCATE_LENGTH, MAX_DECIMALS, XLM_DECIMALS,
};
pub use error::XlmError;
pub use int128::{encode_i128, from_parts, parse_i128};
pub use network::{
    futurenet, get_network, mainnet, rpc_url_for, testnet, NetworkDetails, FUTURENET_PASSPHRASE,
};
pub use scval::{
    account_to_scval, decode_bytes, decode_i128, decode_u32, i128_to_scval, DecodeFallback,
};
pub use token::{balance_op, decimals_op, name_op, symbol_op, transfer_op};
pub use transaction::{
    assemble_transaction, invoke_contract_op, public_key_from_secret, sign_transaction,
    AssemblyData, SorobanTransaction, Timeout, TxBuilder,
};
