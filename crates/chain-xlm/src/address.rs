//! Stellar address handling.
//!
//! Stellar addresses are "strkeys": a version byte, the 32-byte payload and a
//! CRC16-XModem checksum, Base32-encoded. Accounts are ed25519 public keys
//! (`G...`), deployed contracts are contract hashes (`C...`). Both are 56
//! characters long.

use stellar_xdr::curr::{
    AccountId, ContractId, Hash, MuxedAccount, PublicKey, ScAddress, Uint256,
};

use crate::error::XlmError;

/// Length of an encoded account or contract strkey.
pub const STRKEY_LEN: usize = 56;

/// Decode a `G...` account strkey to its 32-byte ed25519 public key.
pub fn account_id_to_bytes(address: &str) -> Result<[u8; 32], XlmError> {
    stellar_strkey::ed25519::PublicKey::from_string(address)
        .map(|pk| pk.0)
        .map_err(|e| XlmError::InvalidAddress(format!("not an account strkey ({e:?}): {address}")))
}

/// Decode a `C...` contract strkey to its 32-byte contract hash.
pub fn contract_id_to_bytes(address: &str) -> Result<[u8; 32], XlmError> {
    stellar_strkey::Contract::from_string(address)
        .map(|c| c.0)
        .map_err(|e| XlmError::InvalidAddress(format!("not a contract strkey ({e:?}): {address}")))
}

/// Encode a 32-byte ed25519 public key as a `G...` account strkey.
pub fn bytes_to_account_id(bytes: &[u8; 32]) -> String {
    stellar_strkey::ed25519::PublicKey(*bytes).to_string()
}

/// Encode a 32-byte contract hash as a `C...` contract strkey.
pub fn bytes_to_contract_id(bytes: &[u8; 32]) -> String {
    stellar_strkey::Contract(*bytes).to_string()
}

/// Encode a 32-byte ed25519 seed as an `S...` secret strkey.
pub fn bytes_to_secret_seed(bytes: &[u8; 32]) -> String {
    stellar_strkey::ed25519::PrivateKey(*bytes).to_string()
}

/// Validate an account strkey. Returns `Ok(true)` or an error describing
/// why the string is not a valid account id.
pub fn validate_account_id(address: &str) -> Result<bool, XlmError> {
    account_id_to_bytes(address).map(|_| true)
}

/// Validate a contract strkey.
pub fn validate_contract_id(address: &str) -> Result<bool, XlmError> {
    contract_id_to_bytes(address).map(|_| true)
}

/// XDR account id for a `G...` strkey.
pub fn to_account_id(address: &str) -> Result<AccountId, XlmError> {
    let bytes = account_id_to_bytes(address)?;
    Ok(AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(bytes))))
}

/// XDR muxed account (plain ed25519 form) for a `G...` strkey.
pub fn to_muxed_account(address: &str) -> Result<MuxedAccount, XlmError> {
    let bytes = account_id_to_bytes(address)?;
    Ok(MuxedAccount::Ed25519(Uint256(bytes)))
}

/// Convert any supported strkey into a contract-call address value.
///
/// `G...` becomes an account address and `C...` a contract address. Anything
/// else is rejected.
pub fn to_sc_address(address: &str) -> Result<ScAddress, XlmError> {
    if let Ok(pk) = stellar_strkey::ed25519::PublicKey::from_string(address) {
        return Ok(ScAddress::Account(AccountId(
            PublicKey::PublicKeyTypeEd25519(Uint256(pk.0)),
        )));
    }
    if let Ok(contract) = stellar_strkey::Contract::from_string(address) {
        return Ok(ScAddress::Contract(ContractId(Hash(contract.0))));
    }
    Err(XlmError::InvalidAddress(format!(
        "expected a G... account or C... contract strkey, got {address:?}"
    )))
}
