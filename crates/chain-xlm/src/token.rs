//! Standard token contract invocations.
//!
//! Every Soroban token exposes the same interface, so a single set of
//! operation builders covers XLM's Stellar Asset Contract as well as custom
//! tokens. Reads (`symbol`, `name`, `decimals`, `balance`) are only ever
//! simulated; `transfer` is the payment itself.
//!
//! ```text
//! symbol()                          -> String
//! name()                            -> String
//! decimals()                        -> u32
//! balance(id: Address)              -> i128
//! transfer(from: Address, to: Address, amount: i128)
//! ```

use stellar_xdr::curr::Operation;

use crate::error::XlmError;
use crate::scval::{account_to_scval, i128_to_scval};
use crate::transaction::invoke_contract_op;

pub const METHOD_SYMBOL: &str = "symbol";
pub const METHOD_NAME: &str = "name";
pub const METHOD_DECIMALS: &str = "decimals";
pub const METHOD_BALANCE: &str = "balance";
pub const METHOD_TRANSFER: &str = "transfer";

pub fn symbol_op(token_id: &str) -> Result<Operation, XlmError> {
    invoke_contract_op(token_id, METHOD_SYMBOL, vec![])
}

pub fn name_op(token_id: &str) -> Result<Operation, XlmError> {
    invoke_contract_op(token_id, METHOD_NAME, vec![])
}

pub fn decimals_op(token_id: &str) -> Result<Operation, XlmError> {
    invoke_contract_op(token_id, METHOD_DECIMALS, vec![])
}

/// `balance(holder)` where `holder` is a `G...` or `C...` address.
pub fn balance_op(token_id: &str, holder: &str) -> Result<Operation, XlmError> {
    invoke_contract_op(token_id, METHOD_BALANCE, vec![account_to_scval(holder)?])
}

/// `transfer(from, to, amount)` with `amount` in token base units.
///
/// Negative amounts are rejected here since token contracts trap on them.
pub fn transfer_op(
    token_id: &str,
    from: &str,
    to: &str,
    amount: i128,
) -> Result<Operation, XlmError> {
    if amount < 0 {
        return Err(XlmError::InvalidAmount(format!(
            "transfer amount must not be negative, got {amount}"
        )));
    }
    invoke_contract_op(
        token_id,
        METHOD_TRANSFER,
        vec![
            account_to_scval(from)?,
            account_to_scval(to)?,
            i128_to_scval(amount)?,
        ],
    )
}
