//! Typed contract values.
//!
//! Simulation returns each contract result as a base64-encoded `ScVal`. The
//! decoders here turn those into native types; the encoders build the
//! positional arguments of a contract call.

use stellar_xdr::curr::{Limits, ReadXdr, ScVal};

use crate::address::to_sc_address;
use crate::error::XlmError;
use crate::int128::{encode_i128, from_parts};

/// What [`decode_i128`] does when the value cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeFallback {
    /// Treat a malformed value as zero and log a warning.
    #[default]
    Zero,
    /// Surface the failure to the caller.
    Strict,
}

fn decode_scval(xdr: &str) -> Result<ScVal, XlmError> {
    ScVal::from_xdr_base64(xdr, Limits::none())
        .map_err(|e| XlmError::DecodeError(format!("invalid ScVal xdr: {e}")))
}

/// Decode a byte-string result (`Bytes`, `String` or `Symbol`) as text.
pub fn decode_bytes(xdr: &str) -> Result<String, XlmError> {
    match decode_scval(xdr)? {
        ScVal::Bytes(b) => Ok(String::from_utf8_lossy(b.0.as_slice()).into_owned()),
        ScVal::String(s) => Ok(String::from_utf8_lossy(s.0.as_slice()).into_owned()),
        ScVal::Symbol(s) => Ok(String::from_utf8_lossy(s.0.as_slice()).into_owned()),
        other => Err(XlmError::DecodeError(format!(
            "expected a byte string, got {other:?}"
        ))),
    }
}

/// Decode an unsigned 32-bit result.
pub fn decode_u32(xdr: &str) -> Result<u32, XlmError> {
    match decode_scval(xdr)? {
        ScVal::U32(v) => Ok(v),
        other => Err(XlmError::DecodeError(format!("expected u32, got {other:?}"))),
    }
}

/// Decode a 128-bit signed result and render it as a decimal string.
pub fn decode_i128(xdr: &str, fallback: DecodeFallback) -> Result<String, XlmError> {
    let decoded = decode_scval(xdr).and_then(|val| match val {
        ScVal::I128(parts) => Ok(from_parts(&parts).to_string()),
        other => Err(XlmError::DecodeError(format!("expected i128, got {other:?}"))),
    });

    match (decoded, fallback) {
        (Ok(v), _) => Ok(v),
        (Err(e), DecodeFallback::Zero) => {
            log::warn!("i128 decode failed, treating as 0: {e}");
            Ok("0".to_string())
        }
        (Err(e), DecodeFallback::Strict) => Err(e),
    }
}

/// Address argument for a contract method (`G...` or `C...`).
pub fn account_to_scval(address: &str) -> Result<ScVal, XlmError> {
    Ok(ScVal::Address(to_sc_address(address)?))
}

/// `i128` argument for a contract method.
pub fn i128_to_scval(value: i128) -> Result<ScVal, XlmError> {
    Ok(ScVal::I128(encode_i128(value)?))
}
