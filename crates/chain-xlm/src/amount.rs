//! Display amount <-> base unit conversion.
//!
//! Tokens store integer base units; users type decimal strings. A token with
//! `decimals = 7` stores `1000000001` for the display value `100.0000001`.
//! The native asset (XLM) always has 7 decimals and its base unit is the
//! stroop.

use crate::error::XlmError;

/// Decimals of the native asset.
pub const XLM_DECIMALS: u32 = 7;

/// Default classic fee in stroops, used when no estimate is available.
pub const BASE_FEE: u32 = 100;

/// Largest `decimals` whose scale `10^decimals` fits in an `i128`.
pub const MAX_DECIMALS: u32 = 38;

/// Characters kept on each side by [`truncate_string`].
pub const DEFAULT_TRUNCATE_LENGTH: usize = 5;

const ELLIPSIS: char = '\u{2026}';

/// Parse a display amount into base units for a token with `decimals`.
///
/// A missing whole or fractional part counts as zero, so `""`, `"."` and
/// `".5"` are all accepted. Fractional digits beyond `decimals` are dropped,
/// not rounded.
pub fn parse_token_amount(value: &str, decimals: u32) -> Result<i128, XlmError> {
    let value = value.trim();
    let mut parts = value.split('.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next().unwrap_or("");
    if parts.next().is_some() {
        return Err(XlmError::InvalidAmount(format!(
            "more than one decimal point in {value:?}"
        )));
    }

    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(XlmError::InvalidAmount(format!(
            "{value:?} is not an unsigned decimal number"
        )));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = fraction.trim_end_matches('0');
    let kept = &fraction[..fraction.len().min(decimals as usize)];

    let scale = pow10(decimals)?;
    let whole_value: i128 = whole
        .parse()
        .map_err(|_| XlmError::AmountOverflow(format!("whole part of {value:?}")))?;

    // Right-pad the kept fractional digits to exactly `decimals` places.
    let fraction_value = if kept.is_empty() {
        0
    } else {
        let digits: i128 = kept
            .parse()
            .map_err(|_| XlmError::AmountOverflow(format!("fraction of {value:?}")))?;
        digits
            .checked_mul(pow10(decimals - kept.len() as u32)?)
            .ok_or_else(|| XlmError::AmountOverflow(value.to_string()))?
    };

    whole_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(|| XlmError::AmountOverflow(value.to_string()))
}

/// Reject a token `decimals` value no `i128` amount can be scaled by.
pub fn check_decimals(decimals: u32) -> Result<u32, XlmError> {
    if decimals > MAX_DECIMALS {
        return Err(XlmError::InvalidAmount(format!(
            "{decimals} decimals, max {MAX_DECIMALS}"
        )));
    }
    Ok(decimals)
}

/// Format base units as a display amount, trimming trailing zeros and a
/// bare trailing decimal point.
///
/// `decimals` must already be within [`MAX_DECIMALS`]; the output is padded
/// to `decimals + 1` digits.
pub fn format_token_amount(amount: i128, decimals: u32) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let sign = if amount < 0 { "-" } else { "" };
    let digits = amount.unsigned_abs().to_string();
    let decimals = decimals as usize;

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{fraction}")
    }
}

/// Stroops to a display XLM value, e.g. `100` -> `"0.00001"`.
pub fn stroop_to_xlm(stroops: impl Into<i128>) -> String {
    format_token_amount(stroops.into(), XLM_DECIMALS)
}

/// Display XLM value to stroops, e.g. `"11"` -> `110000000`.
pub fn xlm_to_stroop(xlm: &str) -> Result<i64, XlmError> {
    let stroops = parse_token_amount(xlm, XLM_DECIMALS)?;
    i64::try_from(stroops)
        .map_err(|_| XlmError::AmountOverflow(format!("{xlm} XLM does not fit in i64 stroops")))
}

/// Float XLM value to stroops, rounded to the nearest stroop.
pub fn xlm_to_stroop_f64(xlm: f64) -> Result<i64, XlmError> {
    if !xlm.is_finite() {
        return Err(XlmError::InvalidAmount(format!("{xlm} is not finite")));
    }
    let stroops = (xlm * 1e7).round();
    if stroops.abs() >= i64::MAX as f64 {
        return Err(XlmError::AmountOverflow(format!("{xlm} XLM")));
    }
    Ok(stroops as i64)
}

/// [`BASE_FEE`] as a display XLM value.
pub fn base_fee_xlm() -> String {
    stroop_to_xlm(BASE_FEE)
}

/// Shorten a long identifier for display: `GCGOR…KYVAL`.
///
/// Empty strings, and strings too short to benefit, are returned unchanged.
pub fn truncate_string(s: &str, length: usize) -> String {
    let count = s.chars().count();
    if count <= length * 2 + 1 {
        return s.to_string();
    }
    let head: String = s.chars().take(length).collect();
    let tail: String = s.chars().skip(count - length).collect();
    format!("{head}{ELLIPSIS}{tail}")
}

fn pow10(exp: u32) -> Result<i128, XlmError> {
    10i128
        .checked_pow(exp)
        .ok_or_else(|| XlmError::AmountOverflow(format!("10^{exp} exceeds i128")))
}
