//! 128-bit signed integers in contract-call wire form.
//!
//! The runtime carries an `i128` as two 64-bit words: a signed high half and
//! an unsigned low half. Together they are the 16-byte big-endian two's
//! complement of the value:
//!
//! ```text
//! bytes 0..4   hi_hi   (upper 32 bits of hi)
//! bytes 4..8   hi_lo   (lower 32 bits of hi)
//! bytes 8..12  lo_hi   (upper 32 bits of lo)
//! bytes 12..16 lo_lo   (lower 32 bits of lo)
//! ```
//!
//! Only magnitudes strictly below 2^127 are accepted, so `i128::MIN` is
//! rejected even though two's complement could represent it.

use stellar_xdr::curr::Int128Parts;

use crate::error::XlmError;

/// Encode a value into its wire halves.
pub fn encode_i128(value: i128) -> Result<Int128Parts, XlmError> {
    if value == i128::MIN {
        return Err(XlmError::I128Overflow(value.to_string()));
    }
    Ok(Int128Parts {
        hi: (value >> 64) as i64,
        lo: value as u64,
    })
}

/// Reassemble a value from its wire halves.
pub fn from_parts(parts: &Int128Parts) -> i128 {
    ((parts.hi as i128) << 64) | (parts.lo as i128)
}

/// Parse a decimal string of arbitrary length into an `i128`, failing with
/// [`XlmError::I128Overflow`] when the magnitude reaches 2^127.
pub fn parse_i128(value: &str) -> Result<i128, XlmError> {
    let trimmed = value.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(XlmError::InvalidAmount(format!(
            "{value:?} is not a decimal integer"
        )));
    }

    let magnitude: u128 = digits
        .parse()
        .map_err(|_| XlmError::I128Overflow(value.to_string()))?;
    if magnitude > i128::MAX as u128 {
        return Err(XlmError::I128Overflow(value.to_string()));
    }

    let signed = magnitude as i128;
    Ok(if negative { -signed } else { signed })
}

/// The 16-byte big-endian representation of the encoded value.
pub fn to_be_bytes(parts: &Int128Parts) -> [u8; 16] {
    from_parts(parts).to_be_bytes()
}

/// The four big-endian 32-bit words `[hi_hi, hi_lo, lo_hi, lo_lo]`.
pub fn words(parts: &Int128Parts) -> [u32; 4] {
    let hi = parts.hi as u64;
    [
        (hi >> 32) as u32,
        hi as u32,
        (parts.lo >> 32) as u32,
        parts.lo as u32,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn small_positive() {
        let parts = encode_i128(100).unwrap();
        assert_eq!(parts.hi, 0);
        assert_eq!(parts.lo, 100);
        assert_eq!(words(&parts), [0, 0, 0, 100]);
    }

    #[test]
    fn value_spanning_both_halves() {
        let value: i128 = (1i128 << 64) + 5;
        let parts = encode_i128(value).unwrap();
        assert_eq!(parts.hi, 1);
        assert_eq!(parts.lo, 5);
        assert_eq!(words(&parts), [0, 1, 0, 5]);
    }

    #[test]
    fn negative_is_twos_complement() {
        let parts = encode_i128(-1).unwrap();
        assert_eq!(parts.hi, -1);
        assert_eq!(parts.lo, u64::MAX);
        assert_eq!(to_be_bytes(&parts), [0xff; 16]);

        let parts = encode_i128(-2).unwrap();
        assert_eq!(to_be_bytes(&parts)[15], 0xfe);
        assert_eq!(to_be_bytes(&parts)[0], 0xff);
    }

    #[test]
    fn big_endian_layout() {
        let parts = encode_i128(0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10).unwrap();
        assert_eq!(
            to_be_bytes(&parts),
            [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]
        );
        assert_eq!(
            words(&parts),
            [0x0102_0304, 0x0506_0708, 0x090a_0b0c, 0x0d0e_0f10]
        );
    }

    #[test]
    fn extremes() {
        let max = encode_i128(i128::MAX).unwrap();
        assert_eq!(from_parts(&max), i128::MAX);

        let min_plus_one = encode_i128(i128::MIN + 1).unwrap();
        assert_eq!(from_parts(&min_plus_one), i128::MIN + 1);
    }

    #[test]
    fn magnitude_of_2_pow_127_overflows() {
        assert!(matches!(
            encode_i128(i128::MIN),
            Err(XlmError::I128Overflow(_))
        ));
        // 2^127
        assert!(matches!(
            parse_i128("170141183460469231731687303715884105728"),
            Err(XlmError::I128Overflow(_))
        ));
        assert!(matches!(
            parse_i128("-170141183460469231731687303715884105728"),
            Err(XlmError::I128Overflow(_))
        ));
        assert!(parse_i128(&"9".repeat(60)).is_err());
    }

    #[test]
    fn parse_accepts_signs() {
        assert_eq!(parse_i128("42").unwrap(), 42);
        assert_eq!(parse_i128("+42").unwrap(), 42);
        assert_eq!(parse_i128("-42").unwrap(), -42);
        assert_eq!(
            parse_i128("170141183460469231731687303715884105727").unwrap(),
            i128::MAX
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_i128("").is_err());
        assert!(parse_i128("-").is_err());
        assert!(parse_i128("12a").is_err());
    }

    #[test]
    fn random_values_roundtrip() {
        let mut rng = rand::thread_rng();
        for _ in 0..1_000 {
            let value: i128 = rng.gen();
            if value == i128::MIN {
                continue;
            }
            let parts = encode_i128(value).unwrap();
            assert_eq!(from_parts(&parts), value);
            assert_eq!(i128::from_be_bytes(to_be_bytes(&parts)), value);
        }
    }
}
