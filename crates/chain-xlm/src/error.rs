use thiserror::Error;

/// Stellar chain operation errors.
#[derive(Debug, Error)]
pub enum XlmError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    #[error("BigNumber overflows i128: {0}")]
    I128Overflow(String),

    #[error("invalid memo: {0}")]
    InvalidMemo(String),

    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("decode error: {0}")]
    DecodeError(String),

    #[error("xdr error: {0}")]
    Xdr(#[from] stellar_xdr::curr::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_address() {
        let err = XlmError::InvalidAddress("bad checksum".into());
        assert_eq!(err.to_string(), "invalid address: bad checksum");
    }

    #[test]
    fn display_i128_overflow() {
        let err = XlmError::I128Overflow("2^127".into());
        assert_eq!(err.to_string(), "BigNumber overflows i128: 2^127");
    }

    #[test]
    fn display_transaction_build_error() {
        let err = XlmError::TransactionBuildError("operation already set".into());
        assert_eq!(
            err.to_string(),
            "transaction build error: operation already set"
        );
    }

    #[test]
    fn display_invalid_memo() {
        let err = XlmError::InvalidMemo("text memo exceeds 28 bytes".into());
        assert_eq!(err.to_string(), "invalid memo: text memo exceeds 28 bytes");
    }

    #[test]
    fn xdr_error_converts() {
        let err: XlmError = stellar_xdr::curr::Error::Invalid.into();
        assert!(err.to_string().starts_with("xdr error"));
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(XlmError::DecodeError("test".into()));
        assert!(err.to_string().contains("test"));
    }
}
