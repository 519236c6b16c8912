use chain_xlm::XlmError;
use rpc_client::RpcError;
use thiserror::Error;

/// Payment pipeline errors.
///
/// The submit, sign and wallet variants display fixed user-facing messages;
/// the underlying reason is kept for logging.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Unsupported network selected, please use Futurenet")]
    UnsupportedNetwork(String),

    #[error("Unable to submit transaction")]
    SubmitFailed(String),

    #[error("Unable to sign transaction")]
    SignFailed(String),

    #[error("Wallet connection rejected")]
    WalletConnectionRejected,

    #[error("Please install a wallet to connect your account")]
    SignerUnavailable(String),

    #[error("simulation failed: {0}")]
    SimulationFailed(String),

    #[error("expected exactly one simulation result, got {0}")]
    UnexpectedResultCount(usize),

    #[error("transaction {hash} failed")]
    TransactionFailed {
        hash: String,
        result_xdr: Option<String>,
    },

    #[error("transaction {hash} still pending after {attempts} polls")]
    PollTimeout { hash: String, attempts: u32 },

    #[error("polling for transaction {0} was cancelled")]
    Cancelled(String),

    #[error("payment step out of order: {0}")]
    OutOfOrder(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Xlm(#[from] XlmError),
}

/// Failures reported by an external signer.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("request rejected by user")]
    Rejected,

    #[error("signer unavailable: {0}")]
    Unavailable(String),

    #[error("signing failed: {0}")]
    Failed(String),
}

impl PaymentError {
    /// Detail behind a fixed user-facing message, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            PaymentError::UnsupportedNetwork(r)
            | PaymentError::SubmitFailed(r)
            | PaymentError::SignFailed(r)
            | PaymentError::SignerUnavailable(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_user_messages() {
        assert_eq!(
            PaymentError::SubmitFailed("status: Duplicate".into()).to_string(),
            "Unable to submit transaction"
        );
        assert_eq!(
            PaymentError::SignFailed("user declined".into()).to_string(),
            "Unable to sign transaction"
        );
        assert_eq!(
            PaymentError::WalletConnectionRejected.to_string(),
            "Wallet connection rejected"
        );
        assert_eq!(
            PaymentError::UnsupportedNetwork("TESTNET".into()).to_string(),
            "Unsupported network selected, please use Futurenet"
        );
    }

    #[test]
    fn reason_is_kept() {
        let err = PaymentError::SubmitFailed("status: TryAgainLater".into());
        assert_eq!(err.reason(), Some("status: TryAgainLater"));
        assert_eq!(PaymentError::WalletConnectionRejected.reason(), None);
    }

    #[test]
    fn signer_unavailable_hides_detail() {
        let err = PaymentError::SignerUnavailable("extension missing".into());
        assert_eq!(err.to_string(), "Please install a wallet to connect your account");
        assert_eq!(err.reason(), Some("extension missing"));
    }

    #[test]
    fn display_signer_errors() {
        assert_eq!(SignerError::Rejected.to_string(), "request rejected by user");
        assert_eq!(
            SignerError::Unavailable("extension missing".into()).to_string(),
            "signer unavailable: extension missing"
        );
    }

    #[test]
    fn display_poll_timeout() {
        let err = PaymentError::PollTimeout {
            hash: "abc".into(),
            attempts: 60,
        };
        assert_eq!(err.to_string(), "transaction abc still pending after 60 polls");
    }

    #[test]
    fn wraps_lower_layers() {
        let err: PaymentError = RpcError::AccountNotFound("GABC".into()).into();
        assert_eq!(err.to_string(), "account not found: GABC");
        let err: PaymentError = XlmError::InvalidMemo("too long".into()).into();
        assert_eq!(err.to_string(), "invalid memo: too long");
    }
}
