//! External signer seam.
//!
//! A wallet extension (or any other key holder) implements
//! [`TransactionSigner`]. The pipeline never sees key material; it hands over
//! an unsigned envelope and gets a signed one back.

use async_trait::async_trait;
use chain_xlm::{
    public_key_from_secret, sign_transaction, validate_account_id, NetworkDetails,
    SorobanTransaction,
};
use zeroize::Zeroizing;

use crate::error::{PaymentError, SignerError};

#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// The `G...` account this signer controls. Prompts for access on
    /// wallet-backed signers.
    async fn public_key(&self) -> Result<String, SignerError>;

    /// Network key (e.g. `FUTURENET`) the signer is currently set to.
    async fn network(&self) -> Result<String, SignerError>;

    /// Sign a base64 envelope for `account_to_sign` on `network`.
    async fn sign(
        &self,
        envelope_xdr: &str,
        network: &NetworkDetails,
        account_to_sign: &str,
    ) -> Result<String, SignerError>;
}

/// Ask the signer for its account, checking that it is set to `network`.
pub async fn connect_signer(
    signer: &dyn TransactionSigner,
    network: &NetworkDetails,
) -> Result<String, PaymentError> {
    let signer_network = signer.network().await.map_err(connect_error)?;
    if !signer_network.eq_ignore_ascii_case(&network.network) {
        return Err(PaymentError::UnsupportedNetwork(signer_network));
    }

    let public_key = signer.public_key().await.map_err(connect_error)?;
    validate_account_id(&public_key)?;
    log::info!("connected signer for {public_key}");
    Ok(public_key)
}

fn connect_error(e: SignerError) -> PaymentError {
    match e {
        SignerError::Rejected => PaymentError::WalletConnectionRejected,
        SignerError::Unavailable(reason) | SignerError::Failed(reason) => {
            PaymentError::SignerUnavailable(reason)
        }
    }
}

/// Have `signer` sign a prepared envelope.
pub async fn sign_tx(
    signer: &dyn TransactionSigner,
    envelope_xdr: &str,
    network: &NetworkDetails,
    public_key: &str,
) -> Result<String, PaymentError> {
    signer
        .sign(envelope_xdr, network, public_key)
        .await
        .map_err(|e| {
            log::warn!("signing for {public_key} failed: {e}");
            PaymentError::SignFailed(e.to_string())
        })
}

// ---------------------------------------------------------------------------
// Local key
// ---------------------------------------------------------------------------

/// Signs with an in-memory `S...` secret seed. For tests, scripts and
/// sandboxes.
pub struct LocalKeySigner {
    secret_seed: Zeroizing<String>,
    public_key: String,
    network: String,
}

impl LocalKeySigner {
    pub fn new(secret_seed: &str, network: &NetworkDetails) -> Result<Self, PaymentError> {
        let public_key = public_key_from_secret(secret_seed)?;
        Ok(Self {
            secret_seed: Zeroizing::new(secret_seed.to_string()),
            public_key,
            network: network.network.clone(),
        })
    }

    pub fn account_id(&self) -> &str {
        &self.public_key
    }
}

#[async_trait]
impl TransactionSigner for LocalKeySigner {
    async fn public_key(&self) -> Result<String, SignerError> {
        Ok(self.public_key.clone())
    }

    async fn network(&self) -> Result<String, SignerError> {
        Ok(self.network.clone())
    }

    async fn sign(
        &self,
        envelope_xdr: &str,
        network: &NetworkDetails,
        account_to_sign: &str,
    ) -> Result<String, SignerError> {
        if account_to_sign != self.public_key {
            return Err(SignerError::Failed(format!(
                "no key for {account_to_sign}"
            )));
        }
        let tx = SorobanTransaction::from_envelope_xdr(envelope_xdr, &network.network_passphrase)
            .map_err(|e| SignerError::Failed(e.to_string()))?;
        sign_transaction(&tx, &self.secret_seed).map_err(|e| SignerError::Failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_xlm::{futurenet, testnet};

    fn secret() -> String {
        chain_xlm::bytes_to_secret_seed(&[7u8; 32])
    }

    struct Refusing;

    #[async_trait]
    impl TransactionSigner for Refusing {
        async fn public_key(&self) -> Result<String, SignerError> {
            Err(SignerError::Rejected)
        }
        async fn network(&self) -> Result<String, SignerError> {
            Ok("FUTURENET".into())
        }
        async fn sign(
            &self,
            _envelope_xdr: &str,
            _network: &NetworkDetails,
            _account_to_sign: &str,
        ) -> Result<String, SignerError> {
            Err(SignerError::Rejected)
        }
    }

    struct Missing;

    #[async_trait]
    impl TransactionSigner for Missing {
        async fn public_key(&self) -> Result<String, SignerError> {
            Err(SignerError::Unavailable("no wallet extension".into()))
        }
        async fn network(&self) -> Result<String, SignerError> {
            Err(SignerError::Unavailable("no wallet extension".into()))
        }
        async fn sign(
            &self,
            _envelope_xdr: &str,
            _network: &NetworkDetails,
            _account_to_sign: &str,
        ) -> Result<String, SignerError> {
            Err(SignerError::Unavailable("no wallet extension".into()))
        }
    }

    #[tokio::test]
    async fn missing_wallet_has_fixed_message() {
        let err = connect_signer(&Missing, &futurenet()).await.unwrap_err();
        assert_eq!(err.to_string(), "Please install a wallet to connect your account");
        assert_eq!(err.reason(), Some("no wallet extension"));
    }

    #[tokio::test]
    async fn rejected_connection() {
        let err = connect_signer(&Refusing, &futurenet()).await.unwrap_err();
        assert!(matches!(err, PaymentError::WalletConnectionRejected));
    }

    #[tokio::test]
    async fn rejected_signature_has_fixed_message() {
        let err = sign_tx(&Refusing, "AAAA", &futurenet(), "G")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unable to sign transaction");
    }

    #[tokio::test]
    async fn local_signer_connects() {
        let signer = LocalKeySigner::new(&secret(), &futurenet()).unwrap();
        let key = connect_signer(&signer, &futurenet()).await.unwrap();
        assert_eq!(key, signer.account_id());
        assert!(key.starts_with('G'));
    }

    #[tokio::test]
    async fn local_signer_refuses_other_accounts() {
        let signer = LocalKeySigner::new(&secret(), &futurenet()).unwrap();
        let other = chain_xlm::bytes_to_account_id(&[1u8; 32]);
        let err = sign_tx(&signer, "AAAA", &futurenet(), &other)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::SignFailed(r) if r.contains("no key")));
    }

    #[test]
    fn local_signer_rejects_bad_secret() {
        assert!(LocalKeySigner::new("SBAD", &futurenet()).is_err());
    }

    #[tokio::test]
    async fn wrong_network_is_unsupported() {
        let signer = LocalKeySigner::new(&secret(), &testnet()).unwrap();
        let err = connect_signer(&signer, &futurenet()).await.unwrap_err();
        assert!(matches!(err, PaymentError::UnsupportedNetwork(n) if n == "TESTNET"));
    }
}
