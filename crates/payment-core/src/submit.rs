//! Submission and confirmation polling.
//!
//! `sendTransaction` only queues an envelope. A `PENDING` answer means the
//! caller has to poll `getTransaction` until the status leaves `NOT_FOUND`.
//! Polling runs at a fixed interval, is bounded by [`PollPolicy`] and can be
//! cancelled through a [`CancelToken`].

use std::time::Duration;

use chain_xlm::SorobanTransaction;
use rpc_client::{GetTxStatus, RpcError, SendTxStatus, SorobanRpc};
use tokio::sync::watch;

use crate::error::PaymentError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 60;

/// How often and how long to poll for a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until a terminal status or cancellation.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: Some(DEFAULT_POLL_MAX_ATTEMPTS),
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Poll every second with no attempt limit.
    pub fn unbounded() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Owner side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observer side of a cancellation signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Never resolves if the handle is dropped
    /// without cancelling.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// Submit a signed envelope and wait for its result.
///
/// Returns the base64 `TransactionResult` of a successful transaction. Any
/// immediate status other than `PENDING` fails without polling.
pub async fn submit_tx(
    rpc: &dyn SorobanRpc,
    signed_xdr: &str,
    network_passphrase: &str,
    policy: &PollPolicy,
    cancel: Option<&CancelToken>,
) -> Result<String, PaymentError> {
    let tx = SorobanTransaction::from_envelope_xdr(signed_xdr, network_passphrase)?;
    let local_hash = tx.hash_hex()?;
    log::info!(
        "submitting transaction {local_hash} ({} signature(s))",
        tx.signature_count()
    );

    let sent = rpc.send_transaction(signed_xdr).await?;
    if sent.hash != local_hash {
        log::warn!(
            "endpoint reported hash {} for transaction {local_hash}",
            sent.hash
        );
    }

    if let Some(result_xdr) = sent.error_result_xdr {
        return Err(PaymentError::SubmitFailed(format!(
            "rejected with result {result_xdr}"
        )));
    }
    if sent.status != SendTxStatus::Pending {
        return Err(PaymentError::SubmitFailed(format!(
            "status: {:?}",
            sent.status
        )));
    }

    poll_transaction(rpc, &sent.hash, policy, cancel).await
}

/// Poll `getTransaction` until `hash` reaches a terminal status.
pub async fn poll_transaction(
    rpc: &dyn SorobanRpc,
    hash: &str,
    policy: &PollPolicy,
    cancel: Option<&CancelToken>,
) -> Result<String, PaymentError> {
    let mut cancel = cancel.cloned();
    let mut attempts: u32 = 0;

    loop {
        if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(PaymentError::Cancelled(hash.to_string()));
        }

        attempts += 1;
        let resp = rpc.get_transaction(hash).await?;
        log::debug!("poll #{attempts} for {hash}: {:?}", resp.status);

        match resp.status {
            GetTxStatus::Success => {
                log::info!("transaction {hash} succeeded in ledger {:?}", resp.ledger);
                return resp.result_xdr.ok_or_else(|| {
                    RpcError::InvalidResponse(format!("{hash}: success without resultXdr")).into()
                });
            }
            GetTxStatus::Failed => {
                log::info!("transaction {hash} failed");
                return Err(PaymentError::TransactionFailed {
                    hash: hash.to_string(),
                    result_xdr: resp.result_xdr,
                });
            }
            GetTxStatus::NotFound => {}
        }

        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(PaymentError::PollTimeout {
                hash: hash.to_string(),
                attempts,
            });
        }

        match cancel.as_mut() {
            Some(token) => {
                tokio::select! {
                    _ = tokio::time::sleep(policy.interval) => {}
                    _ = token.cancelled() => {
                        return Err(PaymentError::Cancelled(hash.to_string()));
                    }
                }
            }
            None => tokio::time::sleep(policy.interval).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert_eq!(policy.max_attempts, Some(60));
        assert_eq!(PollPolicy::unbounded().max_attempts, None);
    }

    #[test]
    fn token_observes_cancel() {
        let handle = CancelHandle::new();
        let token = handle.token();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
        // Tokens taken after cancellation see it too.
        assert!(handle.token().is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_resolves_after_cancel() {
        let handle = CancelHandle::new();
        let mut token = handle.token();
        let waiter = tokio::spawn(async move {
            token.cancelled().await;
        });
        handle.cancel();
        waiter.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_handle_never_cancels() {
        let handle = CancelHandle::new();
        let mut token = handle.token();
        drop(handle);
        let outcome =
            tokio::time::timeout(Duration::from_secs(5), token.cancelled()).await;
        assert!(outcome.is_err());
    }
}
