//! Soroban transaction building, assembly and signing.
//!
//! A Soroban transaction is a classic Stellar transaction carrying exactly
//! one `InvokeHostFunction` operation. The runtime rejects anything else, so
//! [`TxBuilder`] enforces the single-operation rule itself.
//!
//! ```text
//! TransactionEnvelope (ENVELOPE_TYPE_TX):
//!   tx:
//!     source_account   MuxedAccount
//!     fee              u32           classic fee + resource fee after assembly
//!     seq_num          i64           account sequence + 1
//!     cond             Preconditions time bounds (0..0 = no timeout)
//!     memo             Memo
//!     operations       [Operation; 1]
//!     ext              v0 | v1(SorobanTransactionData)
//!   signatures         [DecoratedSignature; <= 20]
//! ```
//!
//! The transaction hash that gets signed is
//! `SHA-256(TransactionSignaturePayload { network_id, Tx(tx) })`.

use std::time::{SystemTime, UNIX_EPOCH};

use ed25519_dalek::Signer;
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{
    ContractId, DecoratedSignature, Hash, HostFunction, InvokeContractArgs, InvokeHostFunctionOp,
    Limits, Memo, MuxedAccount, Operation, OperationBody, Preconditions, ReadXdr, ScAddress,
    ScSymbol, ScVal, SequenceNumber, Signature, SignatureHint, SorobanAuthorizationEntry,
    SorobanTransactionData, StringM, TimeBounds, TimePoint, Transaction, TransactionEnvelope,
    TransactionExt, TransactionSignaturePayload, TransactionSignaturePayloadTaggedTransaction,
    TransactionV1Envelope, VecM, WriteXdr,
};
use zeroize::Zeroize;

use crate::address::{bytes_to_account_id, contract_id_to_bytes, to_muxed_account};
use crate::error::XlmError;
use crate::network::network_id;

/// Maximum length of a text memo in bytes.
pub const MAX_MEMO_TEXT_LEN: usize = 28;

/// Transaction validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// No upper time bound. Contract calls are bounded by their resource
    /// footprint instead.
    Infinite,
    /// Valid until `now + seconds`.
    Seconds(u64),
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Accumulates one operation, an optional memo and a timeout for a single
/// source account, then produces an immutable [`SorobanTransaction`].
#[derive(Debug, Clone)]
pub struct TxBuilder {
    source: MuxedAccount,
    sequence: i64,
    fee: u32,
    network_passphrase: String,
    operation: Option<Operation>,
    memo: Memo,
    timeout: Option<Timeout>,
}

impl TxBuilder {
    /// `sequence` is the account's current sequence number as reported by
    /// the network; the built transaction uses `sequence + 1`.
    pub fn new(
        source_account: &str,
        sequence: i64,
        fee: u32,
        network_passphrase: &str,
    ) -> Result<Self, XlmError> {
        Ok(Self {
            source: to_muxed_account(source_account)?,
            sequence,
            fee,
            network_passphrase: network_passphrase.to_string(),
            operation: None,
            memo: Memo::None,
            timeout: None,
        })
    }

    pub fn add_operation(mut self, operation: Operation) -> Result<Self, XlmError> {
        if self.operation.is_some() {
            return Err(XlmError::TransactionBuildError(
                "soroban transactions carry exactly one operation".into(),
            ));
        }
        self.operation = Some(operation);
        Ok(self)
    }

    /// Attach a text memo of at most [`MAX_MEMO_TEXT_LEN`] bytes.
    pub fn add_memo(mut self, text: &str) -> Result<Self, XlmError> {
        if text.len() > MAX_MEMO_TEXT_LEN {
            return Err(XlmError::InvalidMemo(format!(
                "text memo is {} bytes, max {MAX_MEMO_TEXT_LEN}",
                text.len()
            )));
        }
        let memo: StringM<28> = text
            .try_into()
            .map_err(|e| XlmError::InvalidMemo(format!("{e}")))?;
        self.memo = Memo::Text(memo);
        Ok(self)
    }

    pub fn set_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    pub fn build(self) -> Result<SorobanTransaction, XlmError> {
        let operation = self.operation.ok_or_else(|| {
            XlmError::TransactionBuildError("no operation added".into())
        })?;
        let timeout = self.timeout.ok_or_else(|| {
            XlmError::TransactionBuildError("set_timeout must be called before build".into())
        })?;
        let seq_num = self.sequence.checked_add(1).ok_or_else(|| {
            XlmError::TransactionBuildError("sequence number overflow".into())
        })?;

        let max_time = match timeout {
            Timeout::Infinite => 0,
            Timeout::Seconds(secs) => unix_now()?.saturating_add(secs),
        };

        let tx = Transaction {
            source_account: self.source,
            fee: self.fee,
            seq_num: SequenceNumber(seq_num),
            cond: Preconditions::Time(TimeBounds {
                min_time: TimePoint(0),
                max_time: TimePoint(max_time),
            }),
            memo: self.memo,
            operations: vec![operation].try_into()?,
            ext: TransactionExt::V0,
        };

        log::debug!("built transaction seq={seq_num} fee={}", self.fee);

        Ok(SorobanTransaction {
            tx,
            signatures: Vec::new(),
            network_passphrase: self.network_passphrase,
        })
    }
}

fn unix_now() -> Result<u64, XlmError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| XlmError::TransactionBuildError(format!("system clock: {e}")))
}

// ---------------------------------------------------------------------------
// Built transaction
// ---------------------------------------------------------------------------

/// A built (and possibly assembled and signed) transaction bound to the
/// network it was built for.
#[derive(Debug, Clone, PartialEq)]
pub struct SorobanTransaction {
    tx: Transaction,
    signatures: Vec<DecoratedSignature>,
    network_passphrase: String,
}

impl SorobanTransaction {
    /// Decode a base64 `TransactionEnvelope`. Only v1 envelopes are
    /// accepted; fee-bump and legacy v0 envelopes cannot carry Soroban data.
    pub fn from_envelope_xdr(xdr: &str, network_passphrase: &str) -> Result<Self, XlmError> {
        match TransactionEnvelope::from_xdr_base64(xdr, Limits::none())? {
            TransactionEnvelope::Tx(TransactionV1Envelope { tx, signatures }) => Ok(Self {
                tx,
                signatures: signatures.to_vec(),
                network_passphrase: network_passphrase.to_string(),
            }),
            _ => Err(XlmError::TransactionBuildError(
                "only v1 transaction envelopes are supported".into(),
            )),
        }
    }

    /// Canonical base64 wire encoding of the envelope.
    pub fn to_envelope_xdr(&self) -> Result<String, XlmError> {
        let envelope = TransactionEnvelope::Tx(TransactionV1Envelope {
            tx: self.tx.clone(),
            signatures: self.signatures.clone().try_into()?,
        });
        Ok(envelope.to_xdr_base64(Limits::none())?)
    }

    /// The 32-byte hash signers sign over.
    pub fn hash(&self) -> Result<[u8; 32], XlmError> {
        let payload = TransactionSignaturePayload {
            network_id: Hash(network_id(&self.network_passphrase)),
            tagged_transaction: TransactionSignaturePayloadTaggedTransaction::Tx(self.tx.clone()),
        };
        let bytes = payload.to_xdr(Limits::none())?;
        Ok(Sha256::digest(&bytes).into())
    }

    /// Hex transaction hash, as the RPC reports it.
    pub fn hash_hex(&self) -> Result<String, XlmError> {
        Ok(hex::encode(self.hash()?))
    }

    pub fn fee(&self) -> u32 {
        self.tx.fee
    }

    pub fn sequence(&self) -> i64 {
        self.tx.seq_num.0
    }

    pub fn operation_count(&self) -> usize {
        self.tx.operations.len()
    }

    pub fn operation(&self) -> Option<&Operation> {
        self.tx.operations.first()
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    pub fn memo_text(&self) -> Option<String> {
        match &self.tx.memo {
            Memo::Text(text) => Some(String::from_utf8_lossy(text.as_slice()).into_owned()),
            _ => None,
        }
    }

    /// Whether the Soroban resource extension has been installed.
    pub fn is_assembled(&self) -> bool {
        matches!(self.tx.ext, TransactionExt::V1(_))
    }

    pub fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }
}

// ---------------------------------------------------------------------------
// Contract invocation
// ---------------------------------------------------------------------------

/// Build an operation invoking `method` on the contract `contract_id`
/// (`C...`) with positional `args`.
pub fn invoke_contract_op(
    contract_id: &str,
    method: &str,
    args: Vec<ScVal>,
) -> Result<Operation, XlmError> {
    let contract_address = ScAddress::Contract(ContractId(Hash(contract_id_to_bytes(contract_id)?)));
    let function_name = ScSymbol::try_from(method).map_err(|e| {
        XlmError::TransactionBuildError(format!("invalid method name {method:?}: {e:?}"))
    })?;

    Ok(Operation {
        source_account: None,
        body: OperationBody::InvokeHostFunction(InvokeHostFunctionOp {
            host_function: HostFunction::InvokeContract(InvokeContractArgs {
                contract_address,
                function_name,
                args: args.try_into()?,
            }),
            auth: VecM::default(),
        }),
    })
}

// ---------------------------------------------------------------------------
// Assembly ("prepare")
// ---------------------------------------------------------------------------

/// The parts of a simulation response needed to make a transaction
/// submittable.
#[derive(Debug, Clone, Default)]
pub struct AssemblyData {
    /// Base64 `SorobanTransactionData` (footprint + resources).
    pub transaction_data: String,
    /// Minimum resource fee in stroops.
    pub min_resource_fee: u64,
    /// Base64 `SorobanAuthorizationEntry` values for the single result.
    pub auth: Vec<String>,
}

/// Install simulated resources on a built transaction.
///
/// The fee becomes `declared fee + min_resource_fee`. Simulated auth entries
/// are used only if the operation does not already carry its own. Existing
/// signatures are dropped since the hash changes.
pub fn assemble_transaction(
    tx: &SorobanTransaction,
    data: &AssemblyData,
) -> Result<SorobanTransaction, XlmError> {
    let mut inner = tx.tx.clone();

    let soroban_data =
        SorobanTransactionData::from_xdr_base64(&data.transaction_data, Limits::none())?;

    inner.fee = u64::from(inner.fee)
        .checked_add(data.min_resource_fee)
        .and_then(|total| u32::try_from(total).ok())
        .ok_or_else(|| {
            XlmError::TransactionBuildError(format!(
                "fee {} plus resource fee {} exceeds u32",
                inner.fee, data.min_resource_fee
            ))
        })?;

    let mut operations = inner.operations.to_vec();
    let [operation] = operations.as_mut_slice() else {
        return Err(XlmError::TransactionBuildError(format!(
            "expected exactly one operation, found {}",
            inner.operations.len()
        )));
    };
    let OperationBody::InvokeHostFunction(invoke) = &mut operation.body else {
        return Err(XlmError::TransactionBuildError(
            "operation is not a contract invocation".into(),
        ));
    };
    if invoke.auth.is_empty() && !data.auth.is_empty() {
        let entries = data
            .auth
            .iter()
            .map(|a| SorobanAuthorizationEntry::from_xdr_base64(a, Limits::none()))
            .collect::<Result<Vec<_>, _>>()?;
        invoke.auth = entries.try_into()?;
    }
    inner.operations = operations.try_into()?;
    inner.ext = TransactionExt::V1(soroban_data);

    Ok(SorobanTransaction {
        tx: inner,
        signatures: Vec::new(),
        network_passphrase: tx.network_passphrase.clone(),
    })
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

fn signing_key_from_secret(secret_seed: &str) -> Result<ed25519_dalek::SigningKey, XlmError> {
    let mut seed = stellar_strkey::ed25519::PrivateKey::from_string(secret_seed)
        .map_err(|e| XlmError::InvalidSecretKey(format!("{e:?}")))?
        .0;
    let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
    seed.zeroize();
    Ok(signing_key)
}

/// The `G...` account id belonging to an `S...` secret seed.
pub fn public_key_from_secret(secret_seed: &str) -> Result<String, XlmError> {
    let signing_key = signing_key_from_secret(secret_seed)?;
    Ok(bytes_to_account_id(&signing_key.verifying_key().to_bytes()))
}

/// Sign with an `S...` secret seed and return the signed envelope as base64.
///
/// The signature hint is the last four bytes of the signer's public key.
pub fn sign_transaction(tx: &SorobanTransaction, secret_seed: &str) -> Result<String, XlmError> {
    let signing_key = signing_key_from_secret(secret_seed)?;

    let hash = tx.hash()?;
    let signature = signing_key.sign(&hash);
    let public = signing_key.verifying_key().to_bytes();

    let decorated = DecoratedSignature {
        hint: SignatureHint([public[28], public[29], public[30], public[31]]),
        signature: Signature(
            signature
                .to_bytes()
                .to_vec()
                .try_into()
                .map_err(|e| XlmError::SigningError(format!("{e}")))?,
        ),
    };

    let mut signed = tx.clone();
    signed.signatures.push(decorated);
    signed.to_envelope_xdr()
}
