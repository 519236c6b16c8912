//! Payment client configuration from environment variables
//!
//! Selects the network, optionally overrides its RPC endpoint, and tunes
//! confirmation polling and the i128 decode policy. Defaults to Futurenet.

use std::env;
use std::time::Duration;

use chain_xlm::{futurenet, get_network, DecodeFallback, NetworkDetails};

use crate::submit::PollPolicy;

#[derive(Clone, Debug, PartialEq)]
pub struct PaymentConfig {
    /// Network passed explicitly to every pipeline call
    pub network: NetworkDetails,
    /// Confirmation polling after submission
    pub poll: PollPolicy,
    /// What to do with a malformed balance value
    pub decode_fallback: DecodeFallback,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            network: futurenet(),
            poll: PollPolicy::default(),
            decode_fallback: DecodeFallback::default(),
        }
    }
}

impl PaymentConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SOROBAN_NETWORK`: "futurenet" (default), "testnet" or "mainnet"
    /// - `SOROBAN_RPC_URL`: RPC endpoint override (optional)
    /// - `SOROBAN_POLL_INTERVAL_MS`: poll interval, default 1000
    /// - `SOROBAN_POLL_MAX_ATTEMPTS`: poll limit, default 60, `0` = unbounded
    /// - `SOROBAN_STRICT_DECODE`: "true" fails on malformed i128 results
    ///   instead of treating them as zero
    ///
    /// # Examples
    ///
    /// ```bash
    /// SOROBAN_NETWORK=testnet SOROBAN_POLL_MAX_ATTEMPTS=0 my-wallet
    /// ```
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`PaymentConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let network_key = lookup("SOROBAN_NETWORK").unwrap_or_else(|| "futurenet".to_string());
        let mut network = match get_network(&network_key) {
            Some(network) => {
                log::info!("Using {} network", network.network);
                network
            }
            None => {
                log::warn!("Unknown network '{network_key}', defaulting to Futurenet");
                futurenet()
            }
        };

        if let Some(url) = lookup("SOROBAN_RPC_URL").filter(|u| !u.trim().is_empty()) {
            log::info!("RPC URL override: {url}");
            network = network.with_rpc_url(url.trim());
        }

        let mut poll = PollPolicy::default();
        if let Some(ms) = parse_var::<u64>(&lookup, "SOROBAN_POLL_INTERVAL_MS") {
            poll.interval = Duration::from_millis(ms);
        }
        if let Some(max) = parse_var::<u32>(&lookup, "SOROBAN_POLL_MAX_ATTEMPTS") {
            poll.max_attempts = (max > 0).then_some(max);
        }

        let decode_fallback = match lookup("SOROBAN_STRICT_DECODE").as_deref().map(str::trim) {
            Some("1") | Some("true") | Some("TRUE") | Some("yes") => DecodeFallback::Strict,
            _ => DecodeFallback::Zero,
        };

        log::info!(
            "RPC {} / poll every {:?}, max {:?} / decode {:?}",
            network.rpc_url,
            poll.interval,
            poll.max_attempts,
            decode_fallback
        );

        Self {
            network,
            poll,
            decode_fallback,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring {key}={raw:?}: not a valid number");
            None
        }
    }
}
