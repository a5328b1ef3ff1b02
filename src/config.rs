//! Configuration for the chain engine
//!
//! Network settings are keyed by chain name and loaded once at startup:
//! 1. `CHAIN` env var selects a preset (`BSC` or `BSC_TESTNET`)
//! 2. `RPC_URL` overrides the preset endpoint
//! 3. Custodial signer credentials come from `PRIVY_APP_ID` / `PRIVY_APP_SECRET`
//!
//! The loaded `ChainConfig` is read-only for the rest of the process; the only
//! sanctioned update path is `Engine::record_deployment`, which writes newly
//! deployed contract addresses into the engine's own copy.

use crate::error::{Error, Result};
use alloy::primitives::{address, Address};
use std::path::PathBuf;
use std::time::Duration;

/// Env var selecting the network preset
pub const CHAIN_ENV: &str = "CHAIN";
/// Env var overriding the preset RPC endpoint
pub const RPC_URL_ENV: &str = "RPC_URL";
/// Custodial application id env var
pub const CUSTODIAL_APP_ID_ENV: &str = "PRIVY_APP_ID";
/// Custodial application secret env var
pub const CUSTODIAL_APP_SECRET_ENV: &str = "PRIVY_APP_SECRET";

/// Per-network chain settings, immutable after load
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Block explorer base URL (logging only)
    pub explorer_url: String,
    pub chain_id: u64,
    /// V3 factory contract
    pub factory: Address,
    /// V3 swap router contract
    pub router: Address,
    /// Nonfungible position manager contract
    pub position_manager: Address,
    /// Token launcher contract, if already deployed on this network
    pub launcher: Option<Address>,
    /// Launcher util contract, if already deployed on this network
    pub util: Option<Address>,
    /// Directory holding compiled contract artifacts for `deploy`
    pub artifacts_dir: PathBuf,
    /// Receipt polling parameters
    pub receipts: ReceiptPolicy,
}

impl ChainConfig {
    /// BSC mainnet preset
    pub fn bsc() -> Self {
        Self {
            rpc_url: "https://bsc-rpc.publicnode.com".to_string(),
            explorer_url: "https://www.bscscan.com/".to_string(),
            chain_id: 56,
            factory: address!("0x0BFbCF9fa4f9C56B0F40a671Ad40E0805A091865"),
            router: address!("0x1b81D678ffb9C0263b24A97847620C99d213eB14"),
            position_manager: address!("0x46A15B0b27311cedF172AB29E4f4766fbE7F4364"),
            launcher: Some(address!("0x488FF32dABC2cC42FEc96AED5F002603bB3CEd3F")),
            util: Some(address!("0x5c84c3c6dF5A820D5233743b4Eea5D32bEa30362")),
            artifacts_dir: PathBuf::from("solc"),
            receipts: ReceiptPolicy::default(),
        }
    }

    /// BSC testnet preset
    pub fn bsc_testnet() -> Self {
        Self {
            rpc_url: "https://bsc-testnet-rpc.publicnode.com".to_string(),
            explorer_url: "https://testnet.bscscan.com/".to_string(),
            chain_id: 97,
            factory: address!("0x0BFbCF9fa4f9C56B0F40a671Ad40E0805A091865"),
            router: address!("0x1b81D678ffb9C0263b24A97847620C99d213eB14"),
            position_manager: address!("0x427bF5b37357632377eCbEC9de3626C71A5396c1"),
            launcher: Some(address!("0x6257761AB5a92E89cD727Ea6650E1188D738007a")),
            util: Some(address!("0xa29Bfb0ab2EED7299659B4AAB69a38a77Fd62aa5")),
            artifacts_dir: PathBuf::from("solc"),
            receipts: ReceiptPolicy::default(),
        }
    }

    /// Load a preset from `CHAIN` and apply env overrides
    pub fn from_env() -> Result<Self> {
        let chain = std::env::var(CHAIN_ENV).unwrap_or_else(|_| "BSC_TESTNET".to_string());
        let mut config = match chain.as_str() {
            "BSC" => Self::bsc(),
            "BSC_TESTNET" => Self::bsc_testnet(),
            other => return Err(Error::Config(format!("unknown chain preset: {}", other))),
        };

        if let Ok(url) = std::env::var(RPC_URL_ENV) {
            tracing::debug!("Using RPC_URL override for {}", chain);
            config.rpc_url = url;
        }

        Ok(config)
    }
}

/// Bounded wait-for-receipt loop parameters
///
/// The confirmation wait is a polling loop, never unbounded: if no receipt
/// appears within `timeout` the submission surfaces `ConfirmationTimeout`,
/// which is distinct from a mined-but-reverted transaction.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(3),
        }
    }
}

/// Custodial signer credentials, supplied once at startup
#[derive(Clone)]
pub struct CustodialConfig {
    pub app_id: String,
    pub app_secret: secrecy::SecretString,
}

impl CustodialConfig {
    /// Read custodial credentials from the environment
    ///
    /// Returns `Ok(None)` when no application id is configured (local-key
    /// mode). An app id without its secret is a fatal configuration error,
    /// not a per-call one.
    pub fn from_env() -> Result<Option<Self>> {
        let app_id = match std::env::var(CUSTODIAL_APP_ID_ENV) {
            Ok(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let app_secret = std::env::var(CUSTODIAL_APP_SECRET_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::MissingCredential(format!(
                    "{} is set but {} is not",
                    CUSTODIAL_APP_ID_ENV, CUSTODIAL_APP_SECRET_ENV
                ))
            })?;

        Ok(Some(Self {
            app_id,
            app_secret: app_secret.into(),
        }))
    }
}

impl std::fmt::Debug for CustodialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustodialConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_only_where_expected() {
        let mainnet = ChainConfig::bsc();
        let testnet = ChainConfig::bsc_testnet();

        assert_eq!(mainnet.chain_id, 56);
        assert_eq!(testnet.chain_id, 97);
        // The factory and router are deployed at the same address on both
        assert_eq!(mainnet.factory, testnet.factory);
        assert_eq!(mainnet.router, testnet.router);
        assert_ne!(mainnet.position_manager, testnet.position_manager);
    }

    #[test]
    fn test_presets_carry_launcher_addresses() {
        assert!(ChainConfig::bsc().launcher.is_some());
        assert!(ChainConfig::bsc().util.is_some());
        assert!(ChainConfig::bsc_testnet().launcher.is_some());
    }

    #[test]
    fn test_receipt_policy_default_is_bounded() {
        let policy = ReceiptPolicy::default();
        assert!(policy.timeout > policy.poll_interval);
        assert!(!policy.poll_interval.is_zero());
    }

    #[test]
    fn test_custodial_debug_redacts_secret() {
        let config = CustodialConfig {
            app_id: "app-123".to_string(),
            app_secret: "super-secret".to_string().into(),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
