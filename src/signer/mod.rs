//! Signing backends
//!
//! Two ways to turn a [`TxRequest`] into a signed raw transaction:
//! - [`LocalKeySigner`]: a raw private key held in-process, synchronous and
//!   deterministic.
//! - [`custodial::CustodialSigner`]: a wallet-id addressed remote service
//!   that signs over HTTPS and never exposes key material.
//!
//! SECURITY NOTE:
//! - Private keys live only inside `LocalKeySigner`; they are never
//!   serialized, logged, or echoed in Debug output.

pub mod custodial;

use crate::error::{Error, Result};
use crate::tx::TxRequest;
use alloy::consensus::{SignableTransaction, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Bytes, TxKind};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;

/// Hex length of a raw 32-byte private key (without `0x`)
pub const RAW_KEY_HEX_LEN: usize = 64;

/// Legacy credential discriminator: wallet id vs. raw private key
///
/// Anything shorter than a raw private key's 64 hex characters is treated as
/// a custodial wallet id. This is a loose length heuristic kept byte-for-byte
/// for compatibility with existing callers: a 63-character wallet id routes
/// custodial, a 64-character one would be misread as a private key. Callers
/// that can choose should pass unambiguous credentials.
pub fn is_wallet_id(credential: &str) -> bool {
    credential.len() < RAW_KEY_HEX_LEN
}

/// Uniform interface over the two signing strategies
///
/// Produces an opaque raw transaction ready for broadcast; signing never
/// submits anything.
#[async_trait]
pub trait SigningBackend: Send + Sync {
    async fn sign(&self, request: &TxRequest) -> Result<Bytes>;
}

/// In-process signer over a raw private key
pub struct LocalKeySigner {
    signer: PrivateKeySigner,
}

impl LocalKeySigner {
    /// Build from a hex-encoded 32-byte private key (`0x` prefix optional)
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Signer(format!("invalid private key: {}", e)))?;
        Ok(Self { signer })
    }

    /// Address derived from the key (safe to share)
    pub fn address(&self) -> alloy::primitives::Address {
        self.signer.address()
    }
}

#[async_trait]
impl SigningBackend for LocalKeySigner {
    async fn sign(&self, request: &TxRequest) -> Result<Bytes> {
        let mut tx = TxLegacy {
            chain_id: Some(request.chain_id),
            nonce: request.nonce,
            gas_price: request.gas_price,
            gas_limit: request.gas_limit,
            to: match request.to {
                Some(to) => TxKind::Call(to),
                None => TxKind::Create,
            },
            value: request.value,
            input: request.data.clone().unwrap_or_default(),
        };

        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| Error::Signer(format!("local signing failed: {}", e)))?;

        Ok(Bytes::from(tx.into_signed(signature).encoded_2718()))
    }
}

impl std::fmt::Debug for LocalKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKeySigner")
            .field("address", &self.signer.address())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};

    // Well-known test key (DO NOT use in production!)
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_is_wallet_id_boundary() {
        // 63 characters: wallet id; 64: private key
        assert!(is_wallet_id(&"a".repeat(63)));
        assert!(!is_wallet_id(&"a".repeat(64)));
        assert!(!is_wallet_id(&"a".repeat(66)));
    }

    #[test]
    fn test_is_wallet_id_counts_raw_length() {
        // A 0x-prefixed key is 66 characters and still routes local
        let key = format!("0x{}", "b".repeat(64));
        assert!(!is_wallet_id(&key));
        assert!(is_wallet_id("wlt_cm4abcdef"));
    }

    #[test]
    fn test_local_signer_derives_address() {
        let signer = LocalKeySigner::from_hex(TEST_KEY).unwrap();
        assert_eq!(
            signer.address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_local_signer_rejects_garbage() {
        assert!(LocalKeySigner::from_hex("not-a-key").is_err());
        assert!(LocalKeySigner::from_hex("0x1234").is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let signer = LocalKeySigner::from_hex(TEST_KEY).unwrap();
        let debug = format!("{:?}", signer);
        assert!(!debug.contains("ac0974bec"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_signing_is_deterministic() {
        let signer = LocalKeySigner::from_hex(TEST_KEY).unwrap();
        let request = TxRequest {
            from: signer.address(),
            to: Some(Address::repeat_byte(0x42)),
            value: U256::from(1_000_000u64),
            gas_limit: 100_000,
            gas_price: 5_000_000_000,
            nonce: 1,
            chain_id: 97,
            data: None,
        };

        let first = signer.sign(&request).await.unwrap();
        let second = signer.sign(&request).await.unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
