//! Chain handle: the single owner of the RPC connection
//!
//! Wraps an alloy HTTP provider behind the handful of node interactions the
//! engine needs: nonce/gas-price/balance queries, static calls (optionally
//! pinned to a historical block), raw transaction broadcast, and a bounded
//! wait-for-receipt loop.
//!
//! All externally supplied addresses go through [`parse_address`] before any
//! RPC call; malformed input fails fast client-side instead of being sent to
//! the node.

pub mod diagnosis;

use crate::config::ReceiptPolicy;
use crate::error::{Error, Result};
use crate::tx::TxRequest;
use alloy::eips::BlockId;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionRequest, TransactionReceipt};
use std::str::FromStr;
use tokio::time::{sleep, Instant};

/// Parse an address string
///
/// Accepts `0x`-prefixed hex in any casing and normalizes it; malformed or
/// wrong-length input is rejected client-side.
pub fn parse_address(input: &str) -> Result<Address> {
    Address::from_str(input.trim())
        .map_err(|e| Error::InvalidAddress(format!("{}: {}", input, e)))
}

/// Owned RPC connection plus receipt-wait policy
pub struct ChainHandle {
    provider: DynProvider,
    chain_id: u64,
    receipts: ReceiptPolicy,
}

impl ChainHandle {
    /// Connect to the node and verify it is reachable
    ///
    /// A node that cannot answer `eth_chainId` is a fatal startup error; the
    /// reported chain id must match the configured one.
    pub async fn connect(rpc_url: &str, chain_id: u64, receipts: ReceiptPolicy) -> Result<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| Error::Config(format!("invalid RPC URL {}: {}", rpc_url, e)))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        let reported = provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Connection(format!("{}: {}", rpc_url, e)))?;
        if reported != chain_id {
            return Err(Error::Connection(format!(
                "{} reports chain id {}, expected {}",
                rpc_url, reported, chain_id
            )));
        }
        tracing::info!(rpc_url, chain_id, "connected to chain node");

        Ok(Self {
            provider,
            chain_id,
            receipts,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Current transaction count for `address`
    pub async fn nonce(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| Error::Rpc(format!("nonce query for {}: {}", address, e)))
    }

    /// Current node gas price
    pub async fn gas_price(&self) -> Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| Error::Rpc(format!("gas price query: {}", e)))
    }

    /// Native-currency balance of `address`
    pub async fn balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| Error::Rpc(format!("balance query for {}: {}", address, e)))
    }

    /// Read-only contract call at the latest block
    pub async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().to(to).input(data.into());
        self.provider
            .call(tx)
            .await
            .map_err(|e| Error::Rpc(format!("call to {}: {}", to, e)))
    }

    /// Re-execute a transaction request as a read-only call
    ///
    /// `block` pins execution to a historical state; `None` means latest.
    /// Unlike the other read queries this surfaces the raw node error string,
    /// which for a reverting call carries the revert reason.
    pub async fn call_static(
        &self,
        request: &TxRequest,
        block: Option<u64>,
    ) -> std::result::Result<Bytes, String> {
        let mut tx = TransactionRequest::default()
            .from(request.from)
            .value(request.value);
        if let Some(to) = request.to {
            tx = tx.to(to);
        }
        if let Some(data) = &request.data {
            tx = tx.input(data.clone().into());
        }

        let call = self.provider.call(tx);
        let call = match block {
            Some(number) => call.block(BlockId::number(number)),
            None => call,
        };
        call.await.map_err(|e| e.to_string())
    }

    /// Broadcast a signed raw transaction
    pub async fn broadcast(&self, raw: &[u8]) -> Result<B256> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| Error::Rpc(format!("broadcast: {}", e)))?;
        Ok(*pending.tx_hash())
    }

    /// Poll until the transaction is mined or the wait window elapses
    ///
    /// A timeout means the outcome is unknown (the transaction may still be
    /// mined later); it is reported as `ConfirmationTimeout`, never as a
    /// revert.
    pub async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        let deadline = Instant::now() + self.receipts.timeout;

        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| Error::Rpc(format!("receipt query for {}: {}", tx_hash, e)))?;

            if let Some(receipt) = receipt {
                return Ok(receipt);
            }
            if Instant::now() >= deadline {
                return Err(Error::ConfirmationTimeout(tx_hash));
            }
            sleep(self.receipts.poll_interval).await;
        }
    }
}

impl std::fmt::Debug for ChainHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainHandle")
            .field("chain_id", &self.chain_id)
            .field("receipts", &self.receipts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_accepts_checksummed() {
        let addr = parse_address("0x1b81D678ffb9C0263b24A97847620C99d213eB14").unwrap();
        assert_eq!(
            addr,
            Address::from_str("0x1b81d678ffb9c0263b24a97847620c99d213eb14").unwrap()
        );
    }

    #[test]
    fn test_parse_address_trims_whitespace() {
        assert!(parse_address(" 0x1b81D678ffb9C0263b24A97847620C99d213eB14 ").is_ok());
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        assert!(matches!(
            parse_address("not-an-address"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            parse_address("0x1234"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(parse_address(""), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_parse_address_normalizes_any_casing() {
        let lower = parse_address("0x1b81d678ffb9c0263b24a97847620c99d213eb14").unwrap();
        let upper = parse_address("0x1B81D678FFB9C0263B24A97847620C99D213EB14").unwrap();
        // Casing that matches no EIP-55 checksum still parses to the same address
        let mixed = parse_address("0x1B81D678ffb9C0263b24A97847620C99d213eB14").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
    }
}
