//! Transaction building blocks
//!
//! [`TxRequest`] is the canonical unit of work: built fresh for every call,
//! signed by exactly one backend, consumed by exactly one broadcast. Nonces
//! are fetched at build time and never reused; multi-step flows advance them
//! through a [`NonceSequencer`] instead of re-querying the node mid-flow.

pub mod pipeline;

use crate::chain::ChainHandle;
use crate::error::Result;
use alloy::primitives::{Address, Bytes, U256};

/// Conservative default gas limit for contract calls
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

/// A fully specified legacy transaction, ready for signing
///
/// Single-use: the nonce embedded here is only valid for one broadcast.
#[derive(Debug, Clone)]
pub struct TxRequest {
    pub from: Address,
    /// `None` deploys a contract
    pub to: Option<Address>,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub nonce: u64,
    pub chain_id: u64,
    /// ABI-encoded call payload or deployment init code
    pub data: Option<Bytes>,
}

impl TxRequest {
    /// Assemble generic parameters for a transaction from `from`
    ///
    /// Fetches the current nonce and gas price from the node. The nonce fetch
    /// and the eventual broadcast are not atomic: concurrent flows sharing a
    /// sender address must serialize externally or collide.
    pub async fn build(
        chain: &ChainHandle,
        from: Address,
        value: U256,
        gas_limit: Option<u64>,
    ) -> Result<Self> {
        Ok(Self {
            from,
            to: None,
            value,
            gas_limit: gas_limit.unwrap_or(DEFAULT_GAS_LIMIT),
            gas_price: chain.gas_price().await?,
            nonce: chain.nonce(from).await?,
            chain_id: chain.chain_id(),
            data: None,
        })
    }

    /// Set the recipient contract or account
    pub fn with_to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    /// Merge an ABI-encoded call payload into the request
    pub fn with_call(mut self, data: Bytes) -> Self {
        self.data = Some(data);
        self
    }

    /// Override the nonce (sequenced multi-step flows)
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }
}

/// Strictly increasing nonce source for one multi-step flow
///
/// Owned by the orchestrating flow and never shared: two flows sequencing the
/// same sender concurrently will collide regardless of this type. Call
/// [`NonceSequencer::advance`] only after the previous submission's outcome
/// is known.
#[derive(Debug)]
pub struct NonceSequencer {
    next: u64,
}

impl NonceSequencer {
    /// Start from the sender's current transaction count
    pub async fn for_sender(chain: &ChainHandle, sender: Address) -> Result<Self> {
        Ok(Self::starting_at(chain.nonce(sender).await?))
    }

    pub fn starting_at(nonce: u64) -> Self {
        Self { next: nonce }
    }

    /// The nonce to stamp on the next submission
    pub fn current(&self) -> u64 {
        self.next
    }

    /// Consume the current nonce after its submission confirmed
    pub fn advance(&mut self) -> u64 {
        let used = self.next;
        self.next += 1;
        used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequencer_strictly_increasing() {
        let mut seq = NonceSequencer::starting_at(7);
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(seq.current());
            seq.advance();
        }
        assert_eq!(seen, vec![7, 8, 9, 10]);
        assert_eq!(seq.current(), 11);
    }

    #[test]
    fn test_sequencer_current_is_stable_until_advanced() {
        let seq = NonceSequencer::starting_at(3);
        assert_eq!(seq.current(), 3);
        assert_eq!(seq.current(), 3);
    }

    #[test]
    fn test_request_builders_compose() {
        let to = Address::repeat_byte(0x11);
        let request = TxRequest {
            from: Address::repeat_byte(0x22),
            to: None,
            value: U256::ZERO,
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: 5_000_000_000,
            nonce: 0,
            chain_id: 97,
            data: None,
        }
        .with_to(to)
        .with_call(Bytes::from(vec![0xde, 0xad]))
        .with_nonce(42);

        assert_eq!(request.to, Some(to));
        assert_eq!(request.nonce, 42);
        assert_eq!(request.data.unwrap().as_ref(), &[0xde, 0xad][..]);
        assert_eq!(request.gas_limit, DEFAULT_GAS_LIMIT);
    }
}
