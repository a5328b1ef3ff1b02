//! Submission and confirmation pipeline
//!
//! Sign, broadcast, wait for a receipt, and interpret its status. A mined
//! receipt with status 0 triggers the replay diagnosis and yields
//! [`TransactionOutcome::Reverted`]; any transport-level error during signing
//! or broadcast propagates unchanged. Nothing here retries a state-mutating
//! submission: resubmission with the same nonce would fail, and with a new
//! nonce could execute the intent twice.

use crate::chain::{diagnosis, ChainHandle};
use crate::error::{Error, Result};
use crate::signer::SigningBackend;
use crate::tx::TxRequest;
use alloy::primitives::{Address, B256};
use alloy::rpc::types::TransactionReceipt;

/// Terminal result of one submission; never retried automatically
#[derive(Debug)]
pub enum TransactionOutcome {
    Confirmed {
        tx_hash: B256,
        receipt: Box<TransactionReceipt>,
    },
    Reverted {
        tx_hash: B256,
        cause: String,
    },
}

impl TransactionOutcome {
    pub fn tx_hash(&self) -> B256 {
        match self {
            Self::Confirmed { tx_hash, .. } | Self::Reverted { tx_hash, .. } => *tx_hash,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    /// Unwrap a confirmation, turning a revert into an error
    ///
    /// For flows that cannot proceed past a failed step (deployment
    /// sequences, approvals).
    pub fn confirmed(self) -> Result<Box<TransactionReceipt>> {
        match self {
            Self::Confirmed { receipt, .. } => Ok(receipt),
            Self::Reverted { tx_hash, cause } => Err(Error::Reverted { tx_hash, cause }),
        }
    }

    /// Contract address created by this transaction, if any
    pub fn contract_address(&self) -> Option<Address> {
        match self {
            Self::Confirmed { receipt, .. } => receipt.contract_address,
            Self::Reverted { .. } => None,
        }
    }
}

/// Sign, broadcast, and block until the outcome is known
pub async fn execute(
    chain: &ChainHandle,
    signer: &dyn SigningBackend,
    request: TxRequest,
) -> Result<TransactionOutcome> {
    let raw = signer.sign(&request).await?;
    let tx_hash = chain.broadcast(&raw).await?;
    tracing::debug!(%tx_hash, nonce = request.nonce, "transaction broadcast");

    let receipt = chain.wait_for_receipt(tx_hash).await?;

    if receipt.status() {
        tracing::info!(%tx_hash, "transaction confirmed");
        Ok(TransactionOutcome::Confirmed {
            tx_hash,
            receipt: Box::new(receipt),
        })
    } else {
        let cause = diagnosis::diagnose(chain, tx_hash).await;
        tracing::warn!(%tx_hash, %cause, "transaction reverted");
        Ok(TransactionOutcome::Reverted { tx_hash, cause })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverted_outcome_becomes_error() {
        let tx_hash = B256::repeat_byte(0xaa);
        let outcome = TransactionOutcome::Reverted {
            tx_hash,
            cause: "LOK".to_string(),
        };
        assert!(!outcome.is_confirmed());
        assert_eq!(outcome.tx_hash(), tx_hash);

        match outcome.confirmed() {
            Err(Error::Reverted { tx_hash: hash, cause }) => {
                assert_eq!(hash, tx_hash);
                assert_eq!(cause, "LOK");
            }
            other => panic!("expected Reverted error, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_reverted_has_no_contract_address() {
        let outcome = TransactionOutcome::Reverted {
            tx_hash: B256::ZERO,
            cause: "out of gas".to_string(),
        };
        assert!(outcome.contract_address().is_none());
    }
}
