//! Failure diagnosis by replay
//!
//! A mined transaction with receipt status 0 carries no revert reason of its
//! own. To surface one, the original call is re-executed as `eth_call`
//! against the state of the block immediately preceding its inclusion block;
//! whatever the node reports for that replay is the diagnosis.
//!
//! Best-effort by design: if the replay itself fails (state pruned, node
//! error), that error text is returned as the diagnosis rather than
//! swallowed. The result is never empty.

use super::ChainHandle;
use crate::tx::TxRequest;
use alloy::consensus::Transaction as _;
use alloy::primitives::B256;
use alloy::providers::Provider;

/// Replay a mined transaction against its parent block and describe the cause
pub async fn diagnose(chain: &ChainHandle, tx_hash: B256) -> String {
    let tx = match chain.provider().get_transaction_by_hash(tx_hash).await {
        Ok(Some(tx)) => tx,
        Ok(None) => return format!("transaction {} not found on node", tx_hash),
        Err(e) => return format!("failed to fetch transaction {}: {}", tx_hash, e),
    };

    let Some(block_number) = tx.block_number else {
        return format!("transaction {} has no inclusion block yet", tx_hash);
    };
    let parent_block = block_number.saturating_sub(1);

    let replay = TxRequest {
        from: tx.inner.signer(),
        to: tx.to(),
        value: tx.value(),
        gas_limit: tx.gas_limit(),
        gas_price: tx.gas_price().unwrap_or_default(),
        nonce: tx.nonce(),
        chain_id: chain.chain_id(),
        data: Some(tx.input().clone()),
    };

    match chain.call_static(&replay, Some(parent_block)).await {
        // A replay that succeeds against parent state tells us the failure
        // was state-dependent (raced by another transaction in the block).
        Ok(_) => format!(
            "replay at block {} did not revert; state changed within block {}",
            parent_block, block_number
        ),
        Err(e) => parse_revert_reason(&e),
    }
}

/// Extract a human-readable revert reason from a node error string
pub fn parse_revert_reason(error: &str) -> String {
    if error.contains("execution reverted") {
        // Try to extract the reason string
        if let Some(start) = error.find("revert: ") {
            let reason = &error[start + 8..];
            if let Some(end) = reason.find('"') {
                return reason[..end].to_string();
            }
            return reason.to_string();
        }
        // Try to extract hex return data
        if let Some(start) = error.find("0x") {
            let hex_data = &error[start..];
            if let Some(end) = hex_data.find(|c: char| !c.is_ascii_hexdigit() && c != 'x') {
                let hex = &hex_data[..end];
                if let Some(decoded) = decode_error_string(hex) {
                    return decoded;
                }
                return format!("reverted with data: {}", hex);
            }
            if let Some(decoded) = decode_error_string(hex_data) {
                return decoded;
            }
            return format!("reverted with data: {}", hex_data);
        }
        return "execution reverted".to_string();
    }

    // Return the full error if we can't parse it
    error.to_string()
}

/// Decode an ABI-encoded `Error(string)` payload (selector 0x08c379a0)
fn decode_error_string(hex: &str) -> Option<String> {
    if !hex.starts_with("0x08c379a0") || hex.len() <= 138 {
        return None;
    }
    let decoded = alloy::hex::decode(&hex[138..]).ok()?;
    let filtered: Vec<u8> = decoded.into_iter().filter(|&b| b != 0).collect();
    String::from_utf8(filtered).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_revert_reason_with_message() {
        let error = "execution reverted: revert: Insufficient balance\"";
        assert_eq!(parse_revert_reason(error), "Insufficient balance");
    }

    #[test]
    fn test_parse_revert_reason_bare() {
        assert_eq!(
            parse_revert_reason("execution reverted"),
            "execution reverted"
        );
    }

    #[test]
    fn test_parse_revert_reason_passes_through_unknown() {
        assert_eq!(
            parse_revert_reason("connection refused"),
            "connection refused"
        );
    }

    #[test]
    fn test_decode_error_string_payload() {
        // Error("STF") ABI-encoded: selector + offset + length + padded data
        let hex = concat!(
            "0x08c379a0",
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000003",
            "5354460000000000000000000000000000000000000000000000000000000000",
        );
        let error = format!("execution reverted, data: {}", hex);
        assert_eq!(parse_revert_reason(&error), "STF");
    }

    #[test]
    fn test_parse_revert_reason_never_empty() {
        for error in [
            "execution reverted",
            "execution reverted: revert: x\"",
            "pruned state",
            "0xdeadbeef",
        ] {
            assert!(!parse_revert_reason(error).is_empty());
        }
    }
}
