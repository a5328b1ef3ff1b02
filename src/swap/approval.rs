//! Router allowance management
//!
//! Sell-side swaps need the router approved to spend the input token. The
//! allowance is always re-read from the chain before use (it can be revoked
//! externally, so caching across calls would be unsound), and raising it is
//! idempotent: at or above the check threshold nothing is submitted.

use alloy::primitives::U256;
use std::time::Duration;

/// Allowance value granted when approving: 2^256 - 1
pub const MAX_APPROVAL: U256 = U256::MAX;

/// Allowance level treated as "already approved"
///
/// `0xFFF...F` with the top 15 hex digits zeroed (2^196 - 1). Leaves
/// headroom below the granted maximum so that allowance consumed by earlier
/// trades does not force a fresh approval every call.
pub const APPROVAL_CHECK_THRESHOLD: U256 =
    U256::from_limbs([u64::MAX, u64::MAX, u64::MAX, 0xf]);

/// Pause after an approval confirms, letting the node propagate the updated
/// allowance to subsequent reads. A fixed delay rather than a
/// poll-until-consistent loop; an accepted compromise.
pub const PROPAGATION_DELAY: Duration = Duration::from_secs(3);

/// Whether the current allowance requires an approval transaction
pub fn needs_approval(allowance: U256) -> bool {
    allowance < APPROVAL_CHECK_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_threshold_matches_masked_constant() {
        // 15 zero hex digits followed by 49 f's
        let expected = U256::from_str(&format!("0x{}{}", "0".repeat(15), "f".repeat(49))).unwrap();
        assert_eq!(APPROVAL_CHECK_THRESHOLD, expected);
    }

    #[test]
    fn test_needs_approval_below_threshold() {
        assert!(needs_approval(U256::ZERO));
        assert!(needs_approval(APPROVAL_CHECK_THRESHOLD - U256::from(1)));
    }

    #[test]
    fn test_no_approval_at_or_above_threshold() {
        assert!(!needs_approval(APPROVAL_CHECK_THRESHOLD));
        assert!(!needs_approval(MAX_APPROVAL));
        // Partially consumed max approval still counts as approved
        assert!(!needs_approval(MAX_APPROVAL - U256::from(1u64 << 40)));
    }

    #[test]
    fn test_max_approval_is_uint256_max() {
        assert_eq!(MAX_APPROVAL, U256::from_str(&format!("0x{}", "f".repeat(64))).unwrap());
    }
}
