//! Pool resolution across fee tiers
//!
//! The factory deploys at most one pool per (tokenA, tokenB, fee) triple.
//! Launch pools were historically created at the higher fee tiers, so the
//! search walks tiers in descending order and takes the first live pool.
//! This is a priority convention, not a liquidity-weighted choice.

use crate::abi::IV3Factory;
use crate::chain::ChainHandle;
use crate::error::{Error, Result};
use alloy::primitives::{aliases::U24, Address};
use alloy::sol_types::SolCall;

/// Fee tier search order in basis units (1%, 0.25%, 0.05%, 0.01%)
pub const FEE_TIERS: [u32; 4] = [10_000, 2_500, 500, 100];

/// A resolved pool and the fee tier it was found at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolQuote {
    pub pool: Address,
    pub fee: u32,
}

/// Find the pool pairing `token` with the wrapped native asset
///
/// Queries the factory at each tier of [`FEE_TIERS`] and returns the first
/// non-zero pool address, or `None` when no tier has one.
pub async fn find_pool(
    chain: &ChainHandle,
    factory: Address,
    token: Address,
    wrapped_native: Address,
) -> Result<Option<PoolQuote>> {
    for fee in FEE_TIERS {
        let call = IV3Factory::getPoolCall {
            tokenA: token,
            tokenB: wrapped_native,
            fee: U24::from(fee),
        };
        let returned = chain.call(factory, call.abi_encode().into()).await?;
        let pool = IV3Factory::getPoolCall::abi_decode_returns(&returned)
            .map_err(|e| Error::Rpc(format!("getPool decode: {}", e)))?;

        if let Some(quote) = live_pool(pool, fee) {
            tracing::debug!(%token, pool = %quote.pool, fee, "resolved pool");
            return Ok(Some(quote));
        }
    }
    Ok(None)
}

/// Resolve the single fee tier for one leg of a hop route
///
/// A leg that resolves to no tier at all makes the whole route unbuildable;
/// the error names the leg so the caller's report is actionable.
pub async fn resolve_leg(
    chain: &ChainHandle,
    factory: Address,
    token: Address,
    wrapped_native: Address,
    leg: &str,
) -> Result<PoolQuote> {
    find_pool(chain, factory, token, wrapped_native)
        .await?
        .ok_or_else(|| {
            Error::NoRouteFound(format!(
                "{} token {} has no pool with the wrapped native asset at any fee tier",
                leg, token
            ))
        })
}

/// First tier with a deployed pool, in search order
fn live_pool(pool: Address, fee: u32) -> Option<PoolQuote> {
    (pool != Address::ZERO).then_some(PoolQuote { pool, fee })
}

/// Pure selection over pre-fetched per-tier results, in [`FEE_TIERS`] order
#[cfg(test)]
fn first_live_tier(results: &[(u32, Address)]) -> Option<PoolQuote> {
    results
        .iter()
        .find_map(|&(fee, pool)| live_pool(pool, fee))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_tier_search_order() {
        assert_eq!(FEE_TIERS, [10_000, 2_500, 500, 100]);
    }

    #[test]
    fn test_first_live_tier_prefers_search_order() {
        let pool_a = Address::repeat_byte(0x0a);
        let pool_b = Address::repeat_byte(0x0b);

        // Only the 1% pool exists
        let results: Vec<(u32, Address)> = FEE_TIERS
            .iter()
            .map(|&fee| (fee, if fee == 10_000 { pool_a } else { Address::ZERO }))
            .collect();
        assert_eq!(
            first_live_tier(&results),
            Some(PoolQuote {
                pool: pool_a,
                fee: 10_000
            })
        );

        // Both 1% and 0.05% exist: the earlier tier wins
        let results = vec![
            (10_000, pool_a),
            (2_500, Address::ZERO),
            (500, pool_b),
            (100, Address::ZERO),
        ];
        assert_eq!(first_live_tier(&results).unwrap().fee, 10_000);
    }

    #[test]
    fn test_first_live_tier_skips_zero_pools() {
        let pool = Address::repeat_byte(0x0c);
        let results = vec![
            (10_000, Address::ZERO),
            (2_500, Address::ZERO),
            (500, Address::ZERO),
            (100, pool),
        ];
        assert_eq!(
            first_live_tier(&results),
            Some(PoolQuote { pool, fee: 100 })
        );
    }

    #[test]
    fn test_all_tiers_zero_is_not_found() {
        let results: Vec<(u32, Address)> =
            FEE_TIERS.iter().map(|&fee| (fee, Address::ZERO)).collect();
        assert_eq!(first_live_tier(&results), None);
    }
}
