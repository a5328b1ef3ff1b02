//! Swap routing: pool resolution, path encoding, and approvals
//!
//! These are the only parts of trade construction with real invariants:
//! at-most-one fee tier per hop leg, byte-exact path encoding, and idempotent
//! allowance checks. Everything downstream is parameter marshaling into the
//! router.

pub mod approval;
pub mod path;
pub mod pool;

pub use path::encode_path;
pub use pool::{find_pool, PoolQuote, FEE_TIERS};
