//! Beeper chain engine
//!
//! Client-side orchestration for token launches and DEX trading on BNB Smart
//! Chain: deploy the launcher contract suite, launch tokens against it, swap
//! through the V3 router (with wrapped-native hop routing), transfer assets,
//! and relay aggregator-built swaps.
//!
//! SECURITY NOTE:
//! - Private keys never leave the process in local-key mode; custodial mode
//!   sends only unsigned transaction fields to the remote signer.
//! - Every state-mutating flow submits exactly once; nothing here retries a
//!   broadcast.
//! - Flows sharing a sender address must be serialized by the caller.

pub mod abi;
pub mod chain;
pub mod config;
pub mod deploy;
pub mod engine;
pub mod error;
pub mod quote;
pub mod signer;
pub mod swap;
pub mod tx;

pub use config::{ChainConfig, CustodialConfig, ReceiptPolicy};
pub use deploy::DeploymentResult;
pub use engine::{Engine, TokenDeployment, TokenLaunch};
pub use error::{Error, Result};
pub use quote::QuoteClient;
pub use tx::pipeline::TransactionOutcome;
