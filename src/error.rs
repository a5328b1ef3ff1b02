//! Error types for the chain engine

use alloy::primitives::B256;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot reach chain node: {0}")]
    Connection(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no route found: {0}")]
    NoRouteFound(String),

    #[error("transaction {tx_hash} reverted: {cause}")]
    Reverted { tx_hash: B256, cause: String },

    #[error("no receipt for {0} within the wait window")]
    ConfirmationTimeout(B256),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("signer error: {0}")]
    Signer(String),

    #[error("path length mismatch: {tokens} tokens with {fees} fees")]
    PathLength { tokens: usize, fees: usize },

    #[error("contract artifact error: {0}")]
    Artifact(String),

    #[error("quote aggregator error: {0}")]
    Quote(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
