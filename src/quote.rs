//! Off-chain quote aggregator client
//!
//! Fetches a ready-to-relay swap transaction from a 0x-style quote API. The
//! aggregator computes the route and returns the full transaction object
//! (`to`, `data`, `gas`, `value`, `gasPrice`); this client only relays it,
//! never recomputes routing itself.

use crate::error::{Error, Result};
use alloy::primitives::{Address, Bytes, U256};
use serde::Deserialize;
use std::str::FromStr;

const DEFAULT_BASE_URL: &str = "https://api.0x.org";
const API_KEY_ENV: &str = "ZEROX_API_KEY";

/// Sentinel address aggregators use for the chain's native asset
pub const NATIVE_TOKEN: Address = Address::repeat_byte(0xee);

/// Whether an aggregator-side token address denotes the native asset
pub fn is_native_sentinel(token: Address) -> bool {
    token == Address::ZERO || token == NATIVE_TOKEN
}

/// Query parameters for a quote request
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub chain_id: u64,
    pub buy_token: Address,
    pub sell_token: Address,
    pub sell_amount: U256,
    pub taker: Address,
    pub gas_price: Option<u128>,
    pub slippage_bps: Option<u32>,
}

/// HTTP client for the quote API
#[derive(Debug)]
pub struct QuoteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl QuoteClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Build from the `ZEROX_API_KEY` env var
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| Error::MissingCredential(format!("{} is not set", API_KEY_ENV)))?;
        Ok(Self::new(api_key))
    }

    /// Fetch a ready-to-send swap transaction
    pub async fn quote(&self, request: &QuoteRequest) -> Result<RelayTransaction> {
        let mut query: Vec<(&str, String)> = vec![
            ("chainId", request.chain_id.to_string()),
            ("buyToken", request.buy_token.to_string()),
            ("sellToken", request.sell_token.to_string()),
            ("sellAmount", request.sell_amount.to_string()),
            ("taker", request.taker.to_string()),
        ];
        if let Some(gas_price) = request.gas_price {
            query.push(("gasPrice", gas_price.to_string()));
        }
        if let Some(slippage_bps) = request.slippage_bps {
            query.push(("slippageBps", slippage_bps.to_string()));
        }

        tracing::debug!(
            chain_id = request.chain_id,
            buy = %request.buy_token,
            sell = %request.sell_token,
            "requesting aggregator quote"
        );

        let response = self
            .http
            .get(format!("{}/swap/allowance-holder/quote", self.base_url))
            .query(&query)
            .header("0x-api-key", &self.api_key)
            .header("0x-version", "v2")
            .send()
            .await?
            .error_for_status()?
            .json::<QuoteResponse>()
            .await?;

        response.transaction.parsed()
    }
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    transaction: WireQuoteTransaction,
}

/// The aggregator's transaction object; all quantities arrive as strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuoteTransaction {
    to: String,
    data: String,
    gas: String,
    value: String,
    gas_price: String,
}

impl WireQuoteTransaction {
    fn parsed(&self) -> Result<RelayTransaction> {
        Ok(RelayTransaction {
            to: Address::from_str(&self.to)
                .map_err(|e| Error::Quote(format!("bad 'to' in quote: {}", e)))?,
            data: Bytes::from_str(&self.data)
                .map_err(|e| Error::Quote(format!("bad 'data' in quote: {}", e)))?,
            gas: self
                .gas
                .parse::<u64>()
                .map_err(|e| Error::Quote(format!("bad 'gas' in quote: {}", e)))?,
            value: U256::from_str(&self.value)
                .map_err(|e| Error::Quote(format!("bad 'value' in quote: {}", e)))?,
            gas_price: self
                .gas_price
                .parse::<u128>()
                .map_err(|e| Error::Quote(format!("bad 'gasPrice' in quote: {}", e)))?,
        })
    }
}

/// A pre-built transaction to relay as-is
#[derive(Debug, Clone)]
pub struct RelayTransaction {
    pub to: Address,
    pub data: Bytes,
    pub gas: u64,
    pub value: U256,
    pub gas_price: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_sentinels() {
        assert!(is_native_sentinel(Address::ZERO));
        assert!(is_native_sentinel(
            "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
                .parse()
                .unwrap()
        ));
        assert!(!is_native_sentinel(Address::repeat_byte(0x01)));
    }

    #[test]
    fn test_quote_response_parses() {
        let raw = r#"{
            "transaction": {
                "to": "0x1b81d678ffb9c0263b24a97847620c99d213eb14",
                "data": "0xabcdef",
                "gas": "210000",
                "value": "1000000",
                "gasPrice": "3000000000"
            }
        }"#;
        let response: QuoteResponse = serde_json::from_str(raw).unwrap();
        let tx = response.transaction.parsed().unwrap();

        assert_eq!(tx.gas, 210_000);
        assert_eq!(tx.value, U256::from(1_000_000u64));
        assert_eq!(tx.gas_price, 3_000_000_000);
        assert_eq!(tx.data.len(), 3);
    }

    #[test]
    fn test_quote_response_rejects_bad_fields() {
        let wire = WireQuoteTransaction {
            to: "not-an-address".to_string(),
            data: "0x".to_string(),
            gas: "1".to_string(),
            value: "0".to_string(),
            gas_price: "1".to_string(),
        };
        assert!(matches!(wire.parsed(), Err(Error::Quote(_))));
    }
}
