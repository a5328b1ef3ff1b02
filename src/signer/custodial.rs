//! Remote custodial signer client
//!
//! The custodial service holds key material on behalf of opaque wallet ids
//! and signs transactions over an authenticated HTTPS API:
//! - `POST /v1/wallets/` provisions a wallet, returning its address and id
//! - `POST /v1/wallets/{id}/rpc` with method `eth_signTransaction` returns a
//!   signed raw transaction
//!
//! Both calls use HTTP basic auth with the application id and secret from
//! process configuration. The service is an opaque black box: the signed
//! bytes are relayed to broadcast without inspection.

use crate::config::CustodialConfig;
use crate::error::{Error, Result};
use crate::signer::SigningBackend;
use crate::tx::TxRequest;
use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.privy.io";

/// Authenticated HTTP client for the custodial wallet service
pub struct CustodialClient {
    http: reqwest::Client,
    base_url: String,
    config: CustodialConfig,
}

impl CustodialClient {
    pub fn new(config: CustodialConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(config: CustodialConfig, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            config,
        }
    }

    /// Provision a new custodial wallet, returning `(address, wallet_id)`
    pub async fn create_wallet(&self) -> Result<(Address, String)> {
        let response = self
            .http
            .post(format!("{}/v1/wallets/", self.base_url))
            .basic_auth(
                &self.config.app_id,
                Some(self.config.app_secret.expose_secret()),
            )
            .header("privy-app-id", &self.config.app_id)
            .json(&serde_json::json!({ "chain_type": "ethereum" }))
            .send()
            .await?
            .error_for_status()?
            .json::<CreateWalletResponse>()
            .await?;

        let address = response
            .address
            .parse::<Address>()
            .map_err(|e| Error::Signer(format!("wallet service returned bad address: {}", e)))?;
        tracing::info!(wallet_id = %response.id, %address, "provisioned custodial wallet");

        Ok((address, response.id))
    }

    /// Sign a transaction under `wallet_id`
    pub async fn sign_transaction(&self, wallet_id: &str, request: &TxRequest) -> Result<Bytes> {
        let body = SignRequest {
            method: "eth_signTransaction",
            params: SignParams {
                transaction: WireTransaction::from_request(request),
            },
        };

        let response = self
            .http
            .post(format!("{}/v1/wallets/{}/rpc", self.base_url, wallet_id))
            .basic_auth(
                &self.config.app_id,
                Some(self.config.app_secret.expose_secret()),
            )
            .header("privy-app-id", &self.config.app_id)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<SignResponse>()
            .await?;

        response
            .data
            .signed_transaction
            .parse::<Bytes>()
            .map_err(|e| Error::Signer(format!("wallet service returned bad raw tx: {}", e)))
    }

    /// Borrow a [`SigningBackend`] bound to one wallet id
    pub fn signer(&self, wallet_id: impl Into<String>) -> CustodialSigner<'_> {
        CustodialSigner {
            client: self,
            wallet_id: wallet_id.into(),
        }
    }
}

impl std::fmt::Debug for CustodialClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustodialClient")
            .field("base_url", &self.base_url)
            .field("app_id", &self.config.app_id)
            .finish()
    }
}

/// Remote signing strategy addressed by wallet id
#[derive(Debug)]
pub struct CustodialSigner<'a> {
    client: &'a CustodialClient,
    wallet_id: String,
}

#[async_trait]
impl SigningBackend for CustodialSigner<'_> {
    async fn sign(&self, request: &TxRequest) -> Result<Bytes> {
        self.client.sign_transaction(&self.wallet_id, request).await
    }
}

#[derive(Serialize)]
struct SignRequest<'a> {
    method: &'static str,
    params: SignParams<'a>,
}

#[derive(Serialize)]
struct SignParams<'a> {
    transaction: WireTransaction<'a>,
}

/// The service's transaction shape; legacy (type 0) only
#[derive(Serialize)]
struct WireTransaction<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<Address>,
    nonce: u64,
    gas_limit: u64,
    gas_price: u128,
    /// Hex quantity; the native value can exceed a JSON-safe integer
    value: String,
    chain_id: u64,
    #[serde(rename = "type")]
    tx_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Bytes>,
}

impl<'a> WireTransaction<'a> {
    fn from_request(request: &'a TxRequest) -> Self {
        Self {
            to: request.to,
            nonce: request.nonce,
            gas_limit: request.gas_limit,
            gas_price: request.gas_price,
            value: format!("0x{:x}", request.value),
            chain_id: request.chain_id,
            tx_type: 0,
            data: request.data.as_ref(),
        }
    }
}

#[derive(Deserialize)]
struct CreateWalletResponse {
    address: String,
    id: String,
}

#[derive(Deserialize)]
struct SignResponse {
    data: SignData,
}

#[derive(Deserialize)]
struct SignData {
    signed_transaction: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn request() -> TxRequest {
        TxRequest {
            from: Address::repeat_byte(0x11),
            to: Some(Address::repeat_byte(0x22)),
            value: U256::from(1_000_000u64),
            gas_limit: 100_000,
            gas_price: 5_000_000_000,
            nonce: 9,
            chain_id: 97,
            data: None,
        }
    }

    #[test]
    fn test_wire_transaction_shape() {
        let request = request();
        let wire = WireTransaction::from_request(&request);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["nonce"], 9);
        assert_eq!(json["gas_limit"], 100_000);
        assert_eq!(json["gas_price"], 5_000_000_000u64);
        assert_eq!(json["chain_id"], 97);
        assert_eq!(json["type"], 0);
        assert_eq!(json["value"], "0xf4240");
        // No call payload: the data key must be absent, not null
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_wire_transaction_includes_data_when_present() {
        let mut request = request();
        request.data = Some(Bytes::from(vec![0xab, 0xcd]));
        let json =
            serde_json::to_value(WireTransaction::from_request(&request)).unwrap();
        assert_eq!(json["data"], "0xabcd");
    }

    #[test]
    fn test_sign_request_envelope() {
        let request = request();
        let body = SignRequest {
            method: "eth_signTransaction",
            params: SignParams {
                transaction: WireTransaction::from_request(&request),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["method"], "eth_signTransaction");
        assert!(json["params"]["transaction"]["to"].is_string());
    }

    #[test]
    fn test_sign_response_parses() {
        let raw = r#"{"data":{"signed_transaction":"0xf86b098504a817c800"}}"#;
        let parsed: SignResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.data.signed_transaction, "0xf86b098504a817c800");
    }
}
