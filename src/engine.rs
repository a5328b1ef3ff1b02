//! Transaction orchestration engine
//!
//! The public surface of the crate: balance queries, swaps through the V3
//! router, asset transfers, launcher-suite deployment, token launches, and
//! reward claims. Each operation runs to completion as one sequential flow —
//! there is no internal scheduler, queue, or automatic retry.
//!
//! Signing is selected per call from the supplied credential string: with
//! custodial mode configured, credentials shorter than a raw private key
//! route to the remote signer (see [`crate::signer::is_wallet_id`]).
//!
//! Concurrency contract: two flows sharing a sender address must be
//! serialized by the caller; nonce fetching and broadcast are not atomic
//! across flows.

use crate::abi::{IERC20, ILauncherUtil, ISwapRouter, ITokenLauncher};
use crate::chain::{parse_address, ChainHandle};
use crate::config::{ChainConfig, CustodialConfig};
use crate::deploy::{
    ContractArtifact, DeploymentResult, LAUNCHER_ARTIFACT, LOCKER_ARTIFACT, UTIL_ARTIFACT,
};
use crate::error::{Error, Result};
use crate::quote::{is_native_sentinel, QuoteClient, QuoteRequest, NATIVE_TOKEN};
use crate::signer::custodial::CustodialClient;
use crate::signer::{is_wallet_id, LocalKeySigner, SigningBackend};
use crate::swap::approval::{needs_approval, MAX_APPROVAL, PROPAGATION_DELAY};
use crate::swap::pool::resolve_leg;
use crate::swap::{encode_path, find_pool};
use crate::tx::pipeline::{self, TransactionOutcome};
use crate::tx::{NonceSequencer, TxRequest};
use alloy::primitives::{
    aliases::{I24, U160, U24},
    Address, Bytes, U256,
};
use alloy::sol_types::{SolCall, SolValue};
use sha2::{Digest, Sha256};
use tokio::time::sleep;

/// Swap deadline horizon, seconds from now
const DEADLINE_SECS: u64 = 3600;
/// Default fee tier assumed when pool discovery finds nothing (launch pools
/// are created at 1%)
const DEFAULT_POOL_FEE: u32 = 10_000;
/// Gas limit for contract deployments and launcher wiring calls
const DEPLOY_GAS_LIMIT: u64 = 10_000_000;
/// Gas limit for `deployToken`
const DEPLOY_TOKEN_GAS_LIMIT: u64 = 8_000_000;
/// Gas limit for a plain native transfer
const NATIVE_TRANSFER_GAS_LIMIT: u64 = 100_000;
/// Locker reward duration constructor argument
const LOCKER_DURATION: u64 = 60;

/// Parameters for launching a token through the launcher contract
#[derive(Debug, Clone)]
pub struct TokenDeployment {
    /// Account that receives the deployer role and rewards
    pub recipient: String,
    /// External social identity the launch is keyed on
    pub social_id: u64,
    pub image: String,
    pub name: String,
    pub symbol: String,
    pub supply: U256,
    pub initial_tick: i32,
    /// Pool fee tier for the launch pool
    pub fee: u32,
    /// Fee charged on launch-side buys
    pub buy_fee: u32,
}

impl TokenDeployment {
    /// Launch parameters with the platform defaults
    pub fn new(recipient: impl Into<String>, social_id: u64) -> Self {
        Self {
            recipient: recipient.into(),
            social_id,
            image: "https://twitter.com/".to_string(),
            name: "Beeper".to_string(),
            symbol: "Power by Beeper".to_string(),
            supply: U256::from(10_000_000_000u64) * U256::from(10u64).pow(U256::from(18)),
            initial_tick: -207_400,
            fee: DEFAULT_POOL_FEE,
            buy_fee: DEFAULT_POOL_FEE,
        }
    }
}

/// A submitted token launch: the predicted token address is known up front
/// from the generated salt, before the transaction confirms
#[derive(Debug)]
pub struct TokenLaunch {
    pub outcome: TransactionOutcome,
    pub token: Address,
    pub supply: U256,
}

/// Client-side orchestration over one chain
pub struct Engine {
    chain: ChainHandle,
    config: ChainConfig,
    custodial: Option<CustodialClient>,
    wrapped_native: Address,
}

impl Engine {
    /// Connect to the configured chain and resolve chain constants
    ///
    /// Fails fast when the node is unreachable. The wrapped-native address is
    /// read once from the router and held for the engine's lifetime.
    pub async fn connect(config: ChainConfig, custodial: Option<CustodialConfig>) -> Result<Self> {
        let chain = ChainHandle::connect(&config.rpc_url, config.chain_id, config.receipts).await?;

        let returned = chain
            .call(config.router, ISwapRouter::WETH9Call {}.abi_encode().into())
            .await?;
        let wrapped_native = ISwapRouter::WETH9Call::abi_decode_returns(&returned)
            .map_err(|e| Error::Rpc(format!("WETH9 decode: {}", e)))?;
        tracing::debug!(%wrapped_native, "resolved wrapped native asset");

        Ok(Self {
            chain,
            config,
            custodial: custodial.map(CustodialClient::new),
            wrapped_native,
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn chain(&self) -> &ChainHandle {
        &self.chain
    }

    pub fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    /// Adopt freshly deployed launcher addresses for the rest of the process
    pub fn record_deployment(&mut self, deployment: DeploymentResult) {
        self.config.launcher = Some(deployment.launcher);
        self.config.util = Some(deployment.util);
    }

    /// Pick the signing backend for a credential string
    fn signer_for(&self, credential: &str) -> Result<Box<dyn SigningBackend + '_>> {
        if let Some(client) = &self.custodial {
            if is_wallet_id(credential) {
                return Ok(Box::new(client.signer(credential)));
            }
        }
        Ok(Box::new(LocalKeySigner::from_hex(credential)?))
    }

    async fn submit(&self, credential: &str, request: TxRequest) -> Result<TransactionOutcome> {
        let signer = self.signer_for(credential)?;
        pipeline::execute(&self.chain, signer.as_ref(), request).await
    }

    /// Provision a new custodial wallet, returning `(address, wallet_id)`
    pub async fn create_wallet(&self) -> Result<(Address, String)> {
        let client = self.custodial.as_ref().ok_or_else(|| {
            Error::MissingCredential("custodial mode is not configured".to_string())
        })?;
        client.create_wallet().await
    }

    // ---- balances --------------------------------------------------------

    /// Native or ERC-20 balance of `wallet`
    pub async fn get_balance(&self, wallet: &str, token: Option<&str>) -> Result<U256> {
        let wallet = parse_address(wallet)?;
        match token {
            None => self.chain.balance(wallet).await,
            Some(token) => self.erc20_balance(wallet, parse_address(token)?).await,
        }
    }

    async fn erc20_balance(&self, wallet: Address, token: Address) -> Result<U256> {
        let call = IERC20::balanceOfCall { account: wallet };
        let returned = self.chain.call(token, call.abi_encode().into()).await?;
        IERC20::balanceOfCall::abi_decode_returns(&returned)
            .map_err(|e| Error::Rpc(format!("balanceOf decode: {}", e)))
    }

    // ---- trading ---------------------------------------------------------

    /// Swap between the native asset and/or tokens
    ///
    /// `None` on either side denotes the native asset. Token-to-token trades
    /// where neither side is the wrapped native asset are routed through it
    /// as a middle hop.
    pub async fn make_trade(
        &self,
        wallet: &str,
        credential: &str,
        input_token: Option<&str>,
        output_token: Option<&str>,
        amount: U256,
        fee: Option<u32>,
    ) -> Result<TransactionOutcome> {
        let wallet = parse_address(wallet)?;
        match (input_token, output_token) {
            (None, Some(output)) => {
                let output = parse_address(output)?;
                self.native_to_token(wallet, credential, output, amount, fee)
                    .await
            }
            (Some(input), None) => {
                let input = parse_address(input)?;
                self.token_to_native(wallet, credential, input, amount, fee)
                    .await
            }
            (Some(input), Some(output)) => {
                let input = parse_address(input)?;
                let output = parse_address(output)?;
                self.token_to_token(wallet, credential, input, output, amount, fee)
                    .await
            }
            (None, None) => Err(Error::InvalidArgument(
                "native-to-native trade is meaningless".to_string(),
            )),
        }
    }

    /// Buy `token` with the native asset
    async fn native_to_token(
        &self,
        wallet: Address,
        credential: &str,
        token: Address,
        amount: U256,
        fee: Option<u32>,
    ) -> Result<TransactionOutcome> {
        let fee = self.discover_fee(token, fee).await?;

        let call = ISwapRouter::exactInputSingleCall {
            params: ISwapRouter::ExactInputSingleParams {
                tokenIn: self.wrapped_native,
                tokenOut: token,
                fee: U24::from(fee),
                recipient: wallet,
                deadline: deadline(),
                amountIn: amount,
                amountOutMinimum: U256::ZERO,
                sqrtPriceLimitX96: U160::ZERO,
            },
        };

        let request = TxRequest::build(&self.chain, wallet, amount, None)
            .await?
            .with_to(self.config.router)
            .with_call(call.abi_encode().into());
        self.submit(credential, request).await
    }

    /// Sell `token` for the native asset
    ///
    /// Routed as a router multicall: swap into wrapped native held by the
    /// router, then unwrap to the seller.
    async fn token_to_native(
        &self,
        wallet: Address,
        credential: &str,
        token: Address,
        amount: U256,
        fee: Option<u32>,
    ) -> Result<TransactionOutcome> {
        let fee = self.discover_fee(token, fee).await?;
        self.ensure_approved(wallet, credential, token, self.config.router)
            .await?;
        tracing::info!(%token, %amount, "selling token for native");

        let swap = ISwapRouter::exactInputSingleCall {
            params: ISwapRouter::ExactInputSingleParams {
                tokenIn: token,
                tokenOut: self.wrapped_native,
                fee: U24::from(fee),
                // Output stays with the router for the unwrap step
                recipient: Address::ZERO,
                deadline: deadline(),
                amountIn: amount,
                amountOutMinimum: U256::ZERO,
                sqrtPriceLimitX96: U160::ZERO,
            },
        };
        let unwrap = ISwapRouter::unwrapWETH9Call {
            amountMinimum: U256::ZERO,
            recipient: wallet,
        };
        let multicall = ISwapRouter::multicallCall {
            data: vec![swap.abi_encode().into(), unwrap.abi_encode().into()],
        };

        let request = TxRequest::build(&self.chain, wallet, U256::ZERO, None)
            .await?
            .with_to(self.config.router)
            .with_call(multicall.abi_encode().into());
        self.submit(credential, request).await
    }

    /// Swap one token for another
    async fn token_to_token(
        &self,
        wallet: Address,
        credential: &str,
        input: Address,
        output: Address,
        amount: U256,
        fee: Option<u32>,
    ) -> Result<TransactionOutcome> {
        if input != self.wrapped_native && output != self.wrapped_native {
            return self
                .token_to_token_via_hop(wallet, credential, input, output, amount)
                .await;
        }

        self.ensure_approved(wallet, credential, input, self.config.router)
            .await?;

        let call = ISwapRouter::exactInputSingleCall {
            params: ISwapRouter::ExactInputSingleParams {
                tokenIn: input,
                tokenOut: output,
                fee: U24::from(fee.unwrap_or(DEFAULT_POOL_FEE)),
                recipient: wallet,
                deadline: deadline(),
                amountIn: amount,
                amountOutMinimum: U256::ZERO,
                sqrtPriceLimitX96: U160::ZERO,
            },
        };

        let request = TxRequest::build(&self.chain, wallet, U256::ZERO, None)
            .await?
            .with_to(self.config.router)
            .with_call(call.abi_encode().into());
        self.submit(credential, request).await
    }

    /// Token-to-token through the wrapped native asset as a middle hop
    ///
    /// Each leg must resolve to exactly one fee tier before any transaction
    /// is built; otherwise the trade fails with `NoRouteFound`.
    async fn token_to_token_via_hop(
        &self,
        wallet: Address,
        credential: &str,
        input: Address,
        output: Address,
        amount: U256,
    ) -> Result<TransactionOutcome> {
        let input_leg = resolve_leg(
            &self.chain,
            self.config.factory,
            input,
            self.wrapped_native,
            "input",
        )
        .await?;
        let output_leg = resolve_leg(
            &self.chain,
            self.config.factory,
            output,
            self.wrapped_native,
            "output",
        )
        .await?;

        self.ensure_approved(wallet, credential, input, self.config.router)
            .await?;

        let tokens = [input, self.wrapped_native, output];
        let fees = [input_leg.fee, output_leg.fee];
        let path = encode_path(&tokens, &fees, false)?;

        let call = ISwapRouter::exactInputCall {
            params: ISwapRouter::ExactInputParams {
                path,
                recipient: wallet,
                deadline: deadline(),
                amountIn: amount,
                amountOutMinimum: U256::ZERO,
            },
        };

        let request = TxRequest::build(&self.chain, wallet, U256::ZERO, None)
            .await?
            .with_to(self.config.router)
            .with_call(call.abi_encode().into());
        self.submit(credential, request).await
    }

    /// Fee tier for trading `token` against wrapped native
    ///
    /// Pool discovery wins over the caller's hint; if no pool is live at any
    /// tier the hint (or the platform launch default) is used as-is and the
    /// router surfaces the failure.
    async fn discover_fee(&self, token: Address, hint: Option<u32>) -> Result<u32> {
        let discovered = find_pool(&self.chain, self.config.factory, token, self.wrapped_native)
            .await?
            .map(|quote| quote.fee);
        Ok(discovered.or(hint).unwrap_or(DEFAULT_POOL_FEE))
    }

    // ---- approvals -------------------------------------------------------

    /// Ensure the router may spend `token` from `wallet`
    pub async fn approve(&self, wallet: &str, credential: &str, token: &str) -> Result<()> {
        let wallet = parse_address(wallet)?;
        let token = parse_address(token)?;
        self.ensure_approved(wallet, credential, token, self.config.router)
            .await
    }

    /// Idempotent allowance check-and-raise for `spender`
    ///
    /// Allowance is re-read from the chain every time. When already at or
    /// above the check threshold, no transaction is issued.
    async fn ensure_approved(
        &self,
        owner: Address,
        credential: &str,
        token: Address,
        spender: Address,
    ) -> Result<()> {
        let allowance = self.allowance(owner, token, spender).await?;
        if !needs_approval(allowance) {
            tracing::debug!(%token, %spender, "allowance already sufficient");
            return Ok(());
        }

        tracing::info!(%token, %spender, "raising allowance to maximum");
        let call = IERC20::approveCall {
            spender,
            amount: MAX_APPROVAL,
        };
        let request = TxRequest::build(&self.chain, owner, U256::ZERO, None)
            .await?
            .with_to(token)
            .with_call(call.abi_encode().into());
        self.submit(credential, request).await?.confirmed()?;

        // Let the node propagate the updated allowance before dependent reads
        sleep(PROPAGATION_DELAY).await;
        Ok(())
    }

    async fn allowance(&self, owner: Address, token: Address, spender: Address) -> Result<U256> {
        let call = IERC20::allowanceCall { owner, spender };
        let returned = self.chain.call(token, call.abi_encode().into()).await?;
        IERC20::allowanceCall::abi_decode_returns(&returned)
            .map_err(|e| Error::Rpc(format!("allowance decode: {}", e)))
    }

    // ---- transfers -------------------------------------------------------

    /// Move native currency or an ERC-20 token to another account
    pub async fn transfer_asset(
        &self,
        wallet: &str,
        credential: &str,
        recipient: &str,
        token: Option<&str>,
        amount: U256,
    ) -> Result<TransactionOutcome> {
        let wallet = parse_address(wallet)?;
        let recipient = parse_address(recipient)?;
        match token {
            None => {
                self.transfer_native(wallet, credential, recipient, amount)
                    .await
            }
            Some(token) => {
                let token = parse_address(token)?;
                self.transfer_token(wallet, credential, recipient, token, amount)
                    .await
            }
        }
    }

    async fn transfer_native(
        &self,
        wallet: Address,
        credential: &str,
        recipient: Address,
        amount: U256,
    ) -> Result<TransactionOutcome> {
        let balance = self.chain.balance(wallet).await?;
        tracing::debug!(%wallet, %balance, %amount, "native transfer");

        let request = TxRequest::build(
            &self.chain,
            wallet,
            amount,
            Some(NATIVE_TRANSFER_GAS_LIMIT),
        )
        .await?
        .with_to(recipient);
        self.submit(credential, request).await
    }

    async fn transfer_token(
        &self,
        wallet: Address,
        credential: &str,
        recipient: Address,
        token: Address,
        amount: U256,
    ) -> Result<TransactionOutcome> {
        let call = IERC20::transferCall {
            to: recipient,
            amount,
        };
        let request = TxRequest::build(&self.chain, wallet, U256::ZERO, None)
            .await?
            .with_to(token)
            .with_call(call.abi_encode().into());
        self.submit(credential, request).await
    }

    // ---- deployment ------------------------------------------------------

    /// Deploy and wire the launcher contract suite
    ///
    /// Five sequential submissions under one nonce sequencer, each confirmed
    /// before the next is built. A failure partway leaves earlier steps'
    /// on-chain effects in place; there is no rollback, and the caller must
    /// resume or remediate manually.
    pub async fn deploy(&self, wallet: &str, credential: &str) -> Result<DeploymentResult> {
        let wallet = parse_address(wallet)?;
        let signer = self.signer_for(credential)?;
        let mut sequencer = NonceSequencer::for_sender(&self.chain, wallet).await?;

        // 1. launcher
        let artifact = ContractArtifact::load(&self.config.artifacts_dir, LAUNCHER_ARTIFACT)?;
        let init = artifact.init_code(
            &(
                self.wrapped_native,
                self.config.factory,
                self.config.position_manager,
                self.config.router,
                wallet,
            )
                .abi_encode_params(),
        )?;
        let launcher = self
            .deploy_step(signer.as_ref(), wallet, &mut sequencer, init)
            .await?;
        tracing::info!(%launcher, "launcher deployed");

        // 2. liquidity locker
        let artifact = ContractArtifact::load(&self.config.artifacts_dir, LOCKER_ARTIFACT)?;
        let init = artifact.init_code(
            &(
                launcher,
                self.config.position_manager,
                wallet,
                U256::from(LOCKER_DURATION),
            )
                .abi_encode_params(),
        )?;
        let locker = self
            .deploy_step(signer.as_ref(), wallet, &mut sequencer, init)
            .await?;
        tracing::info!(%locker, "liquidity locker deployed");

        // 3. point the launcher at the locker
        let call = ITokenLauncher::updateLiquidityLockerCall { newLocker: locker };
        self.wiring_step(
            signer.as_ref(),
            wallet,
            &mut sequencer,
            launcher,
            call.abi_encode().into(),
        )
        .await?;

        // 4. launcher util
        let artifact = ContractArtifact::load(&self.config.artifacts_dir, UTIL_ARTIFACT)?;
        let init = artifact.init_code(&(launcher, self.wrapped_native).abi_encode_params())?;
        let util = self
            .deploy_step(signer.as_ref(), wallet, &mut sequencer, init)
            .await?;
        tracing::info!(%util, "launcher util deployed");

        // 5. allow pairing against wrapped native
        let call = ITokenLauncher::toggleAllowedPairedTokenCall {
            token: self.wrapped_native,
            allowed: true,
        };
        self.wiring_step(
            signer.as_ref(),
            wallet,
            &mut sequencer,
            launcher,
            call.abi_encode().into(),
        )
        .await?;

        Ok(DeploymentResult {
            launcher,
            locker,
            util,
        })
    }

    /// One contract-creation submission within a sequenced flow
    async fn deploy_step(
        &self,
        signer: &dyn SigningBackend,
        wallet: Address,
        sequencer: &mut NonceSequencer,
        init_code: Bytes,
    ) -> Result<Address> {
        // Gas price is re-fetched per step; the nonce sequence is unaffected
        let request = TxRequest {
            from: wallet,
            to: None,
            value: U256::ZERO,
            gas_limit: DEPLOY_GAS_LIMIT,
            gas_price: self.chain.gas_price().await?,
            nonce: sequencer.current(),
            chain_id: self.chain.chain_id(),
            data: Some(init_code),
        };
        let receipt = pipeline::execute(&self.chain, signer, request)
            .await?
            .confirmed()?;
        sequencer.advance();
        receipt
            .contract_address
            .ok_or_else(|| Error::Rpc("deploy receipt carries no contract address".to_string()))
    }

    /// One contract-call submission within a sequenced flow
    async fn wiring_step(
        &self,
        signer: &dyn SigningBackend,
        wallet: Address,
        sequencer: &mut NonceSequencer,
        to: Address,
        data: Bytes,
    ) -> Result<()> {
        let request = TxRequest {
            from: wallet,
            to: Some(to),
            value: U256::ZERO,
            gas_limit: DEPLOY_GAS_LIMIT,
            gas_price: self.chain.gas_price().await?,
            nonce: sequencer.current(),
            chain_id: self.chain.chain_id(),
            data: Some(data),
        };
        pipeline::execute(&self.chain, signer, request)
            .await?
            .confirmed()?;
        sequencer.advance();
        Ok(())
    }

    /// Launch a token through the deployed launcher
    ///
    /// Previews the deterministic token address via the util contract's salt
    /// generation, then submits `deployToken`.
    pub async fn deploy_token(
        &self,
        wallet: &str,
        credential: &str,
        params: TokenDeployment,
    ) -> Result<TokenLaunch> {
        let wallet = parse_address(wallet)?;
        let launcher = self.launcher()?;
        let util = self
            .config
            .util
            .ok_or_else(|| Error::Config("no launcher util deployed on this network".to_string()))?;
        let recipient = parse_address(&params.recipient)?;
        let social_hash = social_hash(params.social_id);

        let salt_call = ILauncherUtil::generateSaltCall {
            deployer: recipient,
            socialId: U256::from(params.social_id),
            name: params.name.clone(),
            symbol: params.symbol.clone(),
            image: params.image.clone(),
            socialHash: social_hash.clone(),
            supply: params.supply,
            pairedToken: self.wrapped_native,
        };
        let returned = self.chain.call(util, salt_call.abi_encode().into()).await?;
        let preview = ILauncherUtil::generateSaltCall::abi_decode_returns(&returned)
            .map_err(|e| Error::Rpc(format!("generateSalt decode: {}", e)))?;
        tracing::info!(salt = %preview.salt, token = %preview.token, "salt generated");

        let initial_tick = I24::try_from(params.initial_tick)
            .map_err(|_| Error::InvalidArgument(format!("tick {} out of range", params.initial_tick)))?;
        let call = ITokenLauncher::deployTokenCall {
            name: params.name,
            symbol: params.symbol,
            supply: params.supply,
            fee: U24::from(params.fee),
            salt: preview.salt,
            deployer: recipient,
            socialId: U256::from(params.social_id),
            image: params.image,
            socialHash: social_hash,
            poolConfig: ITokenLauncher::PoolConfig {
                tick: initial_tick,
                pairedToken: self.wrapped_native,
                devBuyFee: U24::from(params.buy_fee),
            },
        };

        let request = TxRequest::build(&self.chain, wallet, U256::ZERO, Some(DEPLOY_TOKEN_GAS_LIMIT))
            .await?
            .with_to(launcher)
            .with_call(call.abi_encode().into());
        let outcome = self.submit(credential, request).await?;

        Ok(TokenLaunch {
            outcome,
            token: preview.token,
            supply: params.supply,
        })
    }

    /// Claim accumulated launch rewards for `token`
    pub async fn claim_reward(
        &self,
        wallet: &str,
        credential: &str,
        token: &str,
    ) -> Result<TransactionOutcome> {
        let wallet = parse_address(wallet)?;
        let token = parse_address(token)?;
        let launcher = self.launcher()?;

        let call = ITokenLauncher::claimRewardsCall { token };
        let request = TxRequest::build(&self.chain, wallet, U256::ZERO, None)
            .await?
            .with_to(launcher)
            .with_call(call.abi_encode().into());
        self.submit(credential, request).await
    }

    /// Grant or revoke the deployer-admin role on the launcher
    pub async fn set_admin(
        &self,
        wallet: &str,
        credential: &str,
        admin: &str,
        is_admin: bool,
    ) -> Result<TransactionOutcome> {
        let wallet = parse_address(wallet)?;
        let admin = parse_address(admin)?;
        let launcher = self.launcher()?;

        let call = ITokenLauncher::setAdminCall {
            admin,
            isAdmin: is_admin,
        };
        let request = TxRequest::build(&self.chain, wallet, U256::ZERO, None)
            .await?
            .with_to(launcher)
            .with_call(call.abi_encode().into());
        self.submit(credential, request).await
    }

    fn launcher(&self) -> Result<Address> {
        self.config
            .launcher
            .ok_or_else(|| Error::Config("no launcher deployed on this network".to_string()))
    }

    // ---- aggregator relay ------------------------------------------------

    /// Buy `buy_token` through the off-chain quote aggregator
    ///
    /// The aggregator returns the full transaction to relay; this flow only
    /// manages the allowance precondition and local nonce sequencing before
    /// submitting it unchanged.
    pub async fn swap_with_aggregator(
        &self,
        quotes: &QuoteClient,
        wallet: &str,
        credential: &str,
        buy_token: &str,
        sell_token: Option<&str>,
        amount: U256,
        slippage_bps: Option<u32>,
    ) -> Result<TransactionOutcome> {
        let wallet = parse_address(wallet)?;
        let buy_token = parse_address(buy_token)?;
        let sell_token = match sell_token {
            Some(token) => parse_address(token)?,
            None => NATIVE_TOKEN,
        };

        let relay = quotes
            .quote(&QuoteRequest {
                chain_id: self.chain.chain_id(),
                buy_token,
                sell_token,
                sell_amount: amount,
                taker: wallet,
                gas_price: None,
                slippage_bps,
            })
            .await?;

        let mut sequencer = NonceSequencer::for_sender(&self.chain, wallet).await?;

        // Selling a token requires the aggregator's allowance target to be
        // able to pull it; the quoted amount is enough here, not max
        if !is_native_sentinel(sell_token) {
            let allowance = self.allowance(wallet, sell_token, relay.to).await?;
            if allowance < amount {
                let call = IERC20::approveCall {
                    spender: relay.to,
                    amount,
                };
                let request = TxRequest::build(&self.chain, wallet, U256::ZERO, None)
                    .await?
                    .with_to(sell_token)
                    .with_call(call.abi_encode().into())
                    .with_nonce(sequencer.current());
                self.submit(credential, request).await?.confirmed()?;
                sequencer.advance();
            }
        }

        let request = TxRequest {
            from: wallet,
            to: Some(relay.to),
            value: relay.value,
            gas_limit: relay.gas,
            gas_price: relay.gas_price,
            nonce: sequencer.current(),
            chain_id: self.chain.chain_id(),
            data: Some(relay.data),
        };
        let outcome = self.submit(credential, request).await?;
        sequencer.advance();
        Ok(outcome)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("chain_id", &self.config.chain_id)
            .field("wrapped_native", &self.wrapped_native)
            .field("custodial", &self.custodial.is_some())
            .finish()
    }
}

/// Swap deadline as a unix timestamp
fn deadline() -> U256 {
    U256::from(chrono::Utc::now().timestamp() as u64 + DEADLINE_SECS)
}

/// Hex digest the launch is keyed on, derived from the social identity
fn social_hash(social_id: u64) -> String {
    let digest = Sha256::digest(social_id.to_string().as_bytes());
    alloy::hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_hash_is_sha256_of_decimal_string() {
        // sha256("12345")
        assert_eq!(
            social_hash(12345),
            "5994471abb01112afcc18159f6cc74b4f511b99806da59b3caf5a9c173cacfc5"
        );
        assert_eq!(social_hash(0), social_hash(0));
        assert_ne!(social_hash(1), social_hash(2));
    }

    #[test]
    fn test_deadline_is_in_the_future() {
        let now = U256::from(chrono::Utc::now().timestamp() as u64);
        let deadline = deadline();
        assert!(deadline > now);
        assert!(deadline <= now + U256::from(DEADLINE_SECS + 1));
    }

    #[test]
    fn test_token_deployment_defaults() {
        let params = TokenDeployment::new("0x0000000000000000000000000000000000000001", 42);
        assert_eq!(params.fee, 10_000);
        assert_eq!(params.buy_fee, 10_000);
        assert_eq!(params.initial_tick, -207_400);
        assert_eq!(
            params.supply,
            U256::from(10_000_000_000u64) * U256::from(10u64).pow(U256::from(18))
        );
    }
}
