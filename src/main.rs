//! Beeper chain CLI
//!
//! Command-line interface over the chain engine: balances, swaps, transfers,
//! launcher deployment, and token launches.

use alloy::primitives::U256;
use beeper_chain::engine::TokenDeployment;
use beeper_chain::{ChainConfig, CustodialConfig, Engine, Error, QuoteClient, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Env var carrying the signing credential (raw private key hex, or a
/// custodial wallet id when custodial mode is configured)
const CREDENTIAL_ENV: &str = "SIGNER_CREDENTIAL";

#[derive(Parser)]
#[command(name = "beeper")]
#[command(about = "Token-launch and DEX trading engine for BNB Smart Chain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a wallet's native or token balance
    Balance {
        /// Wallet address
        #[arg(long)]
        wallet: String,

        /// ERC-20 token address (native balance if omitted)
        #[arg(long)]
        token: Option<String>,
    },

    /// Swap via the V3 router
    Trade {
        /// Wallet address the trade executes from
        #[arg(long)]
        wallet: String,

        /// Input token address (native if omitted)
        #[arg(long)]
        input: Option<String>,

        /// Output token address (native if omitted)
        #[arg(long)]
        output: Option<String>,

        /// Input amount in wei
        #[arg(long)]
        amount: String,

        /// Fee tier hint, used only when pool discovery finds nothing
        #[arg(long)]
        fee: Option<u32>,
    },

    /// Transfer native currency or an ERC-20 token
    Transfer {
        #[arg(long)]
        wallet: String,

        /// Recipient address
        #[arg(long)]
        to: String,

        /// ERC-20 token address (native transfer if omitted)
        #[arg(long)]
        token: Option<String>,

        /// Amount in wei
        #[arg(long)]
        amount: String,
    },

    /// Approve the router to spend a token
    Approve {
        #[arg(long)]
        wallet: String,

        #[arg(long)]
        token: String,
    },

    /// Deploy and wire the launcher contract suite
    Deploy {
        #[arg(long)]
        wallet: String,
    },

    /// Launch a token through the deployed launcher
    DeployToken {
        /// Admin wallet submitting the launch
        #[arg(long)]
        wallet: String,

        /// Account receiving the deployer role and rewards
        #[arg(long)]
        recipient: String,

        /// Social identity the launch is keyed on
        #[arg(long)]
        social_id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        symbol: Option<String>,

        #[arg(long)]
        image: Option<String>,
    },

    /// Claim accumulated launch rewards for a token
    ClaimReward {
        #[arg(long)]
        wallet: String,

        #[arg(long)]
        token: String,
    },

    /// Grant or revoke the deployer-admin role on the launcher
    SetAdmin {
        #[arg(long)]
        wallet: String,

        /// Address gaining or losing the role
        #[arg(long)]
        admin: String,

        /// Revoke instead of grant
        #[arg(long)]
        revoke: bool,
    },

    /// Provision a new custodial wallet
    CreateWallet,

    /// Buy a token through the off-chain quote aggregator
    AggregatorSwap {
        #[arg(long)]
        wallet: String,

        /// Token to buy
        #[arg(long)]
        buy: String,

        /// Token to sell (native if omitted)
        #[arg(long)]
        sell: Option<String>,

        /// Sell amount in wei
        #[arg(long)]
        amount: String,

        /// Slippage tolerance in basis points
        #[arg(long)]
        slippage_bps: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = ChainConfig::from_env()?;
    let custodial = CustodialConfig::from_env()?;
    let engine = Engine::connect(config, custodial).await?;

    match cli.command {
        Commands::Balance { wallet, token } => {
            let balance = engine.get_balance(&wallet, token.as_deref()).await?;
            println!("{}", balance);
        }
        Commands::Trade {
            wallet,
            input,
            output,
            amount,
            fee,
        } => {
            let outcome = engine
                .make_trade(
                    &wallet,
                    &credential()?,
                    input.as_deref(),
                    output.as_deref(),
                    parse_wei(&amount)?,
                    fee,
                )
                .await?;
            report(&engine, &outcome);
        }
        Commands::Transfer {
            wallet,
            to,
            token,
            amount,
        } => {
            let outcome = engine
                .transfer_asset(
                    &wallet,
                    &credential()?,
                    &to,
                    token.as_deref(),
                    parse_wei(&amount)?,
                )
                .await?;
            report(&engine, &outcome);
        }
        Commands::Approve { wallet, token } => {
            engine.approve(&wallet, &credential()?, &token).await?;
            println!("approved");
        }
        Commands::Deploy { wallet } => {
            let deployment = engine.deploy(&wallet, &credential()?).await?;
            println!("launcher: {}", deployment.launcher);
            println!("locker:   {}", deployment.locker);
            println!("util:     {}", deployment.util);
        }
        Commands::DeployToken {
            wallet,
            recipient,
            social_id,
            name,
            symbol,
            image,
        } => {
            let mut params = TokenDeployment::new(recipient, social_id);
            if let Some(name) = name {
                params.name = name;
            }
            if let Some(symbol) = symbol {
                params.symbol = symbol;
            }
            if let Some(image) = image {
                params.image = image;
            }

            let launch = engine.deploy_token(&wallet, &credential()?, params).await?;
            println!("token:  {}", launch.token);
            println!("supply: {}", launch.supply);
            report(&engine, &launch.outcome);
        }
        Commands::ClaimReward { wallet, token } => {
            let outcome = engine.claim_reward(&wallet, &credential()?, &token).await?;
            report(&engine, &outcome);
        }
        Commands::SetAdmin {
            wallet,
            admin,
            revoke,
        } => {
            let outcome = engine
                .set_admin(&wallet, &credential()?, &admin, !revoke)
                .await?;
            report(&engine, &outcome);
        }
        Commands::CreateWallet => {
            let (address, wallet_id) = engine.create_wallet().await?;
            println!("address:   {}", address);
            println!("wallet id: {}", wallet_id);
        }
        Commands::AggregatorSwap {
            wallet,
            buy,
            sell,
            amount,
            slippage_bps,
        } => {
            let quotes = QuoteClient::from_env()?;
            let outcome = engine
                .swap_with_aggregator(
                    &quotes,
                    &wallet,
                    &credential()?,
                    &buy,
                    sell.as_deref(),
                    parse_wei(&amount)?,
                    slippage_bps,
                )
                .await?;
            report(&engine, &outcome);
        }
    }

    Ok(())
}

/// Read the signing credential from the environment
fn credential() -> Result<String> {
    std::env::var(CREDENTIAL_ENV)
        .map_err(|_| Error::MissingCredential(format!("{} is not set", CREDENTIAL_ENV)))
}

fn parse_wei(amount: &str) -> Result<U256> {
    amount
        .parse::<U256>()
        .map_err(|e| Error::InvalidArgument(format!("bad amount '{}': {}", amount, e)))
}

/// Print the outcome of a submission with an explorer link
fn report(engine: &Engine, outcome: &beeper_chain::TransactionOutcome) {
    let tx_hash = outcome.tx_hash();
    println!("tx: {}tx/{:#x}", engine.config().explorer_url, tx_hash);
    match outcome {
        beeper_chain::TransactionOutcome::Confirmed { .. } => println!("status: confirmed"),
        beeper_chain::TransactionOutcome::Reverted { cause, .. } => {
            println!("status: reverted ({})", cause);
        }
    }
}
