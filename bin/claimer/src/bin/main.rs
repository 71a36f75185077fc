//! Bridge operator CLI.
//!
//! Subcommands cover the operator workflows:
//! - `claim`: claim a finalized L2→L1 withdrawal on L1
//! - `watch`: relay token withdrawals automatically as they finalize
//! - `bridge`: move ETH or the bridged token to the other chain
//! - `balances`: inspect bridge escrow and operator balances
//! - `set-fees`: update a bridge deployment's fee parameters

use alloy_primitives::utils::{format_ether, parse_ether};
use alloy_primitives::U256;
use clap::{Parser, Subcommand, ValueEnum};
use claimer::{
    config::Config, metrics::install_prometheus_exporter, report_balances, run_bridge, run_claim,
    run_set_fees, BridgePair,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "claimer")]
#[command(about = "Operate the lock bridge: claim withdrawals, bridge funds, manage fees")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Private key for signing transactions (hex string, with or without 0x prefix)
    #[arg(short = 'k', long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Dry-run mode: log actions without executing transactions
    #[arg(long)]
    dry_run: bool,

    /// Port to serve Prometheus metrics on (disabled when absent)
    #[arg(long)]
    metrics_port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum PairArg {
    /// The native ETH bridge
    Eth,
    /// The custom ERC20 token bridge
    Token,
}

impl From<PairArg> for BridgePair {
    fn from(pair: PairArg) -> Self {
        match pair {
            PairArg::Eth => Self::Eth,
            PairArg::Token => Self::Token,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    L1,
    L2,
}

#[derive(Subcommand)]
enum Command {
    /// Claim a finalized L2→L1 withdrawal on L1 by its L2 transaction hash
    Claim {
        /// L2 withdrawal transaction hash (0x-prefixed, 32 bytes)
        tx_hash: String,
    },

    /// Bridge funds from L1 to L2
    BridgeL1ToL2 {
        /// Amount in ether units (e.g. "0.5")
        amount: String,

        /// Which bridge pair to use
        #[arg(long, value_enum, default_value = "eth")]
        pair: PairArg,
    },

    /// Bridge funds from L2 to L1 (requires a claim once finalized)
    BridgeL2ToL1 {
        /// Amount in ether units (e.g. "0.5")
        amount: String,

        /// Which bridge pair to use
        #[arg(long, value_enum, default_value = "eth")]
        pair: PairArg,
    },

    /// Watch L2 for new token withdrawals and claim them once finalized
    Watch,

    /// Show bridge escrow and operator balances on both chains
    Balances,

    /// Update fee parameters on one bridge deployment (owner only)
    SetFees {
        /// Which chain's deployment to update
        #[arg(long, value_enum)]
        side: SideArg,

        /// Which bridge pair to update
        #[arg(long, value_enum, default_value = "eth")]
        pair: PairArg,

        /// Fixed fee per transfer, in ether units
        #[arg(long, default_value = "0")]
        fixed_fee: String,

        /// Percentage fee in basis points (20 = 0.2%)
        #[arg(long, default_value_t = 0)]
        percent_fee_bps: u64,

        /// Gas cost markup in basis points (2000 = 20%)
        #[arg(long, default_value_t = 0)]
        gas_markup_bps: u64,
    },
}

fn require_key(key: Option<String>) -> eyre::Result<String> {
    key.ok_or_else(|| eyre::eyre!("A private key is required (use -k or the PRIVATE_KEY env var)"))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_file(&cli.config)?;

    // Override dry_run from CLI flag
    if cli.dry_run {
        config.dry_run = true;
    }

    if let Some(port) = cli.metrics_port {
        install_prometheus_exporter(port)?;
        info!("Serving Prometheus metrics on port {}", port);
    }

    info!("Loaded config:");
    info!("  Network: {:?}", config.network);
    info!("  Bridge History API: {}", config.history_api_url());
    info!("  Addresses: {}", config.addresses_path);
    info!("  EOA: {}", config.eoa_address);
    if config.dry_run {
        info!("  Mode: DRY-RUN (no transactions will be executed)");
    }

    match cli.command {
        Command::Claim { tx_hash } => {
            let key = require_key(cli.private_key)?;
            let l1_provider = client::create_wallet_provider(&config.l1_rpc_url, &key)?;

            match run_claim(l1_provider, &config, &tx_hash).await? {
                Some(result) => {
                    if result.is_silent_noop() {
                        warn!(
                            tx_hash = %result.tx_hash,
                            "Claim confirmed with no balance change; inspect the relay manually"
                        );
                    } else {
                        info!(
                            tx_hash = %result.tx_hash,
                            delta = %format_ether(result.delta()),
                            "Claimed"
                        );
                    }
                }
                None => info!("Dry-run complete; nothing submitted"),
            }
        }
        Command::BridgeL1ToL2 { amount, pair } => {
            let key = require_key(cli.private_key)?;
            let provider = client::create_wallet_provider(&config.l1_rpc_url, &key)?;
            let amount = parse_ether(&amount)?;

            let result = run_bridge(
                provider,
                &config,
                pair.into(),
                action::bridge::BridgeDirection::L1ToL2,
                amount,
            )
            .await?;

            match result {
                Some(r) => info!(tx_hash = %r.tx_hash, "Bridge transfer submitted"),
                None => info!("Dry-run complete; nothing submitted"),
            }
        }
        Command::BridgeL2ToL1 { amount, pair } => {
            let key = require_key(cli.private_key)?;
            let provider = client::create_wallet_provider(&config.l2_rpc_url, &key)?;
            let amount = parse_ether(&amount)?;

            let result = run_bridge(
                provider,
                &config,
                pair.into(),
                action::bridge::BridgeDirection::L2ToL1,
                amount,
            )
            .await?;

            match result {
                Some(r) => {
                    info!(
                        tx_hash = %r.tx_hash,
                        "Bridge transfer submitted; claim it on L1 once the batch is finalized"
                    );
                }
                None => info!("Dry-run complete; nothing submitted"),
            }
        }
        Command::Watch => {
            let key = require_key(cli.private_key)?;
            let l1_provider = client::create_wallet_provider(&config.l1_rpc_url, &key)?;
            let l2_provider = client::create_provider(&config.l2_rpc_url)?;

            claimer::watch::run_watch(l1_provider, l2_provider, &config).await?;
        }
        Command::Balances => {
            let l1_provider = client::create_provider(&config.l1_rpc_url)?;
            let l2_provider = client::create_provider(&config.l2_rpc_url)?;

            let balances = report_balances(l1_provider, l2_provider, &config).await?;
            for (label, balance) in balances {
                println!("{label}: {} ETH-units", format_ether(balance.amount));
            }
        }
        Command::SetFees {
            side,
            pair,
            fixed_fee,
            percent_fee_bps,
            gas_markup_bps,
        } => {
            let key = require_key(cli.private_key)?;
            let book = claimer::load_address_book(&config)?;

            let deployment = match BridgePair::from(pair) {
                BridgePair::Eth => &book.eth,
                BridgePair::Token => &book.token,
            };
            let (rpc_url, bridge) = match side {
                SideArg::L1 => (&config.l1_rpc_url, deployment.l1.bridge),
                SideArg::L2 => (&config.l2_rpc_url, deployment.l2.bridge),
            };

            let provider = client::create_wallet_provider(rpc_url, &key)?;
            let fixed_fee: U256 = parse_ether(&fixed_fee)?;

            let result = run_set_fees(
                provider,
                bridge,
                fixed_fee,
                percent_fee_bps,
                gas_markup_bps,
                config.dry_run,
            )
            .await?;

            match result {
                Some(r) => info!(tx_hash = %r.tx_hash, "Fees updated"),
                None => info!("Dry-run complete; nothing submitted"),
            }
        }
    }

    Ok(())
}
