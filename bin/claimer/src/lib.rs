//! Claimer workflows.
//!
//! Each public function here is one complete operation: claim a withdrawal,
//! bridge value, inspect balances, or update fees. The binary in
//! `src/bin/main.rs` is a thin CLI over these.

pub mod config;
pub mod metrics;
pub mod watch;

use crate::config::Config;
use crate::metrics::Metrics;
use ::config::AddressBook;
use action::{
    bridge::{Bridge, BridgeAction, BridgeDirection},
    claim::{Claim, ClaimAction, ClaimError, ClaimOutcome, ClaimResult},
    fees::{SetFees, SetFeesAction},
    Action,
};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use balance::{monitor::BalanceMonitor, Balance, BalanceQuery, Monitor};
use binding::bridge::ILockBridge;
use history::{ClaimRequest, ClaimStage, HistoryClient};
use std::time::Instant;
use tracing::info;

/// Which bridge pair an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgePair {
    /// The native ETH bridge
    Eth,
    /// The custom ERC20 token bridge
    Token,
}

impl BridgePair {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Eth => "eth",
            Self::Token => "token",
        }
    }
}

/// Load the deployment address book from the configured path.
pub fn load_address_book(config: &Config) -> eyre::Result<AddressBook> {
    let book = AddressBook::from_file(&config.addresses_path)?;
    Ok(book)
}

/// Claim a finalized L2→L1 withdrawal on L1.
///
/// Fetches the claim data for `tx_hash` from the Bridge History API,
/// validates it against the deployed L1 bridges, discovers the messenger
/// from the target bridge, and submits `relayMessageWithProof`. Returns
/// `Ok(None)` in dry-run mode, where the workflow stops after validation.
pub async fn run_claim<P>(
    l1_provider: P,
    config: &Config,
    tx_hash: &str,
) -> eyre::Result<Option<ClaimResult>>
where
    P: Provider + Clone,
{
    let metrics = Metrics::new();
    let started = Instant::now();

    let result = claim_inner(l1_provider, config, tx_hash, &metrics).await;

    match &result {
        Ok(Some(claim_result)) => match claim_result.outcome {
            ClaimOutcome::Claimed { delta } => {
                metrics.record_claim_success(delta.saturating_to(), started.elapsed());
            }
            ClaimOutcome::SilentNoOp => {
                metrics.record_claim_silent_noop(started.elapsed());
            }
        },
        Ok(None) => {}
        Err(e) => {
            let kind = if let Some(claim_err) = e.downcast_ref::<ClaimError>() {
                error_kind(claim_err)
            } else if e.downcast_ref::<history::HistoryError>().is_some() {
                "history"
            } else {
                "other"
            };
            metrics.record_claim_failure(kind);
        }
    }

    result
}

fn error_kind(e: &ClaimError) -> &'static str {
    match e {
        ClaimError::History(_) => "history",
        ClaimError::NotClaimable => "not_claimable",
        ClaimError::RecipientMismatch { .. } => "recipient_mismatch",
        ClaimError::Relay { .. } => "relay",
        ClaimError::Rpc(_) => "rpc",
    }
}

async fn claim_inner<P>(
    l1_provider: P,
    config: &Config,
    tx_hash: &str,
    metrics: &Metrics,
) -> eyre::Result<Option<ClaimResult>>
where
    P: Provider + Clone,
{
    metrics.record_claim_attempt();

    let request = ClaimRequest::parse(tx_hash)?;
    info!(stage = %ClaimStage::Requested, tx_hash = %request, "Claim requested");

    let history = HistoryClient::new(config.history_api_url());
    let claim_info = history.fetch_claim_info(&request).await?;
    info!(
        stage = %ClaimStage::ProofFetched,
        target = %claim_info.to,
        value = %claim_info.value,
        nonce = claim_info.nonce,
        claimable = claim_info.claimable,
        batch_index = claim_info.proof.batch_index,
        "Claim data fetched"
    );

    let book = load_address_book(config)?;

    // The proof's target decides which bridge pair the withdrawal belongs
    // to, and with it the asset whose balance delta is reported.
    let (bridge, asset) = if claim_info.to == book.token.l1.bridge {
        (
            book.token.l1.bridge,
            book.token.l1.token.unwrap_or(Address::ZERO),
        )
    } else {
        // Anything else fails the recipient check inside the action with
        // the ETH bridge named as the expected target.
        (book.eth.l1.bridge, Address::ZERO)
    };

    let messenger_contract = ILockBridge::new(bridge, &l1_provider);
    let messenger = messenger_contract.messenger().call().await?;

    let claim = Claim {
        messenger,
        bridge,
        claimer: config.eoa_address,
        asset,
        info: claim_info,
        gas_limit: config.claim_gas_limit(),
    };

    let mut action = ClaimAction::new(l1_provider, claim);
    action.validate()?;
    info!(stage = %ClaimStage::Validated, messenger = %messenger, "Claim validated");

    if config.dry_run {
        info!("Dry-run: {}", action.description());
        return Ok(None);
    }

    info!(stage = %ClaimStage::Submitted, "{}", action.description());
    let result = action.execute().await?;
    info!(
        stage = %ClaimStage::Confirmed,
        tx_hash = %result.tx_hash,
        delta = %result.delta(),
        "Claim finished"
    );

    Ok(Some(result))
}

/// Bridge value between the two chains through the selected bridge pair.
///
/// Returns `Ok(None)` in dry-run mode.
pub async fn run_bridge<P>(
    provider: P,
    config: &Config,
    pair: BridgePair,
    direction: BridgeDirection,
    amount: U256,
) -> eyre::Result<Option<action::Result>>
where
    P: Provider + Clone,
{
    let book = load_address_book(config)?;

    let deployment = match pair {
        BridgePair::Eth => &book.eth,
        BridgePair::Token => &book.token,
    };
    let source = match direction {
        BridgeDirection::L1ToL2 => &deployment.l1,
        BridgeDirection::L2ToL1 => &deployment.l2,
    };

    let bridge = Bridge {
        bridge: source.bridge,
        sender: config.eoa_address,
        token: source.token,
        amount,
        gas_limit: config.bridge_gas_limit(),
        direction,
    };

    let mut action = BridgeAction::new(provider, bridge);

    if config.dry_run {
        info!("Dry-run: {}", action.description());
        return Ok(None);
    }

    let metrics = Metrics::new();
    let result = action.execute().await?;
    metrics.record_bridge(
        direction_label(direction),
        pair.as_str(),
        amount.saturating_to(),
    );

    Ok(Some(result))
}

const fn direction_label(direction: BridgeDirection) -> &'static str {
    match direction {
        BridgeDirection::L1ToL2 => "l1_to_l2",
        BridgeDirection::L2ToL1 => "l2_to_l1",
    }
}

/// Update the fee parameters of one bridge deployment.
///
/// L1 and L2 are separate contracts, so updating both sides takes two
/// invocations. Returns `Ok(None)` in dry-run mode.
pub async fn run_set_fees<P>(
    provider: P,
    bridge: Address,
    fixed_fee: U256,
    percent_fee_bps: u64,
    gas_markup_bps: u64,
    dry_run: bool,
) -> eyre::Result<Option<action::Result>>
where
    P: Provider + Clone,
{
    let set_fees = SetFees {
        bridge,
        fixed_fee,
        percent_fee_bps,
        gas_markup_bps,
    };

    let mut action = SetFeesAction::new(provider, set_fees);

    if dry_run {
        info!("Dry-run: {}", action.description());
        return Ok(None);
    }

    let result = action.execute().await?;
    Ok(Some(result))
}

/// Snapshot the balances the bridge operator cares about.
///
/// Covers the escrow held by each bridge contract and the operator EOA on
/// both chains. Labels are stable so the output can be scraped.
pub async fn report_balances<P1, P2>(
    l1_provider: P1,
    l2_provider: P2,
    config: &Config,
) -> eyre::Result<Vec<(String, Balance)>>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    let book = load_address_book(config)?;
    let l1 = BalanceMonitor::new(l1_provider);
    let l2 = BalanceMonitor::new(l2_provider);

    let mut balances = Vec::new();

    balances.push((
        "eth_bridge_l1".to_string(),
        l1.query_balance(BalanceQuery::NativeBalance {
            address: book.eth.l1.bridge,
        })
        .await?,
    ));
    balances.push((
        "eth_bridge_l2".to_string(),
        l2.query_balance(BalanceQuery::NativeBalance {
            address: book.eth.l2.bridge,
        })
        .await?,
    ));

    if let Some(token) = book.token.l1.token {
        balances.push((
            "token_bridge_l1".to_string(),
            l1.query_balance(BalanceQuery::Erc20Balance {
                token,
                holder: book.token.l1.bridge,
            })
            .await?,
        ));
    }
    if let Some(token) = book.token.l2.token {
        balances.push((
            "token_bridge_l2".to_string(),
            l2.query_balance(BalanceQuery::Erc20Balance {
                token,
                holder: book.token.l2.bridge,
            })
            .await?,
        ));
    }

    balances.push((
        "eoa_l1".to_string(),
        l1.query_balance(BalanceQuery::for_asset(Address::ZERO, config.eoa_address))
            .await?,
    ));
    balances.push((
        "eoa_l2".to_string(),
        l2.query_balance(BalanceQuery::for_asset(Address::ZERO, config.eoa_address))
            .await?,
    ));

    for (label, balance) in &balances {
        info!(
            label = label.as_str(),
            holder = %balance.holder,
            asset = %balance.asset,
            amount = %balance.amount,
            "Balance"
        );
    }

    Ok(balances)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_label_matches_transfer_direction() {
        assert_eq!(direction_label(BridgeDirection::L1ToL2), "l1_to_l2");
        assert_eq!(direction_label(BridgeDirection::L2ToL1), "l2_to_l1");
    }
}
