//! Claim action: relay a proven L2→L1 withdrawal message on L1.
//!
//! This is the finalization step of a withdrawal. The claim data (message,
//! nonce, Merkle proof) comes from the Bridge History API; this action
//! validates it against the configured bridge deployment, submits
//! `relayMessageWithProof` to the L1 messenger, and reports the claimer's
//! balance change.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::Provider;
use binding::{
    messenger::{IL1Messenger, L2MessageProof},
    token::IERC20,
};
use history::{ClaimInfo, HistoryError};
use thiserror::Error;
use tracing::{info, warn};

/// Default gas limit for the relay transaction.
///
/// Gas estimation over proof verification is unreliable, so the relay is
/// submitted with a generous fixed limit instead.
pub const DEFAULT_CLAIM_GAS_LIMIT: u64 = 2_000_000;

/// Errors from the claim workflow.
///
/// Every variant is terminal for the invocation; nothing is retried
/// automatically. In particular a relay is not idempotent: re-running the
/// workflow for an already-relayed message reverts on-chain and surfaces
/// here as [`ClaimError::Relay`].
#[derive(Error, Debug)]
pub enum ClaimError {
    /// Fetching or decoding claim data failed
    #[error(transparent)]
    History(#[from] HistoryError),

    /// The message has not been finalized/included on L1 yet
    #[error("message is not claimable yet; the batch may not be finalized on L1")]
    NotClaimable,

    /// The proof targets a different contract than the configured bridge
    #[error("claim recipient mismatch: proof targets {actual}, expected bridge {expected}")]
    RecipientMismatch { expected: Address, actual: Address },

    /// The relay transaction reverted on-chain (including double-claims)
    #[error("relay transaction failed: {reason}")]
    Relay { reason: String },

    /// A read-path RPC call failed
    #[error("rpc error: {0}")]
    Rpc(String),
}

/// Input for a claim action.
#[derive(Debug, Clone)]
pub struct Claim {
    /// L1 messenger contract address (proof-relay entry point)
    pub messenger: Address,
    /// L1 bridge contract address; the claim's target must equal this
    pub bridge: Address,
    /// Account submitting the relay and receiving the funds
    pub claimer: Address,
    /// Asset whose balance delta is reported (zero address for native ETH)
    pub asset: Address,
    /// Claim data fetched from the Bridge History API
    pub info: ClaimInfo,
    /// Fixed gas limit for the relay transaction
    pub gas_limit: u64,
}

/// Outcome of a confirmed claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The claimer's balance increased by `delta`
    Claimed { delta: U256 },
    /// The receipt succeeded but no balance change was observed.
    ///
    /// This is advisory, not fatal: the relay executed on-chain yet produced
    /// no observable transfer. Whether that indicates a contract bug is
    /// deliberately left undecided here.
    SilentNoOp,
}

/// Result of a confirmed claim, used for reporting only.
#[derive(Debug, Clone)]
pub struct ClaimResult {
    /// L1 relay transaction hash
    pub tx_hash: TxHash,
    /// Block number where the relay was included
    pub block_number: Option<u64>,
    /// Gas used by the relay
    pub gas_used: Option<U256>,
    /// Claimer balance before submission
    pub balance_before: U256,
    /// Claimer balance after confirmation
    pub balance_after: U256,
    /// Derived outcome
    pub outcome: ClaimOutcome,
}

impl ClaimResult {
    /// Derive the outcome from the balance snapshots around a successful
    /// receipt.
    ///
    /// Note that for native-asset claims the delta also reflects the gas the
    /// claimer paid, so a small claim can legitimately show as a no-op.
    pub fn derive(
        tx_hash: TxHash,
        block_number: Option<u64>,
        gas_used: Option<U256>,
        balance_before: U256,
        balance_after: U256,
    ) -> Self {
        let delta = balance_after.saturating_sub(balance_before);
        let outcome = if delta.is_zero() {
            ClaimOutcome::SilentNoOp
        } else {
            ClaimOutcome::Claimed { delta }
        };

        Self {
            tx_hash,
            block_number,
            gas_used,
            balance_before,
            balance_after,
            outcome,
        }
    }

    /// Balance delta observed by the claim.
    pub fn delta(&self) -> U256 {
        self.balance_after.saturating_sub(self.balance_before)
    }

    /// True if the relay succeeded without an observable balance change.
    pub const fn is_silent_noop(&self) -> bool {
        matches!(self.outcome, ClaimOutcome::SilentNoOp)
    }
}

/// Positional arguments for `relayMessageWithProof`, in contract order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayParams {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub nonce: U256,
    pub message: Bytes,
    pub proof: L2MessageProof,
}

/// Build the messenger call arguments from fetched claim data.
///
/// The argument order is fixed by the contract: sender, target, value,
/// nonce, message, proof.
pub fn relay_params(info: &ClaimInfo) -> RelayParams {
    RelayParams {
        from: info.from,
        to: info.to,
        value: info.value,
        nonce: U256::from(info.nonce),
        message: info.message.clone(),
        proof: L2MessageProof {
            batchIndex: U256::from(info.proof.batch_index),
            merkleProof: info.proof.merkle_proof.clone(),
        },
    }
}

/// Action to claim a finalized L2→L1 withdrawal on L1.
pub struct ClaimAction<P> {
    provider: P,
    claim: Claim,
}

impl<P> ClaimAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, claim: Claim) -> Self {
        Self { provider, claim }
    }

    /// Validate the fetched claim data before any submission.
    ///
    /// Both checks guard the claimer from relaying a proof that was never
    /// meant for this deployment.
    pub fn validate(&self) -> Result<(), ClaimError> {
        if !self.claim.info.claimable {
            return Err(ClaimError::NotClaimable);
        }

        // Addresses are compared in canonical form, so hex casing in the
        // API response cannot cause a spurious mismatch.
        if self.claim.info.to != self.claim.bridge {
            return Err(ClaimError::RecipientMismatch {
                expected: self.claim.bridge,
                actual: self.claim.info.to,
            });
        }

        Ok(())
    }

    /// Always false: the messenger, not this tool, tracks relayed messages.
    ///
    /// A repeat invocation therefore reaches the chain and surfaces the
    /// double-claim revert as [`ClaimError::Relay`] instead of silently
    /// succeeding.
    pub const fn is_completed(&self) -> bool {
        false
    }

    /// Snapshot the claimer's balance in the configured asset.
    async fn claimer_balance(&self) -> Result<U256, ClaimError> {
        if self.claim.asset == Address::ZERO {
            self.provider
                .get_balance(self.claim.claimer)
                .await
                .map_err(|e| ClaimError::Rpc(e.to_string()))
        } else {
            let token = IERC20::new(self.claim.asset, &self.provider);
            token
                .balanceOf(self.claim.claimer)
                .call()
                .await
                .map_err(|e| ClaimError::Rpc(e.to_string()))
        }
    }

    /// Validate, submit the relay, and report the balance change.
    pub async fn execute(&mut self) -> Result<ClaimResult, ClaimError> {
        self.validate()?;

        let balance_before = self.claimer_balance().await?;
        let params = relay_params(&self.claim.info);

        info!(
            messenger = %self.claim.messenger,
            target = %params.to,
            value = %params.value,
            nonce = %params.nonce,
            batch_index = %params.proof.batchIndex,
            gas_limit = self.claim.gas_limit,
            "Submitting relayMessageWithProof"
        );

        let messenger = IL1Messenger::new(self.claim.messenger, &self.provider);
        let pending = messenger
            .relayMessageWithProof(
                params.from,
                params.to,
                params.value,
                params.nonce,
                params.message,
                params.proof,
            )
            .gas(self.claim.gas_limit)
            .send()
            .await
            .map_err(|e| ClaimError::Relay {
                reason: e.to_string(),
            })?;

        let tx_hash = *pending.tx_hash();
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ClaimError::Rpc(e.to_string()))?;

        if !receipt.status() {
            return Err(ClaimError::Relay {
                reason: format!("transaction {} reverted on-chain", tx_hash),
            });
        }

        let balance_after = self.claimer_balance().await?;

        let result = ClaimResult::derive(
            tx_hash,
            receipt.block_number,
            Some(U256::from(receipt.gas_used)),
            balance_before,
            balance_after,
        );

        match result.outcome {
            ClaimOutcome::Claimed { delta } => {
                info!(
                    tx_hash = %tx_hash,
                    block_number = receipt.block_number,
                    gas_used = receipt.gas_used,
                    delta = %delta,
                    "Claim confirmed"
                );
            }
            ClaimOutcome::SilentNoOp => {
                warn!(
                    tx_hash = %tx_hash,
                    block_number = receipt.block_number,
                    gas_used = receipt.gas_used,
                    "Claim transaction succeeded but produced no balance change"
                );
            }
        }

        Ok(result)
    }

    pub fn description(&self) -> String {
        format!(
            "Claiming message nonce {} ({} wei) to bridge {}",
            self.claim.info.nonce, self.claim.info.value, self.claim.bridge
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;
    use alloy_primitives::{address, b256};
    use history::ClaimProof;

    fn sample_info() -> ClaimInfo {
        ClaimInfo {
            from: address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            to: address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            value: U256::from(10u64).pow(U256::from(18u64)),
            nonce: 5,
            message: Bytes::from(vec![0xde, 0xad]),
            claimable: true,
            proof: ClaimProof {
                batch_index: 3,
                merkle_proof: Bytes::from(vec![0xbe, 0xef]),
            },
        }
    }

    fn sample_claim(info: ClaimInfo) -> Claim {
        Claim {
            messenger: address!("cccccccccccccccccccccccccccccccccccccccc"),
            bridge: address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            claimer: address!("dddddddddddddddddddddddddddddddddddddddd"),
            asset: Address::ZERO,
            info,
            gas_limit: DEFAULT_CLAIM_GAS_LIMIT,
        }
    }

    #[test]
    fn test_validate_passes_for_matching_recipient() {
        let action = ClaimAction::new(MockProvider, sample_claim(sample_info()));
        assert!(action.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_not_claimable() {
        let mut info = sample_info();
        info.claimable = false;

        let action = ClaimAction::new(MockProvider, sample_claim(info));
        assert!(matches!(action.validate(), Err(ClaimError::NotClaimable)));
    }

    #[test]
    fn test_validate_rejects_recipient_mismatch() {
        let mut info = sample_info();
        info.to = address!("9999999999999999999999999999999999999999");

        let action = ClaimAction::new(MockProvider, sample_claim(info));
        match action.validate() {
            Err(ClaimError::RecipientMismatch { expected, actual }) => {
                assert_eq!(
                    expected,
                    address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb")
                );
                assert_eq!(actual, address!("9999999999999999999999999999999999999999"));
            }
            other => panic!("expected RecipientMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_relay_params_order_and_values() {
        let info = sample_info();
        let params = relay_params(&info);

        assert_eq!(params.from, info.from);
        assert_eq!(params.to, info.to);
        assert_eq!(params.value, U256::from(10u64).pow(U256::from(18u64)));
        assert_eq!(params.nonce, U256::from(5));
        assert_eq!(params.message, Bytes::from(vec![0xde, 0xad]));
        assert_eq!(params.proof.batchIndex, U256::from(3));
        assert_eq!(params.proof.merkleProof, Bytes::from(vec![0xbe, 0xef]));
    }

    #[test]
    fn test_never_reports_completed() {
        // Relay is not idempotent: a second run must reach the chain and
        // surface the revert, not be short-circuited locally.
        let action = ClaimAction::new(MockProvider, sample_claim(sample_info()));
        assert!(!action.is_completed());
    }

    #[test]
    fn test_zero_delta_is_silent_noop() {
        let result = ClaimResult::derive(
            b256!("1111111111111111111111111111111111111111111111111111111111111111"),
            Some(100),
            Some(U256::from(21_000)),
            U256::from(10),
            U256::from(10),
        );

        assert!(result.is_silent_noop());
        assert_eq!(result.delta(), U256::ZERO);
    }

    #[test]
    fn test_positive_delta_is_claimed() {
        let result = ClaimResult::derive(
            b256!("1111111111111111111111111111111111111111111111111111111111111111"),
            Some(100),
            Some(U256::from(21_000)),
            U256::from(10),
            U256::from(1_000_010),
        );

        assert_eq!(
            result.outcome,
            ClaimOutcome::Claimed {
                delta: U256::from(1_000_000)
            }
        );
        assert!(!result.is_silent_noop());
    }

    #[test]
    fn test_description() {
        let action = ClaimAction::new(MockProvider, sample_claim(sample_info()));
        let desc = action.description();

        assert!(desc.contains("Claiming message nonce 5"));
        assert!(desc
            .to_lowercase()
            .contains("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"));
    }
}
