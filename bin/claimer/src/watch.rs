//! Relayer loop: watch the L2 bridge for withdrawals and claim them on L1
//! once the batch is finalized.
//!
//! Each tick re-examines pending withdrawals (new ones are usually not
//! claimable for a while after the event) and scans for new `WithdrawERC20`
//! events. Seen hashes are persisted to plain-text files so a restart does
//! not re-claim or lose track of in-flight withdrawals.

use crate::config::Config;
use crate::run_claim;
use action::claim::ClaimError;
use alloy_provider::Provider;
use binding::bridge::ILockBridge;
use history::HistoryError;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time;
use tracing::{debug, error, info, warn};

const PROCESSED_FILE: &str = "processed.txt";
const PENDING_FILE: &str = "pending.txt";

/// File-backed sets of claimed and in-flight withdrawal hashes.
///
/// One hash per line. Processed hashes are append-only; the pending file is
/// rewritten on every change since entries leave it.
pub struct WatchState {
    dir: PathBuf,
    processed: BTreeSet<String>,
    pending: BTreeSet<String>,
}

impl WatchState {
    /// Load state from `dir`, creating it if needed. Missing files mean
    /// empty sets.
    pub fn load(dir: impl AsRef<Path>) -> eyre::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        let processed = read_hash_file(&dir.join(PROCESSED_FILE))?;
        let pending = read_hash_file(&dir.join(PENDING_FILE))?;

        Ok(Self {
            dir,
            processed,
            pending,
        })
    }

    /// True if the hash was already claimed or is awaiting finalization.
    pub fn is_tracked(&self, tx_hash: &str) -> bool {
        self.processed.contains(tx_hash) || self.pending.contains(tx_hash)
    }

    /// Hashes awaiting finalization.
    pub fn pending(&self) -> Vec<String> {
        self.pending.iter().cloned().collect()
    }

    /// Number of hashes awaiting finalization.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Track a withdrawal that is not claimable yet.
    pub fn mark_pending(&mut self, tx_hash: &str) -> eyre::Result<()> {
        if self.pending.insert(tx_hash.to_string()) {
            self.write_pending()?;
        }
        Ok(())
    }

    /// Record a successful claim and drop the hash from the pending set.
    pub fn mark_processed(&mut self, tx_hash: &str) -> eyre::Result<()> {
        if self.processed.insert(tx_hash.to_string()) {
            append_line(&self.dir.join(PROCESSED_FILE), tx_hash)?;
        }
        if self.pending.remove(tx_hash) {
            self.write_pending()?;
        }
        Ok(())
    }

    fn write_pending(&self) -> eyre::Result<()> {
        let mut contents = String::new();
        for hash in &self.pending {
            contents.push_str(hash);
            contents.push('\n');
        }
        std::fs::write(self.dir.join(PENDING_FILE), contents)?;
        Ok(())
    }
}

fn read_hash_file(path: &Path) -> eyre::Result<BTreeSet<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeSet::new()),
        Err(e) => Err(e.into()),
    }
}

fn append_line(path: &Path, line: &str) -> eyre::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// True if the claim failed only because the withdrawal is not finalized
/// yet; such hashes stay pending and are re-examined on the next tick.
fn awaiting_finalization(e: &eyre::Report) -> bool {
    match e.downcast_ref::<ClaimError>() {
        Some(ClaimError::NotClaimable) => return true,
        Some(ClaimError::History(inner)) => return history_still_indexing(inner),
        _ => {}
    }

    e.downcast_ref::<HistoryError>()
        .is_some_and(history_still_indexing)
}

fn history_still_indexing(e: &HistoryError) -> bool {
    matches!(
        e,
        HistoryError::EmptyResults { .. } | HistoryError::MissingClaimInfo { .. }
    )
}

/// Watch the token bridge on L2 and claim withdrawals as they finalize.
///
/// Runs until the process is stopped. ETH-bridge withdrawals have no L2
/// event cursor here and are claimed with the `claim` subcommand instead.
pub async fn run_watch<P1, P2>(l1_provider: P1, l2_provider: P2, config: &Config) -> eyre::Result<()>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    let book = crate::load_address_book(config)?;
    let l2_bridge = ILockBridge::new(book.token.l2.bridge, &l2_provider);
    let mut state = WatchState::load(config.state_dir())?;

    // Events before startup are not scanned; withdrawals from earlier runs
    // survive in the pending file.
    let mut next_block = l2_provider.get_block_number().await? + 1;

    info!(
        bridge = %book.token.l2.bridge,
        from_block = next_block,
        pending = state.pending_len(),
        "Watching for withdrawals"
    );

    let mut interval = time::interval(Duration::from_secs(config.watch_interval_secs()));

    loop {
        interval.tick().await;

        for tx_hash in state.pending() {
            match run_claim(l1_provider.clone(), config, &tx_hash).await {
                Ok(Some(result)) => {
                    info!(tx_hash = %tx_hash, claim_tx = %result.tx_hash, "Pending withdrawal claimed");
                    state.mark_processed(&tx_hash)?;
                }
                Ok(None) => {
                    // Dry-run stops after validation; keep the hash pending.
                }
                Err(e) if awaiting_finalization(&e) => {
                    debug!(tx_hash = %tx_hash, "Withdrawal not claimable yet");
                }
                Err(e) => {
                    warn!(tx_hash = %tx_hash, error = %e, "Claim attempt failed; hash stays pending");
                }
            }
        }

        let head = match l2_provider.get_block_number().await {
            Ok(n) => n,
            Err(e) => {
                error!(error = %e, "Failed to fetch L2 head");
                continue;
            }
        };
        if head < next_block {
            continue;
        }

        let events = match l2_bridge
            .WithdrawERC20_filter()
            .from_block(next_block)
            .to_block(head)
            .query()
            .await
        {
            Ok(events) => events,
            Err(e) => {
                error!(from = next_block, to = head, error = %e, "Withdrawal event scan failed");
                continue;
            }
        };
        next_block = head + 1;

        for (event, log) in events {
            let Some(tx_hash) = log.transaction_hash else {
                continue;
            };
            let tx_hash = tx_hash.to_string();

            if state.is_tracked(&tx_hash) {
                continue;
            }

            info!(
                tx_hash = %tx_hash,
                from = %event.from,
                amount = %event.amount,
                "Detected withdrawal"
            );

            match run_claim(l1_provider.clone(), config, &tx_hash).await {
                Ok(Some(result)) => {
                    info!(tx_hash = %tx_hash, claim_tx = %result.tx_hash, "Withdrawal claimed");
                    state.mark_processed(&tx_hash)?;
                }
                Ok(None) => {
                    state.mark_pending(&tx_hash)?;
                }
                Err(e) if awaiting_finalization(&e) => {
                    debug!(tx_hash = %tx_hash, "Withdrawal not claimable yet");
                    state.mark_pending(&tx_hash)?;
                }
                Err(e) => {
                    warn!(tx_hash = %tx_hash, error = %e, "Claim attempt failed; hash stays pending");
                    state.mark_pending(&tx_hash)?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "claimer-watch-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    const HASH_A: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
    const HASH_B: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";

    #[test]
    fn test_state_starts_empty_and_tracks_marks() {
        let dir = temp_state_dir("marks");
        let mut state = WatchState::load(&dir).unwrap();

        assert!(!state.is_tracked(HASH_A));

        state.mark_pending(HASH_A).unwrap();
        assert!(state.is_tracked(HASH_A));
        assert_eq!(state.pending(), vec![HASH_A.to_string()]);

        state.mark_processed(HASH_A).unwrap();
        assert!(state.is_tracked(HASH_A));
        assert_eq!(state.pending_len(), 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_state_survives_reload() {
        let dir = temp_state_dir("reload");

        {
            let mut state = WatchState::load(&dir).unwrap();
            state.mark_pending(HASH_A).unwrap();
            state.mark_pending(HASH_B).unwrap();
            state.mark_processed(HASH_B).unwrap();
        }

        let state = WatchState::load(&dir).unwrap();
        assert_eq!(state.pending(), vec![HASH_A.to_string()]);
        assert!(state.is_tracked(HASH_B));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_pending_file_dedupes_and_ignores_blank_lines() {
        let dir = temp_state_dir("dedupe");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(PENDING_FILE),
            format!("{HASH_A}\n\n{HASH_A}\n  \n"),
        )
        .unwrap();

        let state = WatchState::load(&dir).unwrap();
        assert_eq!(state.pending(), vec![HASH_A.to_string()]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_not_claimable_yet_keeps_hash_pending() {
        let not_ready: eyre::Report = ClaimError::NotClaimable.into();
        assert!(awaiting_finalization(&not_ready));

        let not_indexed: eyre::Report = HistoryError::MissingClaimInfo {
            tx_hash: HASH_A.to_string(),
        }
        .into();
        assert!(awaiting_finalization(&not_indexed));

        let empty: eyre::Report = HistoryError::EmptyResults {
            tx_hash: HASH_A.to_string(),
        }
        .into();
        assert!(awaiting_finalization(&empty));
    }

    #[test]
    fn test_terminal_failures_are_not_awaiting_finalization() {
        let reverted: eyre::Report = ClaimError::Relay {
            reason: "execution reverted".to_string(),
        }
        .into();
        assert!(!awaiting_finalization(&reverted));

        let api: eyre::Report = HistoryError::Api {
            errcode: 500,
            errmsg: "internal error".to_string(),
        }
        .into();
        assert!(!awaiting_finalization(&api));
    }
}
