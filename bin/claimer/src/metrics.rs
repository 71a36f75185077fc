//! Prometheus metrics for the claimer.
//!
//! All metrics are aggregated in the [`Metrics`] struct for easy tracking and management.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Aggregated metrics for the claimer.
///
/// This struct provides a centralized interface for recording all claimer metrics.
/// Metrics are registered with the global metrics registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    /// Register metric descriptions with the global registry.
    fn register_descriptions() {
        // Claim metrics
        describe_counter!("claimer_claims_total", "Total number of claims attempted");
        describe_counter!(
            "claimer_claims_success_total",
            "Total number of claims confirmed with a balance increase"
        );
        describe_counter!(
            "claimer_claims_silent_noop_total",
            "Total number of claims confirmed without a balance change"
        );
        describe_counter!(
            "claimer_claims_failure_total",
            "Total number of failed claims by error kind"
        );
        describe_counter!(
            "claimer_claimed_wei_total",
            "Total amount claimed in wei"
        );
        describe_histogram!(
            "claimer_claim_duration_seconds",
            "End-to-end duration of each claim invocation in seconds"
        );

        // Bridge metrics
        describe_counter!(
            "claimer_bridges_total",
            "Total number of bridge transfers executed by direction and bridge pair"
        );
        describe_counter!(
            "claimer_bridge_amount_wei_total",
            "Total amount bridged in wei"
        );
    }

    /// Record a claim attempt start.
    pub fn record_claim_attempt(&self) {
        counter!("claimer_claims_total").increment(1);
    }

    /// Record a confirmed claim with the observed balance delta.
    pub fn record_claim_success(&self, delta_wei: u128, duration: Duration) {
        counter!("claimer_claims_success_total").increment(1);
        counter!("claimer_claimed_wei_total").increment(saturate_wei(delta_wei));
        histogram!("claimer_claim_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a confirmed claim that produced no balance change.
    pub fn record_claim_silent_noop(&self, duration: Duration) {
        counter!("claimer_claims_silent_noop_total").increment(1);
        histogram!("claimer_claim_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a failed claim by error kind.
    pub fn record_claim_failure(&self, kind: &str) {
        counter!("claimer_claims_failure_total", "kind" => kind.to_string()).increment(1);
    }

    /// Record a bridge transfer.
    pub fn record_bridge(&self, direction: &str, pair: &str, amount_wei: u128) {
        counter!(
            "claimer_bridges_total",
            "direction" => direction.to_string(),
            "pair" => pair.to_string()
        )
        .increment(1);
        counter!("claimer_bridge_amount_wei_total").increment(saturate_wei(amount_wei));
    }
}

/// Clamp a wei amount into the u64 range counters can hold.
///
/// Claims above ~18.44 ETH exceed `u64::MAX` wei; clamping keeps the
/// counter monotonic instead of wrapping it.
fn saturate_wei(wei: u128) -> u64 {
    u64::try_from(wei).unwrap_or(u64::MAX)
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturate_wei_passes_small_amounts() {
        assert_eq!(saturate_wei(0), 0);
        assert_eq!(saturate_wei(1_000_000_000_000_000_000), 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_saturate_wei_clamps_large_claims() {
        // 20 ETH in wei is above u64::MAX; the counter must clamp, not wrap.
        assert_eq!(saturate_wei(20_000_000_000_000_000_000), u64::MAX);
        assert_eq!(saturate_wei(u128::MAX), u64::MAX);
    }
}
