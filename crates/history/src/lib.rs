//! Bridge History API client.
//!
//! The Bridge History API is the external indexer that serves claim metadata
//! for L2→L1 withdrawals: the original message, its nonce, and the Merkle
//! proof the L1 messenger needs to authorize the relay. This crate validates
//! the requested transaction hash locally, performs the single
//! `POST /api/txsbyhashes` lookup, and decodes the wire format into the
//! [`ClaimInfo`] domain type.
//!
//! Nothing here caches or retries: claim data is fetched fresh per
//! invocation, and transient indexer failures are the caller's problem.

pub mod client;
pub mod types;

pub use client::HistoryClient;
pub use types::{ClaimInfo, ClaimProof, ClaimRequest, ClaimStage};

use thiserror::Error;

/// Errors from the claim-data fetch path.
///
/// `InvalidTxHash` is checked locally before any network I/O; everything
/// else reflects an indexer-side condition.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The requested hash is not a well-formed 32-byte hex string
    #[error("invalid L2 transaction hash {input:?}: {reason}")]
    InvalidTxHash { input: String, reason: String },

    /// The indexer returned a non-zero error code
    #[error("bridge history API error {errcode}: {errmsg}")]
    Api { errcode: i64, errmsg: String },

    /// The indexer does not know this transaction
    #[error("bridge history API returned no data for {tx_hash}")]
    EmptyResults { tx_hash: String },

    /// The transaction is known but has no claim data attached yet
    #[error("no claim info for {tx_hash}; the withdrawal may not be indexed yet")]
    MissingClaimInfo { tx_hash: String },

    /// A numeric field in the wire format failed to parse
    #[error("invalid {field} in claim info: {value:?}")]
    InvalidField { field: &'static str, value: String },

    /// HTTP transport failure
    #[error("bridge history API request failed: {0}")]
    Http(#[from] reqwest::Error),
}
