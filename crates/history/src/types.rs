//! Claim data model and the `txsbyhashes` wire format.

use crate::HistoryError;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated claim request for a single L2 withdrawal transaction.
///
/// Construction enforces the input constraint (`0x` + 64 hex chars), so any
/// value of this type can be sent to the indexer without further checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimRequest {
    tx_hash: TxHash,
}

impl ClaimRequest {
    /// Parse and validate an L2 transaction hash.
    ///
    /// Rejects anything that is not `0x` followed by exactly 64 hex
    /// characters, before any network call is made.
    pub fn parse(input: &str) -> Result<Self, HistoryError> {
        if !input.starts_with("0x") {
            return Err(HistoryError::InvalidTxHash {
                input: input.to_string(),
                reason: "must start with 0x".to_string(),
            });
        }

        if input.len() != 66 {
            return Err(HistoryError::InvalidTxHash {
                input: input.to_string(),
                reason: format!("expected 66 characters, got {}", input.len()),
            });
        }

        let tx_hash = TxHash::from_str(input).map_err(|e| HistoryError::InvalidTxHash {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { tx_hash })
    }

    /// The validated transaction hash.
    pub const fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }
}

impl fmt::Display for ClaimRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tx_hash)
    }
}

impl FromStr for ClaimRequest {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Inclusion proof for an L2→L1 message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimProof {
    /// Index of the committed batch the message belongs to
    pub batch_index: u64,
    /// Concatenated Merkle sibling nodes
    pub merkle_proof: Bytes,
}

/// Claim metadata for one L2→L1 withdrawal, as served by the indexer.
///
/// Fetched fresh per invocation and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimInfo {
    /// Original sender of the message on L2
    pub from: Address,
    /// Target contract on L1 (must be the bridge)
    pub to: Address,
    /// Value carried by the message, in wei
    pub value: U256,
    /// Message nonce
    pub nonce: u64,
    /// Encoded target call (e.g. `finalizeWithdrawERC20`)
    pub message: Bytes,
    /// Whether the message is finalized and ready to relay
    pub claimable: bool,
    /// Inclusion proof
    pub proof: ClaimProof,
}

/// Stages of one claim invocation.
///
/// No transition skips a predecessor; every failure is terminal for the
/// invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimStage {
    Requested,
    ProofFetched,
    Validated,
    Submitted,
    Confirmed,
}

impl fmt::Display for ClaimStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Requested => "requested",
            Self::ProofFetched => "proof-fetched",
            Self::Validated => "validated",
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
        };
        f.write_str(name)
    }
}

// --- wire format ---------------------------------------------------------
//
// POST {base}/api/txsbyhashes => {
//   "errcode": 0, "errmsg": "",
//   "data": { "results": [ { "claim_info": { ... } } ] }
// }
//
// Numeric fields (value, nonce, batch_index) arrive as decimal strings.

#[derive(Debug, Serialize)]
pub(crate) struct TxsByHashesRequest {
    pub txs: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TxsByHashesResponse {
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
    #[serde(default)]
    pub data: Option<ResultsData>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ResultsData {
    #[serde(default)]
    pub results: Vec<TxResult>,
}

#[derive(Debug, Deserialize)]
pub struct TxResult {
    #[serde(default)]
    pub claim_info: Option<RawClaimInfo>,
}

#[derive(Debug, Deserialize)]
pub struct RawClaimInfo {
    pub from: Address,
    pub to: Address,
    pub value: String,
    pub nonce: String,
    pub message: Bytes,
    #[serde(default)]
    pub claimable: bool,
    pub proof: RawClaimProof,
}

#[derive(Debug, Deserialize)]
pub struct RawClaimProof {
    pub batch_index: String,
    pub merkle_proof: Bytes,
}

impl TryFrom<RawClaimInfo> for ClaimInfo {
    type Error = HistoryError;

    fn try_from(raw: RawClaimInfo) -> Result<Self, Self::Error> {
        let value =
            U256::from_str(&raw.value).map_err(|_| HistoryError::InvalidField {
                field: "value",
                value: raw.value.clone(),
            })?;

        let nonce = raw
            .nonce
            .parse::<u64>()
            .map_err(|_| HistoryError::InvalidField {
                field: "nonce",
                value: raw.nonce.clone(),
            })?;

        let batch_index =
            raw.proof
                .batch_index
                .parse::<u64>()
                .map_err(|_| HistoryError::InvalidField {
                    field: "proof.batch_index",
                    value: raw.proof.batch_index.clone(),
                })?;

        Ok(Self {
            from: raw.from,
            to: raw.to,
            value,
            nonce,
            message: raw.message,
            claimable: raw.claimable,
            proof: ClaimProof {
                batch_index,
                merkle_proof: raw.proof.merkle_proof,
            },
        })
    }
}

/// Decode a `txsbyhashes` response into the claim info for `request`.
///
/// Pure function so the decoding path is testable without HTTP.
pub fn decode_claim_info(
    response: TxsByHashesResponse,
    request: &ClaimRequest,
) -> Result<ClaimInfo, HistoryError> {
    if response.errcode != 0 {
        return Err(HistoryError::Api {
            errcode: response.errcode,
            errmsg: response.errmsg,
        });
    }

    let mut results = response.data.unwrap_or_default().results;
    if results.is_empty() {
        return Err(HistoryError::EmptyResults {
            tx_hash: request.to_string(),
        });
    }

    let claim_info = results
        .swap_remove(0)
        .claim_info
        .ok_or_else(|| HistoryError::MissingClaimInfo {
            tx_hash: request.to_string(),
        })?;

    claim_info.try_into()
}
