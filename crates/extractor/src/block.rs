//! Serde model of the Tendermint `/block` JSON-RPC response.
//!
//! The pipeline only interprets `result.block.data.txs`; every other field is
//! inert and only named here so the cached document's shape is on record.
//! Caching itself persists the raw response bytes verbatim, so the model is
//! deserialize-only. Containers default missing fields so partial fixtures
//! parse, matching the tolerant decoding the cached raw bytes were
//! originally produced under.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockDocument {
    pub jsonrpc: String,
    pub id: i64,
    pub result: BlockResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockResult {
    pub block_id: BlockId,
    pub block: Block,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Block {
    pub header: Header,
    pub data: BlockData,
    pub evidence: EvidenceList,
    pub last_commit: LastCommit,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockData {
    /// Raw transactions, base64-encoded, in consensus order.
    pub txs: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Header {
    pub version: HeaderVersion,
    pub chain_id: String,
    pub height: String,
    pub time: String,
    pub last_block_id: BlockId,
    pub last_commit_hash: String,
    pub data_hash: String,
    pub validators_hash: String,
    pub next_validators_hash: String,
    pub consensus_hash: String,
    pub app_hash: String,
    pub last_results_hash: String,
    pub evidence_hash: String,
    pub proposer_address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeaderVersion {
    pub block: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockId {
    pub hash: String,
    pub parts: BlockIdParts,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockIdParts {
    pub total: i64,
    pub hash: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EvidenceList {
    pub evidence: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LastCommit {
    pub height: String,
    pub round: i64,
    pub block_id: BlockId,
    pub signatures: Vec<CommitSignature>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommitSignature {
    pub block_id_flag: i64,
    pub validator_address: String,
    pub timestamp: String,
    pub signature: Option<String>,
}
