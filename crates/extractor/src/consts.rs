//! Type URLs and output formatting constants shared across the pipeline.

/// Sentinel count key covering every message, recognized or not.
pub const TOTAL: &str = "total";

pub const MSG_ADD_COVENANT_SIGS: &str = "/babylon.btcstaking.v1.MsgAddCovenantSigs";
pub const MSG_ADD_FINALITY_SIG: &str = "/babylon.finality.v1.MsgAddFinalitySig";
pub const MSG_CREATE_BTC_DELEGATION: &str = "/babylon.btcstaking.v1.MsgCreateBTCDelegation";

/// Fixed line closing every per-height count summary.
pub const SUMMARY_SEPARATOR: &str = "=============";

/// Extension of cached raw block responses (`<height>.block`).
pub const BLOCK_FILE_EXT: &str = "block";

/// Extension of per-height count summaries (`<height>.count`).
pub const COUNT_FILE_EXT: &str = "count";

/// Suffix of per-type payload dumps (`<height>.<shortTypeName>.txs.json`).
pub const TXS_FILE_SUFFIX: &str = "txs.json";

/// Name of the cross-height summary concatenation.
pub const AGGREGATION_FILE: &str = "aggregation.txt";
