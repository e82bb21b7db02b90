use std::path::PathBuf;
use thiserror::Error;

/// Errors raised anywhere in the per-height pipeline or the output phase.
///
/// Any variant is fatal to the height it occurred in, and through the
/// fail-fast join in [`crate::runner`], to the whole run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("failed to query block at height {height}")]
    Fetch {
        height: u64,
        #[source]
        source: reqwest::Error,
    },

    #[error("block cache i/o failed at {path}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse block document")]
    Parse(#[source] serde_json::Error),

    #[error("invalid base64 in raw transaction")]
    Encoding(#[from] base64::DecodeError),

    #[error("unknown field {field} in {container}")]
    UnknownField { container: &'static str, field: u32 },

    #[error("failed to decode {container}")]
    Decode {
        container: String,
        #[source]
        source: prost::DecodeError,
    },

    #[error("failed to render decoded payload")]
    Render(#[source] serde_json::Error),

    #[error("summary text is missing the height header line")]
    MalformedSummary,

    #[error("failed to write output file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
