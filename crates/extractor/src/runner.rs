//! Cross-height orchestration: bounded fan-out, fail-fast join, deterministic
//! output.

use crate::aggregate::{self, ExtractResult};
use crate::concurrency::run_with_concurrency_collect;
use crate::consts::{AGGREGATION_FILE, COUNT_FILE_EXT, TXS_FILE_SUFFIX};
use crate::error::ExtractError;
use crate::source::BlockSource;
use config::ExtractorConfig;
use std::path::Path;

/// Run the full pipeline for every requested height.
///
/// One future per height runs the resolve-decode-aggregate chain, at most
/// `max_concurrent` at a time. Any failure aborts the run before a single
/// output file is written; cache files persisted up to that point survive and
/// are reused on the next run. On success, results are ordered by the height
/// parsed back out of each summary (completion and input order are both
/// irrelevant), output files are written, and the aggregation text is
/// returned for echoing to stdout.
pub async fn run(config: &ExtractorConfig, heights: &[u64]) -> Result<String, ExtractError> {
    let out_dir = Path::new(&config.extract.out_dir);
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| ExtractError::Write {
            path: out_dir.to_path_buf(),
            source,
        })?;

    let source = BlockSource::new(&config.node, out_dir)?;
    let source = &source;

    let tasks = heights.iter().map(|&height| async move {
        let block = source.resolve(height).await?;
        let result = aggregate::aggregate(height, &block)?;
        tracing::info!(height, types = result.txs.len(), "extracted block");
        Ok::<_, ExtractError>(result)
    });

    let mut results =
        run_with_concurrency_collect(config.extract.max_concurrent, tasks).await?;

    results.sort_by_key(|r| aggregate::parse_height(&r.counts));

    let mut aggregation = String::new();
    for result in &results {
        write_result(out_dir, result).await?;
        aggregation.push_str(&result.counts);
        aggregation.push('\n');
    }

    let aggregation_path = out_dir.join(AGGREGATION_FILE);
    tokio::fs::write(&aggregation_path, &aggregation)
        .await
        .map_err(|source| ExtractError::Write {
            path: aggregation_path,
            source,
        })?;

    Ok(aggregation)
}

/// Write one height's summary and per-type payload dumps.
async fn write_result(out_dir: &Path, result: &ExtractResult) -> Result<(), ExtractError> {
    let height = aggregate::parse_height(&result.counts).ok_or(ExtractError::MalformedSummary)?;

    let counts_path = out_dir.join(format!("{height}.{COUNT_FILE_EXT}"));
    tokio::fs::write(&counts_path, &result.counts)
        .await
        .map_err(|source| ExtractError::Write {
            path: counts_path,
            source,
        })?;

    for (type_url, json) in &result.txs {
        let short_name = type_url.rsplit('.').next().unwrap_or(type_url);
        let txs_path = out_dir.join(format!("{height}.{short_name}.{TXS_FILE_SUFFIX}"));
        tokio::fs::write(&txs_path, json)
            .await
            .map_err(|source| ExtractError::Write {
                path: txs_path,
                source,
            })?;
    }

    Ok(())
}
