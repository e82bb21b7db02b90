//! Per-height message counting and payload collection.

use crate::block::BlockDocument;
use crate::consts::{SUMMARY_SEPARATOR, TOTAL};
use crate::envelope::decode_tx;
use crate::error::ExtractError;
use crate::messages::classify;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Everything extracted from one height: the rendered count summary and one
/// JSON array of decoded payloads per recognized type that appeared.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractResult {
    pub counts: String,
    pub txs: BTreeMap<String, String>,
}

/// Decode every transaction of `block` and aggregate its messages.
///
/// Transactions and the messages within them are visited in encoded order.
/// Every message increments `total` and its own type's count, recognized or
/// not; recognized payloads are additionally collected in encounter order.
/// Any decode failure aborts the whole height.
pub fn aggregate(height: u64, block: &BlockDocument) -> Result<ExtractResult, ExtractError> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut payloads: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for raw_tx in &block.result.block.data.txs {
        let tx = decode_tx(raw_tx)?;

        for msg in &tx.body.messages {
            *counts.entry(TOTAL.to_string()).or_default() += 1;
            *counts.entry(msg.type_url.clone()).or_default() += 1;

            if let Some(rendered) = classify(msg)?.render()? {
                payloads.entry(msg.type_url.clone()).or_default().push(rendered);
            }
        }
    }

    Ok(ExtractResult {
        counts: render_summary(height, &counts),
        txs: payloads
            .into_iter()
            .map(|(tag, entries)| (tag, render_json_array(&entries)))
            .collect(),
    })
}

/// Render the count summary: height header, total line, then one line per
/// type key in lexicographic order, closed by the fixed separator. The first
/// line is a contract: [`parse_height`] reads it back.
fn render_summary(height: u64, counts: &BTreeMap<String, u64>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{height} counts");
    let _ = writeln!(out, "{TOTAL}: {}", counts.get(TOTAL).copied().unwrap_or(0));

    // BTreeMap iteration is already lexicographic
    for (key, count) in counts {
        if key == TOTAL {
            continue;
        }
        let _ = writeln!(out, "{key}: {count}");
    }

    out.push_str(SUMMARY_SEPARATOR);
    out.push('\n');
    out
}

/// Join rendered payloads into one JSON array. Callers never pass an empty
/// collection; a type with no messages has no entry at all.
fn render_json_array(entries: &[String]) -> String {
    format!("[\n{}\n]", entries.join(",\n"))
}

/// Recover the height from a summary's fixed `"{height} counts"` first line.
pub fn parse_height(summary: &str) -> Option<u64> {
    summary
        .lines()
        .next()?
        .strip_suffix(" counts")?
        .parse()
        .ok()
}
