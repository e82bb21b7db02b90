//! Signer-set reporting over decoded payload dumps.
//!
//! Ad-hoc comparison utilities for the `signer` field of `.txs.json` files
//! produced by the pipeline. Not part of the extraction core; used from the
//! signer comparison tests.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("failed to read payload dump {path}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("payload dump is not a JSON array of messages")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SignerEntry {
    signer: String,
}

/// Symmetric difference between two signer sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignerDiff {
    pub only_a: Vec<String>,
    pub only_b: Vec<String>,
}

impl SignerDiff {
    pub fn is_empty(&self) -> bool {
        self.only_a.is_empty() && self.only_b.is_empty()
    }
}

/// Load the set of `signer` values from a `.txs.json` payload dump.
pub fn load_signers(path: impl AsRef<Path>) -> Result<BTreeSet<String>, SignerError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| SignerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let entries: Vec<SignerEntry> = serde_json::from_slice(&bytes)?;
    Ok(entries.into_iter().map(|e| e.signer).collect())
}

/// Report signers present in exactly one of the two sets, sorted.
pub fn compare(a: &BTreeSet<String>, b: &BTreeSet<String>) -> SignerDiff {
    SignerDiff {
        only_a: a.difference(b).cloned().collect(),
        only_b: b.difference(a).cloned().collect(),
    }
}

/// Report signers present in every given set, sorted. Empty input yields an
/// empty intersection.
pub fn common_signers<'a>(sets: impl IntoIterator<Item = &'a BTreeSet<String>>) -> Vec<String> {
    let mut iter = sets.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    iter.fold(first.clone(), |acc, set| {
        acc.intersection(set).cloned().collect()
    })
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn compare_reports_symmetric_difference() {
        let a = set(&["bbn1a", "bbn1b", "bbn1c"]);
        let b = set(&["bbn1b", "bbn1c", "bbn1d"]);

        let diff = compare(&a, &b);
        assert_eq!(diff.only_a, ["bbn1a"]);
        assert_eq!(diff.only_b, ["bbn1d"]);
        assert!(!diff.is_empty());
    }

    #[test]
    fn identical_sets_have_empty_diff() {
        let a = set(&["bbn1a"]);
        assert!(compare(&a, &a.clone()).is_empty());
    }

    #[test]
    fn common_signers_is_full_intersection() {
        let sets = [
            set(&["bbn1a", "bbn1b", "bbn1c"]),
            set(&["bbn1a", "bbn1c", "bbn1d"]),
            set(&["bbn1a", "bbn1c"]),
        ];
        assert_eq!(common_signers(sets.iter()), ["bbn1a", "bbn1c"]);
    }

    #[test]
    fn common_signers_of_nothing_is_empty() {
        let sets: [BTreeSet<String>; 0] = [];
        assert!(common_signers(sets.iter()).is_empty());
    }
}
