//! Error types for loading, mining and ranking

use std::path::{Path, PathBuf};

/// Errors raised by the basket pipeline.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Input file missing, unreadable or malformed.
    #[error("failed to load {}: {reason}", .path.display())]
    InputLoad { path: PathBuf, reason: String },

    /// A subset needed by the ranker was not produced by the miner.
    #[error("support for itemset {{{itemset}}} was not computed by the miner")]
    MissingSupport { itemset: String },

    /// The miner produced supports that contradict each other.
    #[error("inconsistent support for itemset {{{itemset}}}: {reason}")]
    InconsistentSupport { itemset: String, reason: String },

    /// A threshold was out of range.
    #[error("invalid {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// Too many items to enumerate antecedent/consequent splits.
    #[error("itemset of {len} items is too large to split into rules")]
    ItemsetTooLarge { len: usize },

    /// Writing the rule table failed.
    #[error("failed to export rules to {}: {reason}", .path.display())]
    Export { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn input_load(path: &Path, reason: impl ToString) -> Self {
        Self::InputLoad {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn export(path: &Path, reason: impl ToString) -> Self {
        Self::Export {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
