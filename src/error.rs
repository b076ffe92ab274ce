//! Error types.
//!
//! Grounded on the `thiserror`-based enum pattern in
//! `other_examples/...sebschmi-bidirected-adjacency-array__src-io-gfa1.rs`
//! (`GfaReadError`). The original C++ mixes three failure modes that this
//! crate keeps apart: a malformed input line (`logger->warn` and
//! discard), an inconsistent `k` across edges (`logger->error` and keep
//! going), and a genuinely unrecoverable state (`logger->fatal`). Per the
//! REDESIGN FLAG in spec.md §7, the last two are promoted to hard errors
//! here instead of being logged and limped past.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StarkError {
    #[error("failed to read input file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    MalformedGfa { path: PathBuf, line: usize, message: String },

    #[error("inconsistent overlap length: expected k={expected}, found an edge implying k={found}")]
    InconsistentK { expected: i64, found: i64 },

    #[error("GFA file declares no overlap edges; k cannot be inferred")]
    UndeterminedK,
}

pub type Result<T> = std::result::Result<T, StarkError>;
