// ⚠️ Error taxonomy
// Every failure the core can produce. Catalog misses are `Option`s at the
// lookup site; `NotFound` is for callers that need to turn one into an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WasteError {
    /// Catalog lookup miss
    #[error("not found: {0}")]
    NotFound(String),

    /// Rejected argument (non-positive limit or quantity, missing descriptor, unknown category)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Persisted state could not be parsed. Recovered inside `load()`, never returned from it.
    #[error("persisted state is corrupt: {0}")]
    PersistenceCorrupt(String),

    /// The storage port failed to read or write
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type WasteResult<T> = Result<T, WasteError>;
