//! Error types for the sequence engine.

use thiserror::Error;
use tseq_types::TypesError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TseqError {
    /// Rejected at construction: bad ordering, bounds or mixed frames
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    /// Caller misuse that breaks an engine invariant
    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error(transparent)]
    Type(#[from] TypesError),
}

pub type Result<T> = std::result::Result<T, TseqError>;
