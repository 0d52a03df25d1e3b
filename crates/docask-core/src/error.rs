//! Error taxonomy shared by every DocAsk crate.
//!
//! Lookup and validation failures are raised and translated into HTTP status
//! codes at the gateway boundary. Inference collaborator failures are NOT part
//! of this enum; the answer service absorbs them into the answer string.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocaskError>;

#[derive(Debug, Error)]
pub enum DocaskError {
    /// No document with the requested id exists.
    #[error("Document not found")]
    NotFound,

    /// The PDF requires encryption support we do not ship.
    #[error("{0}")]
    Extraction(String),

    /// Any other upload-time extraction or storage failure.
    #[error("Error processing file: {0}")]
    Processing(String),

    /// Request rejected before any work was done (e.g. empty question).
    #[error("{0}")]
    Validation(String),

    /// Client exceeded the configured request budget for the window.
    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
