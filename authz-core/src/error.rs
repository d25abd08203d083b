use thiserror::Error;

/// A decision that could not be made.
///
/// An error from a checker always means infrastructure failure; a definitive
/// deny is `Ok(false)`, never an error. Callers must be able to tell the two
/// apart.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The relational store failed or rejected the query.
    #[error("storage error: {0}")]
    Storage(String),

    /// The relationship store was unreachable or returned a failure status.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CheckError>;
