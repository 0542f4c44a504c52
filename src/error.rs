use thiserror::Error;

/// Every way a dashboard run can fail.
///
/// Nothing is recovered locally: each variant propagates to `main`, which prints
/// the message and exits with [`AppError::exit_code`].
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Missing, unreadable or placeholder credentials.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The requested date range cannot be reported on.
    #[error("invalid date range: {0}")]
    Validation(String),

    /// HTTP failure or a response body we could not read.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A raw report did not have the columns or values we expect.
    #[error("unexpected report schema: {0}")]
    Schema(String),

    /// Writing one of the run artifacts failed.
    #[error("failed to write output: {0}")]
    Output(String),
}

impl AppError {
    /// Process exit code for this error category.
    ///
    /// - `Configuration` -> 2
    /// - `Validation` -> 3
    /// - `Fetch` -> 4
    /// - `Schema` -> 5
    /// - `Output` -> 6
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Configuration(_) => 2,
            AppError::Validation(_) => 3,
            AppError::Fetch(_) => 4,
            AppError::Schema(_) => 5,
            AppError::Output(_) => 6,
        }
    }
}
