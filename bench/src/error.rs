//! Error types for pl-bench

use std::time::Duration;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can end a benchmark invocation.
///
/// None of these are retried. Setup errors mean the case could not be
/// measured at all; query errors mean a measurement was started and is now
/// worthless.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("invalid connection string: {0}")]
    InvalidConnectionString(#[source] BoxError),

    #[error("failed to connect: {0}")]
    Connect(#[source] BoxError),

    #[error("failed to close connection: {0}")]
    Close(#[source] BoxError),

    #[error("closing the connection took longer than {0:?}")]
    CloseTimeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("query failed on iteration {iteration}: {source}")]
    Query {
        /// Zero-based index of the iteration that failed.
        iteration: u64,
        #[source]
        source: BoxError,
    },
}

impl BenchError {
    pub fn query(iteration: u64, source: impl Into<BoxError>) -> Self {
        BenchError::Query {
            iteration,
            source: source.into(),
        }
    }

    /// True for errors raised while opening or closing the session, as
    /// opposed to errors raised by the measured work itself.
    pub fn is_setup(&self) -> bool {
        !matches!(self, BenchError::Query { .. })
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_errors_are_not_setup_errors() {
        let err = BenchError::query(3, "division by zero");
        assert!(!err.is_setup());
        assert_eq!(
            err.to_string(),
            "query failed on iteration 3: division by zero"
        );
    }

    #[test]
    fn close_timeout_is_a_setup_error() {
        let err = BenchError::CloseTimeout(Duration::from_secs(5));
        assert!(err.is_setup());
        assert!(err.to_string().contains("5s"));
    }
}
