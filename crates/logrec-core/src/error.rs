//! Error types for log sinks.

use thiserror::Error;

/// Error surface of the [`Sink`](crate::sink::Sink) backend contract.
///
/// The in-memory [`Recorder`](crate::recorder::Recorder) never fails; these
/// variants exist for sinks that deliver entries to a real destination.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Underlying destination failed.
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be encoded for the destination.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Result type alias using SinkError
pub type SinkResult<T> = Result<T, SinkError>;
