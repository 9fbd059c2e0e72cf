//! Error types for decoding incoming parameter records

use thiserror::Error;

/// Shape violation in a raw parameter string
///
/// Any of these rejects the whole record; there is no partial decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Expected {expected} chunks, got {actual}")]
    WrongChunkCount { expected: usize, actual: usize },

    #[error("Chunk {index} ('{value}') is not {expected_width} characters")]
    WrongChunkLength {
        index: usize,
        value: String,
        expected_width: usize,
    },
}

/// A timestamp string that does not match the fixed wire format
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("time data '{value}' does not match format '{format}'")]
pub struct TimestampParseError {
    pub value: String,
    pub format: &'static str,
}
