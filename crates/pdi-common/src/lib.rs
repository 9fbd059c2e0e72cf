//! PDI Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared building blocks for the parameter-data ingestion (PDI) service.
//!
//! # Overview
//!
//! - **Decoding**: splitting and validating the 256-chunk parameter string
//! - **Timestamps**: the fixed `YYYY-MM-DD HH:MM:SS` wire format
//! - **Types**: the transient records handed to the persistence layer
//! - **Logging**: `tracing` subscriber bootstrap used by every binary
//!
//! # Example
//!
//! ```
//! use pdi_common::{decode, parse_timestamp, ParameterRecord};
//!
//! let raw = vec!["0A0B"; 256].join(" ");
//! let record = ParameterRecord {
//!     read_at: parse_timestamp("2024-01-15 10:30:00").unwrap(),
//!     parameter_set: decode(&raw).unwrap(),
//!     validated_at: parse_timestamp("2024-01-15 10:31:00").unwrap(),
//!     valid_by: 7,
//!     reader_type: 2,
//! };
//! assert_eq!(record.parameter_set.len(), 256);
//! ```

pub mod error;
pub mod logging;
pub mod parameters;
pub mod timestamp;
pub mod types;

// Re-export commonly used types
pub use error::{TimestampParseError, ValidationError};
pub use parameters::{decode, ParameterSet, PARAMETER_COUNT};
pub use timestamp::parse_timestamp;
pub use types::{ParameterRecord, UnvalidatedParameterRecord};
