//! Fixed-format timestamp parsing
//!
//! Readers send `timeStamp` and `validatedAt` as zone-less local times in a
//! single fixed layout. Nothing else is accepted: no `T` separator, no
//! fractional seconds, no offsets, no trailing characters.

use chrono::NaiveDateTime;

use crate::error::TimestampParseError;

/// Wire layout of every timestamp field
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TimestampParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| TimestampParseError {
        value: value.to_owned(),
        format: TIMESTAMP_FORMAT,
    })
}
