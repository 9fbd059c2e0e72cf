//! Record types shared between the decoder and the persistence layer

use chrono::NaiveDateTime;

use crate::parameters::ParameterSet;

/// A validated reading, ready for the structured single-row insert
///
/// Constructed per request, inserted once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRecord {
    /// When the reader took the sample
    pub read_at: NaiveDateTime,
    /// The decoded 256-chunk parameter string
    pub parameter_set: ParameterSet,
    /// When the record was validated upstream
    pub validated_at: NaiveDateTime,
    /// Identifier of the validating actor
    pub valid_by: i32,
    /// Device/reader class code
    pub reader_type: i32,
}

/// A reading whose parameter string has *not* been decoded
///
/// The batch path hands the raw string to the `insert_parameter_data`
/// database function without running [`crate::parameters::decode`]; keeping
/// a separate type means the two paths cannot be swapped by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnvalidatedParameterRecord {
    pub read_at: NaiveDateTime,
    pub parameter_set: String,
    pub validated_at: NaiveDateTime,
    pub valid_by: i32,
    pub reader_type: i32,
}
