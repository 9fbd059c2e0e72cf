//! Parameter-set decoding
//!
//! A reader transmits its 256 parameters as one string of four-character
//! chunks joined by single spaces:
//!
//! ```text
//! 00A1 0F3C 1200 ... FFFF
//! ```
//!
//! [`decode`] splits that string positionally and checks its shape. The split
//! is exact: no trimming, no case folding, and consecutive spaces produce
//! empty chunks (which then fail the width check).
//!
//! # Example
//!
//! ```
//! use pdi_common::parameters::{column_name, decode, PARAMETER_COUNT};
//!
//! let raw = vec!["ABCD"; PARAMETER_COUNT].join(" ");
//! let set = decode(&raw).unwrap();
//!
//! assert_eq!(set.chunk(0x0A), "ABCD");
//! assert_eq!(column_name(0x0A), "parameter0A");
//! ```

use std::fmt;

use crate::error::ValidationError;

/// Number of chunks in every parameter string
pub const PARAMETER_COUNT: usize = 256;

/// Width of a single chunk, in characters
pub const CHUNK_WIDTH: usize = 4;

/// Separator between chunks
pub const CHUNK_SEPARATOR: char = ' ';

/// A decoded parameter string
///
/// Holds the verbatim source string next to its 256 chunks. The chunks are
/// addressed by index (0x00..=0xFF); column names only appear at the
/// persistence boundary through [`column_name`].
#[derive(Clone, PartialEq, Eq)]
pub struct ParameterSet {
    raw: String,
    chunks: Box<[String; PARAMETER_COUNT]>,
}

impl ParameterSet {
    /// The original delimited string, exactly as received
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Chunk at `index`
    pub fn chunk(&self, index: u8) -> &str {
        &self.chunks[usize::from(index)]
    }

    /// All chunks in positional order
    pub fn chunks(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.chunks.iter().map(String::as_str)
    }

    /// Chunks paired with their hex index
    pub fn indexed_chunks(&self) -> impl Iterator<Item = (u8, &str)> + '_ {
        (0..=u8::MAX).zip(self.chunks())
    }

    pub fn len(&self) -> usize {
        PARAMETER_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSet")
            .field("first", &self.chunks[0])
            .field("last", &self.chunks[PARAMETER_COUNT - 1])
            .field("len", &PARAMETER_COUNT)
            .finish()
    }
}

/// Split `raw` into its 256 chunks and validate their shape
///
/// The chunk count is checked first; after that the lowest-indexed chunk whose
/// width is not [`CHUNK_WIDTH`] is reported. Width is counted in characters.
///
/// # Errors
///
/// - [`ValidationError::WrongChunkCount`] when the split does not yield
///   exactly [`PARAMETER_COUNT`] chunks
/// - [`ValidationError::WrongChunkLength`] for the first chunk of the wrong
///   width
pub fn decode(raw: &str) -> Result<ParameterSet, ValidationError> {
    let chunks: Vec<String> = raw.split(CHUNK_SEPARATOR).map(str::to_owned).collect();

    let chunks: Box<[String; PARAMETER_COUNT]> = chunks
        .into_boxed_slice()
        .try_into()
        .map_err(|rejected: Box<[String]>| ValidationError::WrongChunkCount {
            expected: PARAMETER_COUNT,
            actual: rejected.len(),
        })?;

    if let Some((index, value)) = chunks
        .iter()
        .enumerate()
        .find(|(_, chunk)| chunk.chars().count() != CHUNK_WIDTH)
    {
        return Err(ValidationError::WrongChunkLength {
            index,
            value: value.clone(),
            expected_width: CHUNK_WIDTH,
        });
    }

    Ok(ParameterSet {
        raw: raw.to_owned(),
        chunks,
    })
}

/// Column holding the chunk at `index`: `parameter` plus two uppercase hex digits
pub fn column_name(index: u8) -> String {
    format!("parameter{index:02X}")
}
