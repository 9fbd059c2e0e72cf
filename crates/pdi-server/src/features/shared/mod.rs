//! Shared utilities for feature modules
//!
//! - **test_helpers**: in-memory store and request builders (test-only)

#[cfg(test)]
pub mod test_helpers;
