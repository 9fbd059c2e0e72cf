//! Feature modules implementing the PDI API
//!
//! Each feature is a vertical slice with its own commands and routes.
//!
//! # Features
//!
//! - **parameters**: the three ingestion paths for parameter readings
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations, one file per command with its handler
//! - `routes.rs` - HTTP route definitions
//! - `routes_test.rs` - Router-level tests
//!
//! Handlers are plain async functions taking the store and the command, so
//! they can be tested without going through HTTP.

pub mod parameters;
pub mod shared;

use std::sync::Arc;

use axum::Router;

use crate::db::ParameterStore;

/// Store handle shared by every feature route
pub type SharedStore = Arc<dyn ParameterStore>;

/// Creates the API router with all feature routes mounted
///
/// Mounted by the caller under `/api`.
pub fn router(store: SharedStore) -> Router<()> {
    Router::new().merge(parameters::parameters_routes().with_state(store))
}
