//! PDI Server Library
//!
//! HTTP service that ingests parameter readings into PostgreSQL.
//!
//! # Overview
//!
//! A reading is a pair of timestamps, two integer codes and a parameter
//! string of 256 four-character chunks. The server persists readings three
//! ways:
//!
//! - **Structured insert**: the string is decoded and every chunk lands in its
//!   own `parameterXX` column next to the verbatim string
//! - **JSON insert**: an arbitrary object is handed to a database function
//! - **Batch insert**: many readings go through a database function in one
//!   transaction
//!
//! # Architecture
//!
//! - **features**: one vertical slice per API area, commands plus routes
//! - **db**: the [`db::ParameterStore`] seam and its PostgreSQL implementation
//! - **config**: environment-driven [`config::Config`], built once at startup
//! - **middleware**: CORS and request tracing
//!
//! Every request opens its own connection and runs one transaction on it;
//! nothing is pooled or shared between requests.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pdi_server::{api, config::Config, db::PgStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let store = PgStore::new(config.database.connect_options()?);
//!     api::serve(config, Arc::new(store)).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use error::{AppError, IngestError};
