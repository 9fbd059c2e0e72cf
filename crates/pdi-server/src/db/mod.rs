//! Store access
//!
//! Every ingestion request opens its own connection, runs exactly one
//! transaction on it and closes it again. There is no pool and nothing is
//! shared between requests.
//!
//! [`ParameterStore`] hands out [`StoreSession`]s (connection + open
//! transaction). Handlers never drive a session directly to completion;
//! they wrap it in a [`UnitOfWork`], whose [`UnitOfWork::finish`] commits on
//! success and rolls back on failure. A unit of work dropped without being
//! finished releases its connection, which aborts the transaction on the
//! server.

pub mod postgres;
pub mod schema;

use async_trait::async_trait;
use pdi_common::{ParameterRecord, UnvalidatedParameterRecord};
use thiserror::Error;

pub use postgres::PgStore;

/// Store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not open a connection
    #[error("could not connect to the database: {0}")]
    Connect(#[source] sqlx::Error),

    /// A statement or function call failed
    #[error("{0}")]
    Statement(#[source] sqlx::Error),

    /// BEGIN, COMMIT or ROLLBACK failed
    #[error("transaction {action} failed: {source}")]
    Transaction {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The store refused the operation for a reason of its own
    #[error("{0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Opens store sessions
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Acquire a fresh connection and begin a transaction on it
    async fn begin(&self) -> StoreResult<Box<dyn StoreSession>>;
}

/// One connection with one open transaction
#[async_trait]
pub trait StoreSession: Send {
    /// Insert a decoded record into `parameter_data`, returning the generated id
    async fn insert_parameter_row(&mut self, record: &ParameterRecord) -> StoreResult<i64>;

    /// Call `insert_parameter_data_json` with a serialized JSON object
    async fn call_insert_parameter_data_json(&mut self, json_text: &str) -> StoreResult<()>;

    /// Call `insert_parameter_data` with an undecoded record
    async fn call_insert_parameter_data(
        &mut self,
        record: &UnvalidatedParameterRecord,
    ) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// Scoped connection + transaction with guaranteed release
pub struct UnitOfWork {
    session: Box<dyn StoreSession>,
}

impl UnitOfWork {
    pub async fn begin(store: &dyn ParameterStore) -> StoreResult<Self> {
        let session = store.begin().await?;
        tracing::debug!("Store session opened");
        Ok(Self { session })
    }

    pub fn session(&mut self) -> &mut dyn StoreSession {
        self.session.as_mut()
    }

    /// Roll back unconditionally
    pub async fn rollback(self) -> StoreResult<()> {
        self.session.rollback().await
    }

    /// Commit if `outcome` is `Ok`, roll back otherwise
    ///
    /// The original error is returned after a rollback; a failing rollback is
    /// logged but does not mask it. A failing commit becomes the error.
    pub async fn finish<T, E>(self, outcome: Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError> + std::fmt::Display,
    {
        match outcome {
            Ok(value) => {
                self.session.commit().await?;
                tracing::debug!("Store session committed");
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Rolling back store session");
                if let Err(rollback_err) = self.session.rollback().await {
                    tracing::error!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }
}
