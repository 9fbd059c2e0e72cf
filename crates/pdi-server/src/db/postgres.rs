//! PostgreSQL store
//!
//! One [`PgConnection`] per [`ParameterStore::begin`], never pooled. The
//! transaction is driven with plain `BEGIN`/`COMMIT`/`ROLLBACK` on that
//! connection so the session can own it outright.

use async_trait::async_trait;
use pdi_common::{ParameterRecord, UnvalidatedParameterRecord};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Executor, Row};

use super::{schema, ParameterStore, StoreError, StoreResult, StoreSession};

/// Store backed by a PostgreSQL database
#[derive(Debug, Clone)]
pub struct PgStore {
    options: PgConnectOptions,
}

impl PgStore {
    pub fn new(options: PgConnectOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl ParameterStore for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreSession>> {
        let mut conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(StoreError::Connect)?;

        conn.execute("BEGIN")
            .await
            .map_err(|source| StoreError::Transaction {
                action: "begin",
                source,
            })?;

        Ok(Box::new(PgSession { conn }))
    }
}

struct PgSession {
    conn: PgConnection,
}

impl PgSession {
    async fn end(mut self, action: &'static str, statement: &'static str) -> StoreResult<()> {
        self.conn
            .execute(statement)
            .await
            .map_err(|source| StoreError::Transaction { action, source })?;

        if let Err(e) = self.conn.close().await {
            tracing::warn!(error = %e, "Failed to close connection cleanly");
        }
        Ok(())
    }
}

#[async_trait]
impl StoreSession for PgSession {
    async fn insert_parameter_row(&mut self, record: &ParameterRecord) -> StoreResult<i64> {
        let mut query = sqlx::query(schema::insert_statement())
            .bind(record.read_at)
            .bind(record.parameter_set.raw())
            .bind(record.validated_at)
            .bind(record.valid_by)
            .bind(record.reader_type);

        for chunk in record.parameter_set.chunks() {
            query = query.bind(chunk);
        }

        let row = query
            .fetch_one(&mut self.conn)
            .await
            .map_err(StoreError::Statement)?;

        row.try_get::<i64, _>("id").map_err(StoreError::Statement)
    }

    async fn call_insert_parameter_data_json(&mut self, json_text: &str) -> StoreResult<()> {
        sqlx::query(&schema::insert_json_call())
            .bind(json_text)
            .execute(&mut self.conn)
            .await
            .map_err(StoreError::Statement)?;
        Ok(())
    }

    async fn call_insert_parameter_data(
        &mut self,
        record: &UnvalidatedParameterRecord,
    ) -> StoreResult<()> {
        sqlx::query(&schema::insert_call())
            .bind(record.read_at)
            .bind(record.parameter_set.as_str())
            .bind(record.validated_at)
            .bind(record.valid_by)
            .bind(record.reader_type)
            .execute(&mut self.conn)
            .await
            .map_err(StoreError::Statement)?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.end("commit", "COMMIT").await
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.end("rollback", "ROLLBACK").await
    }
}
