//! Batch insert
//!
//! Every entry goes through the `insert_parameter_data` database function
//! inside one shared transaction. Entries only have their timestamps parsed;
//! the parameter string is handed to the function without decoding. The
//! first failing entry aborts the whole batch.

use serde::{Deserialize, Serialize};

use super::insert::InsertParametersCommand;
use crate::api::response::STATUS_SUCCESS;
use crate::db::{ParameterStore, StoreSession, UnitOfWork};
use crate::error::IngestError;

/// Command carrying a JSON array of single-insert bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsertBatchCommand {
    pub entries: Vec<InsertParametersCommand>,
}

/// Per-entry echo
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntryResult {
    pub timestamp: String,
    pub reader_type: i32,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertBatchResponse {
    pub status: &'static str,
    pub message: String,
    pub results: Vec<BatchEntryResult>,
}

/// Handler for batch inserts
#[tracing::instrument(skip(store, command), fields(entries = command.entries.len()))]
pub async fn handle(
    store: &dyn ParameterStore,
    command: InsertBatchCommand,
) -> Result<InsertBatchResponse, IngestError> {
    tracing::info!("Inserting parameter batch");

    let mut unit = UnitOfWork::begin(store).await?;
    let outcome = insert_entries(unit.session(), &command.entries).await;
    let results = unit.finish(outcome).await?;

    tracing::info!(inserted = results.len(), "Parameter batch committed");

    Ok(InsertBatchResponse {
        status: STATUS_SUCCESS,
        message: format!("Inserted {} records", results.len()),
        results,
    })
}

async fn insert_entries(
    session: &mut dyn StoreSession,
    entries: &[InsertParametersCommand],
) -> Result<Vec<BatchEntryResult>, IngestError> {
    let mut results = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let record = entry.to_unvalidated_record().inspect_err(|e| {
            tracing::debug!(index, error = %e, "Batch entry rejected");
        })?;

        session.call_insert_parameter_data(&record).await?;

        results.push(BatchEntryResult {
            timestamp: entry.time_stamp.clone(),
            reader_type: entry.reader_type,
            status: "inserted",
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{valid_parameter_set, RecordedWrite, RecordingStore};

    fn entry(time_stamp: &str, reader_type: i32) -> InsertParametersCommand {
        InsertParametersCommand {
            time_stamp: time_stamp.to_string(),
            parameter_set: valid_parameter_set(),
            validated_at: "2024-01-15 10:31:00".to_string(),
            valid_by: 7,
            reader_type,
        }
    }

    fn batch(entries: Vec<InsertParametersCommand>) -> InsertBatchCommand {
        InsertBatchCommand { entries }
    }

    #[tokio::test]
    async fn test_three_entries_one_commit() {
        let store = RecordingStore::new();
        let command = batch(vec![
            entry("2024-01-15 10:30:00", 1),
            entry("2024-01-15 10:30:01", 2),
            entry("2024-01-15 10:30:02", 3),
        ]);

        let response = handle(&store, command).await.unwrap();

        assert_eq!(response.message, "Inserted 3 records");
        assert_eq!(response.results.len(), 3);
        assert!(response.results.iter().all(|r| r.status == "inserted"));
        assert_eq!(response.results[1].timestamp, "2024-01-15 10:30:01");
        assert_eq!(response.results[2].reader_type, 3);

        assert_eq!(store.connections(), 1);
        assert_eq!(store.commits(), 1);
        assert_eq!(store.committed().len(), 3);
    }

    #[tokio::test]
    async fn test_bad_timestamp_rolls_back_whole_batch() {
        let store = RecordingStore::new();
        let command = batch(vec![
            entry("2024-01-15 10:30:00", 1),
            entry("yesterday", 2),
            entry("2024-01-15 10:30:02", 3),
        ]);

        let err = handle(&store, command).await.unwrap_err();

        assert!(matches!(err, IngestError::Timestamp(_)));
        assert_eq!(err.to_string(), "time data 'yesterday' does not match format '%Y-%m-%d %H:%M:%S'");
        assert_eq!(store.rollbacks(), 1);
        assert_eq!(store.commits(), 0);
        assert!(store.committed().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_mid_batch_rolls_back() {
        let store = RecordingStore::new().failing_on_statement(2, "check constraint violated");
        let command = batch(vec![
            entry("2024-01-15 10:30:00", 1),
            entry("2024-01-15 10:30:01", 2),
        ]);

        let err = handle(&store, command).await.unwrap_err();

        assert_eq!(err.to_string(), "check constraint violated");
        assert_eq!(store.rollbacks(), 1);
        assert!(store.committed().is_empty());
    }

    #[tokio::test]
    async fn test_parameter_set_passed_through_undecoded() {
        let store = RecordingStore::new();
        let mut odd = entry("2024-01-15 10:30:00", 1);
        odd.parameter_set = "AB CDE".to_string();

        handle(&store, batch(vec![odd])).await.unwrap();

        match store.committed().as_slice() {
            [RecordedWrite::DataCall(record)] => assert_eq!(record.parameter_set, "AB CDE"),
            other => panic!("unexpected writes: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_commits_nothing() {
        let store = RecordingStore::new();

        let response = handle(&store, batch(Vec::new())).await.unwrap();

        assert_eq!(response.message, "Inserted 0 records");
        assert!(response.results.is_empty());
        assert_eq!(store.commits(), 1);
        assert!(store.committed().is_empty());
    }
}
