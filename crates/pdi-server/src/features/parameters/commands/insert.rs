//! Structured single insert
//!
//! Parses both timestamps, decodes the parameter string into its 256 chunks
//! and writes one `parameter_data` row holding the metadata, the verbatim
//! string and every chunk in its own column.
//!
//! All parsing happens before a connection is opened, so a malformed record
//! never touches the store.

use pdi_common::{decode, parse_timestamp, ParameterRecord, UnvalidatedParameterRecord};
use serde::{Deserialize, Serialize};

use crate::api::response::STATUS_SUCCESS;
use crate::db::{ParameterStore, UnitOfWork};
use crate::error::IngestError;

/// Command to insert a single reading
///
/// # Examples
///
/// ```rust,ignore
/// use pdi_server::features::parameters::commands::InsertParametersCommand;
///
/// let command = InsertParametersCommand {
///     time_stamp: "2024-01-15 10:30:00".to_string(),
///     parameter_set: vec!["0A0B"; 256].join(" "),
///     validated_at: "2024-01-15 10:31:00".to_string(),
///     valid_by: 7,
///     reader_type: 2,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertParametersCommand {
    /// When the reading was taken, `YYYY-MM-DD HH:MM:SS`
    pub time_stamp: String,

    /// 256 four-character chunks separated by single spaces
    pub parameter_set: String,

    /// When the reading was validated, `YYYY-MM-DD HH:MM:SS`
    pub validated_at: String,

    pub valid_by: i32,

    pub reader_type: i32,
}

/// Response from a structured insert
#[derive(Debug, Clone, Serialize)]
pub struct InsertParametersResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub inserted_id: i64,
    pub chunks_count: usize,
}

impl InsertParametersCommand {
    /// Parse the timestamps and decode the parameter string
    ///
    /// # Errors
    ///
    /// - Either timestamp does not match `%Y-%m-%d %H:%M:%S`
    /// - The parameter string is not 256 chunks of 4 characters
    pub fn to_record(&self) -> Result<ParameterRecord, IngestError> {
        let read_at = parse_timestamp(&self.time_stamp)?;
        let validated_at = parse_timestamp(&self.validated_at)?;
        let parameter_set = decode(&self.parameter_set)?;

        Ok(ParameterRecord {
            read_at,
            parameter_set,
            validated_at,
            valid_by: self.valid_by,
            reader_type: self.reader_type,
        })
    }

    /// Parse the timestamps only; the parameter string is passed on as-is
    pub fn to_unvalidated_record(&self) -> Result<UnvalidatedParameterRecord, IngestError> {
        Ok(UnvalidatedParameterRecord {
            read_at: parse_timestamp(&self.time_stamp)?,
            parameter_set: self.parameter_set.clone(),
            validated_at: parse_timestamp(&self.validated_at)?,
            valid_by: self.valid_by,
            reader_type: self.reader_type,
        })
    }
}

/// Handler for structured inserts
///
/// # Errors
///
/// Any parse, decode or store failure. When the failure happens after the
/// transaction was opened it is rolled back first.
#[tracing::instrument(
    skip(store, command),
    fields(reader_type = command.reader_type, valid_by = command.valid_by)
)]
pub async fn handle(
    store: &dyn ParameterStore,
    command: InsertParametersCommand,
) -> Result<InsertParametersResponse, IngestError> {
    let record = command.to_record()?;

    tracing::info!("Inserting parameter row");

    let mut unit = UnitOfWork::begin(store).await?;
    let outcome = unit
        .session()
        .insert_parameter_row(&record)
        .await
        .map_err(IngestError::from);
    let inserted_id = unit.finish(outcome).await?;

    tracing::info!(inserted_id, "Parameter row inserted");

    Ok(InsertParametersResponse {
        status: STATUS_SUCCESS,
        message: "Data inserted successfully",
        inserted_id,
        chunks_count: record.parameter_set.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{valid_parameter_set, RecordedWrite, RecordingStore};

    fn command() -> InsertParametersCommand {
        InsertParametersCommand {
            time_stamp: "2024-01-15 10:30:00".to_string(),
            parameter_set: valid_parameter_set(),
            validated_at: "2024-01-15 10:31:00".to_string(),
            valid_by: 7,
            reader_type: 2,
        }
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = serde_json::json!({
            "timeStamp": "2024-01-15 10:30:00",
            "parameterSet": "x",
            "validatedAt": "2024-01-15 10:31:00",
            "validBy": 7,
            "readerType": 2,
        });

        let command: InsertParametersCommand = serde_json::from_value(json).unwrap();
        assert_eq!(command.time_stamp, "2024-01-15 10:30:00");
        assert_eq!(command.valid_by, 7);
        assert_eq!(command.reader_type, 2);
    }

    #[test]
    fn test_deserialize_rejects_string_integers() {
        let json = serde_json::json!({
            "timeStamp": "2024-01-15 10:30:00",
            "parameterSet": "x",
            "validatedAt": "2024-01-15 10:31:00",
            "validBy": "seven",
            "readerType": 2,
        });

        assert!(serde_json::from_value::<InsertParametersCommand>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_numeric_strings() {
        let json = serde_json::json!({
            "timeStamp": "2024-01-15 10:30:00",
            "parameterSet": "x",
            "validatedAt": "2024-01-15 10:31:00",
            "validBy": "7",
            "readerType": "2",
        });

        assert!(serde_json::from_value::<InsertParametersCommand>(json).is_err());
    }

    #[test]
    fn test_to_record() {
        let record = command().to_record().unwrap();

        assert_eq!(record.read_at.to_string(), "2024-01-15 10:30:00");
        assert_eq!(record.validated_at.to_string(), "2024-01-15 10:31:00");
        assert_eq!(record.parameter_set.raw(), valid_parameter_set());
        assert_eq!(record.parameter_set.chunk(0xFF), "00FF");
    }

    #[test]
    fn test_to_record_bad_timestamp() {
        let mut cmd = command();
        cmd.validated_at = "2024/01/15 10:31:00".to_string();

        assert!(matches!(cmd.to_record(), Err(IngestError::Timestamp(_))));
    }

    #[test]
    fn test_to_unvalidated_record_skips_decode() {
        let mut cmd = command();
        cmd.parameter_set = "too short".to_string();

        let record = cmd.to_unvalidated_record().unwrap();
        assert_eq!(record.parameter_set, "too short");
        assert!(matches!(cmd.to_record(), Err(IngestError::Validation(_))));
    }

    #[tokio::test]
    async fn test_handle_commits_one_row() {
        let store = RecordingStore::new();

        let response = handle(&store, command()).await.unwrap();

        assert_eq!(response.status, "success");
        assert_eq!(response.message, "Data inserted successfully");
        assert_eq!(response.inserted_id, 1);
        assert_eq!(response.chunks_count, 256);
        assert_eq!(store.commits(), 1);
        assert_eq!(store.rollbacks(), 0);

        let committed = store.committed();
        assert_eq!(committed.len(), 1);
        match &committed[0] {
            RecordedWrite::Row { id, record } => {
                assert_eq!(*id, 1);
                assert_eq!(record.valid_by, 7);
                assert_eq!(record.reader_type, 2);
            }
            other => panic!("unexpected write: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_invalid_set_never_connects() {
        let store = RecordingStore::new();
        let mut cmd = command();
        cmd.parameter_set = vec!["ABCD"; 255].join(" ");

        let err = handle(&store, cmd).await.unwrap_err();

        assert_eq!(err.to_string(), "Expected 256 chunks, got 255");
        assert_eq!(store.connections(), 0);
        assert!(store.committed().is_empty());
    }

    #[tokio::test]
    async fn test_handle_store_failure_rolls_back() {
        let store = RecordingStore::new().failing_statements("null value in column \"read_at\"");

        let err = handle(&store, command()).await.unwrap_err();

        assert!(matches!(err, IngestError::Store(_)));
        assert_eq!(store.rollbacks(), 1);
        assert_eq!(store.commits(), 0);
        assert_eq!(store.open_sessions(), 0);
    }
}
