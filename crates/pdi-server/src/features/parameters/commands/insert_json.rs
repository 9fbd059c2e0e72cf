//! Opaque JSON insert
//!
//! The body is handed to the `insert_parameter_data_json` database function
//! unexamined. The only field this layer looks at is `readerType`, which is
//! echoed back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::response::STATUS_SUCCESS;
use crate::db::{ParameterStore, UnitOfWork};
use crate::error::IngestError;

/// Echoed in place of `readerType` when the body has no such key
pub const READER_TYPE_NOT_PROVIDED: &str = "not provided";

/// Command carrying an arbitrary JSON object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsertJsonCommand {
    pub payload: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertJsonResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub reader_type: Value,
}

impl InsertJsonCommand {
    /// `readerType` exactly as sent, whatever its JSON type
    pub fn reader_type(&self) -> Value {
        self.payload
            .get("readerType")
            .cloned()
            .unwrap_or_else(|| Value::String(READER_TYPE_NOT_PROVIDED.to_string()))
    }
}

/// Handler for JSON inserts
///
/// A failing function call rolls the transaction back before the error is
/// returned.
#[tracing::instrument(skip(store, command), fields(keys = command.payload.len()))]
pub async fn handle(
    store: &dyn ParameterStore,
    command: InsertJsonCommand,
) -> Result<InsertJsonResponse, IngestError> {
    let json_text = serde_json::to_string(&command.payload)?;
    let reader_type = command.reader_type();

    tracing::info!(reader_type = %reader_type, "Inserting parameter data from JSON");

    let mut unit = UnitOfWork::begin(store).await?;
    let outcome = unit
        .session()
        .call_insert_parameter_data_json(&json_text)
        .await
        .map_err(IngestError::from);
    unit.finish(outcome).await?;

    Ok(InsertJsonResponse {
        status: STATUS_SUCCESS,
        message: "Data inserted from JSON",
        reader_type,
    })
}
