//! Test helpers for route and command tests
//!
//! [`RecordingStore`] is an in-memory [`ParameterStore`] that keeps what a
//! real database would have committed, and counts connections, commits and
//! rollbacks so tests can assert on transaction boundaries.
//!
//! # Examples
//!
//! ```rust,ignore
//! use pdi_server::features::shared::test_helpers::*;
//!
//! let store = RecordingStore::new().failing_on_statement(2, "boom");
//! let app = test_app(&store);
//! // ... drive `app` with tower::ServiceExt::oneshot ...
//! assert_eq!(store.rollbacks(), 1);
//! assert!(store.committed().is_empty());
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use pdi_common::{ParameterRecord, UnvalidatedParameterRecord};

use crate::config::Config;
use crate::db::{ParameterStore, StoreError, StoreResult, StoreSession};

/// A write the store accepted inside a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedWrite {
    Row { id: i64, record: ParameterRecord },
    JsonCall(String),
    DataCall(UnvalidatedParameterRecord),
}

#[derive(Debug, Default)]
struct State {
    connections: usize,
    commits: usize,
    rollbacks: usize,
    statements: usize,
    next_id: i64,
    committed: Vec<RecordedWrite>,
    fail_begin: Option<String>,
    fail_statement: Option<(usize, String)>,
    fail_all_statements: Option<String>,
}

/// In-memory store recording committed writes
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    state: Arc<Mutex<State>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `begin` fails, as if the database were unreachable
    pub fn failing_begin(self, message: &str) -> Self {
        self.lock().fail_begin = Some(message.to_string());
        self
    }

    /// The `n`th statement (1-based, counted across all sessions) fails
    pub fn failing_on_statement(self, n: usize, message: &str) -> Self {
        self.lock().fail_statement = Some((n, message.to_string()));
        self
    }

    /// Every statement fails
    pub fn failing_statements(self, message: &str) -> Self {
        self.lock().fail_all_statements = Some(message.to_string());
        self
    }

    pub fn connections(&self) -> usize {
        self.lock().connections
    }

    pub fn commits(&self) -> usize {
        self.lock().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.lock().rollbacks
    }

    /// Sessions begun but neither committed nor rolled back
    pub fn open_sessions(&self) -> usize {
        let state = self.lock();
        state.connections - state.commits - state.rollbacks
    }

    pub fn committed(&self) -> Vec<RecordedWrite> {
        self.lock().committed.clone()
    }

    pub fn shared(&self) -> Arc<dyn ParameterStore> {
        Arc::new(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl ParameterStore for RecordingStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreSession>> {
        let mut state = self.lock();
        if let Some(message) = &state.fail_begin {
            return Err(StoreError::Unavailable(message.clone()));
        }
        state.connections += 1;
        drop(state);

        Ok(Box::new(RecordingSession {
            store: self.clone(),
            pending: Vec::new(),
        }))
    }
}

struct RecordingSession {
    store: RecordingStore,
    pending: Vec<RecordedWrite>,
}

impl RecordingSession {
    fn statement(&mut self) -> StoreResult<()> {
        let mut state = self.store.lock();
        state.statements += 1;

        if let Some(message) = &state.fail_all_statements {
            return Err(StoreError::Unavailable(message.clone()));
        }
        match &state.fail_statement {
            Some((n, message)) if *n == state.statements => {
                Err(StoreError::Unavailable(message.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl StoreSession for RecordingSession {
    async fn insert_parameter_row(&mut self, record: &ParameterRecord) -> StoreResult<i64> {
        self.statement()?;
        let id = {
            let mut state = self.store.lock();
            state.next_id += 1;
            state.next_id
        };
        self.pending.push(RecordedWrite::Row {
            id,
            record: record.clone(),
        });
        Ok(id)
    }

    async fn call_insert_parameter_data_json(&mut self, json_text: &str) -> StoreResult<()> {
        self.statement()?;
        self.pending.push(RecordedWrite::JsonCall(json_text.to_string()));
        Ok(())
    }

    async fn call_insert_parameter_data(
        &mut self,
        record: &UnvalidatedParameterRecord,
    ) -> StoreResult<()> {
        self.statement()?;
        self.pending.push(RecordedWrite::DataCall(record.clone()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let RecordingSession { store, pending } = *self;
        let mut state = store.lock();
        state.commits += 1;
        state.committed.extend(pending);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.store.lock().rollbacks += 1;
        Ok(())
    }
}

/// Full application router over `store` with default configuration
pub fn test_app(store: &RecordingStore) -> Router {
    crate::api::create_router(store.shared(), &Config::default())
}

/// 256 distinct four-character chunks joined by single spaces
pub fn valid_parameter_set() -> String {
    (0..=u8::MAX)
        .map(|i| format!("{i:04X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A well-formed single-insert body
pub fn parameter_body(time_stamp: &str, reader_type: i32) -> serde_json::Value {
    serde_json::json!({
        "timeStamp": time_stamp,
        "parameterSet": valid_parameter_set(),
        "validatedAt": "2024-01-15 10:31:00",
        "validBy": 7,
        "readerType": reader_type,
    })
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

pub fn post_raw(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
