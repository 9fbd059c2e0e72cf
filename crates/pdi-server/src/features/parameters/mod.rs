//! Parameter ingestion
//!
//! Three ways to persist a reading, all under `/api/parameters`:
//!
//! - `POST /parameters` - decoded single-row insert
//! - `POST /parameters/json` - opaque JSON through `insert_parameter_data_json`
//! - `POST /parameters/batch` - many readings through `insert_parameter_data`

pub mod commands;
pub mod routes;


pub use commands::{
    InsertBatchCommand, InsertBatchResponse, InsertJsonCommand, InsertJsonResponse,
    InsertParametersCommand, InsertParametersResponse,
};

pub use routes::parameters_routes;
