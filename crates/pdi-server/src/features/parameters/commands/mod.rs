pub mod insert;
pub mod insert_batch;
pub mod insert_json;

pub use insert::{InsertParametersCommand, InsertParametersResponse};
pub use insert_batch::{BatchEntryResult, InsertBatchCommand, InsertBatchResponse};
pub use insert_json::{InsertJsonCommand, InsertJsonResponse, READER_TYPE_NOT_PROVIDED};
