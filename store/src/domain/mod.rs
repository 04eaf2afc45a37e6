//! Domain primitives and services.
//!
//! Purpose: define the schema allowlist, the record shape written to the
//! store, and the user-input rules for amounts. Nothing here performs I/O
//! except through the ports in [`ports`].
//!
//! Public surface:
//! - Collection / Column — the only identifiers ever placed in SQL text.
//! - Record / FieldValue — one row to be written.
//! - RecordService — upsert and fetch, reporting success as plain values.
//! - validate_numeric / validate_amount — amount parsing for user replies.

pub mod amount;
pub mod ports;
pub mod record;
pub mod record_service;
pub mod schema;

pub use self::amount::{
    AmountValidationError, DEFAULT_AMOUNT_FIELD, validate_amount, validate_numeric,
};
pub use self::record::{FieldValue, Record, RecordValidationError, UNIQUE_KEY};
pub use self::record_service::RecordService;
pub use self::schema::{Collection, Column, ColumnType};
