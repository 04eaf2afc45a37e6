//! Persistence and input-validation helpers for the tax data-collection bot.
//!
//! The crate exposes three operations to the dialogue layer:
//!
//! - [`outbound::persistence::PostgresConnector::acquire`] opens one
//!   PostgreSQL session from fixed settings.
//! - [`domain::RecordService::upsert`] inserts or updates a row keyed by
//!   `user_id`.
//! - [`domain::validate_numeric`] turns a typed amount such as
//!   `"Rs 1,200.50"` into a non-negative `f64` or a message for the user.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

pub use config::DatabaseSettings;
pub use domain::{
    AmountValidationError, Collection, Column, FieldValue, Record, RecordService,
    validate_amount, validate_numeric,
};
pub use outbound::persistence::{PostgresConnector, PostgresRecordRepository};
