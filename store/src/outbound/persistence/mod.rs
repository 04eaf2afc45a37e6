//! PostgreSQL persistence adapters using the synchronous `postgres` client.
//!
//! # Architecture
//!
//! - **One connection per call**: [`PostgresConnector`] opens a fresh
//!   session for every operation and the session is dropped, and therefore
//!   closed, before the operation returns. There is no pooling.
//! - **Allowlisted identifiers**: [`UpsertStatement`] renders table and
//!   column names only from the domain schema enums; values are always
//!   bound as parameters.
//! - **Strongly typed errors**: `postgres::Error` is mapped to
//!   [`RecordPersistenceError`](crate::domain::ports::RecordPersistenceError)
//!   variants.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use taxbot_store::{
//!     Collection, Column, DatabaseSettings, PostgresConnector, PostgresRecordRepository, Record,
//!     RecordService,
//! };
//!
//! let settings = DatabaseSettings::default();
//! let repository = PostgresRecordRepository::new(PostgresConnector::new(&settings));
//! let service = RecordService::new(Arc::new(repository));
//!
//! let record = Record::for_user(42).with(Column::FullName, "Ayesha Khan");
//! let saved = service.upsert(Collection::Users, &record);
//! # let _ = saved;
//! ```

mod connection;
mod error_mapping;
mod postgres_record_repository;
mod upsert_statement;

pub use connection::{ConnectionError, PostgresConnector};
pub use postgres_record_repository::PostgresRecordRepository;
pub use upsert_statement::{BoundValue, UpsertStatement};
