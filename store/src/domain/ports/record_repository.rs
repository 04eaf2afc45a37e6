//! Port abstraction for record persistence adapters and their errors.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::domain::record::{FieldValue, Record, RecordValidationError, UNIQUE_KEY};
use crate::domain::schema::Collection;

/// Persistence errors raised by record repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordPersistenceError {
    /// Repository connection could not be established.
    #[error("record repository connection failed: {message}")]
    Connection {
        /// Detail reported by the driver.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("record repository query failed: {message}")]
    Query {
        /// Detail reported by the driver.
        message: String,
    },
    /// The record was rejected before the store was contacted.
    #[error("record rejected: {0}")]
    InvalidRecord(#[from] RecordValidationError),
}

impl RecordPersistenceError {
    /// Build a [`Self::Connection`] error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`Self::Query`] error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for writing and reading rows keyed by `user_id`.
#[cfg_attr(test, mockall::automock)]
pub trait RecordRepository: Send + Sync {
    /// Insert the record, or update every supplied non-key column of the row
    /// that already holds the same `user_id`.
    fn upsert(&self, collection: Collection, record: &Record) -> Result<(), RecordPersistenceError>;

    /// Fetch the row holding `user_id`, with every column of the collection.
    fn find(
        &self,
        collection: Collection,
        user_id: i64,
    ) -> Result<Option<Record>, RecordPersistenceError>;
}

/// In-memory implementation with the same conflict semantics as the
/// PostgreSQL adapter. Columns never written read back as `Null`.
#[derive(Debug, Default)]
pub struct FixtureRecordRepository {
    rows: Mutex<HashMap<(Collection, i64), Record>>,
}

impl FixtureRecordRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(Collection, i64), Record>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordRepository for FixtureRecordRepository {
    fn upsert(
        &self,
        collection: Collection,
        record: &Record,
    ) -> Result<(), RecordPersistenceError> {
        record.validate_for(collection)?;
        let user_id = record
            .user_id()
            .ok_or(RecordValidationError::NullUniqueKey { collection })?;

        let mut rows = self.lock();
        let row = rows.entry((collection, user_id)).or_insert_with(|| {
            collection
                .columns()
                .iter()
                .fold(Record::for_user(user_id), |row, column| {
                    if *column == UNIQUE_KEY {
                        row
                    } else {
                        row.with(*column, FieldValue::Null)
                    }
                })
        });
        for (column, value) in record.iter().filter(|(column, _)| *column != UNIQUE_KEY) {
            row.set(column, value.clone());
        }
        Ok(())
    }

    fn find(
        &self,
        collection: Collection,
        user_id: i64,
    ) -> Result<Option<Record>, RecordPersistenceError> {
        Ok(self.lock().get(&(collection, user_id)).cloned())
    }
}
