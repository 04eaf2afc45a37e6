//! Upsert and fetch entry points used by the dialogue layer.
//!
//! Store failures stop here: they are logged with their detail and reported
//! to the caller as `false` or `None`. Callers never see raw store errors.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::ports::RecordRepository;
use crate::domain::record::Record;
use crate::domain::schema::Collection;

/// Record service wrapping a [`RecordRepository`].
#[derive(Clone)]
pub struct RecordService<R> {
    repository: Arc<R>,
}

impl<R> RecordService<R> {
    /// Create a service backed by `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: RecordRepository> RecordService<R> {
    /// Insert `record` into `collection`, or update the row that already
    /// holds its `user_id`.
    ///
    /// Returns `true` once the write is committed. Rejected records and store
    /// failures are logged at error level and yield `false`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    ///
    /// use taxbot_store::domain::ports::FixtureRecordRepository;
    /// use taxbot_store::{Collection, Column, Record, RecordService};
    ///
    /// let service = RecordService::new(Arc::new(FixtureRecordRepository::new()));
    /// let record = Record::for_user(42).with(Column::ZakatPaid, 2_500.0);
    ///
    /// assert!(service.upsert(Collection::Deductions, &record));
    /// assert!(!service.upsert(Collection::Deductions, &Record::for_user(42)));
    /// ```
    pub fn upsert(&self, collection: Collection, record: &Record) -> bool {
        let contents =
            serde_json::to_string(record).unwrap_or_else(|_| format!("{record:?}"));
        info!(collection = %collection, record = %contents, "upserting record");

        match self.repository.upsert(collection, record) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    collection = %collection,
                    user_id = ?record.user_id(),
                    error = %err,
                    "record upsert failed"
                );
                false
            }
        }
    }

    /// Read back the row holding `user_id`.
    ///
    /// Returns `None` when no row exists or the store could not be queried;
    /// the latter is logged.
    pub fn fetch(&self, collection: Collection, user_id: i64) -> Option<Record> {
        self.repository
            .find(collection, user_id)
            .unwrap_or_else(|err| {
                error!(
                    collection = %collection,
                    user_id,
                    error = %err,
                    "record fetch failed"
                );
                None
            })
    }
}

#[cfg(test)]
#[path = "record_service_tests.rs"]
mod tests;
