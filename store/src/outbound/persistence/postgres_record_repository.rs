//! PostgreSQL-backed implementation of the record repository port.
//!
//! Each call opens its own session through [`PostgresConnector`]. The
//! session is owned by the call and dropped before it returns, on success and
//! on every error path; an uncommitted transaction is rolled back when it is
//! dropped.

use postgres::Row;
use tracing::debug;

use super::connection::PostgresConnector;
use super::error_mapping::map_postgres_error;
use super::upsert_statement::UpsertStatement;
use crate::domain::ports::{RecordPersistenceError, RecordRepository};
use crate::domain::{Collection, ColumnType, FieldValue, Record, UNIQUE_KEY};

/// Record repository writing through short-lived PostgreSQL sessions.
#[derive(Debug, Clone)]
pub struct PostgresRecordRepository {
    connector: PostgresConnector,
}

impl PostgresRecordRepository {
    /// Create a repository that opens sessions with `connector`.
    pub fn new(connector: PostgresConnector) -> Self {
        Self { connector }
    }

    fn open(&self) -> Result<postgres::Client, RecordPersistenceError> {
        self.connector
            .acquire()
            .ok_or_else(|| RecordPersistenceError::connection("database connection unavailable"))
    }
}

impl RecordRepository for PostgresRecordRepository {
    fn upsert(&self, collection: Collection, record: &Record) -> Result<(), RecordPersistenceError> {
        let statement = UpsertStatement::build(collection, record)?;

        let mut client = self.open()?;
        let mut transaction = client
            .transaction()
            .map_err(|err| map_postgres_error(&err))?;
        let affected = transaction
            .execute(statement.sql(), &statement.params())
            .map_err(|err| map_postgres_error(&err))?;
        transaction
            .commit()
            .map_err(|err| map_postgres_error(&err))?;

        debug!(collection = %collection, affected, "record upsert committed");
        Ok(())
    }

    fn find(
        &self,
        collection: Collection,
        user_id: i64,
    ) -> Result<Option<Record>, RecordPersistenceError> {
        let names: Vec<&str> = collection.columns().iter().map(|c| c.name()).collect();
        let sql = format!(
            "SELECT {names} FROM {table} WHERE {key} = $1",
            names = names.join(", "),
            table = collection.table_name(),
            key = UNIQUE_KEY.name(),
        );

        let mut client = self.open()?;
        let row = client
            .query_opt(sql.as_str(), &[&user_id])
            .map_err(|err| map_postgres_error(&err))?;

        row.map(|row| decode_row(collection, &row)).transpose()
    }
}

fn decode_row(collection: Collection, row: &Row) -> Result<Record, RecordPersistenceError> {
    let mut record = Record::new();
    for (index, column) in collection.columns().iter().enumerate() {
        let value = match column.column_type() {
            ColumnType::BigInt => row.try_get::<_, Option<i64>>(index).map(FieldValue::from),
            ColumnType::Double => row.try_get::<_, Option<f64>>(index).map(FieldValue::from),
            ColumnType::Text => row
                .try_get::<_, Option<String>>(index)
                .map(FieldValue::from),
        }
        .map_err(|err| map_postgres_error(&err))?;
        record.set(*column, value);
    }
    Ok(record)
}
