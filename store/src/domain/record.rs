//! Row model written by the upsert operation.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use thiserror::Error;

use super::schema::{Collection, Column, ColumnType};

/// Column that identifies a row and drives conflict detection.
pub const UNIQUE_KEY: Column = Column::UserId;

/// Largest integer magnitude a `DOUBLE PRECISION` column stores exactly.
pub const MAX_EXACT_INTEGER: i64 = 1 << 53;

/// Convert `value` to `f64`, or `None` when the conversion would round.
pub(crate) fn exact_f64(value: i64) -> Option<f64> {
    if value.unsigned_abs() > MAX_EXACT_INTEGER.unsigned_abs() {
        return None;
    }
    let high = i32::try_from(value >> 32).ok()?;
    let low = u32::try_from(value & 0xFFFF_FFFF).ok()?;
    Some(f64::from(high).mul_add(4_294_967_296.0, f64::from(low)))
}

/// Scalar value stored in a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text.
    Text(String),
    /// Floating-point number.
    Number(f64),
    /// Whole number.
    Integer(i64),
    /// SQL `NULL`.
    Null,
}

impl FieldValue {
    /// Whether the value may be bound to a column of the given type.
    ///
    /// Integers are accepted for `DOUBLE PRECISION` columns while their
    /// magnitude is at most [`MAX_EXACT_INTEGER`]; `Null` fits everywhere.
    pub fn fits(&self, column_type: ColumnType) -> bool {
        match (self, column_type) {
            (Self::Integer(value), ColumnType::Double) => exact_f64(*value).is_some(),
            _ => matches!(
                (self, column_type),
                (Self::Null, _)
                    | (Self::Text(_), ColumnType::Text)
                    | (Self::Number(_), ColumnType::Double)
                    | (Self::Integer(_), ColumnType::BigInt)
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Reasons a record cannot be written to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordValidationError {
    /// No column was supplied.
    #[error("record for {collection} has no fields")]
    EmptyRecord {
        /// Target collection.
        collection: Collection,
    },
    /// `user_id` is absent.
    #[error("record for {collection} is missing the unique key `user_id`")]
    MissingUniqueKey {
        /// Target collection.
        collection: Collection,
    },
    /// `user_id` is present but null.
    #[error("record for {collection} has a null `user_id`")]
    NullUniqueKey {
        /// Target collection.
        collection: Collection,
    },
    /// A column outside the collection was supplied.
    #[error("column `{column}` does not belong to {collection}")]
    UnknownColumn {
        /// Target collection.
        collection: Collection,
        /// Column absent from the collection.
        column: Column,
    },
    /// A value kind does not match its column type.
    #[error("value for `{column}` does not fit column type {expected}")]
    TypeMismatch {
        /// Column whose value was rejected.
        column: Column,
        /// Declared type of the column.
        expected: ColumnType,
    },
    /// Only the unique key was supplied, leaving nothing to update on conflict.
    #[error("record for {collection} has no columns to update besides `user_id`")]
    EmptyUpdateSet {
        /// Target collection.
        collection: Collection,
    },
}

/// Ordered mapping from column to value describing one row.
///
/// Setting a column that is already present replaces its value without
/// changing its position.
///
/// # Examples
///
/// ```rust
/// use taxbot_store::{Column, FieldValue, Record};
///
/// let record = Record::for_user(42)
///     .with(Column::SalaryIncome, 1_200.5)
///     .with(Column::OtherIncome, None::<f64>);
///
/// assert_eq!(record.user_id(), Some(42));
/// assert_eq!(record.get(Column::OtherIncome), Some(&FieldValue::Null));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(Column, FieldValue)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a record holding only the unique key.
    pub fn for_user(user_id: i64) -> Self {
        Self::new().with(UNIQUE_KEY, user_id)
    }

    /// Builder form of [`Record::set`].
    #[must_use]
    pub fn with(mut self, column: Column, value: impl Into<FieldValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Insert or replace the value of `column`.
    pub fn set(&mut self, column: Column, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Value of `column`, if the record sets it.
    pub fn get(&self, column: Column) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| *existing == column)
            .map(|(_, value)| value)
    }

    /// Value of the unique key when it is a non-null integer.
    pub fn user_id(&self) -> Option<i64> {
        match self.get(UNIQUE_KEY) {
            Some(FieldValue::Integer(id)) => Some(*id),
            _ => None,
        }
    }

    /// Columns and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, &FieldValue)> {
        self.fields.iter().map(|(column, value)| (*column, value))
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.fields.iter().map(|(column, _)| *column)
    }

    /// Number of columns set.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no column is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check the record can be upserted into `collection`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecordValidationError`] found.
    pub fn validate_for(&self, collection: Collection) -> Result<(), RecordValidationError> {
        if self.is_empty() {
            return Err(RecordValidationError::EmptyRecord { collection });
        }

        for (column, value) in self.iter() {
            if !collection.has_column(column) {
                return Err(RecordValidationError::UnknownColumn { collection, column });
            }
            let expected = column.column_type();
            if !value.fits(expected) {
                return Err(RecordValidationError::TypeMismatch { column, expected });
            }
        }

        match self.get(UNIQUE_KEY) {
            None => return Err(RecordValidationError::MissingUniqueKey { collection }),
            Some(FieldValue::Null) => {
                return Err(RecordValidationError::NullUniqueKey { collection });
            }
            Some(_) => {}
        }

        if self.columns().all(|column| column == UNIQUE_KEY) {
            return Err(RecordValidationError::EmptyUpdateSet { collection });
        }

        Ok(())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column.name(), value)?;
        }
        map.end()
    }
}
