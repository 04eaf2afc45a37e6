//! Construction of `INSERT .. ON CONFLICT .. DO UPDATE` statements.

use postgres::types::ToSql;

use crate::domain::record::exact_f64;
use crate::domain::{
    Collection, Column, ColumnType, FieldValue, Record, RecordValidationError, UNIQUE_KEY,
};

/// A value converted to the Rust type matching its column.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// Bound to a `BIGINT` column.
    BigInt(Option<i64>),
    /// Bound to a `DOUBLE PRECISION` column.
    Double(Option<f64>),
    /// Bound to a `TEXT` column.
    Text(Option<String>),
}

impl BoundValue {
    /// Convert `value` for binding to `column`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordValidationError::TypeMismatch`] when the value kind
    /// does not fit the column type.
    pub fn for_column(column: Column, value: &FieldValue) -> Result<Self, RecordValidationError> {
        let expected = column.column_type();
        let bound = match (expected, value) {
            (ColumnType::BigInt, FieldValue::Integer(v)) => Self::BigInt(Some(*v)),
            (ColumnType::BigInt, FieldValue::Null) => Self::BigInt(None),
            (ColumnType::Double, FieldValue::Number(v)) => Self::Double(Some(*v)),
            (ColumnType::Double, FieldValue::Integer(v)) => {
                let exact = exact_f64(*v).ok_or(RecordValidationError::TypeMismatch {
                    column,
                    expected,
                })?;
                Self::Double(Some(exact))
            }
            (ColumnType::Double, FieldValue::Null) => Self::Double(None),
            (ColumnType::Text, FieldValue::Text(v)) => Self::Text(Some(v.clone())),
            (ColumnType::Text, FieldValue::Null) => Self::Text(None),
            _ => return Err(RecordValidationError::TypeMismatch { column, expected }),
        };
        Ok(bound)
    }

    /// Borrow the value as a query parameter; `None` binds `NULL`.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        match self {
            Self::BigInt(v) => v,
            Self::Double(v) => v,
            Self::Text(v) => v,
        }
    }
}

/// An upsert ready to execute: SQL text plus positional parameters.
///
/// Identifiers in the SQL text come from [`Collection`] and [`Column`];
/// record values only ever appear in [`UpsertStatement::params`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertStatement {
    collection: Collection,
    sql: String,
    values: Vec<BoundValue>,
}

impl UpsertStatement {
    /// Build the statement writing `record` into `collection`.
    ///
    /// On conflict every supplied column except `user_id` is set to the
    /// incoming value.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordValidationError`] when the record cannot be written
    /// to the collection, including when it holds nothing but `user_id`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use taxbot_store::outbound::persistence::UpsertStatement;
    /// use taxbot_store::{Collection, Column, Record};
    ///
    /// let record = Record::for_user(7).with(Column::ZakatPaid, 2_500.0);
    /// let statement = UpsertStatement::build(Collection::Deductions, &record)?;
    /// assert_eq!(
    ///     statement.sql(),
    ///     "INSERT INTO deductions (user_id, zakat_paid) VALUES ($1, $2) \
    ///      ON CONFLICT (user_id) DO UPDATE SET zakat_paid = EXCLUDED.zakat_paid"
    /// );
    /// # Ok::<(), taxbot_store::domain::RecordValidationError>(())
    /// ```
    pub fn build(collection: Collection, record: &Record) -> Result<Self, RecordValidationError> {
        record.validate_for(collection)?;

        let mut names = Vec::with_capacity(record.len());
        let mut placeholders = Vec::with_capacity(record.len());
        let mut assignments = Vec::with_capacity(record.len());
        let mut values = Vec::with_capacity(record.len());

        for (position, (column, value)) in record.iter().enumerate() {
            names.push(column.name());
            placeholders.push(format!("${}", position + 1));
            if column != UNIQUE_KEY {
                assignments.push(format!("{0} = EXCLUDED.{0}", column.name()));
            }
            values.push(BoundValue::for_column(column, value)?);
        }

        let sql = format!(
            "INSERT INTO {table} ({names}) VALUES ({placeholders}) \
             ON CONFLICT ({key}) DO UPDATE SET {assignments}",
            table = collection.table_name(),
            names = names.join(", "),
            placeholders = placeholders.join(", "),
            key = UNIQUE_KEY.name(),
            assignments = assignments.join(", "),
        );

        Ok(Self {
            collection,
            sql,
            values,
        })
    }

    /// Target collection.
    pub const fn collection(&self) -> Collection {
        self.collection
    }

    /// Rendered SQL text with `$n` placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound values in placeholder order.
    pub fn values(&self) -> &[BoundValue] {
        &self.values
    }

    /// Parameters in placeholder order, ready for `Client::execute`.
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(BoundValue::as_sql).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for statement construction.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn renders_insert_with_conflict_update() {
        let record = Record::for_user(11)
            .with(Column::FullName, "Ayesha Khan")
            .with(Column::Cnic, "42101-7654321-2")
            .with(Column::Email, None::<String>);

        let statement = UpsertStatement::build(Collection::Users, &record).expect("valid record");

        assert_eq!(
            statement.sql(),
            "INSERT INTO users (user_id, full_name, cnic, email) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET full_name = EXCLUDED.full_name, \
             cnic = EXCLUDED.cnic, email = EXCLUDED.email"
        );
        assert_eq!(
            statement.values(),
            &[
                BoundValue::BigInt(Some(11)),
                BoundValue::Text(Some("Ayesha Khan".to_owned())),
                BoundValue::Text(Some("42101-7654321-2".to_owned())),
                BoundValue::Text(None),
            ]
        );
        assert_eq!(statement.params().len(), 4);
        assert_eq!(statement.collection(), Collection::Users);
    }

    #[rstest]
    fn key_column_is_never_in_the_update_set() {
        let record = Record::new()
            .with(Column::WithholdingTax, 5_000.0)
            .with(Column::UserId, 3_i64);

        let statement =
            UpsertStatement::build(Collection::TaxPayments, &record).expect("valid record");

        let (_, update_set) = statement
            .sql()
            .split_once("DO UPDATE SET ")
            .expect("update clause present");
        assert_eq!(update_set, "withholding_tax = EXCLUDED.withholding_tax");
        assert!(statement.sql().contains("(withholding_tax, user_id) VALUES ($1, $2)"));
    }

    #[rstest]
    fn values_never_appear_in_sql_text() {
        let hostile = "x'); DROP TABLE users; --";
        let record = Record::for_user(1).with(Column::FullName, hostile);

        let statement = UpsertStatement::build(Collection::Users, &record).expect("valid record");

        assert!(!statement.sql().contains(hostile));
        assert_eq!(
            statement.values().get(1),
            Some(&BoundValue::Text(Some(hostile.to_owned())))
        );
    }

    #[rstest]
    fn integers_are_widened_for_double_columns() {
        let record = Record::for_user(4).with(Column::ZakatPaid, 2_500_i64);
        let statement = UpsertStatement::build(Collection::Deductions, &record).expect("valid");
        assert_eq!(statement.values().get(1), Some(&BoundValue::Double(Some(2_500.0))));
    }

    #[rstest]
    fn integers_beyond_exact_double_range_are_rejected() {
        let too_large = crate::domain::record::MAX_EXACT_INTEGER + 1;
        assert_eq!(
            BoundValue::for_column(Column::ZakatPaid, &FieldValue::Integer(too_large)),
            Err(RecordValidationError::TypeMismatch {
                column: Column::ZakatPaid,
                expected: ColumnType::Double,
            })
        );
        let record = Record::for_user(4).with(Column::ZakatPaid, too_large);
        assert!(UpsertStatement::build(Collection::Deductions, &record).is_err());
    }

    #[rstest]
    #[case(Record::for_user(1), RecordValidationError::EmptyUpdateSet { collection: Collection::Users })]
    #[case(
        Record::new().with(Column::FullName, "No Key"),
        RecordValidationError::MissingUniqueKey { collection: Collection::Users }
    )]
    #[case(Record::new(), RecordValidationError::EmptyRecord { collection: Collection::Users })]
    fn rejects_invalid_records(#[case] record: Record, #[case] expected: RecordValidationError) {
        assert_eq!(UpsertStatement::build(Collection::Users, &record), Err(expected));
    }

    #[rstest]
    #[case(Column::UserId, FieldValue::Number(1.0))]
    #[case(Column::FullName, FieldValue::Integer(1))]
    #[case(Column::SalaryIncome, FieldValue::Text("1".to_owned()))]
    fn for_column_rejects_mismatched_kinds(#[case] column: Column, #[case] value: FieldValue) {
        assert_eq!(
            BoundValue::for_column(column, &value),
            Err(RecordValidationError::TypeMismatch {
                column,
                expected: column.column_type(),
            })
        );
    }
}
