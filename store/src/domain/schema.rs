//! Allowlist of tables and columns the bot may write.
//!
//! Table and column names are interpolated into SQL text, so they must never
//! come from user input. Every identifier the persistence layer renders is
//! taken from the enums in this module.

use std::fmt;

use serde::Serialize;

/// SQL type of a column, used to bind values with the matching Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// `BIGINT`, bound as `i64`.
    BigInt,
    /// `DOUBLE PRECISION`, bound as `f64`.
    Double,
    /// `TEXT`, bound as `String`.
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BigInt => "bigint",
            Self::Double => "double precision",
            Self::Text => "text",
        })
    }
}

/// Known column identifiers across all collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Chat user identifier; the unique key of every table.
    UserId,
    // users
    /// Name as printed on the CNIC.
    FullName,
    /// Computerised national identity card number.
    Cnic,
    /// Contact phone number.
    Phone,
    /// Contact email address.
    Email,
    /// Whether the user is on the active taxpayers list.
    FilerStatus,
    // income_details
    /// Salary income.
    SalaryIncome,
    /// Business income.
    BusinessIncome,
    /// Rental income.
    RentalIncome,
    /// Capital gains.
    CapitalGains,
    /// Foreign remittances and income.
    ForeignIncome,
    /// Other income.
    OtherIncome,
    // deductions
    /// Zakat paid.
    ZakatPaid,
    /// Donations to approved charities.
    CharitableDonations,
    /// Voluntary pension contributions.
    PensionContributions,
    /// Health insurance premiums.
    HealthInsurance,
    /// Education expenses.
    EducationExpenses,
    // tax_payments
    /// Tax year the payments belong to.
    TaxYear,
    /// Tax withheld at source.
    WithholdingTax,
    /// Advance tax paid.
    AdvanceTaxPaid,
}

impl Column {
    /// Column name as it appears in the database.
    pub const fn name(self) -> &'static str {
        match self {
            Self::UserId => "user_id",
            Self::FullName => "full_name",
            Self::Cnic => "cnic",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::FilerStatus => "filer_status",
            Self::SalaryIncome => "salary_income",
            Self::BusinessIncome => "business_income",
            Self::RentalIncome => "rental_income",
            Self::CapitalGains => "capital_gains",
            Self::ForeignIncome => "foreign_income",
            Self::OtherIncome => "other_income",
            Self::ZakatPaid => "zakat_paid",
            Self::CharitableDonations => "charitable_donations",
            Self::PensionContributions => "pension_contributions",
            Self::HealthInsurance => "health_insurance",
            Self::EducationExpenses => "education_expenses",
            Self::TaxYear => "tax_year",
            Self::WithholdingTax => "withholding_tax",
            Self::AdvanceTaxPaid => "advance_tax_paid",
        }
    }

    /// Declared SQL type of the column.
    pub const fn column_type(self) -> ColumnType {
        match self {
            Self::UserId => ColumnType::BigInt,
            Self::FullName
            | Self::Cnic
            | Self::Phone
            | Self::Email
            | Self::FilerStatus
            | Self::TaxYear => ColumnType::Text,
            Self::SalaryIncome
            | Self::BusinessIncome
            | Self::RentalIncome
            | Self::CapitalGains
            | Self::ForeignIncome
            | Self::OtherIncome
            | Self::ZakatPaid
            | Self::CharitableDonations
            | Self::PensionContributions
            | Self::HealthInsurance
            | Self::EducationExpenses
            | Self::WithholdingTax
            | Self::AdvanceTaxPaid => ColumnType::Double,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tables the bot collects answers into. Each is keyed by `user_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Identity and contact details.
    Users,
    /// Income by source.
    IncomeDetails,
    /// Deductible spending and contributions.
    Deductions,
    /// Tax already withheld or paid in advance.
    TaxPayments,
}

impl Collection {
    /// Every known collection.
    pub const ALL: [Self; 4] = [
        Self::Users,
        Self::IncomeDetails,
        Self::Deductions,
        Self::TaxPayments,
    ];

    /// Table name as it appears in the database.
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::IncomeDetails => "income_details",
            Self::Deductions => "deductions",
            Self::TaxPayments => "tax_payments",
        }
    }

    /// Columns of the table in declaration order, unique key first.
    pub const fn columns(self) -> &'static [Column] {
        match self {
            Self::Users => &[
                Column::UserId,
                Column::FullName,
                Column::Cnic,
                Column::Phone,
                Column::Email,
                Column::FilerStatus,
            ],
            Self::IncomeDetails => &[
                Column::UserId,
                Column::SalaryIncome,
                Column::BusinessIncome,
                Column::RentalIncome,
                Column::CapitalGains,
                Column::ForeignIncome,
                Column::OtherIncome,
            ],
            Self::Deductions => &[
                Column::UserId,
                Column::ZakatPaid,
                Column::CharitableDonations,
                Column::PensionContributions,
                Column::HealthInsurance,
                Column::EducationExpenses,
            ],
            Self::TaxPayments => &[
                Column::UserId,
                Column::TaxYear,
                Column::WithholdingTax,
                Column::AdvanceTaxPaid,
            ],
        }
    }

    /// Whether `column` belongs to this collection.
    pub fn has_column(self, column: Column) -> bool {
        self.columns().contains(&column)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[cfg(test)]
mod tests {
    //! Invariants of the schema allowlist.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn every_collection_starts_with_the_unique_key() {
        for collection in Collection::ALL {
            assert_eq!(collection.columns().first(), Some(&Column::UserId));
        }
    }

    #[rstest]
    fn identifiers_are_lowercase_snake_case() {
        let names = Collection::ALL
            .iter()
            .map(|collection| collection.table_name())
            .chain(
                Collection::ALL
                    .iter()
                    .flat_map(|collection| collection.columns())
                    .map(|column| column.name()),
            );
        for name in names {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "{name} is not a plain identifier"
            );
        }
    }

    #[rstest]
    #[case(Collection::Users, Column::Cnic, true)]
    #[case(Collection::Users, Column::SalaryIncome, false)]
    #[case(Collection::TaxPayments, Column::TaxYear, true)]
    #[case(Collection::Deductions, Column::UserId, true)]
    fn membership(#[case] collection: Collection, #[case] column: Column, #[case] expected: bool) {
        assert_eq!(collection.has_column(column), expected);
    }

    #[rstest]
    fn serialises_as_table_names() {
        let json = serde_json::to_string(&Collection::IncomeDetails).expect("serialise");
        assert_eq!(json, "\"income_details\"");
        let json = serde_json::to_string(&Column::AdvanceTaxPaid).expect("serialise");
        assert_eq!(json, "\"advance_tax_paid\"");
    }
}
