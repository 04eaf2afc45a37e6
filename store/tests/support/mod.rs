//! Helpers for integration tests that need a running PostgreSQL server.
//!
//! Tests read the server location from `TAXBOT_TEST_DATABASE_URL`. When the
//! variable is unset the test prints a `SKIP-TEST-DATABASE` marker and
//! returns early so local runs without a server stay green.

use std::sync::Mutex;

use postgres::{Client, NoTls};

/// Serialises table creation; concurrent `CREATE TABLE IF NOT EXISTS` can
/// race on the catalog.
static SCHEMA_LOCK: Mutex<()> = Mutex::new(());

/// Environment variable naming the test database.
pub const DATABASE_URL_VAR: &str = "TAXBOT_TEST_DATABASE_URL";

/// Return the test database URL, or `None` after printing a skip marker.
pub fn database_url_or_skip() -> Option<String> {
    match std::env::var(DATABASE_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-DATABASE: set {DATABASE_URL_VAR} to run");
            None
        }
    }
}

/// Create the bot tables when they do not exist yet.
pub fn create_tables(client: &mut Client) -> Result<(), postgres::Error> {
    client.batch_execute(concat!(
        "CREATE TABLE IF NOT EXISTS users (",
        "  user_id BIGINT PRIMARY KEY,",
        "  full_name TEXT,",
        "  cnic TEXT,",
        "  phone TEXT,",
        "  email TEXT,",
        "  filer_status TEXT",
        ");",
        "CREATE TABLE IF NOT EXISTS income_details (",
        "  user_id BIGINT PRIMARY KEY,",
        "  salary_income DOUBLE PRECISION,",
        "  business_income DOUBLE PRECISION,",
        "  rental_income DOUBLE PRECISION,",
        "  capital_gains DOUBLE PRECISION,",
        "  foreign_income DOUBLE PRECISION,",
        "  other_income DOUBLE PRECISION",
        ");",
        "CREATE TABLE IF NOT EXISTS deductions (",
        "  user_id BIGINT PRIMARY KEY,",
        "  zakat_paid DOUBLE PRECISION,",
        "  charitable_donations DOUBLE PRECISION,",
        "  pension_contributions DOUBLE PRECISION,",
        "  health_insurance DOUBLE PRECISION,",
        "  education_expenses DOUBLE PRECISION",
        ");",
        "CREATE TABLE IF NOT EXISTS tax_payments (",
        "  user_id BIGINT PRIMARY KEY,",
        "  tax_year TEXT,",
        "  withholding_tax DOUBLE PRECISION,",
        "  advance_tax_paid DOUBLE PRECISION",
        ");",
    ))
}

/// Connect, create tables, and remove any rows left for `user_id`.
pub fn prepare(database_url: &str, user_id: i64) -> Result<(), postgres::Error> {
    let mut client = Client::connect(database_url, NoTls)?;
    {
        let _schema_guard = SCHEMA_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        create_tables(&mut client)?;
    }
    for table in ["users", "income_details", "deductions", "tax_payments"] {
        client.execute(
            format!("DELETE FROM {table} WHERE user_id = $1").as_str(),
            &[&user_id],
        )?;
    }
    Ok(())
}
