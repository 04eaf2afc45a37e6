//! Domain ports and supporting types for the hexagonal boundary.

mod record_repository;

#[cfg(test)]
pub use record_repository::MockRecordRepository;
pub use record_repository::{FixtureRecordRepository, RecordPersistenceError, RecordRepository};
