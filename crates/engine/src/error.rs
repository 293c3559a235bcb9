//! The module contains the errors the points book can return.
//!
//! Running out of points is **not** an error: [`Ledger::spend`] reports it
//! through [`SpendOutcome`]. The variants here are reserved for misuse and
//! storage failures:
//!
//! - [`InvalidIdentifier`] when a ledger is built with an empty identifier.
//! - [`Uninitialized`] when the store has no schema version yet.
//! - [`InvalidTarget`] and [`MissingMigration`] when a migration is misconfigured.
//! - [`StorageUnavailable`] and [`Storage`] for failures of the database itself.
//! - [`NotFound`] when loading an identifier that was never stored.
//!
//!  [`Ledger::spend`]: crate::Ledger::spend
//!  [`SpendOutcome`]: crate::SpendOutcome
//!  [`InvalidIdentifier`]: PointsError::InvalidIdentifier
//!  [`Uninitialized`]: PointsError::Uninitialized
//!  [`InvalidTarget`]: PointsError::InvalidTarget
//!  [`MissingMigration`]: PointsError::MissingMigration
//!  [`StorageUnavailable`]: PointsError::StorageUnavailable
//!  [`Storage`]: PointsError::Storage
//!  [`NotFound`]: PointsError::NotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Points book errors.
#[derive(Error, Debug)]
pub enum PointsError {
    #[error("Invalid identifier: identifier must not be empty")]
    InvalidIdentifier,
    #[error("Store uninitialized: no schema version recorded")]
    Uninitialized,
    #[error("Schema outdated: version {current}, need at least {required}")]
    SchemaOutdated { current: i64, required: i64 },
    #[error("Invalid migration target {target}: current version is {current}")]
    InvalidTarget { current: i64, target: i64 },
    #[error("Missing migration step for version {0}")]
    MissingMigration(i64),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Position overflow: {offset} entries past cursor {start}")]
    PositionOverflow { start: usize, offset: usize },
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Operation cancelled")]
    Cancelled,
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Storage(#[from] DbErr),
}

impl PartialEq for PointsError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidIdentifier, Self::InvalidIdentifier) => true,
            (Self::Uninitialized, Self::Uninitialized) => true,
            (
                Self::SchemaOutdated {
                    current: a,
                    required: b,
                },
                Self::SchemaOutdated {
                    current: c,
                    required: d,
                },
            ) => a == c && b == d,
            (
                Self::InvalidTarget {
                    current: a,
                    target: b,
                },
                Self::InvalidTarget {
                    current: c,
                    target: d,
                },
            ) => a == c && b == d,
            (Self::MissingMigration(a), Self::MissingMigration(b)) => a == b,
            (Self::StorageUnavailable(a), Self::StorageUnavailable(b)) => a == b,
            (
                Self::PositionOverflow {
                    start: a,
                    offset: b,
                },
                Self::PositionOverflow {
                    start: c,
                    offset: d,
                },
            ) => a == c && b == d,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Cancelled, Self::Cancelled) => true,
            (Self::Config(a), Self::Config(b)) => a.to_string() == b.to_string(),
            (Self::Storage(a), Self::Storage(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
