//! A points book: per-entity point balances kept as an append-only ledger of
//! signed entries, with optional persistence to SQLite.
//!
//! [`Ledger`] is the in-memory book. [`Store`] writes its uncommitted entries
//! and rebuilds it from disk, behind a schema version managed by the
//! `migration` crate.

pub use error::PointsError;
pub use ledger::{Ledger, SpendOutcome};
pub use settings::{Database, StoreSettings};
pub use store::{MEMORY, Store};

mod book_transactions;
mod books;
mod error;
mod ledger;
mod settings;
mod store;

pub type ResultBook<T> = Result<T, PointsError>;
