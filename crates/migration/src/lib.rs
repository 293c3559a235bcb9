//! Numbered schema steps for the points book store.
//!
//! Unlike a name-ordered migrator, steps are keyed by the integer schema
//! version they move the database *into*. The store applies them one by one
//! from `current + 1` up to the requested target and records each version in
//! the `dbver` table. New versions are added by extending [`steps`].
pub use sea_orm_migration::prelude::*;

use std::collections::BTreeMap;

mod m0000_schema_version;
mod m0001_books;

pub use m0000_schema_version::{DbVer, UNINITIALIZED};
pub use m0001_books::{BookTransactions, Books};

/// The version that creates the `books` and `book_transactions` tables.
pub const BOOKS_VERSION: i64 = 1;

/// The highest version known to this crate.
pub const LATEST_VERSION: i64 = BOOKS_VERSION;

/// Every known step, keyed by the version it produces.
pub fn steps() -> BTreeMap<i64, Box<dyn MigrationTrait>> {
    let mut steps: BTreeMap<i64, Box<dyn MigrationTrait>> = BTreeMap::new();
    steps.insert(0, Box::new(m0000_schema_version::Migration));
    steps.insert(BOOKS_VERSION, Box::new(m0001_books::Migration));
    steps
}

/// Look up the step that produces `version`.
pub fn step(version: i64) -> Option<Box<dyn MigrationTrait>> {
    steps().remove(&version)
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, Database, Statement};

    use super::*;

    #[test]
    fn steps_are_contiguous_from_zero() {
        let versions: Vec<i64> = steps().keys().copied().collect();
        let expected: Vec<i64> = (0..=LATEST_VERSION).collect();
        assert_eq!(versions, expected);
    }

    #[test]
    fn unknown_versions_have_no_step() {
        assert!(step(LATEST_VERSION + 1).is_none());
        assert!(step(UNINITIALIZED).is_none());
    }

    #[test]
    fn step_names_follow_module_names() {
        let names: Vec<String> = steps().values().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["m0000_schema_version", "m0001_books"]);
    }

    #[tokio::test]
    async fn version_step_seeds_sentinel() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let manager = SchemaManager::new(&db);
        step(0).unwrap().up(&manager).await.unwrap();

        assert!(manager.has_table("dbver").await.unwrap());
        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT v FROM dbver".to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        let v: i64 = row.try_get("", "v").unwrap();
        assert_eq!(v, UNINITIALIZED);
    }

    #[tokio::test]
    async fn books_step_restricts_orphan_rows() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let backend = db.get_database_backend();
        db.execute(Statement::from_string(
            backend,
            "PRAGMA foreign_keys = ON".to_string(),
        ))
        .await
        .unwrap();
        let manager = SchemaManager::new(&db);
        step(BOOKS_VERSION).unwrap().up(&manager).await.unwrap();

        assert!(manager.has_table("books").await.unwrap());
        assert!(manager.has_table("book_transactions").await.unwrap());

        let orphan = db
            .execute(Statement::from_string(
                backend,
                "INSERT INTO book_transactions (book_id, position, amount) VALUES ('ghost', 0, 1)"
                    .to_string(),
            ))
            .await;
        assert!(orphan.is_err());
    }
}
