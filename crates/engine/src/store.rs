//! Durable storage for ledgers.
//!
//! The store owns a SQLite connection and maps [`Ledger`]s to rows:
//! - `books` holds one root record per identifier,
//! - `book_transactions` holds one row per entry, keyed by `(book_id, position)`,
//! - `dbver` holds the schema version, advanced by [`Store::migrate_to`].
//!
//! Every write runs inside one database transaction. Dropping an in-flight
//! future rolls the transaction back; the `*_until` variants do the same when
//! an external cancellation future resolves first.

use std::{future::Future, time::Duration};

use migration::{BOOKS_VERSION, SchemaManager, UNINITIALIZED};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectOptions, ConnectionTrait, Database, PaginatorTrait,
    QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*,
};

use crate::{Ledger, PointsError, ResultBook, StoreSettings, book_transactions, books};

/// Location that opens a private in-memory database.
pub const MEMORY: &str = ":memory:";

const VERSION_TABLE: &str = "dbver";

/// Lifetime and idle limit of the pooled connection. Replacing the
/// connection would drop an in-memory database and the pragmas set on open.
const CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 100);

#[derive(Clone, Debug)]
pub struct Store {
    database: DatabaseConnection,
}

impl Store {
    /// Open the SQLite database at `location`, creating the file if needed.
    ///
    /// Pass [`MEMORY`] for an in-memory database.
    pub async fn open(location: &str) -> ResultBook<Self> {
        let database = Database::connect(connect_options(location))
            .await
            .map_err(|err| PointsError::StorageUnavailable(err.to_string()))?;
        database
            .execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .map_err(|err| PointsError::StorageUnavailable(err.to_string()))?;

        tracing::info!("points store opened at {location}");
        Ok(Self { database })
    }

    /// Open the configured database and migrate it to the configured version.
    pub async fn connect(settings: &StoreSettings) -> ResultBook<Self> {
        let store = Self::open(settings.database.location()).await?;
        store.migrate_to(settings.target_version()).await?;
        Ok(store)
    }

    pub async fn close(self) -> ResultBook<()> {
        self.database.close().await?;
        Ok(())
    }

    /// The underlying connection, for callers that need to run their own
    /// queries next to the store.
    #[doc(hidden)]
    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }

    /// Current schema version. Fails with [`PointsError::Uninitialized`]
    /// until version 0 has been applied.
    pub async fn schema_version(&self) -> ResultBook<i64> {
        read_version(&self.database).await
    }

    /// Apply every step from the current version up to `target` in a single
    /// transaction. Either all steps land or the version stays where it was.
    pub async fn migrate_to(&self, target: i64) -> ResultBook<()> {
        let db_tx = self.database.begin().await?;
        let current = match read_version(&db_tx).await {
            Ok(version) => version,
            Err(PointsError::Uninitialized) => UNINITIALIZED,
            Err(err) => return Err(err),
        };

        if target == current {
            return Ok(());
        }
        if target < current {
            tracing::warn!("refusing to migrate from version {current} down to {target}");
            return Err(PointsError::InvalidTarget { current, target });
        }

        let mut pending = Vec::new();
        for version in current + 1..=target {
            let step = migration::step(version).ok_or_else(|| {
                tracing::warn!("no schema step produces version {version}");
                PointsError::MissingMigration(version)
            })?;
            pending.push((version, step));
        }

        {
            let backend = db_tx.get_database_backend();
            let manager = SchemaManager::new(&db_tx);
            for (version, step) in pending {
                step.up(&manager).await?;
                db_tx
                    .execute(Statement::from_sql_and_values(
                        backend,
                        "UPDATE dbver SET v = ?;",
                        [version.into()],
                    ))
                    .await?;
                tracing::info!("applied schema step {} (version {version})", step.name());
            }
        }

        db_tx.commit().await?;
        Ok(())
    }

    /// Like [`Store::migrate_to`], but gives up as soon as `cancel` resolves.
    pub async fn migrate_to_until<F>(&self, target: i64, cancel: F) -> ResultBook<()>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => Err(PointsError::Cancelled),
            result = self.migrate_to(target) => result,
        }
    }

    /// Persist the uncommitted tail of `ledger`.
    ///
    /// The root record is created on first store. Entries are written at
    /// positions continuing from the commit cursor, and the cursor only moves
    /// once the transaction has committed: a failed store can be retried with
    /// the same ledger.
    pub async fn store(&self, ledger: &mut Ledger) -> ResultBook<()> {
        let db_tx = self.database.begin().await?;
        require_books_schema(&db_tx).await?;

        let identifier = ledger.identifier();
        if books::Entity::find_by_id(identifier.to_string())
            .one(&db_tx)
            .await?
            .is_none()
        {
            books::ActiveModel {
                id: ActiveValue::Set(identifier.to_string()),
            }
            .insert(&db_tx)
            .await?;
        }

        let start = ledger.committed_len();
        let rows = ledger
            .uncommitted_transactions()
            .iter()
            .enumerate()
            .map(|(offset, amount)| -> ResultBook<book_transactions::ActiveModel> {
                Ok(book_transactions::ActiveModel::entry(
                    identifier,
                    position(start, offset)?,
                    *amount,
                ))
            })
            .collect::<ResultBook<Vec<_>>>()?;

        let written = if rows.is_empty() {
            0
        } else {
            book_transactions::Entity::insert_many(rows)
                .exec_without_returning(&db_tx)
                .await?
        };

        db_tx.commit().await?;
        ledger.mark_committed();

        tracing::debug!("stored {written} entries for book {}", ledger.identifier());
        Ok(())
    }

    /// Like [`Store::store`], but gives up as soon as `cancel` resolves. The
    /// ledger is left untouched when cancelled.
    pub async fn store_until<F>(&self, ledger: &mut Ledger, cancel: F) -> ResultBook<()>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => Err(PointsError::Cancelled),
            result = self.store(ledger) => result,
        }
    }

    /// Rebuild the ledger stored under `identifier`.
    pub async fn load(&self, identifier: &str) -> ResultBook<Ledger> {
        if identifier.is_empty() {
            return Err(PointsError::InvalidIdentifier);
        }
        require_books_schema(&self.database).await?;

        let roots = books::Entity::find()
            .filter(books::Column::Id.eq(identifier))
            .count(&self.database)
            .await?;
        if roots != 1 {
            return Err(PointsError::NotFound(identifier.to_string()));
        }

        let amounts: Vec<i64> = book_transactions::Entity::find()
            .filter(book_transactions::Column::BookId.eq(identifier))
            .order_by_asc(book_transactions::Column::Position)
            .all(&self.database)
            .await?
            .into_iter()
            .map(|row| row.amount)
            .collect();

        tracing::debug!("loaded {} entries for book {identifier}", amounts.len());
        Ledger::from_transactions(identifier, amounts)
    }
}

/// Build the pool options for `location`: a single connection that is never
/// recycled, since pragmas and in-memory databases are bound to it.
fn connect_options(location: &str) -> ConnectOptions {
    let url = if location == MEMORY {
        String::from("sqlite::memory:")
    } else {
        format!("sqlite:{location}?mode=rwc")
    };

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(1)
        .min_connections(1)
        .max_lifetime(CONNECTION_LIFETIME)
        .idle_timeout(CONNECTION_LIFETIME);
    options
}

/// Row position of the entry `offset` places past the commit cursor.
fn position(start: usize, offset: usize) -> ResultBook<i64> {
    start
        .checked_add(offset)
        .and_then(|index| i64::try_from(index).ok())
        .ok_or(PointsError::PositionOverflow { start, offset })
}

async fn read_version<C: ConnectionTrait>(db: &C) -> ResultBook<i64> {
    let backend = db.get_database_backend();
    let tables = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = ?;",
            [VERSION_TABLE.into()],
        ))
        .await?;
    let present = match tables {
        Some(row) => row.try_get::<i64>("", "n")? > 0,
        None => false,
    };
    if !present {
        return Err(PointsError::Uninitialized);
    }

    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT v FROM dbver;".to_string(),
        ))
        .await?;
    match row {
        Some(row) => {
            let version: i64 = row.try_get("", "v")?;
            if version == UNINITIALIZED {
                return Err(PointsError::Uninitialized);
            }
            Ok(version)
        }
        None => Err(PointsError::Uninitialized),
    }
}

async fn require_books_schema<C: ConnectionTrait>(db: &C) -> ResultBook<()> {
    let current = read_version(db).await?;
    if current < BOOKS_VERSION {
        return Err(PointsError::SchemaOutdated {
            current,
            required: BOOKS_VERSION,
        });
    }
    Ok(())
}
