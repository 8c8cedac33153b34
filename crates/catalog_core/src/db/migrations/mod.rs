//! Catalog schema history.
//!
//! | version | file | adds |
//! |---|---|---|
//! | 1 | `0001_catalog.sql` | `authors`, `books`, `book_genres`, listing indexes |
//! | 2 | `0002_author_name_unique.sql` | unique index on `authors.name` |
//!
//! The stamped version lives in `PRAGMA user_version`. Every pending step runs
//! inside a single transaction, so a failed upgrade leaves the file at its
//! previous version.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

/// One forward-only schema step.
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "catalog",
        sql: include_str!("0001_catalog.sql"),
    },
    SchemaStep {
        version: 2,
        name: "author_name_unique",
        sql: include_str!("0002_author_name_unique.sql"),
    },
];

/// Schema version produced by the newest step this build knows.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings a connection up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let to_version = latest_version();

    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from_version} to_version={to_version}"
    );
    Ok(())
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    info!(
        "event=db_migrate_step module=db status=ok version={} name={}",
        step.version, step.name
    );
    Ok(())
}

/// Reads the schema version stamped on a connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}
