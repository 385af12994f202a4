// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite connection bootstrap.
//!
//! Opens connections, applies the embedded migrations, and issues the
//! PRAGMA statements Diesel has no DSL for. Domain reads and writes live
//! in `queries/` and `mutations/`.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::PersistenceError;

/// Embedded schema migrations for the `grades` and `student_grades` tables.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Journal configuration for a new connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Journal {
    /// SQLite's default rollback journal; used for in-memory databases.
    Rollback,
    /// Write-ahead logging for file databases; better read concurrency.
    Wal,
}

/// Row shape for `PRAGMA foreign_keys`.
#[derive(QueryableByName)]
struct ForeignKeyPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Opens a connection, configures it, and applies pending migrations.
///
/// Foreign key enforcement is switched on and then read back: an
/// enrollment row must never outlive the grade it references, and SQLite
/// enforces that only when the pragma takes effect.
///
/// # Errors
///
/// Returns an error if the connection cannot be established, a PRAGMA or
/// migration fails, or foreign key enforcement is not active afterwards.
pub fn open(database_url: &str, journal: Journal) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    // PRAGMAs are raw SQL; Diesel has no DSL for them.
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    if journal == Journal::Wal {
        diesel::sql_query("PRAGMA journal_mode = WAL")
            .execute(&mut conn)
            .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    let enforced: i32 = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<ForeignKeyPragma>(&mut conn)?
        .foreign_keys;
    if enforced == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    Ok(conn)
}

/// Returns the row ID assigned by the most recent insert.
///
/// The insert paths read the generated key back with
/// `last_insert_rowid()` because `SQLite` does not support a RETURNING
/// clause in every statement position.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}
