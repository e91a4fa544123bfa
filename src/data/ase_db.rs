// ============================================================
// Layer 4 — ASE Trajectory Database
// ============================================================
// The trajectory is stored as an ASE database, which is an
// SQLite file. Every configuration is one row of the `systems`
// table, so the dataset size is a row count:
//
//   SELECT COUNT(*) FROM systems
//
// The database is opened read-only; this crate never writes it.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::domain::traits::ConfigurationSource;
use crate::errors::WorkflowError;

/// Read-only handle to an ASE SQLite database.
pub struct AseDatabase {
    path: PathBuf,
    conn: Connection,
}

impl AseDatabase {
    /// Open the database at `path`.
    /// Fails with `NotFound` if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WorkflowError> {
        let path = path.as_ref().to_path_buf();

        if !path.is_file() {
            return Err(WorkflowError::not_found("trajectory database", path));
        }

        let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| WorkflowError::Database {
                path: path.clone(),
                source,
            })?;

        tracing::debug!("Opened trajectory database '{}'", path.display());
        Ok(Self { path, conn })
    }
}

impl ConfigurationSource for AseDatabase {
    fn configuration_count(&self) -> Result<usize, WorkflowError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM systems", [], |row| row.get(0))
            .map_err(|source| WorkflowError::Database {
                path: self.path.clone(),
                source,
            })?;

        usize::try_from(count).map_err(|_| {
            WorkflowError::Validation(format!(
                "negative row count {count} in '{}'",
                self.path.display()
            ))
        })
    }
}

/// Write a minimal ASE-shaped database with `rows` configurations.
#[cfg(test)]
pub(crate) fn write_test_database(path: &Path, rows: usize) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE systems (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             unique_id TEXT UNIQUE,
             numbers BLOB,
             positions BLOB
         );",
    )
    .unwrap();
    for i in 0..rows {
        conn.execute(
            "INSERT INTO systems (unique_id) VALUES (?1)",
            [format!("conf-{i}")],
        )
        .unwrap();
    }
}
