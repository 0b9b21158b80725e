// Pwman - SQLite database handle
//
// Owns the connection to the single database file and hands out one scope at
// a time. Both scope constructors borrow the handle mutably, so two scopes
// can never be open on the same store.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::session::{ReadScope, WriteScope};
use super::StoreError;

/// Handle to the secrets database file.
pub struct Database {
    path: PathBuf,
    conn: Option<Connection>,
}

impl Database {
    /// Open the database at `path`, resolved to an absolute location.
    ///
    /// This does not check that the file exists beforehand; SQLite creates
    /// it when missing. Callers that must not create a file check first.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let requested = path.as_ref();
        let path = std::path::absolute(requested).map_err(|e| StoreError::Unavailable {
            path: requested.to_path_buf(),
            reason: e.to_string(),
        })?;

        let conn = Connection::open(&path).map_err(|e| StoreError::Unavailable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        // SQLite opens lazily; the schema step is the first real file access.
        Self::run_migrations(&conn).map_err(|e| StoreError::Unavailable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "Database opened");
        Ok(Self {
            path,
            conn: Some(conn),
        })
    }

    /// Open an in-memory database (for testing only).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::run_migrations(&conn)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Some(conn),
        })
    }

    /// The raw connection, for tests that need to act outside any scope.
    #[cfg(test)]
    pub(crate) fn conn(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    /// Absolute path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Release the connection. Calling this on a closed store is a no-op.
    pub fn close(&mut self) -> Result<(), StoreError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        // On failure the handle comes back to us and is dropped here, which
        // still releases it.
        conn.close().map_err(|(_conn, e)| {
            tracing::warn!(path = %self.path.display(), error = %e, "Database close failed");
            StoreError::Database(e)
        })?;

        tracing::debug!(path = %self.path.display(), "Database closed");
        Ok(())
    }

    /// Begin a write scope. Call `commit()` on it to keep its changes.
    pub fn scoped_write(&mut self) -> Result<WriteScope<'_>, StoreError> {
        let conn = self.conn.as_mut().ok_or_else(closed_store)?;
        WriteScope::begin(conn)
    }

    /// Begin a read scope. Writes are rejected until it is released.
    pub fn scoped_read(&mut self) -> Result<ReadScope<'_>, StoreError> {
        let conn = self.conn.as_ref().ok_or_else(closed_store)?;
        ReadScope::begin(conn)
    }

    /// Run `f` in a write scope: commit if it returns `Ok`, roll back if it
    /// returns `Err`. A panic inside `f` also rolls back.
    pub fn write<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&WriteScope<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let scope = self.scoped_write()?;
        match f(&scope) {
            Ok(value) => {
                scope.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = scope.rollback() {
                    tracing::warn!(error = %rollback_err, "Rollback after failed write scope failed");
                }
                Err(e)
            }
        }
    }

    /// Run `f` in a read scope and release it afterwards.
    pub fn read<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&ReadScope<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let scope = self.scoped_read()?;
        let value = f(&scope)?;
        scope.release()?;
        Ok(value)
    }

    /// Create the `pw` table if it does not exist yet.
    ///
    /// Columns stay nullable so files written by older tooling still load.
    fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS pw (
                id          INTEGER PRIMARY KEY,
                name        TEXT,
                website     TEXT,
                user        TEXT,
                password    TEXT,
                notes       TEXT
            );
            ",
        )?;

        tracing::debug!("Database migrations completed successfully");
        Ok(())
    }
}

fn closed_store() -> StoreError {
    StoreError::ScopeViolation("the store is closed".to_string())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
