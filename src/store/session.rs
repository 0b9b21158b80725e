// Pwman - Read and write scopes
//
// A scope owns the single open transaction on a `Database`. Write scopes
// commit explicitly and roll back when dropped uncommitted. Read scopes run
// with `PRAGMA query_only` and roll back when dropped unreleased.

use rusqlite::{Connection, Params, Transaction, TransactionBehavior};

use super::StoreError;

/// What a scope is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Read,
    Write,
}

/// Common surface of both scope kinds, used by the repository.
pub trait Session {
    fn kind(&self) -> ScopeKind;

    /// The connection the scope's transaction runs on.
    fn conn(&self) -> &Connection;

    /// Fail with `ScopeViolation` unless this is a write scope.
    fn require_write(&self) -> Result<(), StoreError> {
        match self.kind() {
            ScopeKind::Write => Ok(()),
            ScopeKind::Read => Err(StoreError::ScopeViolation(
                "write attempted inside a read scope".to_string(),
            )),
        }
    }

    /// Run a mutating statement. Only valid in a write scope.
    fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize, StoreError> {
        self.require_write()?;
        Ok(self.conn().execute(sql, params)?)
    }
}

// ─── Write ───────────────────────────────────────────────────────────────────

/// An IMMEDIATE transaction. Nothing is visible to other connections until
/// `commit()`; dropping the scope rolls everything back.
pub struct WriteScope<'db> {
    tx: Transaction<'db>,
}

impl<'db> WriteScope<'db> {
    pub(crate) fn begin(conn: &'db mut Connection) -> Result<Self, StoreError> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tracing::debug!("Write scope opened");
        Ok(Self { tx })
    }

    /// Commit every change made in this scope.
    ///
    /// On failure the transaction is rolled back and
    /// `StoreError::TransactionFailure` is returned.
    pub fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().map_err(|e| {
            tracing::warn!(error = %e, "Commit failed, write scope rolled back");
            StoreError::TransactionFailure(e)
        })?;
        tracing::debug!("Write scope committed");
        Ok(())
    }

    /// Discard every change made in this scope.
    pub fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback()?;
        tracing::debug!("Write scope rolled back");
        Ok(())
    }
}

impl Session for WriteScope<'_> {
    fn kind(&self) -> ScopeKind {
        ScopeKind::Write
    }

    fn conn(&self) -> &Connection {
        &self.tx
    }
}

// ─── Read ────────────────────────────────────────────────────────────────────

/// A deferred transaction on a connection switched to `query_only`.
pub struct ReadScope<'db> {
    conn: &'db Connection,
    tx: Option<Transaction<'db>>,
}

impl<'db> ReadScope<'db> {
    pub(crate) fn begin(conn: &'db Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "query_only", true)?;
        let tx = match conn.unchecked_transaction() {
            Ok(tx) => tx,
            Err(e) => {
                reset_query_only(conn);
                return Err(e.into());
            }
        };
        tracing::debug!("Read scope opened");
        Ok(Self { conn, tx: Some(tx) })
    }

    /// End the scope normally. Records already fetched are owned values and
    /// stay usable.
    pub fn release(mut self) -> Result<(), StoreError> {
        if let Some(tx) = self.tx.take() {
            tx.commit()?;
        }
        tracing::debug!("Read scope released");
        Ok(())
    }
}

impl Session for ReadScope<'_> {
    fn kind(&self) -> ScopeKind {
        ScopeKind::Read
    }

    fn conn(&self) -> &Connection {
        self.conn
    }
}

impl Drop for ReadScope<'_> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            match tx.rollback() {
                Ok(()) => tracing::debug!("Read scope rolled back"),
                Err(e) => tracing::warn!(error = %e, "Read scope rollback failed"),
            }
        }
        reset_query_only(self.conn);
    }
}

fn reset_query_only(conn: &Connection) {
    if let Err(e) = conn.pragma_update(None, "query_only", false) {
        tracing::warn!(error = %e, "Failed to switch connection back to read-write");
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
