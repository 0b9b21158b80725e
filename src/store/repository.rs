// Pwman - Secret Repository
//
// Upsert, list and search over the `pw` table. Every operation runs against
// a scope borrowed from `Database`; the repository itself never commits.

use rusqlite::params;

use super::models::{Secret, SecretFields, SecretId};
use super::session::Session;
use super::StoreError;

const SELECT_SECRET: &str = "SELECT id, name, website, user, password, notes FROM pw";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Operations on stored secrets.
pub trait SecretRepository {
    /// Insert `fields` as a new secret when `id` is `None`, otherwise
    /// overwrite the provided fields of secret `id`. Returns the identity.
    ///
    /// Fails with `NotFound` for an unknown `id` and with `ScopeViolation`
    /// inside a read scope.
    fn upsert(&self, fields: SecretFields, id: Option<SecretId>) -> Result<SecretId, StoreError>;

    /// Fetch one secret by identity.
    fn get(&self, id: SecretId) -> Result<Option<Secret>, StoreError>;

    /// Every stored secret, ordered by identity.
    fn list_all(&self) -> Result<Vec<Secret>, StoreError>;

    /// Secrets whose name or website contains `term`, ignoring ASCII case.
    /// `term` is matched literally; `%` and `_` are not wildcards.
    fn search(&self, term: &str) -> Result<Vec<Secret>, StoreError>;
}

// ─── SQLite Implementation ──────────────────────────────────────────────────

pub struct SqliteSecretRepository<'s, S: Session> {
    session: &'s S,
}

impl<'s, S: Session> SqliteSecretRepository<'s, S> {
    pub fn new(session: &'s S) -> Self {
        Self { session }
    }

    /// Parse a `pw` row. NULL columns read as "".
    fn row_to_secret(row: &rusqlite::Row<'_>) -> rusqlite::Result<Secret> {
        fn text(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<String> {
            Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
        }

        Ok(Secret::new(
            row.get(0)?,
            text(row, 1)?,
            text(row, 2)?,
            text(row, 3)?,
            text(row, 4)?,
            text(row, 5)?,
        ))
    }

    fn query_secrets<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<Secret>, StoreError> {
        let mut stmt = self.session.conn().prepare(sql)?;
        let rows = stmt.query_map(params, Self::row_to_secret)?;

        let mut secrets = Vec::new();
        for row in rows {
            secrets.push(row?);
        }
        Ok(secrets)
    }

    fn insert(&self, fields: SecretFields) -> Result<SecretId, StoreError> {
        let secret = fields.into_secret(0);
        self.session.execute(
            "INSERT INTO pw (name, website, user, password, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                secret.name,
                secret.website,
                secret.user,
                secret.password(),
                secret.notes,
            ],
        )?;

        let id = self.session.conn().last_insert_rowid();
        tracing::info!(secret_id = id, "Secret stored");
        Ok(id)
    }

    fn update(&self, id: SecretId, fields: SecretFields) -> Result<SecretId, StoreError> {
        let mut secret = self.get(id)?.ok_or(StoreError::NotFound(id))?;
        secret.apply(&fields);

        self.session.execute(
            "UPDATE pw
             SET name = ?1, website = ?2, user = ?3, password = ?4, notes = ?5
             WHERE id = ?6",
            params![
                secret.name,
                secret.website,
                secret.user,
                secret.password(),
                secret.notes,
                id,
            ],
        )?;

        tracing::info!(secret_id = id, "Secret updated");
        Ok(id)
    }
}

impl<S: Session> SecretRepository for SqliteSecretRepository<'_, S> {
    fn upsert(&self, fields: SecretFields, id: Option<SecretId>) -> Result<SecretId, StoreError> {
        self.session.require_write()?;
        match id {
            Some(id) => self.update(id, fields),
            None => self.insert(fields),
        }
    }

    fn get(&self, id: SecretId) -> Result<Option<Secret>, StoreError> {
        let mut secrets = self.query_secrets(&format!("{SELECT_SECRET} WHERE id = ?1"), params![id])?;
        Ok(secrets.pop())
    }

    fn list_all(&self) -> Result<Vec<Secret>, StoreError> {
        self.query_secrets(&format!("{SELECT_SECRET} ORDER BY id"), [])
    }

    fn search(&self, term: &str) -> Result<Vec<Secret>, StoreError> {
        let pattern = format!("%{}%", escape_like(term));
        self.query_secrets(
            &format!(
                r"{SELECT_SECRET}
                 WHERE IFNULL(name, '') LIKE ?1 ESCAPE '\'
                    OR IFNULL(website, '') LIKE ?1 ESCAPE '\'
                 ORDER BY id"
            ),
            params![pattern],
        )
    }
}

/// Escape LIKE metacharacters so `term` matches only itself.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ─── Tests ───────────────────────────────────────────────────────────────────
