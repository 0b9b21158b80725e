// Pwman - Secret data models
//
// The password is kept in plain text in the database. It is still kept out
// of Debug output so it never ends up in log lines by accident.

use serde::Serialize;
use std::fmt;

/// Store-assigned surrogate identity of a secret (`pw.id`).
pub type SecretId = i64;

/// One stored credential record.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Secret {
    pub id: SecretId,
    pub name: String,
    pub website: String,
    pub user: String,
    password: String,
    pub notes: String,
}

impl Secret {
    pub fn new(
        id: SecretId,
        name: String,
        website: String,
        user: String,
        password: String,
        notes: String,
    ) -> Self {
        Self {
            id,
            name,
            website,
            user,
            password,
            notes,
        }
    }

    /// The stored password, verbatim.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Overwrite every field that `fields` actually provides.
    /// Missing or empty values leave the current value alone.
    pub fn apply(&mut self, fields: &SecretFields) {
        fn overwrite(slot: &mut String, value: &Option<String>) {
            if let Some(v) = provided(value) {
                *slot = v.to_string();
            }
        }

        overwrite(&mut self.name, &fields.name);
        overwrite(&mut self.website, &fields.website);
        overwrite(&mut self.user, &fields.user);
        overwrite(&mut self.password, &fields.password);
        overwrite(&mut self.notes, &fields.notes);
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("website", &self.website)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("notes", &self.notes)
            .finish()
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.id, self.name, self.website)
    }
}

/// Field values for an upsert, one slot per column.
///
/// `None` and `Some("")` both mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretFields {
    pub name: Option<String>,
    pub website: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub notes: Option<String>,
}

impl SecretFields {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.website,
            &self.user,
            &self.password,
            &self.notes,
        ]
        .iter()
        .all(|v| provided(v).is_none())
    }

    /// Build a fresh record, defaulting unprovided fields to "".
    pub(crate) fn into_secret(self, id: SecretId) -> Secret {
        let mut secret = Secret::new(
            id,
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );
        secret.apply(&self);
        secret
    }
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
