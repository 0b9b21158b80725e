// Pwman - Store Module
//
// Single-file SQLite storage for secrets: the database handle, its
// read/write scopes, and the repository that runs queries inside them.

mod db;
mod error;
mod models;
mod repository;
mod session;

pub use db::Database;
pub use error::StoreError;
pub use models::{Secret, SecretFields, SecretId};
pub use repository::{SecretRepository, SqliteSecretRepository};
pub use session::{ReadScope, ScopeKind, Session, WriteScope};
