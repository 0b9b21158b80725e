// Pwman - CLI Command Handlers
//
// Each function handles one CLI subcommand: open the store, run one scope,
// close the store, print the result.

use std::path::Path;

use crate::error::PwmanError;
use crate::store::{Database, Secret, SecretId, SecretRepository, SqliteSecretRepository};

use super::{Cli, Commands, UpsertArgs};

/// Execute the parsed CLI command.
pub fn execute(cli: Cli) -> Result<(), PwmanError> {
    let Cli { dbfile, command } = cli;
    match command {
        Commands::Init => cmd_init(&dbfile),
        Commands::Upsert(args) => cmd_upsert(&dbfile, args).map(|_| ()),
        Commands::Query { term, json } => cmd_query(&dbfile, &term, json),
        Commands::List { json } => cmd_list(&dbfile, json),
    }
}

// ─── Init ────────────────────────────────────────────────────────────────────

fn cmd_init(path: &Path) -> Result<(), PwmanError> {
    if path.exists() {
        return Err(PwmanError::Other(format!(
            "Database already exists at {}",
            path.display()
        )));
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let mut db = Database::open(path)?;
    db.close()?;

    println!("✓ Database created");
    println!("  Path: {}", db.path().display());
    println!();
    println!("Next: add a secret with `pwman upsert --name <name> --website <site> --user <user> --password <password>`");

    Ok(())
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

fn cmd_upsert(path: &Path, args: UpsertArgs) -> Result<SecretId, PwmanError> {
    let (id, fields) = args.into_parts();
    if fields.is_empty() {
        tracing::warn!("No field values given");
    }

    let stored = with_store(path, |db| {
        db.write(|scope| SqliteSecretRepository::new(scope).upsert(fields, id))
            .map_err(PwmanError::from)
    })?;

    match id {
        Some(_) => println!("✓ Secret updated"),
        None => println!("✓ Secret stored"),
    }
    println!("  ID: {}", stored);

    Ok(stored)
}

// ─── Query ───────────────────────────────────────────────────────────────────

fn cmd_query(path: &Path, term: &str, json: bool) -> Result<(), PwmanError> {
    let secrets = with_store(path, |db| {
        db.read(|scope| SqliteSecretRepository::new(scope).search(term))
            .map_err(PwmanError::from)
    })?;

    print_secrets(&secrets, json)
}

// ─── List ────────────────────────────────────────────────────────────────────

fn cmd_list(path: &Path, json: bool) -> Result<(), PwmanError> {
    let secrets = with_store(path, |db| {
        db.read(|scope| SqliteSecretRepository::new(scope).list_all())
            .map_err(PwmanError::from)
    })?;

    print_secrets(&secrets, json)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Open the existing database at `path`, run `f`, then close the store.
/// The store is closed on both the success and the error path.
fn with_store<T>(
    path: &Path,
    f: impl FnOnce(&mut Database) -> Result<T, PwmanError>,
) -> Result<T, PwmanError> {
    if !path.exists() {
        return Err(PwmanError::DatabaseMissing(path.to_path_buf()));
    }

    let mut db = Database::open(path)?;
    let outcome = f(&mut db);
    let closed = db.close();

    // The operation's error wins; a close failure is already logged by `close`.
    let value = outcome?;
    closed?;
    Ok(value)
}

fn print_secrets(secrets: &[Secret], json: bool) -> Result<(), PwmanError> {
    if json {
        println!("{}", serde_json::to_string_pretty(secrets)?);
        return Ok(());
    }

    if secrets.is_empty() {
        println!("No secrets found.");
        return Ok(());
    }

    println!("{:-<80}", "");
    for secret in secrets {
        println!("  ID:       {}", secret.id);
        println!("  Name:     {}", secret.name);
        println!("  Website:  {}", secret.website);
        println!("  User:     {}", secret.user);
        println!("  Password: {}", secret.password());
        println!("  Notes:    {}", secret.notes);
        println!("{:-<80}", "");
    }

    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn list(path: &Path) -> Vec<Secret> {
        with_store(path, |db| {
            db.read(|scope| SqliteSecretRepository::new(scope).list_all())
                .map_err(PwmanError::from)
        })
        .unwrap()
    }

    #[test]
    fn test_missing_database_is_reported_before_opening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pw.sqlite");

        let err = cmd_list(&path, false).unwrap_err();
        assert!(matches!(err, PwmanError::DatabaseMissing(_)));
        assert!(!path.exists(), "a failed command must not create the file");
    }

    #[test]
    fn test_init_creates_database_and_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encrypted").join("pw.sqlite");

        cmd_init(&path).unwrap();
        assert!(path.exists());
        assert!(list(&path).is_empty());
    }

    #[test]
    fn test_init_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pw.sqlite");
        cmd_init(&path).unwrap();

        let err = cmd_init(&path).unwrap_err();
        assert!(matches!(err, PwmanError::Other(_)));
    }

    #[test]
    fn test_upsert_then_update_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pw.sqlite");
        cmd_init(&path).unwrap();

        let id = cmd_upsert(
            &path,
            UpsertArgs {
                name: Some("bank".to_string()),
                website: Some("bank.example.com".to_string()),
                user: Some("alice".to_string()),
                password: Some("p1".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        cmd_upsert(
            &path,
            UpsertArgs {
                id: Some(id),
                password: Some("p2".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let all = list(&path);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].password(), "p2");
        assert_eq!(all[0].user, "alice");
    }

    #[test]
    fn test_upsert_unknown_id_is_visible_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pw.sqlite");
        cmd_init(&path).unwrap();

        let err = cmd_upsert(
            &path,
            UpsertArgs {
                id: Some(12),
                name: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();

        assert!(matches!(
            err,
            PwmanError::Store(crate::store::StoreError::NotFound(12))
        ));
        assert!(list(&path).is_empty());
    }

    #[test]
    fn test_query_and_list_succeed_on_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pw.sqlite");
        cmd_init(&path).unwrap();

        assert!(cmd_list(&path, false).is_ok());
        assert!(cmd_query(&path, "anything", true).is_ok());
    }
}
