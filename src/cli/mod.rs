// Pwman - CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: init, upsert (u), query (q), list (l).

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::store::{SecretFields, SecretId};

pub use commands::execute;

/// Pwman - store and retrieve passwords in a local SQLite file.
#[derive(Parser, Debug)]
#[command(name = "pwman")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the database file.
    #[arg(short, long, global = true, env = "PWMAN_DB", default_value_os_t = default_db_path())]
    pub dbfile: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty database file.
    Init,

    /// Add a secret, or update the fields given for an existing one.
    #[command(visible_alias = "u")]
    Upsert(UpsertArgs),

    /// Show secrets whose name or website contains TERM (case-insensitive).
    #[command(visible_alias = "q")]
    Query {
        /// Text to look for. Matched literally.
        term: String,

        /// Print the results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show every stored secret.
    #[command(visible_alias = "l")]
    List {
        /// Print the results as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct UpsertArgs {
    /// Identity of the secret to update. Omit to add a new one.
    #[arg(short, long)]
    pub id: Option<SecretId>,

    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub website: Option<String>,

    #[arg(short, long)]
    pub user: Option<String>,

    /// Stored in plain text.
    #[arg(short, long)]
    pub password: Option<String>,

    #[arg(short = 't', long)]
    pub notes: Option<String>,
}

impl UpsertArgs {
    /// Split into the target identity and the field values to write.
    pub fn into_parts(self) -> (Option<SecretId>, SecretFields) {
        let fields = SecretFields {
            name: self.name,
            website: self.website,
            user: self.user,
            password: self.password,
            notes: self.notes,
        };
        (self.id, fields)
    }
}

/// `~/encrypted/pw.sqlite`, or `./encrypted/pw.sqlite` without a home dir.
pub fn default_db_path() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("encrypted")
        .join("pw.sqlite")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_upsert_short_options_map_to_fields() {
        let cli = parse(&[
            "pwman", "-d", "/tmp/pw.sqlite", "upsert", "-i", "4", "-n", "bank", "-w",
            "bank.example.com", "-u", "alice", "-p", "p1", "-t", "checking",
        ]);

        let Commands::Upsert(args) = cli.command else {
            panic!("expected upsert");
        };
        let (id, fields) = args.into_parts();
        assert_eq!(id, Some(4));
        assert_eq!(
            fields,
            SecretFields {
                name: Some("bank".to_string()),
                website: Some("bank.example.com".to_string()),
                user: Some("alice".to_string()),
                password: Some("p1".to_string()),
                notes: Some("checking".to_string()),
            }
        );
        assert_eq!(cli.dbfile, PathBuf::from("/tmp/pw.sqlite"));
    }

    #[test]
    fn test_upsert_alias_and_partial_fields() {
        let cli = parse(&["pwman", "-d", "x.sqlite", "u", "--password", "p2", "--id", "1"]);

        let Commands::Upsert(args) = cli.command else {
            panic!("expected upsert");
        };
        let (id, fields) = args.into_parts();
        assert_eq!(id, Some(1));
        assert_eq!(fields.password.as_deref(), Some("p2"));
        assert!(fields.name.is_none());
        assert!(fields.notes.is_none());
    }

    #[test]
    fn test_query_and_list_aliases() {
        let cli = parse(&["pwman", "-d", "x.sqlite", "q", "bank", "--json"]);
        assert!(matches!(
            cli.command,
            Commands::Query { ref term, json: true } if term == "bank"
        ));

        let cli = parse(&["pwman", "-d", "x.sqlite", "l"]);
        assert!(matches!(cli.command, Commands::List { json: false }));
    }

    #[test]
    fn test_dbfile_is_global() {
        let cli = parse(&["pwman", "list", "--dbfile", "after.sqlite"]);
        assert_eq!(cli.dbfile, PathBuf::from("after.sqlite"));
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let result = Cli::try_parse_from(["pwman", "-d", "x.sqlite", "upsert", "-i", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_db_path_file_name() {
        let path = default_db_path();
        assert!(path.ends_with("encrypted/pw.sqlite"));
    }
}
