//! Command-line front end for the client store.
//!
//! # Responsibility
//! - Open one database session per invocation and run a single command.
//! - Map the lookup-miss sentinel to a dedicated exit code.
//! - Write command results to stdout; diagnostics go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clientdb_core::db::open_db;
use clientdb_core::{
    core_version, init_logging, ClientId, ClientListQuery, ClientRepository, ClientService, Config,
    RepoError, SqliteClientRepository,
};
use log::info;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_NOT_FOUND: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "clientdb", version, about = "Manage client records in a SQLite store")]
struct Cli {
    /// Database file; overrides CLIENTDB_DATABASE_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one client as JSON.
    Get {
        #[arg(allow_negative_numbers = true)]
        id: ClientId,
    },
    /// Insert a client and print its id.
    Add {
        #[arg(long)]
        fio: String,
        #[arg(long)]
        login: String,
        /// YYYYMMDD
        #[arg(long)]
        birthday: String,
        #[arg(long)]
        email: String,
    },
    /// Delete a client by id.
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: ClientId,
    },
    /// Print clients as JSON lines in id order.
    List {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = Config::from_env()
        .map_err(anyhow::Error::from)
        .and_then(|config| run(cli, config, &mut io::stdout().lock()));

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Applies command-line overrides to `config`, opens one session and runs
/// the command, writing its output to `out`.
fn run(cli: Cli, mut config: Config, out: &mut impl Write) -> Result<ExitCode> {
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
        info!(
            "event=cli_start module=cli status=ok core_version={}",
            core_version()
        );
    }

    let conn = open_db(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;
    let service = ClientService::new(SqliteClientRepository::try_new(&conn)?);

    execute(cli.command, &service, out)
}

fn execute<R: ClientRepository>(
    command: Command,
    service: &ClientService<R>,
    out: &mut impl Write,
) -> Result<ExitCode> {
    match command {
        Command::Get { id } => match service.select_client(id) {
            Ok(client) => writeln!(out, "{}", serde_json::to_string_pretty(&client)?)?,
            Err(RepoError::NotFound(id)) => {
                eprintln!("client {id} not found");
                return Ok(ExitCode::from(EXIT_NOT_FOUND));
            }
            Err(err) => return Err(err.into()),
        },
        Command::Add {
            fio,
            login,
            birthday,
            email,
        } => {
            let id = service.register_client(&fio, &login, &birthday, &email)?;
            writeln!(out, "{id}")?;
        }
        Command::Delete { id } => service.delete_client(id)?,
        Command::List { limit, offset } => {
            for client in service.list_clients(&ClientListQuery { limit, offset })? {
                writeln!(out, "{}", serde_json::to_string(&client)?)?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, EXIT_NOT_FOUND};
    use clap::Parser;
    use clientdb_core::{Client, Config};
    use std::path::Path;
    use std::process::ExitCode;

    fn invoke(db: &Path, args: &[&str]) -> (ExitCode, String) {
        let db_arg = db.to_str().unwrap();
        let argv = ["clientdb", "--db", db_arg]
            .into_iter()
            .chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();

        let mut out = Vec::new();
        let code = run(cli, Config::default(), &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    fn add_test_client(db: &Path, login: &str) -> i64 {
        let (code, out) = invoke(
            db,
            &[
                "add",
                "--fio",
                "Test",
                "--login",
                login,
                "--birthday",
                "19700101",
                "--email",
                "mail@mail.com",
            ],
        );
        assert_eq!(code, ExitCode::SUCCESS);
        out.trim().parse().unwrap()
    }

    #[test]
    fn get_missing_client_exits_with_not_found_code() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("clients.db");

        let (code, out) = invoke(&db, &["get", "-1"]);
        assert_eq!(code, ExitCode::from(EXIT_NOT_FOUND));
        assert!(out.is_empty());
    }

    #[test]
    fn add_then_get_round_trips_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("clients.db");

        let id = add_test_client(&db, "Test");
        assert!(id > 0);

        let (code, out) = invoke(&db, &["get", &id.to_string()]);
        assert_eq!(code, ExitCode::SUCCESS);
        let client: Client = serde_json::from_str(&out).unwrap();
        assert_eq!(client.id, id);
        assert_eq!(client.fio, "Test");
        assert_eq!(client.login, "Test");
        assert_eq!(client.birthday, "19700101");
        assert_eq!(client.email, "mail@mail.com");
    }

    #[test]
    fn delete_missing_client_succeeds_and_delete_removes_row() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("clients.db");

        let (code, out) = invoke(&db, &["delete", "-1"]);
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(out.is_empty());

        let id = add_test_client(&db, "Test");
        let (code, _) = invoke(&db, &["delete", &id.to_string()]);
        assert_eq!(code, ExitCode::SUCCESS);

        let (code, _) = invoke(&db, &["get", &id.to_string()]);
        assert_eq!(code, ExitCode::from(EXIT_NOT_FOUND));
    }

    #[test]
    fn list_prints_one_json_line_per_client() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("clients.db");
        let first = add_test_client(&db, "a");
        let second = add_test_client(&db, "b");

        let (code, out) = invoke(&db, &["list"]);
        assert_eq!(code, ExitCode::SUCCESS);
        let ids: Vec<i64> = out
            .lines()
            .map(|line| serde_json::from_str::<Client>(line).unwrap().id)
            .collect();
        assert_eq!(ids, vec![first, second]);

        let (_, page) = invoke(&db, &["list", "--limit", "1", "--offset", "1"]);
        assert_eq!(page.lines().count(), 1);
        assert!(page.contains("\"login\":\"b\""));
    }

    #[test]
    fn db_flag_overrides_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let configured = dir.path().join("configured.db");
        let flagged = dir.path().join("flagged.db");

        let cli = Cli::try_parse_from([
            "clientdb",
            "--db",
            flagged.to_str().unwrap(),
            "list",
        ])
        .unwrap();
        let config = Config {
            database_path: configured.clone(),
            ..Config::default()
        };
        let mut out = Vec::new();
        assert_eq!(run(cli, config, &mut out).unwrap(), ExitCode::SUCCESS);

        assert!(flagged.exists());
        assert!(!configured.exists());
    }
}
