//! accountdeck - command-line client for accountdeck accounts.
//!
//! Sign up, log in and out, and manage the profile and settings of an
//! account on an accountdeck REST server. The session token is kept in the
//! OS keychain by default so later invocations stay logged in.

mod app;
mod output;
mod prompt;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use accountdeck_core::config::TokenBackend;
use accountdeck_core::Config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;

#[derive(Parser)]
#[command(name = "accountdeck")]
#[command(version)]
#[command(about = "Manage an accountdeck account from the terminal")]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the account API (overrides config and ACCOUNTDECK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Where to keep the session token: keyring, file or memory
    #[arg(long, global = true)]
    token_store: Option<String>,

    /// Log in automatically after a successful signup
    #[arg(long, global = true)]
    auto_login: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether a session is active
    Status,
    /// Create a new account
    Signup {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the profile of the logged-in account
    Profile,
    /// Edit name and bio
    ///
    /// With neither flag given, prompts for both using the current values
    /// as defaults. Pass an empty --bio to remove the bio.
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// Change the account password
    ChangePassword,
    /// Permanently delete the account
    DeleteAccount {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Score a name and bio without contacting the server
    Strength {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        bio: String,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` controls the level (default `warn`). The returned guard must be
/// held until exit so buffered file output is flushed.
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            Ok(None)
        }
    }
}

/// Stored config, then environment, then command-line flags. An invalid
/// override from either layer is an error.
fn load_config<F>(cli: &Cli, path: Option<&Path>, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::load_with(path, lookup)?;

    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    if let Some(store) = &cli.token_store {
        config.token_store = store.parse::<TokenBackend>()?;
    }
    if cli.auto_login {
        config.auto_login_on_signup = true;
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    // Offline; needs neither config nor a session store
    if let Commands::Strength { name, bio } = &cli.command {
        App::strength(name, bio);
        return Ok(());
    }

    let config = load_config(&cli, Config::config_path().ok().as_deref(), |key| {
        std::env::var(key).ok()
    })?;
    info!(api = %config.api_base_url, "accountdeck starting");
    let mut app = App::new(config)?;

    match cli.command {
        Commands::Status => app.status().await,
        Commands::Signup { name, email } => app.signup(name, email).await,
        Commands::Login { email } => app.login(email).await,
        Commands::Logout => app.logout().await,
        Commands::Profile => app.profile().await,
        Commands::Edit { name, bio } => app.edit(name, bio).await,
        Commands::ChangePassword => app.change_password().await,
        Commands::DeleteAccount { yes } => app.delete_account(yes).await,
        Commands::Strength { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let guard = match init_tracing(cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        drop(guard);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_delete_with_yes() {
        let cli = Cli::try_parse_from(["accountdeck", "delete-account", "--yes"])
            .expect("Failed to parse args");
        assert!(matches!(cli.command, Commands::DeleteAccount { yes: true }));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "accountdeck",
            "login",
            "--email",
            "a@b.co",
            "--api-url",
            "https://accounts.example.com",
            "--token-store",
            "memory",
        ])
        .expect("Failed to parse args");
        assert_eq!(cli.api_url.as_deref(), Some("https://accounts.example.com"));
        assert_eq!(cli.token_store.as_deref(), Some("memory"));
        assert!(matches!(cli.command, Commands::Login { email: Some(ref e) } if e == "a@b.co"));
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn stored_config(dir: &Path) -> PathBuf {
        let path = dir.join("config.json");
        std::fs::write(
            &path,
            r#"{"api_base_url": "https://prod.example.com", "token_store": "file"}"#,
        )
        .expect("Failed to write config");
        path
    }

    #[test]
    fn test_invalid_env_override_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = stored_config(dir.path());
        let cli = Cli::try_parse_from(["accountdeck", "status"]).expect("Failed to parse args");

        let result = load_config(&cli, Some(&path), |key: &str| {
            (key == "ACCOUNTDECK_AUTO_LOGIN").then(|| "maybe".to_string())
        });
        assert!(result.is_err());

        let config = load_config(&cli, Some(&path), no_env).expect("Failed to load config");
        assert_eq!(config.api_base_url, "https://prod.example.com");
        assert_eq!(config.token_store, TokenBackend::File);
    }

    #[test]
    fn test_flags_override_stored_config() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = stored_config(dir.path());
        let cli = Cli::try_parse_from([
            "accountdeck",
            "--token-store",
            "memory",
            "--auto-login",
            "status",
        ])
        .expect("Failed to parse args");

        let config = load_config(&cli, Some(&path), no_env).expect("Failed to load config");
        assert_eq!(config.api_base_url, "https://prod.example.com");
        assert_eq!(config.token_store, TokenBackend::Memory);
        assert!(config.auto_login_on_signup);

        let bad = Cli::try_parse_from(["accountdeck", "--token-store", "vault", "status"])
            .expect("Failed to parse args");
        assert!(load_config(&bad, Some(&path), no_env).is_err());
    }

    #[tokio::test]
    async fn test_strength_runs_without_config_or_session() {
        let cli = Cli::try_parse_from([
            "accountdeck",
            "--token-store",
            "vault",
            "strength",
            "--name",
            "Ada",
        ])
        .expect("Failed to parse args");
        assert!(run(cli).await.is_ok());
    }

    #[test]
    fn test_strength_defaults_to_empty_fields() {
        let cli = Cli::try_parse_from(["accountdeck", "strength", "--name", "Ada"])
            .expect("Failed to parse args");
        match cli.command {
            Commands::Strength { name, bio } => {
                assert_eq!(name, "Ada");
                assert_eq!(bio, "");
            }
            _ => panic!("Expected strength command"),
        }
    }
}
