use std::path::PathBuf;
use std::sync::Arc;

use admin_console::auth::{AuthError, AuthFlow};
use admin_console::config::{ConfigError, ConsoleConfig};
use admin_console::dashboard;
use admin_console::guard::{GuardError, SessionGuard};
use admin_console::net::{ApiError, Credentials, HttpAdminApi};
use admin_console::session::SessionStore;
use admin_console::session::storage::FileStorage;
use admin_console::state::loader::LoadState;
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Guard(#[from] GuardError),
    #[error("session was rejected by the server; log in again")]
    SessionExpired,
}

#[derive(Parser, Debug)]
#[command(name = "admin-console", about = "Kwacha Tracker admin console")]
struct Cli {
    #[arg(long, help = "Admin API base URL (overrides ADMIN_API_BASE_URL)")]
    base_url: Option<String>,

    #[arg(long, help = "Session file path (overrides ADMIN_SESSION_FILE)")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session.
    Login {
        #[arg(long, env = "ADMIN_USERNAME", value_parser = NonEmptyStringValueParser::new())]
        username: String,
        #[arg(
            long,
            env = "ADMIN_PASSWORD",
            hide_env_values = true,
            value_parser = NonEmptyStringValueParser::new()
        )]
        password: String,
    },
    /// Sign out and remove the persisted session.
    Logout,
    /// Report whether a session exists.
    Status,
    /// Show the stats dashboard.
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConsoleConfig::from_env()?.with_overrides(cli.base_url.as_deref(), cli.session_file)?;

    let session = Arc::new(SessionStore::open(FileStorage::new(&config.session_file)));
    let api = HttpAdminApi::new(&config.api_base_url, config.timeouts)?;
    tracing::debug!(base_url = api.base_url(), session_file = %config.session_file.display(), "console configured");

    match cli.command {
        Command::Login { username, password } => run_login(AuthFlow::new(api, session), username, password).await,
        Command::Logout => run_logout(&AuthFlow::new(api, session)),
        Command::Status => {
            run_status(&session);
            Ok(())
        }
        Command::Stats => run_stats(api, session).await,
    }
}

async fn run_login(flow: AuthFlow<HttpAdminApi>, username: String, password: String) -> Result<(), CliError> {
    let credentials = Credentials::new(username, password);
    let outcome = flow.login(&credentials).await?;
    match outcome.user {
        Some(user) if !user.role.is_empty() => println!("signed in as {} ({})", user.username, user.role),
        Some(user) => println!("signed in as {}", user.username),
        None => println!("signed in as {}", credentials.username),
    }
    Ok(())
}

fn run_logout(flow: &AuthFlow<HttpAdminApi>) -> Result<(), CliError> {
    flow.logout()?;
    println!("signed out");
    Ok(())
}

fn run_status(session: &SessionStore) {
    if session.is_authenticated() {
        println!("signed in");
    } else {
        println!("signed out");
    }
}

async fn run_stats(api: HttpAdminApi, session: Arc<SessionStore>) -> Result<(), CliError> {
    let guard = SessionGuard::new(session);
    let token = guard.require()?;

    let loader = dashboard::stats_loader(Arc::new(api), token);
    eprintln!("{}", dashboard::LOADING_TEXT);

    let mut expired = false;
    if let LoadState::Failed(failure) = loader.load().await {
        eprintln!("warning: could not load stats ({failure}); showing defaults");
        expired = match guard.on_failure(&failure) {
            Ok(destroyed) => destroyed,
            Err(e) => {
                eprintln!("warning: {e}; delete the session file to sign out");
                true
            }
        };
    }

    println!("Dashboard Overview");
    print!("{}", dashboard::render(&loader.view()));

    if expired {
        return Err(CliError::SessionExpired);
    }
    Ok(())
}
