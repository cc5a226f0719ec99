use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use authgate::config::{AppConfig, DirectoryConfig, DirectoryMode};
use authgate::directory::{RemoteUserDirectory, StaticUserDirectory, UserDirectory, UserRecord};
use authgate::login::LoginService;
use authgate::rpc::AuthRpc;
use clap::{Args, Parser, Subcommand};
use log::{LevelFilter, debug, info, warn};
use serde_json::json;
use tonic::transport::Server;

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine; the environment may already be populated.
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env(cli.common.config.as_deref())
        .context("loading configuration")?;
    init_logging(&cli.common, &config);
    debug!("effective configuration: {config:#?}");

    match cli.command {
        Command::Serve => async_serve(config),
        Command::Inspect(cmd) => handle_inspect(&config, cmd),
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "authgate - credential issuance service.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct CommonOpts {
    /// Read configuration from a TOML file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Reduce output to only errors
    #[arg(short, long, action = clap::ArgAction::SetTrue, global = true)]
    quiet: bool,
    /// Increase logging verbosity (stackable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Emit log lines as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Connect to the user directory and serve the gRPC login endpoint
    Serve,
    /// Parse a credential with the configured secret and print its claims
    Inspect(InspectCommand),
}

#[derive(Debug, Clone, Args)]
struct InspectCommand {
    /// The credential to inspect
    #[arg(value_name = "TOKEN")]
    token: String,
}

fn init_logging(common: &CommonOpts, config: &AppConfig) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    if common.quiet {
        log::set_max_level(LevelFilter::Off);
        return;
    }

    let level = effective_log_level(common, config);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "authgate={level},authgate_protocol={level},tonic=warn"
        ))
    });

    if common.json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_ansi(io::stderr().is_terminal()))
            .try_init()
            .ok();
    }

    // Also init env_logger for log users when no tracing bridge took over
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.filter_level(level);
    builder.try_init().ok();
}

fn effective_log_level(common: &CommonOpts, config: &AppConfig) -> LevelFilter {
    match common.verbose {
        0 => config.logging.level.parse().unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn async_serve(config: AppConfig) -> Result<()> {
    info!("Starting the server");

    let tokens = Arc::new(config.token.build_service());
    info!("Issuing tokens valid for {}s", tokens.ttl().as_secs());
    let directory = build_directory(&config.directory).await?;
    let login = Arc::new(LoginService::new(directory, tokens));

    let addr = config.server.listen_addr()?;
    info!("gRPC server listening on {addr}");

    Server::builder()
        .add_service(AuthRpc::new(login).into_server())
        .serve_with_shutdown(addr, shutdown_signal())
        .await
        .with_context(|| format!("serving gRPC on {addr}"))?;

    info!("Server stopped");
    Ok(())
}

async fn build_directory(config: &DirectoryConfig) -> Result<Arc<dyn UserDirectory>> {
    match config.mode {
        DirectoryMode::Remote => {
            info!("Connecting to user directory at {}", config.address);
            let directory = RemoteUserDirectory::connect(
                &config.address,
                config.request_timeout(),
                config.connect_policy(),
            )
            .await
            .context("connecting to user directory")?;
            Ok(Arc::new(directory))
        }
        DirectoryMode::Static => {
            let id = config
                .static_user_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            warn!(
                "Static user directory enabled: every login resolves to user {id} (admin: {})",
                config.static_is_admin
            );
            Ok(Arc::new(StaticUserDirectory::found(UserRecord::new(
                id,
                config.static_is_admin,
            ))))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn handle_inspect(config: &AppConfig, cmd: InspectCommand) -> Result<()> {
    let tokens = config.token.build_service();
    let claims = match tokens.parse(cmd.token.trim()) {
        Ok(claims) => claims,
        Err(e) if e.is_parse_error() => bail!("not a well-formed credential: {e}"),
        Err(e) => return Err(e).context("verifying token"),
    };
    let subject = tokens
        .decode_subject(&claims.subject)
        .context("decoding token subject")?;

    let now = chrono::Utc::now().timestamp();
    let report = json!({
        "claims": claims,
        "subject": subject,
        "checked_at": now,
        "expired": claims.is_expired_at(now),
    });
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, &report).context("writing report")?;
    writeln!(stdout)?;
    Ok(())
}
