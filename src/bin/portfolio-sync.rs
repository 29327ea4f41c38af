use anyhow::Context;
use clap::{Parser, Subcommand};
use portfolio_sync::adapters::GitHubAdapter;
use portfolio_sync::auth::EnvAuthProvider;
use portfolio_sync::commands::{self, UpdateOptions};
use portfolio_sync::config::{PortfolioConfig, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// CLI arguments for portfolio-sync
#[derive(Parser, Debug)]
#[command(name = "portfolio-sync")]
#[command(about = "Builds the portfolio data file from an account's repositories")]
#[command(version)]
struct Args {
    /// Path to the YAML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Account whose repositories are showcased (overrides the config file)
    #[arg(short, long)]
    account: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild the portfolio data file (default)
    Update,
    /// Verify token, API access and output directories
    Check,
    /// Print the JSON Schema of the portfolio data file
    Schema,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before anything reads the token
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,portfolio_sync=info"));

    // Logs go to stderr so `schema` output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let command = args.command.unwrap_or(Command::Update);

    if let Command::Schema = command {
        println!("{}", commands::schema()?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = PortfolioConfig::load(&args.config)
        .await
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(account) = args.account {
        config.account = account;
    }
    config.validate()?;

    let auth = Arc::new(EnvAuthProvider::new());
    commands::require_token(auth.as_ref(), &config.token_env).await?;

    let forge = Arc::new(GitHubAdapter::with_api_url(
        auth,
        &config.token_env,
        &config.api_url,
        config.http_timeout(),
    )?);

    tracing::info!("Starting portfolio-sync for {} at {}", config.account, chrono::Utc::now());

    match command {
        Command::Update => {
            let report = commands::update(forge, &config, UpdateOptions::new()).await?;
            println!("{}", report.format());
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => {
            let report = commands::check(forge, &config).await;
            println!("{}", report.format());
            Ok(if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Schema => Ok(ExitCode::SUCCESS),
    }
}
