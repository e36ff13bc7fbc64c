use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use reposeed::{AppError, LoadOptions, OutputFormat};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "reposeed")]
#[command(version)]
#[command(
    about = "Bulk-apply CI workflow files and encrypted secrets across GitHub repositories",
    long_about = None
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// Manifest listing repositories and settings [default: reposeed.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Dotenv file with GITHUB_TOKEN and secret values [default: .env]
    #[arg(short, long)]
    env_file: Option<PathBuf>,
    /// Directory holding the workflow files to copy
    #[arg(short, long)]
    workflows: Option<PathBuf>,
    /// Repository URL; repeat to process several (replaces the manifest list)
    #[arg(short, long = "repo")]
    repos: Vec<String>,
    /// Pause after each API call, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
}

impl From<ConfigArgs> for LoadOptions {
    fn from(args: ConfigArgs) -> Self {
        LoadOptions {
            manifest: args.config,
            env_file: args.env_file,
            repositories: args.repos,
            workflows_dir: args.workflows,
            delay_ms: args.delay_ms,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Push workflows, enable Actions permissions, and upsert secrets
    #[clap(visible_alias = "r")]
    Run {
        #[command(flatten)]
        args: ConfigArgs,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate configuration and show what would be applied
    #[clap(visible_alias = "p")]
    Plan {
        #[command(flatten)]
        args: ConfigArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("REPOSEED_LOG").unwrap_or_else(|_| {
        if cli.verbose { EnvFilter::new("reposeed=debug") } else { EnvFilter::new("reposeed=warn") }
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).without_time())
        .init();

    let result: Result<i32, AppError> = match cli.command {
        Commands::Run { args, json } => {
            let format = if json { OutputFormat::Json } else { OutputFormat::Text };
            reposeed::run(&args.into(), format).map(|report| report.exit_status().code())
        }
        Commands::Plan { args } => reposeed::plan(&args.into())
            .map(|plan| if plan.invalid_count() > 0 { 1 } else { 0 }),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            if e.is_fatal() {
                eprintln!("   No repository was modified.");
            }
            std::process::exit(1);
        }
    }
}
