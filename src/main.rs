use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use guarded_answer::connector::api::{Container, ContainerConfig, Router};
use guarded_answer::{Commands, RetryPolicy};

#[derive(Parser)]
#[command(name = "guarded-answer")]
#[command(author, version, about = "Ask questions about JPMorgan Chase", long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override GEMINI_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override GEMINI_MODEL
    #[arg(long, global = true)]
    model: Option<String>,

    /// Delay before the first retry; doubles on each further retry
    #[arg(long, global = true, default_value_t = RetryPolicy::DEFAULT_INITIAL_DELAY.as_millis() as u64)]
    initial_delay_ms: u64,

    #[arg(long, global = true, default_value_t = RetryPolicy::DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// Give up on a question after this many seconds, retries included
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Answer locally with a canned reply instead of calling the API
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let container = Container::new(ContainerConfig {
        mock: cli.mock,
        base_url: cli.base_url,
        model: cli.model,
        initial_delay: Duration::from_millis(cli.initial_delay_ms),
        max_retries: cli.max_retries,
        timeout: cli.timeout.map(Duration::from_secs),
        spinner: std::io::stderr().is_terminal(),
    })?;

    let router = Router::new(&container);
    // An interrupted REPL can leave a blocking stdin read behind; exit
    // without waiting for the runtime to wind down.
    match router.route(cli.command).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
