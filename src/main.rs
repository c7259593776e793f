use anyhow::{Context, Result};
use clap::Parser;
use judge0_client::commands::{self, SourceOptions};
use judge0_client::config::Judge0Config;
use judge0_client::judge0::{DEFAULT_LANGUAGE_ID, DEFAULT_POLL_INTERVAL, Judge0Client};
use judge0_client::runtime::{RealRuntime, Runtime};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// judge0 - run code on a Judge0 server
///
/// Connection settings come from JUDGE0_API_URL, JUDGE0_API_KEY,
/// JUDGE0_API_HOST, JUDGE0_TIMEOUT and JUDGE0_MAX_WAIT. RapidAPI headers
/// are sent when both JUDGE0_API_KEY and JUDGE0_API_HOST are set.
///
/// Examples:
///   judge0 run hello.py                  # Run with Python 3 and print the result
///   judge0 run main.c -l 50 --stdin 42   # Run C with input
///   judge0 submit main.py                # Print the token only
///   judge0 wait <TOKEN>                  # Wait for a submitted run
#[derive(Parser, Debug)]
#[command(author, version = env!("JUDGE0_CLIENT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Judge0 API URL (overrides JUDGE0_API_URL)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = parse_seconds, global = true)]
    pub timeout: Option<Duration>,

    /// Maximum time to wait for a submission in seconds
    #[arg(long = "max-wait", value_name = "SECS", value_parser = parse_seconds, global = true)]
    pub max_wait: Option<Duration>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Submit a source file and wait for the result
    Run(RunArgs),

    /// Submit a source file and print its token
    Submit(SourceArgs),

    /// Fetch the current state of a submission
    Status(StatusArgs),

    /// Wait for a submission to finish
    Wait(WaitArgs),

    /// List the languages supported by the server
    Languages,

    /// Check whether the server is reachable
    Health(HealthArgs),
}

#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// Source file to execute
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Judge0 language id (71 is Python 3)
    #[arg(long, short = 'l', value_name = "ID", default_value_t = DEFAULT_LANGUAGE_ID)]
    pub language: i64,

    /// Standard input for the program
    #[arg(long, value_name = "TEXT")]
    pub stdin: Option<String>,

    /// Output the program is expected to print
    #[arg(long = "expected-output", value_name = "TEXT")]
    pub expected_output: Option<String>,

    /// Extra submission field; VALUE is parsed as JSON when possible
    #[arg(long = "param", short = 'p', value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

impl SourceArgs {
    fn options(&self) -> SourceOptions {
        SourceOptions {
            file: self.file.clone(),
            language_id: self.language,
            stdin: self.stdin.clone(),
            expected_output: self.expected_output.clone(),
            params: self.params.clone(),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the token instead of waiting for the result
    #[arg(long = "no-wait")]
    pub no_wait: bool,

    /// Seconds between status polls
    #[arg(long = "poll-interval", value_name = "SECS", value_parser = parse_seconds)]
    pub poll_interval: Option<Duration>,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Submission token
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Comma separated list of fields to return
    #[arg(long, value_name = "FIELDS")]
    pub fields: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct WaitArgs {
    /// Submission token
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Seconds between status polls
    #[arg(long = "poll-interval", value_name = "SECS", value_parser = parse_seconds)]
    pub poll_interval: Option<Duration>,
}

#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Print the full health report as JSON
    #[arg(long)]
    pub details: bool,
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", raw))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("'{}' must be greater than zero", raw));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("'{}' is out of range: {}", raw, e))
}

/// Environment configuration with command line overrides applied.
fn build_config<R: Runtime + ?Sized>(runtime: &R, cli: &Cli) -> Result<Judge0Config> {
    let mut config =
        Judge0Config::from_env(runtime).context("Failed to load configuration from environment")?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url.clone());
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(timeout);
    }
    if let Some(max_wait) = cli.max_wait {
        config = config.with_max_wait(max_wait);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let runtime = RealRuntime;
    let config = build_config(&runtime, &cli)?;
    let client = Judge0Client::new(config).context("Invalid client configuration")?;
    let max_wait = client.config().max_wait();
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Run(args) => {
            let request = commands::build_request(&runtime, &args.source.options())?;
            let poll_interval = args.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL);
            commands::run(&client, &request, !args.no_wait, max_wait, poll_interval, &mut out)
                .await?
        }
        Commands::Submit(args) => {
            let request = commands::build_request(&runtime, &args.options())?;
            commands::submit(&client, &request, &mut out).await?
        }
        Commands::Status(args) => {
            commands::status(&client, &args.token, args.fields.as_deref(), &mut out).await?
        }
        Commands::Wait(args) => {
            let poll_interval = args.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL);
            commands::wait(&client, &args.token, max_wait, poll_interval, &mut out).await?
        }
        Commands::Languages => commands::languages(&client, &mut out).await?,
        Commands::Health(args) => {
            let healthy = commands::health(&client, args.details, &mut out).await?;
            if !healthy {
                out.flush()?;
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
