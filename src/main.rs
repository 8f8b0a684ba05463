use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;

use traceline::config::Config;
use traceline::ledger::UsageLedger;
use traceline::store::AnnotationStore;
use traceline::timeline;

#[derive(Parser)]
#[command(
    name = "traceline",
    about = "Builds daily activity timelines and token usage reports from screen-capture annotations",
    version
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data root, overriding the configured root_dir
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build one day's timeline and stats
    Timeline {
        /// Day to build, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show one day's token ledger
    Usage {
        /// Day to report, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Token totals over the most recent days
    Summary {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Record an API call in today's token ledger
    Log {
        #[arg(long)]
        api_type: String,
        #[arg(long)]
        total_tokens: u64,
        #[arg(long, default_value_t = 0)]
        prompt_tokens: u64,
        #[arg(long, default_value_t = 0)]
        completion_tokens: u64,
        #[arg(long)]
        context: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(err) = run(Cli::parse()) {
        log::error!("{err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(root) = cli.root {
        config.root_dir = root;
    }

    match cli.command {
        Command::Timeline { date } => {
            let store = AnnotationStore::new(&config.root_dir);
            let day = timeline::build_day(&store, &config.timeline, date.unwrap_or_else(today))?;
            print_json(&day)
        }
        Command::Usage { date } => {
            let ledger = UsageLedger::new(&config.root_dir);
            let usage = ledger.get_daily_usage(date.unwrap_or_else(today))?;
            print_json(&usage)
        }
        Command::Summary { days } => {
            let ledger = UsageLedger::new(&config.root_dir);
            let summary = ledger.get_summary(days)?;
            print_json(&summary)
        }
        Command::Log {
            api_type,
            total_tokens,
            prompt_tokens,
            completion_tokens,
            context,
        } => {
            let ledger = UsageLedger::new(&config.root_dir);
            ledger
                .log(
                    &api_type,
                    total_tokens,
                    prompt_tokens,
                    completion_tokens,
                    context,
                )
                .with_context(|| format!("failed to log {api_type} usage"))?;
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
