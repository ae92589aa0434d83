use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use snss_rs::count::{count_tabs, CountObservation, HistoricalCounts};
use snss_rs::discovery::find_session_file;
use snss_rs::firefox::firefox_tab_count;
use snss_rs::session::parse_session;

/// Decode Chrome/Chromium SNSS session logs and report on open tabs
#[derive(Clone, Debug, Parser)]
struct Args {
    #[command(subcommand)]
    operation: Operation,
}

#[derive(Clone, Debug, Subcommand)]
enum Operation {
    /// Print the number of open tabs and record it to the history log
    Count(InputArgs),
    /// Decode a session file and print the full session state as JSON
    Dump(DumpArgs),
    /// Print previously recorded (timestamp, count) observations
    History,
    /// Run the Firefox recovery-file collaborator and print its tab count
    FirefoxCount,
}

#[derive(Clone, Debug, Parser)]
struct InputArgs {
    /// session log to read; defaults to the newest discovered Session_* file
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Clone, Debug, Parser)]
struct DumpArgs {
    /// session log to read; defaults to the newest discovered Session_* file
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("$HOME is not set"))
}

fn resolve_input(input: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = input {
        return Ok(path);
    }
    find_session_file(&home_dir()?).ok_or_else(|| anyhow!("no Session_* file found"))
}

fn history_log_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(".snss-rs-history.ndjson"))
}

fn now_unix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn run_count(args: InputArgs) -> Result<()> {
    // mirrors the reference implementation's get_tab_count: any fatal error
    // here degrades to "0 tabs", since this subcommand exists to feed a
    // monitoring consumer, not to explain decode failures.
    let count = (|| -> Result<usize> {
        let path = resolve_input(args.input)?;
        let file = std::fs::File::open(&path)?;
        let state = parse_session(std::io::BufReader::new(file))?;
        Ok(count_tabs(&state))
    })()
    .unwrap_or(0);

    println!("{count}");

    let log_path = history_log_path()?;
    let log = HistoricalCounts::new(&log_path);
    log.append(CountObservation {
        timestamp: now_unix(),
        count,
    })
    .context("failed to append to history log")?;

    Ok(())
}

fn run_dump(args: DumpArgs) -> Result<()> {
    let path = resolve_input(args.input)?;
    let file = std::fs::File::open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let state = parse_session(std::io::BufReader::new(file))?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&state)?
    } else {
        serde_json::to_string(&state)?
    };
    println!("{json}");
    Ok(())
}

fn run_history() -> Result<()> {
    let log_path = history_log_path()?;
    let log = HistoricalCounts::new(&log_path);
    for observation in log.read_all()? {
        println!("{}\t{}", observation.timestamp, observation.count);
    }
    Ok(())
}

fn run_firefox_count() -> Result<()> {
    match firefox_tab_count(&home_dir()?) {
        Some(count) => {
            println!("{count}");
            Ok(())
        }
        None => Err(anyhow!("Firefox tab count unavailable")),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.operation {
        Operation::Count(input_args) => run_count(input_args),
        Operation::Dump(dump_args) => run_dump(dump_args),
        Operation::History => run_history(),
        Operation::FirefoxCount => run_firefox_count(),
    }
}
