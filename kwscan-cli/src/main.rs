use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use kwscan::{
    config::CliOverrides, discover_files, run, scan::serve, ConcurrencyModel, IsolatedWorkerPool,
    KeywordSet, RunReport, ScanConfig, SharedMemoryPool, WorkerPool,
};
use std::{num::NonZeroUsize, path::PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct CliScanConfig {
    /// Keyword to search for (can be specified multiple times)
    #[arg(short = 'k', long = "keyword")]
    keywords: Vec<String>,

    /// Directory containing the files to scan
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// File extensions to include (e.g. txt,md)
    #[arg(short = 'e', long)]
    extensions: Option<String>,

    /// Patterns to ignore (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Descend into subdirectories
    #[arg(short = 'R', long)]
    recursive: bool,

    /// Maximum number of concurrent workers
    #[arg(short = 'j', long)]
    workers: Option<NonZeroUsize>,

    /// Concurrency model to run (both|shared|isolated)
    #[arg(short = 'm', long, default_value = "both")]
    model: String,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan text files for keywords
    Scan(Box<CliScanConfig>),

    /// Serve a single isolated-worker job over stdin and stdout
    #[command(hide = true)]
    Worker {
        /// Log level for the worker's own signals
        #[arg(long, default_value = "info")]
        log_level: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelSelection {
    Both,
    Shared,
    Isolated,
}

impl ModelSelection {
    fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "both" => Ok(Self::Both),
            "shared" | "shared-memory" | "threads" => Ok(Self::Shared),
            "isolated" | "isolated-worker" | "processes" => Ok(Self::Isolated),
            other => bail!("Unknown concurrency model '{}' (expected both|shared|isolated)", other),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(config) => run_scan(*config),
        Commands::Worker { log_level } => {
            init_logging(&log_level);
            serve(std::io::stdin().lock(), std::io::stdout().lock())
                .context("worker failed to serve its job")
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_scan(cli: CliScanConfig) -> Result<()> {
    let selection = ModelSelection::parse(&cli.model)?;

    let file_extensions = cli.extensions.as_ref().map(|e| {
        e.split(',')
            .map(|s| s.trim().trim_start_matches('.').to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
    });

    let config = ScanConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(CliOverrides {
            keywords: cli.keywords,
            root_path: cli.root,
            file_extensions,
            ignore_patterns: cli.ignore,
            recursive: cli.recursive,
            max_workers: cli.workers,
            log_level: cli.log_level,
        });
    init_logging(&config.log_level);
    debug!(?config, "Effective configuration");

    let keywords = config.keyword_set()?;
    let files = discover_files(&config)?;

    let names: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
    println!("{}\n", format!("Found text files: {:?}", names).yellow());

    if files.is_empty() {
        let kinds = config
            .file_extensions
            .iter()
            .map(|e| format!(".{}", e))
            .collect::<Vec<_>>()
            .join("/");
        println!("{}", format!("No {} files found. Exiting.", kinds).red());
        return Ok(());
    }

    let mut reports = Vec::new();
    if selection != ModelSelection::Isolated {
        print_header(ConcurrencyModel::SharedMemory);
        let report = run_model(&SharedMemoryPool::new(), &files, &keywords, config.max_workers)?;
        print_report(&report, &keywords);
        reports.push(report);
    }
    if selection != ModelSelection::Shared {
        print_header(ConcurrencyModel::IsolatedWorker);
        let pool = IsolatedWorkerPool::current_exe()?.with_args([
            "worker",
            "--log-level",
            config.log_level.as_str(),
        ]);
        let report = run_model(&pool, &files, &keywords, config.max_workers)?;
        print_report(&report, &keywords);
        reports.push(report);
    }

    if let [shared, isolated] = reports.as_slice() {
        if shared.matches.set_eq(&isolated.matches) {
            println!(
                "{}",
                "Both concurrency models found the same matches.".green()
            );
        } else {
            println!(
                "{}",
                "Concurrency models disagree on the matches found.".red()
            );
            bail!("shared-memory and isolated-worker results differ");
        }
    }

    Ok(())
}

fn run_model<P: WorkerPool>(
    pool: &P,
    files: &[PathBuf],
    keywords: &KeywordSet,
    max_workers: NonZeroUsize,
) -> Result<RunReport> {
    run(pool, files, keywords, max_workers)
        .with_context(|| format!("{} run failed", pool.model()))
}

fn title(model: ConcurrencyModel) -> &'static str {
    match model {
        ConcurrencyModel::SharedMemory => "Shared-Memory",
        ConcurrencyModel::IsolatedWorker => "Isolated-Worker",
    }
}

fn print_header(model: ConcurrencyModel) {
    println!("{}", format!("--- {} Approach ---", title(model)).magenta());
}

fn print_report(report: &RunReport, keywords: &KeywordSet) {
    println!("{}", format!("{} results:", title(report.model)).magenta());
    for keyword in keywords.iter() {
        if let Some(files) = report.matches.get(keyword) {
            let names: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
            println!("{}", format!("{}: {:?}", keyword, names).bright_cyan());
        }
    }
    println!(
        "{}\n",
        format!("Time taken: {:.2} seconds", report.elapsed.as_secs_f64()).yellow()
    );
    debug!(
        model = %report.model,
        workers = report.workers,
        elapsed = %humantime::format_duration(report.elapsed),
        "Run finished"
    );
}
