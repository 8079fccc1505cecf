//! crashscan - crash signature scanner and reporter for system logs
//!
//! Walks a log file or directory, scans for crash signatures and writes
//! a context-rich text report (or a JSON summary with `--json`).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use crashscan::{discovery, pattern_file};
use crashscan_core::{render_text, PatternSet, PatternSpec, ReportMeta, ScanJob};

#[derive(Parser, Debug)]
#[command(name = "crashscan")]
#[command(about = "Crash signature scanner and reporter for system logs", version)]
struct Cli {
    /// Log file or directory to scan
    path: PathBuf,

    /// Output report file (default: crash_report_<timestamp>.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Context lines captured before and after each match
    #[arg(long, default_value_t = 5)]
    context: usize,

    /// Additional case-insensitive regex pattern (repeatable)
    #[arg(long = "pattern")]
    patterns: Vec<String>,

    /// TOML file with additional, optionally labeled patterns
    #[arg(long)]
    patterns_file: Option<PathBuf>,

    /// Worker threads ("auto" = CPU count, 1 = sequential)
    #[arg(long, default_value = "auto")]
    threads: String,

    /// Print the scan result as JSON to stdout instead of writing a report
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if !cli.path.exists() {
        bail!("path not found: {}", cli.path.display());
    }

    // Pattern compilation fails the run before any scanning starts.
    let mut specs: Vec<PatternSpec> = cli
        .patterns
        .iter()
        .map(|p| PatternSpec {
            label: None,
            regex: p.clone(),
        })
        .collect();
    if let Some(path) = &cli.patterns_file {
        specs.extend(pattern_file::load(path)?);
    }
    let patterns = PatternSet::with_specs(&specs).context("invalid pattern configuration")?;

    let files = discovery::collect_files(&cli.path);
    info!(files = files.len(), patterns = patterns.len(), "starting scan");
    println!("[*] Scanning {} for crash signatures...", cli.path.display());

    let job = ScanJob::new(cli.context).with_threads(parse_threads(&cli.threads));
    let result = job.run(&files, &patterns);
    println!("[*] Found {} potential crash events.", result.event_count());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let meta = ReportMeta::collect();
    let report = render_text(&result, &meta);

    let output = cli.output.unwrap_or_else(default_output_name);
    let file = File::create(&output)
        .with_context(|| format!("create report file {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(report.as_bytes()).context("write report")?;
    writer.flush().context("flush report")?;

    println!("[+] Report generated: {}", output.display());
    Ok(())
}

fn default_output_name() -> PathBuf {
    PathBuf::from(format!(
        "crash_report_{}.txt",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Parse the thread count argument; "auto" means machine parallelism.
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") {
        return None;
    }
    s.parse::<usize>().ok().filter(|n| *n >= 1)
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
