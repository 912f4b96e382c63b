use anyhow::{bail, Result};
use circbuf::config::{Config, OutputFormat};
use circbuf::{report, selftest, RingBuffer};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "circbuf", about = "Self-test for the circbuf ring buffer", version)]
struct Cli {
    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// List available scenarios and exit
    #[arg(long)]
    list: bool,

    /// Only run scenarios whose name contains NAME (repeatable)
    #[arg(long, value_name = "NAME")]
    only: Vec<String>,

    /// Write TOKENs into a 4-slot buffer, print what remains, and exit
    #[arg(long, value_name = "TOKEN", num_args = 1..)]
    feed: Vec<String>,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,

    /// Read settings from this file instead of the per-user config
    #[arg(long, value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (cfg, fallback) = match &cli.config_file {
        Some(path) => (Config::load_from(path)?, None),
        None       => Config::load(),
    };
    init_logging(if cli.verbose { "debug" } else { cfg.logging.level.as_str() });
    if let Some(reason) = fallback {
        log::debug!("using default config: {:#}", reason);
    }

    if cli.list {
        return run_list();
    }
    if cli.config {
        return run_print_config(&cfg, cli.config_file.as_deref());
    }
    if !cli.feed.is_empty() {
        return run_feed(&cli.feed);
    }

    let format = if cli.json { OutputFormat::Json } else { cfg.output.format };
    run_selftest(&cfg, &cli.only, format)
}

fn init_logging(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run_list() -> Result<()> {
    for s in selftest::scenarios() {
        println!("{:20} {}", s.name, s.description);
    }
    Ok(())
}

fn run_feed(tokens: &[String]) -> Result<()> {
    let mut buf: RingBuffer<String, 4> = RingBuffer::new();
    buf.extend(tokens.iter().cloned());
    log::debug!("fed {} token(s), {} retained", tokens.len(), buf.len());
    println!("{}", buf);
    Ok(())
}

fn run_selftest(cfg: &Config, only: &[String], format: OutputFormat) -> Result<()> {
    let selected = selftest::select(selftest::scenarios(), only);
    if selected.is_empty() {
        bail!("no scenario matches {:?} (try --list)", only);
    }

    let summary = selftest::run(&selected, cfg.general.stop_on_failure);
    match format {
        OutputFormat::Text => print!("{}", report::text(&summary, cfg.output.timestamp)),
        OutputFormat::Json => {
            let value = report::json(&summary, cfg.output.timestamp);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    if !summary.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_print_config(cfg: &Config, explicit: Option<&std::path::Path>) -> Result<()> {
    let path = explicit
        .map(|p| p.to_path_buf())
        .or_else(Config::config_path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let format = match cfg.output.format {
        OutputFormat::Text => "text",
        OutputFormat::Json => "json",
    };
    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  stop_on_failure = {}", cfg.general.stop_on_failure);
    println!();
    println!("[output]");
    println!("  format    = {}", format);
    println!("  timestamp = {}", cfg.output.timestamp);
    println!();
    println!("[logging]");
    println!("  level = {}", cfg.logging.level);
    Ok(())
}
