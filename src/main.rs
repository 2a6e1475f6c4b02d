//! CLI entry point for the paper scanner.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use paper_scanner_core::scan::{DEFAULT_SOURCE_TIMEOUT, PaperScanner, ScanOptions, UnparsableDatePolicy, sort_papers};
use paper_scanner_core::source::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS, SourceConfig,
    build_default_source_registry, configure_source_http_timeouts,
};
use tracing::{debug, info, warn};

mod app_config;
mod cli;
mod output;

use app_config::{FileConfig, load_file_config};
use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let file_config = load_file_config(args.config.as_deref())?;

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config file > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => file_config
                .verbosity
                .map_or("info", app_config::VerbositySetting::log_level),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, ?file_config, "CLI arguments and config parsed");

    configure_source_http_timeouts(
        file_config
            .connect_timeout_secs
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        file_config
            .read_timeout_secs
            .unwrap_or(DEFAULT_READ_TIMEOUT_SECS),
    );

    let registry = build_default_source_registry(&source_config(&args, &file_config));
    let scanner = PaperScanner::new(registry, scan_options(&args, &file_config));
    let request = args.scan_request();

    info!(
        topics = request.topics.len(),
        sources = request.sources.len(),
        range = %request.date_preset,
        "Scanning"
    );

    let mut result = scanner.scan(&request).await;
    sort_papers(&mut result.papers, args.sort);
    if let Some(limit) = args.limit {
        result
            .papers
            .truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    if args.json {
        println!("{}", output::render_json(&result)?);
    } else {
        for line in output::render_table(&result.papers, output::terminal_width()) {
            println!("{line}");
        }
    }
    info!("{}", output::scan_summary(&result));

    if result.all_sources_failed() {
        warn!("Scan failed: no source returned results");
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn source_config(args: &Args, file: &FileConfig) -> SourceConfig {
    let defaults = SourceConfig::default();
    SourceConfig {
        arxiv_max_results: file.arxiv_max_results.unwrap_or(defaults.arxiv_max_results),
        openalex_per_page: file.openalex_per_page.unwrap_or(defaults.openalex_per_page),
        cors_proxy: args.cors_proxy.clone().or_else(|| file.cors_proxy.clone()),
        mailto: args.mailto.clone().or_else(|| file.mailto.clone()),
        arxiv_base_url: file
            .arxiv_base_url
            .clone()
            .unwrap_or(defaults.arxiv_base_url),
        openalex_base_url: file
            .openalex_base_url
            .clone()
            .unwrap_or(defaults.openalex_base_url),
    }
}

fn scan_options(args: &Args, file: &FileConfig) -> ScanOptions {
    let source_timeout = args
        .timeout
        .or(file.source_timeout_secs)
        .map_or(DEFAULT_SOURCE_TIMEOUT, Duration::from_secs);
    let unparsable_dates = if args.keep_undated {
        UnparsableDatePolicy::Retain
    } else {
        file.unparsable_dates.unwrap_or_default()
    };
    ScanOptions {
        source_timeout,
        unparsable_dates,
    }
}
