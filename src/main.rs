//! bundledupes - Find packages bundled in more than one version.
//!
//! Usage:
//!   bundledupes                         Analyze ./.next/analyze/client.html
//!   bundledupes --root apps/web         Analyze another project root
//!   bundledupes --report stats.json     Analyze an explicit report
//!   bundledupes --format json           Print the report as JSON
//!   bundledupes --help                  Show help

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use crossterm::style::Stylize;
use humansize::{FixedAt, FormatSizeOptions, WINDOWS};
use tracing_subscriber::EnvFilter;

use bundledupes_analyze::{DuplicateGroup, PackageAnalyzer, PackageReport, ResolvedPackage};
use bundledupes_core::{AnalyzeConfig, MissingSizePolicy, ReportFormat};
use bundledupes_report::{flatten, load_report};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "BUNDLEDUPES_LOG";

#[derive(Parser)]
#[command(
    name = "bundledupes",
    version,
    about = "Find packages bundled in more than one version",
    long_about = "bundledupes reads a webpack-bundle-analyzer report, maps every bundled \
                  file back to its pnpm installation and lists the packages that ship \
                  in more than one version, with the bytes they waste."
)]
struct Cli {
    /// Project root containing node_modules
    #[arg(long, env = "ROOT", default_value = ".")]
    root: PathBuf,

    /// Report to analyze (defaults to <ROOT>/.next/analyze/client.html)
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "auto")]
    report_format: ReportFormatArg,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// How to count files the report gives no size for
    #[arg(long, default_value = "zero")]
    missing_size: MissingSizeArg,

    /// Sizes above this many bytes are highlighted
    #[arg(short, long, default_value = "20000")]
    threshold: u64,

    /// Log pipeline progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormatArg {
    Auto,
    Html,
    Json,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Auto => ReportFormat::Auto,
            ReportFormatArg::Html => ReportFormat::Html,
            ReportFormatArg::Json => ReportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MissingSizeArg {
    Zero,
    Exclude,
}

impl From<MissingSizeArg> for MissingSizePolicy {
    fn from(arg: MissingSizeArg) -> Self {
        match arg {
            MissingSizeArg::Zero => MissingSizePolicy::Zero,
            MissingSizeArg::Exclude => MissingSizePolicy::Exclude,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AnalyzeConfig::builder()
        .root(cli.root)
        .report_path(cli.report)
        .report_format(ReportFormat::from(cli.report_format))
        .missing_size(MissingSizePolicy::from(cli.missing_size))
        .large_size_threshold(cli.threshold)
        .build()
        .context("Invalid configuration")?;

    let report = run_analysis(&config)?;

    match cli.format {
        OutputFormat::Text => print_report(&config, &report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Install the stderr log subscriber.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load, flatten and analyze the configured report.
fn run_analysis(config: &AnalyzeConfig) -> Result<PackageReport> {
    let report_path = config.report_path();
    let format = config.effective_report_format();
    tracing::debug!(report = %report_path.display(), ?format, "loading report");

    let nodes = load_report(&report_path, format)
        .with_context(|| format!("Failed to load {}", report_path.display()))?;
    let entries = flatten(&nodes, config.missing_size);

    tracing::info!(files = entries.len(), "flattened report");

    PackageAnalyzer::with_config(config)
        .analyze(entries)
        .context("Analysis failed")
}

/// Print the text report.
fn print_report(config: &AnalyzeConfig, report: &PackageReport) {
    let threshold = config.large_size_threshold;

    println!(
        "Analyzing browser bundle from {}.",
        config.report_path().display()
    );
    println!("Sizes shown are for minified and tree-shaken files (before compression).");
    println!(
        "Total size of all node_modules, minified: {}",
        format_size(report.total_size, threshold)
    );
    println!();

    if report.has_duplicates() {
        println!(
            "{}",
            format!("{} duplicate packages found.", report.duplicate_count()).red()
        );
        println!(
            "Estimated size wasted: {}",
            format_size(report.total_savings, threshold)
        );
    } else {
        println!("{}", "No duplicate packages found.".green());
    }
    println!();

    for group in &report.duplicates {
        print_duplicate(group, threshold);
    }

    for package in &report.unique {
        println!("{} has a single version:", package.name);
        print_install(package, threshold, "");
        println!();
    }
}

fn print_duplicate(group: &DuplicateGroup, threshold: u64) {
    println!("{} has {} versions:", group.name, group.count());
    for install in &group.installs {
        print_install(install, threshold, "  ");
    }
    println!();
}

fn print_install(package: &ResolvedPackage, threshold: u64, indent: &str) {
    for line in install_lines(package, threshold, indent) {
        println!("{line}");
    }
}

/// Lines for one installation and, if it has several, its files.
///
/// `indent` prefixes the version line only; file lines are always indented
/// four spaces and followed by a blank line.
fn install_lines(package: &ResolvedPackage, threshold: u64, indent: &str) -> Vec<String> {
    let mut lines = vec![format!(
        "{indent}{} ({}) (in {})",
        package.version,
        format_size(package.size(), threshold),
        package.manifest_path
    )];

    if package.files.len() > 1 {
        for file in &package.files {
            lines.push(format!("    {} ({})", format_size(file.size, threshold), file.path));
        }
        lines.push(String::new());
    }

    lines
}

/// Format size in kilobytes, red above the threshold.
fn format_size(bytes: u64, threshold: u64) -> String {
    let options = FormatSizeOptions::from(WINDOWS)
        .fixed_at(Some(FixedAt::Kilo))
        .decimal_places(2)
        .decimal_zeroes(2);
    let text = humansize::format_size(bytes, options);

    if bytes > threshold {
        text.red().to_string()
    } else {
        text.yellow().to_string()
    }
}
