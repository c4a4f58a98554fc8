use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn, Level};

use splitrs::export::{self, OutputFormat};
use splitrs::logging::{init_logging, LogFormat, LogLevel};
use splitrs::{analyze_series, Activity, AppConfig, AxisMode, SegmentRange, SplitRsError};

/// SplitRS - Workout Segment Analysis CLI
///
/// Splits a GPX running workout into warm-up, interval and cool-down
/// segments and reports heart rate, cadence and duration for each.
#[derive(Parser)]
#[command(name = "splitrs")]
#[command(author = "SplitRS Contributors")]
#[command(version)]
#[command(about = "Workout Segment Analysis CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log format (pretty, json, compact)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a workout into segments and summarize each one
    Analyze {
        /// Input GPX file
        #[arg(short, long)]
        file: PathBuf,

        /// Segmentation axis (time, distance)
        #[arg(short, long)]
        mode: Option<AxisMode>,

        /// Warm-up range as START:END (seconds or meters)
        #[arg(long, value_name = "START:END")]
        warmup: Option<String>,

        /// Interval range as START:END (defaults to follow the warm-up)
        #[arg(long, value_name = "START:END")]
        interval: Option<String>,

        /// Cool-down range as START:END (defaults to follow the interval)
        #[arg(long, value_name = "START:END")]
        cooldown: Option<String>,

        /// Output format (table, json, csv)
        #[arg(short = 'F', long)]
        format: Option<OutputFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show what a GPX file contains before choosing ranges
    Inspect {
        /// Input GPX file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show or initialize the configuration file
    Config {
        /// Print the effective configuration
        #[arg(short, long)]
        list: bool,

        /// Write the default configuration if none exists
        #[arg(short, long)]
        init: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<SplitRsError>() {
            Some(split_err) => {
                match split_err.severity().to_tracing_level() {
                    Level::ERROR => error!(error = %split_err, "Analysis failed"),
                    Level::WARN => warn!(error = %split_err, "Analysis failed"),
                    _ => info!(error = %split_err, "Analysis failed"),
                }
                eprintln!("{} {}", "✗".red().bold(), split_err.user_message());
            }
            None => eprintln!("{} {:#}", "✗".red().bold(), err),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone();
    let mut config = match &config_path {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };

    config.logging.level = LogLevel::from_verbosity(config.logging.level, cli.verbose);
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    init_logging(&config.logging)?;
    config.analysis.validate()?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Analyze {
            file,
            mode,
            warmup,
            interval,
            cooldown,
            format,
            output,
        } => {
            let mode = mode.unwrap_or(config.analysis.default_mode);
            let format = format.unwrap_or(config.output.format);
            let warmup = parse_range(warmup.as_deref())?;
            let interval = parse_range(interval.as_deref())?;
            let cooldown = parse_range(cooldown.as_deref())?;

            eprintln!("{}", "Analyzing workout...".green().bold());
            eprintln!("  File: {}", file.display());
            eprintln!("  Axis: {} ({})", mode, mode.unit());

            let activity = Activity::from_file(&file)?;
            let series = activity.series(mode);
            if series.is_empty() {
                warn!(file = %file.display(), "No timestamped trackpoints found");
            }

            let plan = config
                .analysis
                .plan(mode, series.extent, warmup, interval, cooldown);

            let report = analyze_series(&series, &plan);
            export::write_report(&report, format, output.as_deref())?;

            if let Some(path) = output {
                eprintln!("{} Report written to {}", "✓".green(), path.display());
            }
        }

        Commands::Inspect { file } => {
            inspect(&file)?;
        }

        Commands::Config { list, init } => {
            let path = config_path.unwrap_or_else(AppConfig::default_config_path);

            if init {
                if path.exists() {
                    eprintln!("{} Config already exists: {}", "!".yellow(), path.display());
                } else {
                    AppConfig::default()
                        .save_to_file(&path)
                        .with_context(|| format!("Failed to initialize {}", path.display()))?;
                    eprintln!("{} Wrote default config to {}", "✓".green(), path.display());
                }
            }

            if list || !init {
                println!("# {}", path.display());
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

/// Parse an optional `START:END` argument, keeping the typed error for reporting
fn parse_range(raw: Option<&str>) -> splitrs::Result<Option<SegmentRange>> {
    raw.map(str::parse::<SegmentRange>)
        .transpose()
        .map_err(SplitRsError::from)
}

fn inspect(file: &Path) -> Result<()> {
    let activity = Activity::from_file(file)?;
    let time_series = activity.series(AxisMode::Time);
    let distance_series = activity.series(AxisMode::Distance);

    println!("{}", "Workout overview".cyan().bold());
    println!("  File: {}", file.display());
    println!("  Trackpoints: {}", activity.points().len());
    println!("  Timestamped rows: {}", time_series.len());
    println!(
        "  Duration: {} s ({:.1} min)",
        time_series.extent,
        time_series.extent as f64 / 60.0
    );
    println!("  Distance: {} m", distance_series.extent);
    println!(
        "  Heart rate: {}",
        if activity.has_heart_rate() { "present" } else { "missing" }
    );
    println!(
        "  Cadence: {}",
        if activity.has_cadence() { "present" } else { "missing" }
    );

    Ok(())
}
