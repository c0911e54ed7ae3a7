/// ppi_tools - statistics and GO annotation for PPI datasets
///
/// The main entry point. It parses command-line arguments, sets up logging and
/// configuration, and dispatches to the `stats` or `annotate` command.

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use ppi_tools::app::{self, AnnotateOptions, AnnotationStatus};
use ppi_tools::config::{self, Config};
use ppi_tools::utils::file_utils;
use ppi_tools::utils::output_formatter;
use ppi_tools::Annotator;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "ppi_tools",
    version,
    about = "Statistics and GO annotation for protein-protein interaction datasets",
    long_about = "Helpers for protein-protein interaction (PPI) datasets:
- stats: count proteins and interactions per dataset file
- annotate: create GO annotation files (.anno) for network files (.ppi)
  with the go2ppi tool (requires Java and an Internet connection)"
)]
struct Cli {
    /// Path to JSON configuration file
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Set logging level (default: WARN)
    #[arg(long = "log-level", default_value = "warn", global = true)]
    log_level: LevelFilter,

    /// Write log output to this file instead of stderr
    #[arg(long = "log-file", global = true)]
    log_file: Option<PathBuf>,

    /// Suppress summaries and progress output
    #[arg(long = "quiet", action = ArgAction::SetTrue, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print protein and interaction counts for dataset files
    Stats(StatsArgs),
    /// Create annotation files for network files with go2ppi
    Annotate(AnnotateArgs),
}

/// Options shared by both commands for locating input files
#[derive(Args, Debug)]
struct InputArgs {
    /// Glob pattern selecting input files (default from configuration)
    #[arg(name = "pattern")]
    pattern: Option<String>,

    /// Directory to search
    #[arg(long = "dir", default_value = ".")]
    dir: PathBuf,

    /// Search subdirectories as well
    #[arg(long = "recursive", action = ArgAction::SetTrue)]
    recursive: bool,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Skip lines holding a single protein instead of failing the file
    #[arg(long = "lenient", action = ArgAction::SetTrue)]
    lenient: bool,

    /// Output in markdown format (wrapped in triple backticks)
    #[arg(long = "md", action = ArgAction::SetTrue)]
    md: bool,

    /// Export statistics to JSON file
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Export statistics to CSV file
    #[arg(long = "csv")]
    csv: Option<PathBuf>,

    /// Number of parallel workers (0=auto, default: auto)
    #[arg(long = "parallel", default_value = "0")]
    parallel: usize,
}

#[derive(Args, Debug)]
struct AnnotateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Java launcher
    #[arg(long = "java")]
    java: Option<String>,

    /// Path to go2ppi.jar
    #[arg(long = "jar")]
    jar: Option<String>,

    /// Main class of the annotation tool
    #[arg(long = "main-class")]
    main_class: Option<String>,

    /// Print the commands without running them
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Skip network files that already have an annotation file
    #[arg(long = "skip-existing", action = ArgAction::SetTrue)]
    skip_existing: bool,

    /// Number of parallel workers (0=auto, default: 1)
    #[arg(long = "parallel", default_value = "1")]
    parallel: usize,
}

/// Main entry point function
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    setup_logging(cli.log_level, cli.log_file.as_deref())?;

    // Load configuration
    let config = config::load_config(cli.config.as_deref())?;

    let success = match &cli.command {
        Command::Stats(args) => run_stats(args, &config, cli.quiet)?,
        Command::Annotate(args) => run_annotate(args, &config, cli.quiet)?,
    };

    if !success {
        process::exit(1);
    }

    Ok(())
}

/// Set up logging to stderr or a log file
fn setup_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(level);

    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();

    Ok(())
}

/// Find input files, reporting an empty match on stderr
fn collect_files(input: &InputArgs, default_pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = input.pattern.as_deref().unwrap_or(default_pattern);
    let files = file_utils::find_files(&input.dir, pattern, input.recursive)?;

    if files.is_empty() {
        eprintln!(
            "{} no files matching '{}' in {}",
            "Error:".red(),
            pattern,
            input.dir.display()
        );
    } else {
        info!("Found {} file(s) matching '{}'", files.len(), pattern);
    }

    Ok(files)
}

fn progress_bar(len: usize, quiet: bool) -> Result<Option<ProgressBar>> {
    if quiet || len < 2 {
        return Ok(None);
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(Some(pb))
}

/// Run the `stats` command, returning whether every file was counted
fn run_stats(args: &StatsArgs, config: &Config, quiet: bool) -> Result<bool> {
    let start_time = Instant::now();

    let files = collect_files(&args.input, &config.stats.pattern)?;
    if files.is_empty() {
        return Ok(false);
    }

    let lenient = args.lenient || config.stats.lenient;
    let pb = progress_bar(files.len(), quiet)?;
    let report = app::run_stats(&files, &args.input.dir, lenient, args.parallel, || {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    })?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    print!("{}", output_formatter::format_stats_table(&report.rows, args.md));

    if let Some(json_path) = &args.json {
        output_formatter::export_stats_json(&report.rows, json_path)?;
        info!("Wrote JSON report to {}", json_path.display());
    }
    if let Some(csv_path) = &args.csv {
        output_formatter::export_stats_csv(&report.rows, csv_path)?;
        info!("Wrote CSV report to {}", csv_path.display());
    }

    if !quiet {
        eprintln!("\n{}", "Statistics Complete".bold());
        eprintln!("{} {}", "Files counted:".green(), report.rows.len());
        if !report.failures.is_empty() {
            eprintln!("{} {}", "Files failed:".red(), report.failures.len());
            for (file, reason) in &report.failures {
                eprintln!("  - {}: {}", file, reason);
            }
        }
        eprintln!(
            "{} {:.2} seconds",
            "Time elapsed:".green(),
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(report.failures.is_empty())
}

/// Run the `annotate` command, returning whether every file succeeded
fn run_annotate(args: &AnnotateArgs, config: &Config, quiet: bool) -> Result<bool> {
    let start_time = Instant::now();

    let files = collect_files(&args.input, &config.annotate.pattern)?;
    if files.is_empty() {
        return Ok(false);
    }

    let mut annotator = Annotator::from_config(&config.annotate);
    if let Some(java) = &args.java {
        annotator.java = java.clone();
    }
    if let Some(jar) = &args.jar {
        annotator.jar = PathBuf::from(jar);
    }
    if let Some(main_class) = &args.main_class {
        annotator.main_class = main_class.clone();
    }

    let options = AnnotateOptions {
        dry_run: args.dry_run,
        skip_existing: args.skip_existing,
        parallel: args.parallel,
    };

    let workers = app::worker_count(args.parallel);
    let pb = if workers > 1 {
        progress_bar(files.len(), quiet)?
    } else {
        None
    };
    let outcomes = app::run_annotate(&files, &args.input.dir, &annotator, &options, || {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    })?;
    if let Some(pb) = pb {
        pb.finish_with_message("Annotation complete");
    }

    let count = |wanted: fn(&AnnotationStatus) -> bool| {
        outcomes.iter().filter(|o| wanted(&o.status)).count()
    };
    let annotated = count(|s| matches!(s, AnnotationStatus::Annotated));
    let skipped = count(|s| matches!(s, AnnotationStatus::Skipped));
    let failed = count(|s| matches!(s, AnnotationStatus::Failed(_)));

    if !quiet && !args.dry_run {
        eprintln!("\n{}", "Annotation Complete".bold());
        eprintln!("{} {}", "Files annotated:".green(), annotated);
        if skipped > 0 {
            eprintln!("{} {}", "Files skipped:".yellow(), skipped);
        }
        if failed > 0 {
            eprintln!("{} {}", "Files failed:".red(), failed);
        }
        eprintln!(
            "{} {:.2} seconds",
            "Time elapsed:".green(),
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(failed == 0)
}
