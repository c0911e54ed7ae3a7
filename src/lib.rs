/// ppi_tools - helpers for protein-protein interaction datasets
///
/// This library counts proteins and interactions in PPI files and drives the
/// go2ppi tool that annotates network files with GO terms.

pub mod core;
pub mod utils;

// Re-export main types for convenience
pub use crate::core::annotate::{AnnotateError, Annotator};
pub use crate::core::stats::{file_stats, stats_from_reader, PpiStats, StatsError};
pub use crate::utils::output_formatter::StatsRow;

/// Library configuration
pub mod config {
    use std::path::Path;

    use anyhow::{Context, Result};
    use log::{error, info};
    use serde::{Deserialize, Serialize};

    /// Settings for the `stats` command
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct StatsConfig {
        /// Glob pattern selecting dataset files
        pub pattern: String,
        /// Skip single-token lines instead of failing the file
        pub lenient: bool,
    }

    impl Default for StatsConfig {
        fn default() -> Self {
            Self {
                pattern: "??_*.txt".to_string(),
                lenient: false,
            }
        }
    }

    /// Settings for the `annotate` command
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct AnnotateConfig {
        pub pattern: String,
        pub java: String,
        pub jar: String,
        pub main_class: String,
        pub input_extension: String,
        pub output_extension: String,
    }

    impl Default for AnnotateConfig {
        fn default() -> Self {
            Self {
                pattern: "*.ppi".to_string(),
                java: "java".to_string(),
                jar: "go2ppi.jar".to_string(),
                main_class: "au.edu.imb.go2ppi.Id2go".to_string(),
                input_extension: "ppi".to_string(),
                output_extension: "anno".to_string(),
            }
        }
    }

    /// Top-level configuration file layout
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Config {
        pub stats: StatsConfig,
        pub annotate: AnnotateConfig,
    }

    /// Load configuration from a JSON file.
    ///
    /// A missing file falls back to the defaults; malformed JSON is an error.
    pub fn load_config(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(path) => path,
            None => return Ok(Config::default()),
        };

        if !path.exists() {
            error!("Configuration file not found: {}", path.display());
            return Ok(Config::default());
        }

        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let config = serde_json::from_str(&config_str)
            .with_context(|| format!("Invalid JSON in configuration file {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Command-line application functionality
pub mod app {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use log::{error, info, warn};
    use rayon::prelude::*;

    use crate::core::annotate::Annotator;
    use crate::core::stats::file_stats;
    use crate::utils::file_utils::display_name;
    use crate::utils::output_formatter::StatsRow;

    /// Statistics for a batch of files
    #[derive(Debug, Default)]
    pub struct StatsReport {
        /// Successfully counted files, sorted by name
        pub rows: Vec<StatsRow>,
        /// Files that could not be counted, with the reason
        pub failures: Vec<(String, String)>,
    }

    /// Resolve a worker count, 0 meaning one per logical CPU
    pub fn worker_count(parallel: usize) -> usize {
        if parallel == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            parallel
        }
    }

    fn build_pool(workers: usize) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| anyhow!("Failed to build thread pool: {}", e))
    }

    /// Compute statistics for every file
    ///
    /// # Arguments
    ///
    /// * `files` - Dataset files to count
    /// * `base` - Directory file names are reported relative to
    /// * `lenient` - Skip single-token lines instead of failing the file
    /// * `parallel` - Number of workers (0 = auto)
    /// * `on_done` - Called once per finished file
    ///
    /// # Returns
    ///
    /// Rows and failures, both sorted by file name
    pub fn run_stats<P, F>(
        files: &[P],
        base: &Path,
        lenient: bool,
        parallel: usize,
        on_done: F,
    ) -> Result<StatsReport>
    where
        P: AsRef<Path> + Sync,
        F: Fn() + Sync,
    {
        let report = Mutex::new(StatsReport::default());
        let pool = build_pool(worker_count(parallel))?;

        pool.install(|| {
            files.par_iter().for_each(|file| {
                let file = file.as_ref();
                let name = display_name(file, base);

                let outcome = file_stats(file, lenient);
                if let Ok(mut report) = report.lock() {
                    match outcome {
                        Ok(stats) => report.rows.push(StatsRow::new(name, stats)),
                        Err(e) => {
                            error!("{}", e);
                            report.failures.push((name, e.to_string()));
                        }
                    }
                }
                on_done();
            });
        });

        let mut report = report
            .into_inner()
            .map_err(|_| anyhow!("Statistics worker panicked"))?;
        report.rows.sort_by(|a, b| a.file.cmp(&b.file));
        report.failures.sort();

        Ok(report)
    }

    /// What happened to one network file
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum AnnotationStatus {
        Annotated,
        /// The annotation file already existed
        Skipped,
        /// Only the command line was printed
        DryRun,
        Failed(String),
    }

    /// Result of annotating one network file
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AnnotationOutcome {
        pub network: PathBuf,
        pub annotation: PathBuf,
        pub status: AnnotationStatus,
    }

    /// Options for an annotation run
    #[derive(Debug, Clone)]
    pub struct AnnotateOptions {
        /// Print the tool invocation instead of running it
        pub dry_run: bool,
        /// Leave files with an existing annotation alone
        pub skip_existing: bool,
        /// Number of workers (0 = auto)
        pub parallel: usize,
    }

    impl Default for AnnotateOptions {
        fn default() -> Self {
            Self {
                dry_run: false,
                skip_existing: false,
                parallel: 1,
            }
        }
    }

    fn annotate_one(
        annotator: &Annotator,
        network: &Path,
        base: &Path,
        options: &AnnotateOptions,
    ) -> AnnotationOutcome {
        let annotation = annotator.annotation_path(network);

        let status = if options.skip_existing && annotation.exists() {
            warn!(
                "Skipping {}: {} already exists",
                network.display(),
                annotation.display()
            );
            AnnotationStatus::Skipped
        } else if options.dry_run {
            println!("{}", annotator.command_line(network));
            AnnotationStatus::DryRun
        } else {
            println!("{}", display_name(network, base));
            match annotator.annotate(network) {
                Ok(_) => AnnotationStatus::Annotated,
                Err(e) => {
                    error!("{}", e);
                    AnnotationStatus::Failed(e.to_string())
                }
            }
        };

        AnnotationOutcome {
            network: network.to_path_buf(),
            annotation,
            status,
        }
    }

    /// Annotate every network file with the go2ppi tool
    ///
    /// # Arguments
    ///
    /// * `files` - Network files to annotate
    /// * `base` - Directory file names are echoed relative to
    /// * `annotator` - Tool invocation settings
    /// * `options` - Run options
    /// * `on_done` - Called once per finished file
    ///
    /// # Returns
    ///
    /// One outcome per file, in input order
    pub fn run_annotate<P, F>(
        files: &[P],
        base: &Path,
        annotator: &Annotator,
        options: &AnnotateOptions,
        on_done: F,
    ) -> Result<Vec<AnnotationOutcome>>
    where
        P: AsRef<Path> + Sync,
        F: Fn() + Sync,
    {
        let workers = worker_count(options.parallel);
        info!("Annotating {} file(s) with {} worker(s)", files.len(), workers);

        if workers == 1 {
            return Ok(files
                .iter()
                .map(|file| {
                    let outcome = annotate_one(annotator, file.as_ref(), base, options);
                    on_done();
                    outcome
                })
                .collect());
        }

        let pool = build_pool(workers)?;
        let outcomes: Vec<AnnotationOutcome> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let outcome = annotate_one(annotator, file.as_ref(), base, options);
                    on_done();
                    outcome
                })
                .collect()
        });

        Ok(outcomes)
    }
}
