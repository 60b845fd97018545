//! scout - incremental project-tree discovery.
//!
//! Usage:
//!   scout scan [PATH]           Scan a tree (cached, incremental)
//!   scout deps [PATH]           Build the dependency map
//!   scout impact PATH TARGET    Files that depend on TARGET
//!   scout cache-clear [PATH]    Drop cached scan state
//!   scout --help                Show help

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Context, Result};

use scout_analyze::{DependencyMap, DependencyMapper, DEPENDENCY_STORE_FILE};
use scout_cache::{CachedScanner, ScanCache, DEFAULT_CACHE_DIR};
use scout_core::{PatternMatcher, ScanParams, ScanReport};
use scout_scan::{ProgressMode, ProgressReporter, Scanner};

#[derive(Parser)]
#[command(
    name = "scout",
    version,
    about = "Incremental project-tree discovery with cached scans",
    long_about = "scout walks project trees, remembers what it saw, and answers\n\
                  repeat scans from an mtime-diffed cache. It can also map\n\
                  cross-file imports and tell you which files depend on a target."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a directory tree
    Scan {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// List only the immediate files of PATH
        #[arg(long)]
        non_recursive: bool,

        /// Maximum depth below PATH
        #[arg(short = 'd', long)]
        max_depth: Option<u32>,

        /// Extra ignore pattern (repeatable)
        #[arg(short = 'i', long = "ignore")]
        ignore_patterns: Vec<String>,

        /// Walk the tree fresh, bypassing the cache
        #[arg(long)]
        no_cache: bool,

        /// Progress verbosity: silent, simple, detailed, verbose
        #[arg(short, long, default_value = "silent")]
        progress: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Build and persist the dependency map for a tree
    Deps {
        /// Path to analyze
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show files that directly depend on a target file
    Impact {
        /// Path of the analyzed tree
        path: PathBuf,

        /// Target file, relative to PATH
        target: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Remove cached scan entries and the dependency store
    CacheClear {
        /// Path whose cache to clear
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            path,
            non_recursive,
            max_depth,
            ignore_patterns,
            no_cache,
            progress,
            format,
        } => run_scan(
            &path,
            non_recursive,
            max_depth,
            ignore_patterns,
            no_cache,
            &progress,
            format,
        ),
        Command::Deps { path, format } => run_deps(&path, format),
        Command::Impact {
            path,
            target,
            format,
        } => run_impact(&path, &target, format),
        Command::CacheClear { path } => run_cache_clear(&path),
    }
}

fn run_scan(
    path: &Path,
    non_recursive: bool,
    max_depth: Option<u32>,
    ignore_patterns: Vec<String>,
    no_cache: bool,
    progress: &str,
    format: OutputFormat,
) -> Result<()> {
    let root = path.canonicalize().context("Invalid path")?;
    let mode: ProgressMode = progress
        .parse()
        .map_err(|_| eyre!("Unknown progress mode: {progress}"))?;

    let params = ScanParams::builder()
        .root(root.clone())
        .recursive(!non_recursive)
        .max_depth(max_depth)
        .ignore_patterns(ignore_patterns)
        .build()
        .map_err(scout_core::ScanError::from)?;
    let matcher = PatternMatcher::for_root(&root, &params.ignore_patterns);
    let mut reporter = ProgressReporter::new(mode);

    let report = if no_cache {
        let started = std::time::Instant::now();
        let output = Scanner::new()
            .scan(&params, &matcher, &mut reporter)
            .context("Scan failed")?;
        ScanReport::fresh(output.result, started.elapsed(), output.warnings)
    } else {
        CachedScanner::new(Scanner::new(), ScanCache::for_root(&root))
            .scan(&params, &matcher, &mut reporter)
            .context("Scan failed")?
    };

    match format {
        OutputFormat::Text => print_report(&root, &report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn run_deps(path: &Path, format: OutputFormat) -> Result<()> {
    let root = path.canonicalize().context("Invalid path")?;
    let (map, warnings) = analyze_tree(&root)?;

    let store = root.join(DEFAULT_CACHE_DIR).join(DEPENDENCY_STORE_FILE);
    let mapper = DependencyMapper::new();
    mapper
        .save(&map, &store)
        .context("Failed to write dependency store")?;

    match format {
        OutputFormat::Text => {
            let edge_count: usize = map.iter().map(|(_, d)| d.dependencies.len()).sum();
            println!("Analyzed {} files, {} dependency edges", map.len(), edge_count);
            println!("Store written to {}", store.display());
            if warnings > 0 {
                println!("{warnings} file(s) skipped with warnings");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&map)?),
    }

    Ok(())
}

fn run_impact(path: &Path, target: &Path, format: OutputFormat) -> Result<()> {
    let root = path.canonicalize().context("Invalid path")?;
    let store = root.join(DEFAULT_CACHE_DIR).join(DEPENDENCY_STORE_FILE);

    let mapper = DependencyMapper::new();
    let map = {
        let loaded = mapper.load(&store);
        if loaded.is_empty() {
            analyze_tree(&root)?.0
        } else {
            loaded
        }
    };

    let impacted: BTreeSet<PathBuf> = mapper.get_impact_analysis(target, &map);

    match format {
        OutputFormat::Text => {
            if impacted.is_empty() {
                println!("Nothing depends on {}", target.display());
            } else {
                println!(
                    "{} file(s) depend on {}:",
                    impacted.len(),
                    target.display()
                );
                for path in &impacted {
                    println!("  {}", path.display());
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&impacted)?),
    }

    Ok(())
}

fn run_cache_clear(path: &Path) -> Result<()> {
    let root = path.canonicalize().context("Invalid path")?;
    let removed = ScanCache::for_root(&root)
        .clear()
        .context("Failed to clear cache")?;
    println!("Removed {removed} cache file(s)");
    Ok(())
}

/// Scan (cached) and analyze a tree; returns the map and the number of
/// analysis warnings.
fn analyze_tree(root: &Path) -> Result<(DependencyMap, usize)> {
    let params = ScanParams::new(root);
    let matcher = PatternMatcher::for_root(root, &params.ignore_patterns);

    let report = CachedScanner::new(Scanner::new(), ScanCache::for_root(root))
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .context("Scan failed")?;

    let files: Vec<PathBuf> = report.result.files.iter().cloned().collect();
    let output = DependencyMapper::new().analyze_codebase(root, &files);
    Ok((output.map, output.warnings.len()))
}

/// Print the text summary of a scan.
fn print_report(root: &Path, report: &ScanReport) {
    println!();
    println!("{}", "─".repeat(60));
    println!(" {}", root.display());
    println!(
        " {} files, {} folders",
        report.result.total_files, report.result.total_folders
    );
    println!(" Scanned in {:.2}s", report.scan_time.as_secs_f64());
    if report.cached {
        if report.incremental {
            println!(
                " From cache (incremental: {} new, {} changed, {} deleted)",
                report.delta.new, report.delta.changed, report.delta.deleted
            );
        } else {
            println!(" From cache (unchanged)");
        }
    }
    println!("{}", "─".repeat(60));

    if !report.result.categories.is_empty() {
        println!();
        for (category, count) in &report.result.categories {
            println!("   {category:<14} {count:>8}");
        }
    }

    let errors = report.error_summary();
    if !errors.is_empty() {
        println!();
        println!(" {} warning(s) during scan:", errors.total);
        for (kind, count) in &errors.by_kind {
            println!("   {kind:?}: {count}");
        }
    }
    println!();
}
