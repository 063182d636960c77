//! Upshift — incremental 2to3 conversion cache for a Python source tree.
//!
//! # Usage
//!
//! ```text
//! upshift [TREES]... [--source-root DIR] [--build-root DIR] [--tag TAG]
//!         [--fixer PROG] [--config FILE] [--copy-only PATH]
//!         [--slow-threshold SECS] [--json]
//! ```
//!
//! Mirrors each known subtree into `build/<tag>/<subtree>` and re-runs the
//! external fixer only on files that changed since the last run. Editing
//! one source file and re-running converts just that file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;

use upshift_convert::pipeline::RunOptions;
use upshift_convert::{pipeline, CancelToken, ConvertError, FixerCommand, RunSummary};
use upshift_core::config::RunConfig;
use upshift_core::types::TreeName;

#[derive(Parser, Debug)]
#[command(
    name = "upshift",
    version,
    about = "Incrementally mirror and 2to3-convert a Python source tree",
    long_about = None,
)]
struct Cli {
    /// Subtree names to process; defaults to every known subtree.
    trees: Vec<String>,

    /// Root of the Python 2 sources.
    #[arg(long, default_value = ".")]
    source_root: PathBuf,

    /// Root for converted trees; defaults to `<source-root>/build/<tag>`.
    #[arg(long)]
    build_root: Option<PathBuf>,

    /// Platform/version tag segment of the default build layout.
    #[arg(long)]
    tag: Option<String>,

    /// External fixer program to invoke per file.
    #[arg(long)]
    fixer: Option<PathBuf>,

    /// Config file; defaults to `upshift.yaml` in the source root.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source-root-relative directory to mirror without converting.
    #[arg(long)]
    copy_only: Option<PathBuf>,

    /// Report the slowest conversions when the slowest exceeds this many
    /// seconds.
    #[arg(long)]
    slow_threshold: Option<f64>,

    /// Print the run summary as JSON instead of the human summary.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            RunConfig::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => RunConfig::load_or_default(&cli.source_root).context("loading upshift.yaml")?,
    };

    let trees = select_trees(&cli.trees, &config);
    if trees.is_empty() {
        println!("Nothing to do: no known subtrees selected.");
        return Ok(());
    }

    let tag = cli.tag.unwrap_or_else(|| config.platform_tag.clone());
    let build_root = cli
        .build_root
        .unwrap_or_else(|| cli.source_root.join("build").join(&tag));
    let fixer = cli.fixer.unwrap_or_else(|| config.fixer_program.clone());
    let copy_only = cli.copy_only.or_else(|| Some(config.copy_only.clone()));
    let threshold = Duration::from_secs_f64(
        cli.slow_threshold
            .unwrap_or(config.slow_report_threshold_secs),
    );

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel()).context("installing Ctrl-C handler")?;
    }

    if !cli.json {
        println!(
            "Converted files are cached under {}",
            build_root.display()
        );
    }

    let mut transformer = FixerCommand::new(fixer);
    let options = RunOptions { copy_only };
    let summary = match pipeline::run(
        &cli.source_root,
        &build_root,
        &trees,
        &mut transformer,
        &cancel,
        &options,
    ) {
        Ok(summary) => summary,
        Err(ConvertError::Interrupted { path }) => {
            eprintln!("{}", format!("Interrupted during {}", path.display()).red());
            std::process::exit(1);
        }
        Err(ConvertError::TransformFailed {
            path,
            status,
            diagnostics,
        }) => {
            // Success is quiet; a failed file gets its captured output.
            eprint!("{diagnostics}");
            bail!("fixer exited with status {status} on {}", path.display());
        }
        Err(err) => return Err(err.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, threshold);
    }
    Ok(())
}

/// Keep known subtree names in the order requested; an empty request
/// selects every known subtree.
fn select_trees(requested: &[String], config: &RunConfig) -> Vec<TreeName> {
    if requested.is_empty() {
        return config.subtrees.clone();
    }
    for name in requested {
        if !config.knows(name) {
            eprintln!("{}", format!("ignoring unknown subtree '{name}'").yellow());
        }
    }
    requested
        .iter()
        .filter(|name| config.knows(name))
        .map(|name| TreeName::from(name.as_str()))
        .collect()
}

fn print_summary(summary: &RunSummary, threshold: Duration) {
    for report in &summary.trees {
        println!(
            "{} '{}' synced ({} copied, {} removed, {} current, {} converted)",
            "✓".green(),
            report.tree,
            report.sync.copied.len(),
            report.sync.removed.len(),
            report.sync.current,
            report.convert.converted.len(),
        );
        if let Some(slow) = report.convert.slow_outliers(threshold) {
            println!("Note: slowest files to convert were:");
            for timing in slow {
                println!(
                    "  {} took {:.1}s",
                    timing.path.display(),
                    timing.elapsed.as_secs_f64()
                );
            }
        }
    }
    println!("2to3 processing done.");
}
