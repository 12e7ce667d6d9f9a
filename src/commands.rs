//! CLI command implementations

use anyhow::Context;
use requirecat_core::{sort_files, SortError};
use requirecat_indexer::{ScanConfig, Scanner};
use requirecat_output::OutputWriter;
use std::path::{Path, PathBuf};

pub struct RunOptions {
    pub root: PathBuf,
    pub output: PathBuf,
    pub json: bool,
}

/// Scan, sort and concatenate everything under the root directory.
pub fn run(options: RunOptions) -> anyhow::Result<()> {
    tracing::info!("Starting for root folder: '{}'", options.root.display());

    let config = ScanConfig::new(&options.root).with_output(&options.output);
    let report = Scanner::new(config).scan()?;

    for warning in &report.warnings {
        tracing::warn!("{}", warning.describe(&report.root));
    }

    let root = report.root.clone();
    let output = report.output.clone();
    let graph = report
        .into_graph()
        .context("Dependency graph is incomplete")?;

    tracing::info!(
        "Analyzed {} files ({} dependencies), starting topological sort",
        graph.file_count(),
        graph.dependency_count()
    );
    let sorted = sort_files(&graph).map_err(|e| describe_sort_error(e, &root))?;

    tracing::info!("Files sorted, compiling output file");
    let summary = OutputWriter::new(&output).write(&sorted)?;

    tracing::info!(
        "Output of {} files saved to '{}'",
        summary.files,
        output.display()
    );

    if options.json {
        let report = serde_json::json!({
            "files": summary.files,
            "lines": summary.lines,
            "output": output,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

/// Turn a failed sort into a message that names files relative to the root.
fn describe_sort_error(err: SortError<requirecat_core::FileId>, root: &Path) -> anyhow::Error {
    match err {
        SortError::Cycle(cycle) => anyhow::anyhow!(
            "Files contain a circular dependency:\n{}",
            cycle.render(|file| file.relative_to(root).display().to_string())
        ),
        other => anyhow::Error::new(other),
    }
}
