//! Builder module - Writes rendered templates to disk
//!
//! Provides utilities for materializing a generated package

use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::path::{Path, PathBuf};

use crate::core::template::RenderedFile;

/// How a package gets written
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Allow writing into an existing, non-empty directory
    pub force: bool,
    /// Report the plan without touching the filesystem
    pub dry_run: bool,
    pub verbose: bool,
    /// Hide the progress bar
    pub quiet: bool,
}

/// Files written (or planned) for one package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub bytes: usize,
}

/// Directory that will hold a package
pub fn package_dir(output: &Path, package: &str) -> PathBuf {
    output.join(package)
}

/// Refuses to clobber an existing non-empty directory unless `force`
pub fn check_target(target: &Path, force: bool) -> Result<()> {
    if !target.exists() {
        return Ok(());
    }
    if !target.is_dir() {
        anyhow::bail!("Target exists and is not a directory: {}", target.display());
    }

    let occupied = std::fs::read_dir(target)
        .context(format!("Failed to read directory: {}", target.display()))?
        .next()
        .is_some();
    if occupied && !force {
        anyhow::bail!(
            "Target directory is not empty: {} (use --force to overwrite)",
            target.display()
        );
    }
    Ok(())
}

/// Writes every rendered file below `target`
pub fn write_package(target: &Path, files: &[RenderedFile], options: WriteOptions) -> Result<WriteReport> {
    check_target(target, options.force)?;

    let mut report = WriteReport {
        root: target.to_path_buf(),
        ..WriteReport::default()
    };

    let progress = if options.dry_run || options.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    progress.set_style(
        ProgressStyle::with_template("   {bar:30.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress template")?,
    );

    for file in files {
        let dest = target.join(&file.path);
        progress.set_message(file.path.display().to_string());

        if options.dry_run {
            debug!("dry run: would write {}", dest.display());
        } else {
            write_file(&dest, &file.contents, options.verbose)?;
        }

        report.files.push(file.path.clone());
        report.bytes += file.contents.len();
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(report)
}

/// Write one file, creating parent directories
pub fn write_file(dest: &Path, contents: &str, verbose: bool) -> Result<()> {
    if let Some(parent) = dest.parent() {
        create_dir_all(parent, false)?;
    }

    std::fs::write(dest, contents).context(format!("Failed to write {}", dest.display()))?;

    if verbose {
        println!(
            "     {} {}",
            "✓".bright_green(),
            dest.display().to_string().bright_cyan()
        );
    }

    Ok(())
}

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path, verbose: bool) -> Result<()> {
    std::fs::create_dir_all(path)
        .context(format!("Failed to create directory: {}", path.display()))?;

    if verbose {
        println!(
            "     {} {}",
            "📁".bright_blue(),
            path.display().to_string().bright_cyan()
        );
    }

    Ok(())
}
