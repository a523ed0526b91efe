use std::{
    env,
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use log::{debug, trace};

use crate::types::{CheckResult, ManifestReport};

/// Path relative to the current directory when it lives below it, for clickable output
fn display_path(path: &Path) -> String {
    let Ok(cwd) = env::current_dir() else {
        debug!("Failed to get current directory");
        return path.display().to_string();
    };
    match path.strip_prefix(&cwd) {
        Ok(rel) => {
            trace!("Relativized {} to {}", path.display(), rel.display());
            rel.display().to_string()
        }
        Err(_) => path.display().to_string(),
    }
}

pub fn print_no_style_entries_message<W: Write>(
    writer: &mut W,
    result: &CheckResult,
) -> io::Result<()> {
    debug!("No style-only entries found");
    writeln!(
        writer,
        "{} No style-only entries found in {} manifests.",
        "✓".green().bold(),
        result.manifests_analyzed()
    )?;
    print_failures(writer, result)?;
    writer.flush()?;
    Ok(())
}

pub fn print_removals_tree<W: Write>(
    writer: &mut W,
    result: &CheckResult,
    written: bool,
) -> io::Result<()> {
    let mut reports: Vec<&ManifestReport> =
        result.reports.iter().filter(|r| !r.removals.is_empty()).collect();
    debug!("Printing removals for {} manifests", reports.len());

    // Most removals first, then by path for stable output
    reports.sort_by(|a, b| {
        b.removals.len().cmp(&a.removals.len()).then_with(|| a.manifest.cmp(&b.manifest))
    });

    let verb = if written { "Removed" } else { "Would remove" };
    writeln!(
        writer,
        "{} {} script assets of style-only entries\n",
        "✂".yellow().bold(),
        verb
    )?;

    for report in &reports {
        writeln!(
            writer,
            "{} ({} of {} chunks)",
            display_path(&report.manifest).blue(),
            report.removals.len().to_string().red().bold(),
            report.chunks_analyzed
        )?;

        for (idx, removal) in report.removals.iter().enumerate() {
            let is_last = idx == report.removals.len() - 1;
            let prefix = if is_last { "└──" } else { "├──" };
            writeln!(writer, "{}  {} {}", prefix.dimmed(), removal.chunk.bright_white(), removal.file)?;
        }

        writeln!(writer)?;
    }

    print_summary(writer, result, reports.len())?;
    print_failures(writer, result)?;

    writer.flush()?;
    Ok(())
}

fn print_summary<W: Write>(
    writer: &mut W,
    result: &CheckResult,
    manifests_with_removals: usize,
) -> io::Result<()> {
    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    writeln!(writer, "  Script assets: {}", result.total_removals().to_string().yellow().bold())?;
    writeln!(
        writer,
        "  Manifests affected: {} of {}",
        manifests_with_removals.to_string().yellow(),
        result.manifests_analyzed()
    )?;
    Ok(())
}

fn print_failures<W: Write>(writer: &mut W, result: &CheckResult) -> io::Result<()> {
    if result.failures.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{} {} manifests could not be processed:", "⚠".red().bold(), result.failures.len())?;
    for (path, reason) in &result.failures {
        writeln!(writer, "  {} - {}", display_path(path).blue(), reason)?;
    }
    Ok(())
}
