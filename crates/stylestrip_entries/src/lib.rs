//! Style-only entry detection for bundler output.
//!
//! An entry point whose module graph resolves only to stylesheets still gets a
//! compiled script emitted next to its extracted CSS. This crate finds such
//! entries and removes their script asset from the compilation.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use clap::Parser;
//! use stylestrip_entries::{Config, run_style_entry_check};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::parse_from(["prune", "dist/stats", "--ignore", "polyfills"]);
//! let result = run_style_entry_check(&cfg)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! if result.total_removals() > 0 {
//!     stylestrip_entries::print_removals_tree(&mut stdout, &result, cfg.write)?;
//! } else {
//!     stylestrip_entries::print_no_style_entries_message(&mut stdout, &result)?;
//! }
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod classifier;
mod config;
mod constants;
mod matcher;
mod plugin;
mod reporter;
mod types;

// Re-export public API
pub use checker::run_style_entry_check;
pub use classifier::{NoticeWriter, StyleOnlyEntries, is_script_file};
pub use config::{Config, IgnoreKind, IgnoreSpec, Options};
pub use constants::{DEFAULT_STYLE_EXTENSIONS, PLUGIN_NAME, SCRIPT_FILE_SUFFIXES};
pub use matcher::{DevServerFilter, IgnorePattern, StyleExtensionMatcher};
pub use plugin::FixStyleOnlyEntriesPlugin;
pub use reporter::{print_no_style_entries_message, print_removals_tree};
pub use types::{CheckResult, ManifestReport, Removal};
