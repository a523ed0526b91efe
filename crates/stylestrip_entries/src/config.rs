use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::constants::DEFAULT_STYLE_EXTENSIONS;

/// How a user supplied ignore pattern is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreSpec {
    Regex(String),
    Glob(String),
    Substring(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum IgnoreKind {
    #[default]
    Regex,
    Glob,
    Substring,
}

impl IgnoreKind {
    pub fn spec(self, pattern: String) -> IgnoreSpec {
        match self {
            Self::Regex => IgnoreSpec::Regex(pattern),
            Self::Glob => IgnoreSpec::Glob(pattern),
            Self::Substring => IgnoreSpec::Substring(pattern),
        }
    }
}

/// Plugin options, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Style file extensions, each optionally with a leading dot
    pub extensions: Vec<String>,
    /// Suppress the notice printed for each removed script
    pub silent: bool,
    /// Resources matching this are left out before classification
    pub ignore: Option<IgnoreSpec>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_STYLE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            silent: false,
            ignore: None,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "prune")]
#[command(about = "Remove script assets of style-only entries from compilation manifests")]
pub struct Config {
    /// Compilation manifest, or a directory of manifests
    pub input: PathBuf,

    /// Style file extensions (comma separated)
    #[arg(long, value_delimiter = ',', default_values = ["less", "scss", "css"])]
    pub extensions: Vec<String>,

    /// Do not print a notice for each removed script
    #[arg(long)]
    pub silent: bool,

    /// Exclude matching resources before classification
    #[arg(long)]
    pub ignore: Option<String>,

    /// How to interpret --ignore
    #[arg(long, value_enum, default_value_t = IgnoreKind::Regex)]
    pub ignore_kind: IgnoreKind,

    /// JSON file with plugin options; takes precedence over the flags above
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Write pruned manifests back to disk
    #[arg(long)]
    pub write: bool,
}

impl Config {
    /// Build the plugin options from the options file if given, else from the flags.
    pub fn plugin_options(&self) -> Result<Options> {
        if let Some(path) = &self.options {
            info!("Reading plugin options from {}", path.display());
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options {}", path.display()))?;
            let options: Options = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse options {}", path.display()))?;
            debug!("Options from file: {:?}", options);
            return Ok(options);
        }

        let options = Options {
            extensions: self.extensions.clone(),
            silent: self.silent,
            ignore: self.ignore.clone().map(|p| self.ignore_kind.spec(p)),
        };
        debug!("Options from flags: {:?}", options);
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.extensions, vec!["less", "scss", "css"]);
        assert!(!options.silent);
        assert!(options.ignore.is_none());
    }

    #[test]
    fn test_flags_defaults() {
        let cfg = Config::parse_from(["prune", "stats.json"]);
        assert_eq!(cfg.plugin_options().unwrap(), Options::default());
        assert!(!cfg.write);
    }

    #[test]
    fn test_flags_to_options() {
        let cfg = Config::parse_from([
            "prune",
            "dist",
            "--extensions",
            ".sass,pcss",
            "--silent",
            "--ignore",
            "**/polyfills/**",
            "--ignore-kind",
            "glob",
        ]);

        let options = cfg.plugin_options().unwrap();
        assert_eq!(options.extensions, vec![".sass", "pcss"]);
        assert!(options.silent);
        assert_eq!(options.ignore, Some(IgnoreSpec::Glob("**/polyfills/**".to_string())));
    }

    #[test]
    fn test_options_file_partial() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_file(
            temp_dir.path(),
            "options.json",
            r#"{ "silent": true, "ignore": { "regex": "y\\.js$" } }"#,
        );

        let cfg = Config::parse_from(["prune", "stats.json", "--options", path.to_str().unwrap()]);
        let options = cfg.plugin_options().unwrap();
        assert_eq!(options.extensions, vec!["less", "scss", "css"]);
        assert!(options.silent);
        assert_eq!(options.ignore, Some(IgnoreSpec::Regex(r"y\.js$".to_string())));
    }

    #[test]
    fn test_options_file_missing() {
        let cfg = Config::parse_from(["prune", "stats.json", "--options", "/nonexistent/o.json"]);
        assert!(cfg.plugin_options().is_err());
    }
}
