use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use log::trace;
use regex::Regex;

use crate::{config::IgnoreSpec, constants::DEV_SERVER_CLIENT_PATTERN};

/// Matches resource paths ending in one of the style extensions.
///
/// The extension must be the last thing in the path, except for an optional
/// `?query` tail: `main.scss?foo=bar` matches `scss`, `main.scssx` does not.
#[derive(Debug, Clone)]
pub struct StyleExtensionMatcher {
    re: Regex,
}

impl StyleExtensionMatcher {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Result<Self> {
        let alternation = extensions
            .iter()
            .map(|e| {
                let e = e.as_ref();
                regex::escape(e.strip_prefix('.').unwrap_or(e))
            })
            .collect::<Vec<_>>()
            .join("|");

        let pattern = format!(r"[.]({})([?].*)?$", alternation);
        trace!("Compiled style extension pattern: {}", pattern);
        let re = Regex::new(&pattern)
            .with_context(|| format!("Invalid style extension pattern: {}", pattern))?;
        Ok(Self { re })
    }

    pub fn is_match(&self, resource: &str) -> bool {
        self.re.is_match(resource)
    }

    pub fn as_str(&self) -> &str {
        self.re.as_str()
    }
}

/// Detects client scripts injected by the dev server.
#[derive(Debug, Clone)]
pub struct DevServerFilter {
    re: Regex,
}

impl DevServerFilter {
    pub fn new() -> Result<Self> {
        let re = Regex::new(DEV_SERVER_CLIENT_PATTERN).context("Invalid dev server pattern")?;
        Ok(Self { re })
    }

    pub fn is_match(&self, resource: &str) -> bool {
        self.re.is_match(resource)
    }
}

/// User supplied pattern excluding resources from classification.
#[derive(Debug, Clone)]
pub enum IgnorePattern {
    /// Unanchored regex search anywhere in the path
    Regex(Regex),
    /// Glob matched against the whole path
    Glob(GlobMatcher),
    /// Literal substring
    Substring(String),
}

impl IgnorePattern {
    pub fn compile(spec: &IgnoreSpec) -> Result<Self> {
        let pattern = match spec {
            IgnoreSpec::Regex(p) => Self::Regex(
                Regex::new(p).with_context(|| format!("Invalid ignore regex: {}", p))?,
            ),
            IgnoreSpec::Glob(p) => Self::Glob(
                Glob::new(p).with_context(|| format!("Invalid ignore glob: {}", p))?.compile_matcher(),
            ),
            IgnoreSpec::Substring(p) => Self::Substring(p.clone()),
        };
        Ok(pattern)
    }

    pub fn is_match(&self, resource: &str) -> bool {
        match self {
            Self::Regex(re) => re.is_match(resource),
            Self::Glob(glob) => glob.is_match(resource),
            Self::Substring(s) => resource.contains(s.as_str()),
        }
    }
}
