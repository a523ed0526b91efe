//! Names, extensions and markers used when classifying entries.
//!
//! ## Script outputs
//!
//! Only emitted files ending in `.js` or `.mjs` are candidates for removal.
//! Stylesheets and other assets of a chunk are never touched.
//!
//! ## Style resources
//!
//! An entry whose resources all end in one of the configured extensions
//! (by default `.less`, `.scss`, `.css`, optionally followed by a `?query`)
//! is considered style-only.

/// Plugin name, used for hook taps and the removal notice
pub const PLUGIN_NAME: &str = "fix-style-only-entries";

/// Output file suffixes that identify a compiled script artifact
pub const SCRIPT_FILE_SUFFIXES: &[&str] = &[".js", ".mjs"];

/// Style extensions used when none are configured
pub const DEFAULT_STYLE_EXTENSIONS: &[&str] = &["less", "scss", "css"];

/// Resources injected by the dev server client; they never count for or against an entry
pub const DEV_SERVER_CLIENT_PATTERN: &str = r"(?i)node_modules[\\/]+webpack-dev-server";
