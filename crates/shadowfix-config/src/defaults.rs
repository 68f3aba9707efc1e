//! Default values for every configuration setting.

use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Source file extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

/// Directory-name markers skipped during traversal: dependency folders,
/// version control, and backup folders.
pub const DEFAULT_EXCLUDE_MARKERS: [&str; 3] = ["node_modules", ".git", "backup"];

/// Colour written into inserted backgrounds.
pub const DEFAULT_OPAQUE_COLOR: &str = "white";

/// Interpreter used to run fix scripts.
pub const DEFAULT_SCRIPT_INTERPRETER: &str = "node";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default scanned extensions as owned strings.
#[must_use]
pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect()
}

/// Default traversal exclusion markers as owned strings.
#[must_use]
pub fn default_exclude_markers() -> Vec<String> {
    DEFAULT_EXCLUDE_MARKERS
        .iter()
        .map(|marker| (*marker).to_owned())
        .collect()
}
