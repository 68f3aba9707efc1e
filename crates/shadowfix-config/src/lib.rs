//! Layered configuration for the shadowfix toolchain.
//!
//! [`Config`] is loaded with `ortho_config`: built-in defaults, then a TOML
//! file named by `--config-path` or `SHADOWFIX_CONFIG_PATH`, then
//! `SHADOWFIX_*` environment variables, then command-line flags. Every field
//! is optional; the accessors fall back to the values in [`defaults`].

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_EXCLUDE_MARKERS, DEFAULT_EXTENSIONS, DEFAULT_LOG_FILTER, DEFAULT_OPAQUE_COLOR,
    DEFAULT_SCRIPT_INTERPRETER, default_exclude_markers, default_extensions, default_log_filter,
    default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SHADOWFIX")]
pub struct Config {
    /// `tracing` filter expression, for example `info` or
    /// `shadowfix_harness=debug`.
    pub log_filter: Option<String>,
    /// Log line format.
    pub log_format: Option<LogFormat>,
    /// File extensions to scan, without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Directory-name substrings excluded from traversal.
    #[serde(default)]
    pub exclude_markers: Vec<String>,
    /// Colour literal written into inserted backgrounds.
    pub opaque_color: Option<String>,
    /// Interpreter for fix scripts; an empty string runs them directly.
    pub script_interpreter: Option<String>,
    /// Fix scripts run by `run-all` when none are given.
    #[serde(default)]
    pub scripts: Vec<PathBuf>,
}

impl Config {
    /// Effective log filter.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Effective log format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or_else(default_log_format)
    }

    /// Effective scanned extensions, without leading dots.
    #[must_use]
    pub fn extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            return default_extensions();
        }
        self.extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_owned())
            .collect()
    }

    /// Effective traversal exclusion markers.
    #[must_use]
    pub fn exclude_markers(&self) -> Vec<String> {
        if self.exclude_markers.is_empty() {
            default_exclude_markers()
        } else {
            self.exclude_markers.clone()
        }
    }

    /// Effective opaque colour.
    #[must_use]
    pub fn opaque_color(&self) -> &str {
        self.opaque_color.as_deref().unwrap_or(DEFAULT_OPAQUE_COLOR)
    }

    /// Interpreter for fix scripts, or `None` to run them directly.
    #[must_use]
    pub fn script_interpreter(&self) -> Option<&str> {
        match self.script_interpreter.as_deref() {
            None => Some(DEFAULT_SCRIPT_INTERPRETER),
            Some("") => None,
            Some(interpreter) => Some(interpreter),
        }
    }

    /// Configured `run-all` script list.
    #[must_use]
    pub fn scripts(&self) -> &[PathBuf] {
        &self.scripts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_fall_back_to_defaults() {
        let config = Config::default();
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert_eq!(config.extensions(), vec!["js", "jsx", "ts", "tsx"]);
        assert_eq!(config.exclude_markers(), vec!["node_modules", ".git", "backup"]);
        assert_eq!(config.opaque_color(), "white");
        assert_eq!(config.script_interpreter(), Some("node"));
        assert!(config.scripts().is_empty());
    }

    #[test]
    fn extensions_drop_leading_dots() {
        let config = Config {
            extensions: vec![String::from(".tsx"), String::from("ts")],
            ..Config::default()
        };
        assert_eq!(config.extensions(), vec!["tsx", "ts"]);
    }

    #[test]
    fn empty_interpreter_runs_scripts_directly() {
        let config = Config {
            script_interpreter: Some(String::new()),
            ..Config::default()
        };
        assert_eq!(config.script_interpreter(), None);
    }
}
