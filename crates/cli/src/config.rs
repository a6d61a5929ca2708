//! Runner configuration from environment variables and command-line flags.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};

/// Output format of log records written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Runs a smart store command script and prints the JSON report.
#[derive(Debug, Default, Parser)]
#[command(name = "smart-store", version, about)]
pub struct Cli {
    /// Script to run. Reads stdin when omitted.
    pub script: Option<PathBuf>,

    /// Tracing filter directive, e.g. `debug` or `engine=trace`
    #[arg(long)]
    pub log_level: Option<String>,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Pretty-print the report
    #[arg(long)]
    pub pretty: bool,

    /// Exit with a failure status when any command fails
    #[arg(long)]
    pub strict: bool,
}

/// Runner configuration.
///
/// Reads from environment variables:
/// - `SMART_STORE_SCRIPT`: script path (default: read stdin)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `SMART_STORE_LOG_FORMAT`: `text` or `json` (default: `text`)
///
/// Flags given on the command line win over the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub script: Option<PathBuf>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub pretty: bool,
    pub strict: bool,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            script: lookup("SMART_STORE_SCRIPT")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("SMART_STORE_LOG_FORMAT")
                .and_then(|f| f.parse().ok())
                .unwrap_or(defaults.log_format),
            ..defaults
        }
    }

    /// Overrides settings with the flags present in `cli`.
    pub fn merge(self, cli: Cli) -> Self {
        Self {
            script: cli.script.or(self.script),
            log_level: cli.log_level.unwrap_or(self.log_level),
            log_format: cli.log_format.unwrap_or(self.log_format),
            pretty: cli.pretty || self.pretty,
            strict: cli.strict || self.strict,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            pretty: false,
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.script.is_none());
    }

    #[test]
    fn test_reads_environment() {
        let config = Config::from_lookup(lookup(&[
            ("SMART_STORE_SCRIPT", "scripts/store.script"),
            ("RUST_LOG", "debug"),
            ("SMART_STORE_LOG_FORMAT", "JSON"),
        ]));
        assert_eq!(config.script, Some(PathBuf::from("scripts/store.script")));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_format_falls_back_to_text() {
        let config = Config::from_lookup(lookup(&[("SMART_STORE_LOG_FORMAT", "xml")]));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_flags_override_environment() {
        let env = Config::from_lookup(lookup(&[
            ("SMART_STORE_SCRIPT", "from-env.script"),
            ("RUST_LOG", "warn"),
        ]));
        let cli = Cli::parse_from(["smart-store", "cli.script", "--log-format", "json", "--strict"]);

        let config = env.merge(cli);

        assert_eq!(config.script, Some(PathBuf::from("cli.script")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.strict);
        assert!(!config.pretty);
    }
}
