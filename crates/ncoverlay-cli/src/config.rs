use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use ncoverlay_parse::ParserConfig;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Log filter covering the parser library and this binary.
pub const DEFAULT_LOG_FILTER: &str = "ncoverlay=info,nco_title=info";

/// Top-level CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl AppConfig {
    /// Load config from `path`, or the user file if it exists, or the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let user_path = Self::config_path();
                if user_path.exists() {
                    Self::from_file(&user_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "ncoverlay")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.parser, ParserConfig::default());
        assert!(!config.output.pretty);
        assert_eq!(config.log.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_default_filter_enables_binary_target() {
        let crate_name = env!("CARGO_CRATE_NAME");
        assert!(DEFAULT_LOG_FILTER
            .split(',')
            .any(|directive| directive.starts_with(crate_name)));
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_builtin_matches_section_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.output, OutputConfig::default());
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_partial_user_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[parser]\nmax_depth = 4\n\n[output]\npretty = true").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.parser.max_depth, 4);
        assert_eq!(config.parser.max_episode_span, 500);
        assert!(config.output.pretty);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[parser]\nmax_depth = \"deep\"").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/ncoverlay.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized, config);
    }
}
