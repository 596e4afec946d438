//! Configuration file loading with precedence handling.

use crate::document::PageSelectors;
use crate::model::{HeadingLevel, HeadingLevelSet, WidgetSettings};
use crate::resolver::{InvalidRootMargin, ObserverOptions, RootMargin};
use crate::widget::WidgetOptions;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PATOC_CONFIG";

/// Environment variable overriding the content root selector.
pub const CONTENT_SELECTOR_ENV: &str = "PATOC_CONTENT_SELECTOR";

/// Environment variable overriding the default heading levels (`"h2,h3"`).
pub const LEVELS_ENV: &str = "PATOC_LEVELS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is not usable.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Config key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/patoc/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Selector of the content root holding the headings.
    #[serde(default)]
    pub content_selector: Option<String>,

    /// Selector of the widget container.
    #[serde(default)]
    pub widget_selector: Option<String>,

    /// Selector of the list inside the widget container.
    #[serde(default)]
    pub list_selector: Option<String>,

    /// Heading tags used when a page carries no settings payload.
    #[serde(default)]
    pub default_levels: Option<Vec<String>>,

    /// Indent nested entries in generated containers.
    #[serde(default)]
    pub indentation: Option<bool>,

    /// Visibility root margin, CSS shorthand.
    #[serde(default)]
    pub root_margin: Option<String>,

    /// Visibility threshold in `0.0..=1.0`.
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Delay before the first offset measurement.
    #[serde(default)]
    pub layout_settle_ms: Option<u64>,

    /// Delay before honoring an initial fragment.
    #[serde(default)]
    pub hash_settle_ms: Option<u64>,

    /// Pixels the progress dot sits above the link center.
    #[serde(default)]
    pub dot_adjust_px: Option<f64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args. Values
/// are validated when converted into runtime types.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Selector of the element holding the headings.
    pub content_selector: String,
    /// Selector of each widget container.
    pub widget_selector: String,
    /// Selector of the list inside a container.
    pub list_selector: String,
    /// Heading tags used when a page carries no settings.
    pub default_levels: Vec<String>,
    /// Whether generated containers enable indentation.
    pub indentation: bool,
    /// CSS root margin of the visibility tracker.
    pub root_margin: String,
    /// Visibility threshold, 0 to 1.
    pub threshold: f64,
    /// Delay before the first offset measurement.
    pub layout_settle_ms: u64,
    /// Delay before honoring the initial fragment.
    pub hash_settle_ms: u64,
    /// Pixels the progress dot sits above the link center.
    pub dot_adjust_px: f64,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let widget = WidgetOptions::default();
        Self {
            content_selector: ".entry-content".to_string(),
            widget_selector: ".patoc-toc".to_string(),
            list_selector: ".patoc-list".to_string(),
            default_levels: vec!["h2".to_string(), "h3".to_string()],
            indentation: true,
            root_margin: widget.observer.root_margin.to_string(),
            threshold: widget.observer.threshold,
            layout_settle_ms: 100,
            hash_settle_ms: 200,
            dot_adjust_px: widget.dot_adjust,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Parse the three page selectors.
    pub fn selectors(&self) -> Result<PageSelectors, ConfigError> {
        PageSelectors::new(&self.content_selector, &self.widget_selector, &self.list_selector).map_err(
            |err| ConfigError::InvalidValue {
                field: match err.role {
                    "content" => "content_selector",
                    "widget" => "widget_selector",
                    _ => "list_selector",
                },
                reason: err.reason,
            },
        )
    }

    /// Parse `default_levels`.
    pub fn levels(&self) -> Result<HeadingLevelSet, ConfigError> {
        self.default_levels
            .iter()
            .map(|tag| tag.parse::<HeadingLevel>())
            .collect::<Result<HeadingLevelSet, _>>()
            .map_err(|err| ConfigError::InvalidValue {
                field: "default_levels",
                reason: err.to_string(),
            })
    }

    /// Settings for containers generated from configuration.
    pub fn widget_settings(&self) -> Result<WidgetSettings, ConfigError> {
        Ok(WidgetSettings {
            levels: self.levels()?,
            indentation: self.indentation,
        })
    }

    /// Validated runtime options for scroll tracking.
    pub fn widget_options(&self) -> Result<WidgetOptions, ConfigError> {
        let root_margin: RootMargin = self.root_margin.parse().map_err(|err: InvalidRootMargin| {
            ConfigError::InvalidValue {
                field: "root_margin",
                reason: err.to_string(),
            }
        })?;
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidValue {
                field: "threshold",
                reason: format!("{} is outside 0.0..=1.0", self.threshold),
            });
        }
        if !self.dot_adjust_px.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "dot_adjust_px",
                reason: "must be a finite number".to_string(),
            });
        }

        Ok(WidgetOptions {
            layout_settle: Duration::from_millis(self.layout_settle_ms),
            hash_settle: Duration::from_millis(self.hash_settle_ms),
            dot_adjust: self.dot_adjust_px,
            observer: ObserverOptions {
                root_margin,
                threshold: self.threshold,
            },
            ..WidgetOptions::default()
        })
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/patoc/patoc.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("patoc").join("patoc.log")
    } else {
        PathBuf::from("patoc.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/patoc/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("patoc").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `PATOC_CONFIG` environment variable
/// 3. Default path `~/.config/patoc/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(config_path: Option<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV} is set but empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `PATOC_CONTENT_SELECTOR`: content root selector
/// - `PATOC_LEVELS`: comma-separated default levels
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(selector) = std::env::var(CONTENT_SELECTOR_ENV) {
        config.content_selector = selector;
    }

    if let Ok(levels) = std::env::var(LEVELS_ENV) {
        config.default_levels = split_levels(&levels);
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        content_selector: config.content_selector.unwrap_or(defaults.content_selector),
        widget_selector: config.widget_selector.unwrap_or(defaults.widget_selector),
        list_selector: config.list_selector.unwrap_or(defaults.list_selector),
        default_levels: config.default_levels.unwrap_or(defaults.default_levels),
        indentation: config.indentation.unwrap_or(defaults.indentation),
        root_margin: config.root_margin.unwrap_or(defaults.root_margin),
        threshold: config.threshold.unwrap_or(defaults.threshold),
        layout_settle_ms: config.layout_settle_ms.unwrap_or(defaults.layout_settle_ms),
        hash_settle_ms: config.hash_settle_ms.unwrap_or(defaults.hash_settle_ms),
        dot_adjust_px: config.dot_adjust_px.unwrap_or(defaults.dot_adjust_px),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--content-selector`
    pub content_selector: Option<String>,
    /// `--levels h2,h3`
    pub levels: Option<String>,
    /// `--no-indent`
    pub indentation: Option<bool>,
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    if let Some(selector) = overrides.content_selector {
        config.content_selector = selector;
    }

    if let Some(levels) = overrides.levels {
        config.default_levels = split_levels(&levels);
    }

    if let Some(indentation) = overrides.indentation {
        config.indentation = indentation;
    }

    config
}

fn split_levels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
