//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.rosterstats.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Roster source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "roster_report.md".to_string()
}

/// Roster source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Request timeout in seconds for remote sources.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Show a progress spinner during remote fetches.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            show_progress: true,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// How many cities to list in the Top Cities section.
    #[serde(default = "default_top_cities")]
    pub top_cities: usize,

    /// Include the full member roster table.
    #[serde(default = "default_true")]
    pub include_roster: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_cities: default_top_cities(),
            include_roster: true,
        }
    }
}

fn default_top_cities() -> usize {
    6
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".rosterstats.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Report settings - always override since they have defaults in CLI
        self.report.top_cities = args.top_cities;

        if args.no_roster_table {
            self.report.include_roster = false;
        }

        // Timeout - only override if explicitly provided via CLI
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }

        // Quiet mode disables the fetch spinner along with other output
        if args.quiet {
            self.source.show_progress = false;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
