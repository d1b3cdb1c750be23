//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// RosterStats - club roster analytics from a member CSV
///
/// Load a club member roster (local file or URL), compute the activity
/// and city distributions, and render a Markdown/JSON report.
///
/// Examples:
///   rosterstats --source members.csv
///   rosterstats --source https://example.com/members.csv --format json
///   rosterstats --source members.csv --top-cities 10 --output report.md
///   rosterstats --source members.csv --dry-run
///   rosterstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Roster CSV to analyze: a local file path or an http(s) URL
    ///
    /// Not required when using --init-config.
    #[arg(
        short,
        long,
        value_name = "PATH_OR_URL",
        env = "ROSTERSTATS_SOURCE",
        required_unless_present = "init_config"
    )]
    pub source: Option<String>,

    /// Output file path for the report
    #[arg(short, long, default_value = "roster_report.md", value_name = "FILE")]
    pub output: PathBuf,

    /// Output format (markdown, json)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// How many cities to list in the Top Cities section
    #[arg(long, default_value = "6", value_name = "COUNT")]
    pub top_cities: usize,

    /// Omit the full member roster table from the report
    #[arg(long)]
    pub no_roster_table: bool,

    /// Request timeout in seconds for remote sources
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .rosterstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: load and validate the roster without writing a report
    ///
    /// Prints the record count and detected columns, then exits.
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .rosterstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the roster source, empty if not set (should be validated first).
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.source().is_empty() {
            return Err("A roster source is required (--source)".to_string());
        }

        // Local sources must exist; remote sources fail at fetch time
        let source = self.source();
        if !source.starts_with("http://") && !source.starts_with("https://") {
            let path = std::path::Path::new(source);
            if !path.exists() {
                return Err(format!("Roster file does not exist: {}", source));
            }
            if !path.is_file() {
                return Err(format!("Roster source is not a file: {}", source));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.top_cities == 0 {
            return Err("Top cities must be at least 1".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            source: Some("https://example.com/members.csv".to_string()),
            output: PathBuf::from("report.md"),
            format: OutputFormat::Markdown,
            top_cities: 6,
            no_roster_table: false,
            timeout: None,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_missing_local_file() {
        let mut args = make_args();
        args.source = Some("definitely_missing_roster.csv".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_remote_source_accepted() {
        let args = make_args();
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_top_cities() {
        let mut args = make_args();
        args.top_cities = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
