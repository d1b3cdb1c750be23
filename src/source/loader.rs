//! Roster source loading.
//!
//! This module acquires the member roster CSV from a local file or an
//! HTTP(S) URL and parses it into an ordered sequence of records.

use crate::models::Record;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from acquiring or parsing the roster source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The HTTP fetch failed (connection, timeout, or bad status).
    #[error("failed to fetch roster: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The local roster file could not be read.
    #[error("failed to read roster file: {0}")]
    Read(#[from] std::io::Error),

    /// The CSV payload could not be parsed.
    #[error("failed to parse roster CSV: {0}")]
    Parse(#[from] csv::Error),
}

/// Options for loading a roster source.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Request timeout for remote sources, in seconds.
    pub timeout_seconds: u64,
    /// Whether to show a progress spinner during a remote fetch.
    pub show_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// Load a roster from a URL or file path.
///
/// Sources starting with `http://` or `https://` are fetched over HTTP;
/// anything else is treated as a local file path. Returns the parsed
/// records in source order.
pub async fn load_roster(source: &str, options: &LoadOptions) -> Result<Vec<Record>, SourceError> {
    let csv_text = if is_remote(source) {
        fetch_remote(source, options).await?
    } else {
        info!("Reading roster file: {}", source);
        std::fs::read_to_string(Path::new(source))?
    };

    let records = parse_csv(&csv_text)?;
    info!("Loaded {} member records", records.len());
    Ok(records)
}

/// Returns true for sources that must be fetched over HTTP.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetch a remote roster source.
async fn fetch_remote(url: &str, options: &LoadOptions) -> Result<String, SourceError> {
    info!("Fetching roster: {}", url);

    let spinner = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(format!("Fetching {}", url));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(options.timeout_seconds))
        .build()?;

    let result = async {
        let response = client.get(url).send().await?.error_for_status()?;
        response.text().await
    }
    .await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    Ok(result?)
}

/// Parse CSV text into records.
///
/// The first row is the header; each following row becomes one record
/// keyed by header names. Short rows leave their trailing columns
/// absent, and rows longer than the header drop the extra fields.
/// Empty lines are skipped.
pub fn parse_csv(text: &str) -> Result<Vec<Record>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    debug!("Roster columns: {:?}", headers);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = headers.iter().zip(row.iter()).collect();
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FIELD_CITY, FIELD_VISITS};
    use std::io::Write;

    const SAMPLE: &str = "\
Name,City,Visits per month,Fav game today
Lisa,Springfield,12,Chess
Bart,Shelbyville (east),2,Darts
Milhouse,,1,
";

    #[test]
    fn test_parse_csv_keys_rows_by_header() {
        let records = parse_csv(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].get("Name"), "Lisa");
        assert_eq!(records[0].get(FIELD_CITY), "Springfield");
        assert_eq!(records[0].get(FIELD_VISITS), "12");
        assert_eq!(records[1].get(FIELD_CITY), "Shelbyville (east)");
        assert_eq!(records[2].get(FIELD_CITY), "");
    }

    #[test]
    fn test_parse_csv_short_rows_leave_columns_absent() {
        let text = "Name,City,Visits per month\nLisa\n";
        let records = parse_csv(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Name"), "Lisa");
        assert_eq!(records[0].get("City"), "");
        assert_eq!(records[0].get("Visits per month"), "");
    }

    #[test]
    fn test_parse_csv_skips_empty_lines() {
        let text = "Name,City\nLisa,Springfield\n\nBart,Shelbyville\n";
        let records = parse_csv(text).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_csv_header_only() {
        let records = parse_csv("Name,City,Visits per month\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/members.csv"));
        assert!(is_remote("http://example.com/members.csv"));
        assert!(!is_remote("members.csv"));
        assert!(!is_remote("/data/members.csv"));
    }

    #[tokio::test]
    async fn test_load_roster_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let options = LoadOptions {
            show_progress: false,
            ..LoadOptions::default()
        };
        let records = load_roster(file.path().to_str().unwrap(), &options)
            .await
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get("Name"), "Lisa");
    }

    #[tokio::test]
    async fn test_load_roster_missing_file() {
        let options = LoadOptions {
            show_progress: false,
            ..LoadOptions::default()
        };
        let err = load_roster("no_such_roster.csv", &options).await.unwrap_err();
        assert!(matches!(err, SourceError::Read(_)));
    }
}
