//! Roster source modules.
//!
//! Acquisition and parsing of the tabular member source.

pub mod loader;

pub use loader::{is_remote, load_roster, parse_csv, LoadOptions, SourceError};
