//! Markdown report generation.
//!
//! This module renders the roster report (metadata, both distributions,
//! and the member table) as Markdown or JSON. Rendering only reads the
//! aggregation results; it never recomputes or mutates them.

use crate::models::{CityEntry, FrequencyEntry, Record, ReportMetadata, RosterReport, ROSTER_COLUMNS};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Options controlling the rendered report.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// How many cities to list in the Top Cities section.
    pub top_cities: usize,
    /// Whether to include the full member roster table.
    pub include_roster: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            top_cities: 6,
            include_roster: true,
        }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &RosterReport, options: &RenderOptions) -> String {
    let mut output = String::new();

    output.push_str("# Member Roster Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_cities_section(&report.cities, options.top_cities));
    output.push_str(&generate_frequency_section(&report.frequency));

    if options.include_roster {
        output.push_str(&generate_roster_section(&report.members));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Total Members:** {}\n", metadata.total_members));
    section.push('\n');

    section
}

/// Generate the top-cities section.
fn generate_cities_section(cities: &[CityEntry], top_cities: usize) -> String {
    let mut section = String::new();

    section.push_str("## Top Cities\n\n");

    if cities.is_empty() {
        section.push_str("No cities recorded.\n\n");
        return section;
    }

    section.push_str("| City | Members | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");

    for entry in cities.iter().take(top_cities) {
        section.push_str(&format!(
            "| {} | {} | {}% |\n",
            escape_cell(&entry.city),
            entry.count,
            entry.percentage
        ));
    }
    section.push('\n');

    section
}

/// Generate the activity-level distribution section.
fn generate_frequency_section(frequency: &[FrequencyEntry]) -> String {
    let mut section = String::new();

    section.push_str("## Activity Level Distribution\n\n");

    if frequency.is_empty() {
        section.push_str("No members loaded.\n\n");
        return section;
    }

    section.push_str("| Activity Level | Members | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");

    for entry in frequency {
        section.push_str(&format!(
            "| {} | {} | {}% |\n",
            entry.label, entry.count, entry.percentage
        ));
    }
    section.push('\n');

    section
}

/// Generate the pass-through member roster table.
fn generate_roster_section(members: &[Record]) -> String {
    let mut section = String::new();

    section.push_str("## Member Roster\n\n");

    if members.is_empty() {
        section.push_str("No members loaded.\n\n");
        return section;
    }

    section.push_str(&format!("| {} |\n", ROSTER_COLUMNS.join(" | ")));
    section.push_str(&format!(
        "|{}\n",
        ROSTER_COLUMNS.map(|_| ":---|").join("")
    ));

    for member in members {
        let cells: Vec<String> = ROSTER_COLUMNS
            .iter()
            .map(|column| escape_cell(member.get(column)))
            .collect();
        section.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by RosterStats*\n".to_string()
}

/// Escape pipe characters so member-supplied text cannot break the table.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Write the Markdown report to a file.
#[allow(dead_code)] // Alternative to writing in main
pub fn write_report(report: &RosterReport, options: &RenderOptions, path: &Path) -> Result<()> {
    let content = generate_markdown_report(report, options);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Generate a JSON report.
pub fn generate_json_report(report: &RosterReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
