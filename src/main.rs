//! RosterStats - Club Roster Analytics
//!
//! A CLI tool that loads a club member roster (CSV file or URL),
//! computes the activity-frequency and city distributions, and renders
//! a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (load failure, config error, write failure)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod source;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use models::{LoadState, ReportMetadata, RosterReport};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("RosterStats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the analysis
    match run_analysis(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .rosterstats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".rosterstats.toml");

    if path.exists() {
        eprintln!("⚠️  .rosterstats.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .rosterstats.toml")?;

    println!("✅ Created .rosterstats.toml with default settings.");
    println!("   Edit it to customize output, timeouts, and report sections.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete load → aggregate → report workflow. Returns exit code.
async fn run_analysis(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let source_name = args.source().to_string();

    // Step 1: Load the roster (the only suspension point)
    println!("📥 Loading roster: {}", source_name);

    let load_options = source::LoadOptions {
        timeout_seconds: config.source.timeout_seconds,
        show_progress: config.source.show_progress,
    };

    let outcome = source::load_roster(&source_name, &load_options)
        .await
        .map_err(|e| e.to_string());
    let state = LoadState::Loading.resolve(outcome);

    // A failed load surfaces its message verbatim; no aggregation runs.
    if let Some(message) = state.error() {
        eprintln!("\n❌ Error loading data: {}", message);
        return Ok(1);
    }

    let records = state.records().unwrap_or(&[]);
    info!("Roster ready: {} members", records.len());

    // Handle --dry-run: report what was loaded and exit
    if args.dry_run {
        return handle_dry_run(records);
    }

    // Step 2: Aggregate
    let frequency = analysis::aggregate_frequency(records);
    let cities = analysis::aggregate_city(records);

    // Step 3: Build the report
    println!("📝 Generating report...");

    let report = RosterReport {
        metadata: ReportMetadata {
            source: source_name,
            generated_at: Utc::now(),
            total_members: records.len(),
        },
        frequency,
        cities,
        members: records.to_vec(),
    };

    let render_options = report::RenderOptions {
        top_cities: config.report.top_cities,
        include_roster: config.report.include_roster,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &render_options),
    };

    std::fs::write(&args.output, &output)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;

    // Print summary
    println!("\n📊 Roster Summary:");
    println!("   Total members: {}", report.metadata.total_members);
    if let Some(top) = report.cities.first() {
        println!(
            "   Top city: {} ({} members, {}%)",
            top.city, top.count, top.percentage
        );
    }
    for entry in &report.frequency {
        println!("   - {}: {} ({}%)", entry.label, entry.count, entry.percentage);
    }
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        args.output.display()
    );

    Ok(0)
}

/// Handle --dry-run: print what was loaded, write nothing.
fn handle_dry_run(records: &[models::Record]) -> Result<i32> {
    println!("\n🔍 Dry run: roster loaded, no report written.\n");
    println!("   Members: {}", records.len());

    if let Some(first) = records.first() {
        let columns: Vec<_> = first.columns().collect();
        println!("   Columns: {}", columns.join(", "));
    }

    println!("\n✅ Dry run complete.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .rosterstats.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
