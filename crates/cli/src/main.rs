//! Course Finder CLI
//!
//! A thin wrapper around course-finder-core: loads a catalogue snapshot
//! from JSON, runs the validate -> window -> search -> diagnose pipeline on
//! a natural-language query, and prints the plain-data results as JSON.
//! This binary stands in for the conversational orchestration layer.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use course_finder_core::{
    detect_user_location, diagnose, normalize_date_window, search, validate_course_query,
    SearchParams, SessionRecord,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "course-finder")]
#[command(about = "Resolve a course query and search a session catalogue")]
struct Args {
    /// Course request in natural language (e.g. "smsts refresher")
    course: String,

    /// Path to the catalogue snapshot JSON file
    #[arg(long = "catalogue")]
    catalogue_path: PathBuf,

    /// Natural-language date filter (e.g. "next month", "after 20th August")
    #[arg(long)]
    when: Option<String>,

    /// Location filter (city, venue, or "online")
    #[arg(long)]
    location: Option<String>,

    /// Reference day as YYYY-MM-DD (defaults to today, UTC)
    #[arg(long)]
    now: Option<String>,

    /// Maximum number of results to print
    #[arg(long, default_value = "10")]
    limit: usize,

    /// Enable verbose debug output
    #[arg(long, short = 'v')]
    verbose: bool,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let now = match &args.now {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .with_context(|| format!("Invalid --now date: {}", text))?,
        None => Utc::now().date_naive(),
    };

    let catalogue = load_catalogue(&args.catalogue_path)?;
    if args.verbose {
        eprintln!(
            "DEBUG: Loaded {} session(s) from {}",
            catalogue.len(),
            args.catalogue_path.display()
        );
    }

    // Validate the course query first; the search never runs on a query the
    // validator rejects.
    let validation = validate_course_query(&args.course);
    println!("Validation:");
    println!("{}", serde_json::to_string_pretty(&validation)?);

    if !validation.exists {
        return Ok(());
    }
    let family = validation
        .normalized_family
        .clone()
        .context("validated query is missing a family")?;

    let window = normalize_date_window(args.when.as_deref().unwrap_or(""), now);
    let location = args.location.as_deref().and_then(detect_user_location);
    if args.verbose {
        eprintln!(
            "DEBUG: family={} window={} ({:?}..{:?}) location={:?}",
            family, window.label, window.start, window.end, location
        );
    }

    let params = SearchParams {
        family,
        refresher: validation.refresher_requested,
        location,
        window: Some(window),
    };

    let mut results = search(&catalogue, &params);
    if results.is_empty() {
        let diagnostics = diagnose(&catalogue, &params, now);
        println!("\nDiagnostics:");
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        return Ok(());
    }

    results.truncate(args.limit);
    println!("\nResults:");
    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}

fn load_catalogue(path: &PathBuf) -> Result<Vec<SessionRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| "Failed to parse catalogue JSON")
}

// ============================================================================
// Tests
// ============================================================================
