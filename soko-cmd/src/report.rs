//! One-shot commands over a price CSV: show, summary, counties and ask.

use crate::context::load_snapshot;
use crate::render::{render, OutputFormat};
use crate::DEFAULT_HEADLINES;
use soko_data::assistant::generate_response;
use soko_data::Selection;
use soko_db::snapshot::PriceSnapshot;
use soko_prices::county::County;
use std::path::Path;

/// Selected records of `snapshot` in the requested format.
pub fn show_output(
    snapshot: &PriceSnapshot,
    selection: &Selection,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let records = selection.select(&snapshot.index);
    log::debug!(
        "show: {} of {} records selected by {:?}",
        records.len(),
        snapshot.record_count,
        selection
    );
    render(&records, format)
}

/// Headlines followed by the last update line.
pub fn summary_output(snapshot: &PriceSnapshot) -> String {
    let mut lines: Vec<String> = snapshot
        .headlines
        .iter()
        .map(|h| format!("- {}", h))
        .collect();
    if lines.is_empty() {
        lines.push("No prices loaded.".to_string());
    }
    lines.push(format!(
        "Last update: {}",
        snapshot.last_update.as_deref().unwrap_or("never")
    ));
    lines.join("\n")
}

pub fn counties_output(counties: &[County]) -> String {
    counties
        .iter()
        .map(|c| format!("{:>2}  {:<16} {}", c.code, c.name, c.former_province))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn run_show(
    prices_csv: &str,
    selection: &Selection,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let snapshot = load_snapshot(Path::new(prices_csv), DEFAULT_HEADLINES)?;
    println!("{}", show_output(&snapshot, selection, format)?);
    Ok(())
}

pub fn run_summary(prices_csv: &str, limit: usize) -> anyhow::Result<()> {
    let snapshot = load_snapshot(Path::new(prices_csv), limit)?;
    println!("{}", summary_output(&snapshot));
    Ok(())
}

pub fn run_counties() -> anyhow::Result<()> {
    let counties = County::get_county_vector()?;
    println!("{}", counties_output(&counties));
    Ok(())
}

pub fn run_ask(prices_csv: &str, question: &str) -> anyhow::Result<()> {
    let snapshot = load_snapshot(Path::new(prices_csv), DEFAULT_HEADLINES)?;
    println!("{}", generate_response(question, &snapshot.index));
    Ok(())
}
