//! Terminal, JSON and CSV rendering of selected price records.

use clap::ValueEnum;
use soko_prices::record::PriceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

const HEADERS: [&str; 7] = ["#", "Commodity", "County", "Market", "Price (KES)", "Unit", "Date"];

/// Plain text table; rows are keyed by their position in the selection.
pub fn render_table(records: &[&PriceRecord]) -> String {
    if records.is_empty() {
        return "No prices match the current selection.".to_string();
    }
    let rows: Vec<[String; 7]> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                (i + 1).to_string(),
                r.commodity.clone(),
                r.county.clone(),
                r.market.clone(),
                format!("{:.2}", r.price),
                r.unit.clone(),
                r.date.clone(),
            ]
        })
        .collect();

    let mut widths: [usize; 7] = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(col, (cell, w))| {
                // index and price columns are right-aligned
                if col == 0 || col == 4 {
                    format!("{:>width$}", cell, width = *w)
                } else {
                    format!("{:<width$}", cell, width = *w)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let mut out = format_row(&header[..]);
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    for row in &rows {
        out.push('\n');
        out.push_str(&format_row(&row[..]));
    }
    out
}

pub fn render(records: &[&PriceRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(records)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => {
            let mut out: Vec<u8> = Vec::new();
            PriceRecord::write_price_csv(records.iter().copied(), &mut out)?;
            Ok(String::from_utf8(out)?.trim_end().to_string())
        }
    }
}
