//! Terminal rendering of plans and results.

use scout_core::{FilterSet, RawFilterMapping, RawFilterValue, ResultRecord};
use scout_search::export::HEADER;
use std::fmt::Write as _;

/// Filters as extracted from the command, before normalization.
pub fn format_filters(filters: &RawFilterMapping) -> String {
    let mut out = String::from("Interpreted filters:");
    if filters.is_empty() {
        out.push_str(" (none)");
    }
    for (category, value) in filters {
        let text = match value {
            RawFilterValue::One(v) => v.clone(),
            RawFilterValue::Many(values) => values.join(", "),
        };
        let _ = write!(out, "\n  {category}: {text}");
    }
    out
}

/// Numbered list of the searches about to run.
pub fn format_plan(plan: &[FilterSet]) -> String {
    let mut out = format!("Planned {} search(es):", plan.len());
    for (i, filters) in plan.iter().enumerate() {
        let _ = write!(out, "\n  {}. {}", i + 1, filters);
    }
    out
}

/// First `rows` records as an aligned text table.
pub fn format_preview(records: &[ResultRecord], rows: usize) -> String {
    let table: Vec<[&str; 6]> = records
        .iter()
        .take(rows)
        .map(|r| {
            [
                r.action.as_str(),
                r.location.as_str(),
                r.name.as_str(),
                r.organization.as_str(),
                r.phone.as_str(),
                r.website_url.as_str(),
            ]
        })
        .collect();

    let mut widths = HEADER.map(str::len);
    for row in &table {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&HEADER).chain(&table) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }

    if records.len() > rows {
        let _ = writeln!(out, "... and {} more", records.len() - rows);
    }
    out
}
