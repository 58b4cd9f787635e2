//! Plain-text rendering of takeout rows for the terminal.

use std::fmt::Write;

use crate::models::TakeoutRow;

const COLUMNS: [&str; 6] = ["HP_ID", "Lat", "Lon", "NearestFAT", "DistToFAT_m", "Reason"];

fn cells(row: &TakeoutRow) -> [String; 6] {
    [
        row.hp_id.clone(),
        format!("{:.7}", row.lat),
        format!("{:.7}", row.lon),
        row.nearest_fat_id.clone().unwrap_or_else(|| "-".to_string()),
        row.distance_to_fat_m
            .map(|d| format!("{:.1}", d))
            .unwrap_or_else(|| "-".to_string()),
        row.reason.clone(),
    ]
}

fn format_line<I, S>(values: I, widths: &[usize]) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let line = values
        .into_iter()
        .zip(widths)
        .map(|(v, w)| format!("{:<width$}", v.as_ref(), width = *w))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

/// Render rows as an aligned table. Returns an empty string for no rows.
pub fn render_table(rows: &[TakeoutRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let body: Vec<[String; 6]> = rows.iter().map(cells).collect();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for line in &body {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", format_line(COLUMNS, &widths));
    for line in &body {
        let _ = writeln!(out, "{}", format_line(line, &widths));
    }

    out
}
