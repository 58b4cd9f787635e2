//! CSV export of takeout rows.
//!
//! Text columns are always quoted with embedded quotes doubled; coordinates
//! are written at full precision and the FAT distance with two decimals.

use std::io::{Read, Write};

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use serde::Deserialize;

use crate::error::Result;
use crate::models::TakeoutRow;

/// File name offered for the export
pub const DEFAULT_EXPORT_FILE: &str = "hp_takeout_nearest_fat.csv";

pub const HEADER: [&str; 7] = [
    "HP_ID",
    "Lat",
    "Lon",
    "Folder",
    "NearestFAT",
    "DistToFAT_m",
    "Reason",
];

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Write `rows` as CSV to `writer`.
pub fn write_csv<W: Write>(rows: &[TakeoutRow], writer: W) -> Result<()> {
    // Quoting is done per column above, so the writer must not add its own
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    csv_writer.write_record(HEADER)?;

    for row in rows {
        csv_writer.write_record([
            quoted(&row.hp_id),
            row.lat.to_string(),
            row.lon.to_string(),
            quoted(&row.group_label),
            quoted(row.nearest_fat_id.as_deref().unwrap_or_default()),
            row.distance_to_fat_m
                .map(|d| format!("{:.2}", d))
                .unwrap_or_default(),
            quoted(&row.reason),
        ])?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Render `rows` as a CSV string.
pub fn to_csv_string(rows: &[TakeoutRow]) -> Result<String> {
    let mut out = Vec::new();
    write_csv(rows, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "HP_ID")]
    hp_id: String,
    #[serde(rename = "Lat")]
    lat: f64,
    #[serde(rename = "Lon")]
    lon: f64,
    #[serde(rename = "Folder")]
    folder: String,
    #[serde(rename = "NearestFAT")]
    nearest_fat: String,
    #[serde(rename = "DistToFAT_m")]
    dist_to_fat_m: Option<f64>,
    #[serde(rename = "Reason")]
    reason: String,
}

impl From<CsvRow> for TakeoutRow {
    fn from(r: CsvRow) -> Self {
        Self {
            hp_id: r.hp_id,
            lat: r.lat,
            lon: r.lon,
            group_label: r.folder,
            nearest_fat_id: (!r.nearest_fat.is_empty()).then_some(r.nearest_fat),
            distance_to_fat_m: r.dist_to_fat_m,
            reason: r.reason,
        }
    }
}

/// Read rows back from a CSV produced by [`write_csv`].
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<TakeoutRow>> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<CsvRow>() {
        rows.push(record?.into());
    }
    Ok(rows)
}
