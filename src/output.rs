//! Output formatting and persistence for dashboard data.
//!
//! Supports pretty-printing, JSON serialization, CSV export of the filtered
//! view and the preview table.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Debug;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::filter::{FilteredView, PreviewSize};

/// Header of the derived column appended to exported rows.
pub const SENTIMENT_COLUMN: &str = "sentiment";

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    debug!("{:#?}", value);
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes the rows of `view` as CSV, with a trailing sentiment column.
pub fn write_csv<W: Write>(writer: W, view: &FilteredView<'_>, headers: &[String]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(headers.iter().map(String::as_str).chain([SENTIMENT_COLUMN]))?;
    for row in view.iter() {
        writer.write_record(
            row.fields
                .iter()
                .map(String::as_str)
                .chain([row.sentiment.as_str()]),
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Exports the filtered view to a CSV file at `path`, replacing it if present.
pub fn export_csv(path: impl AsRef<Path>, view: &FilteredView<'_>, headers: &[String]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = view.len(), "Exporting CSV");

    let file = std::fs::File::create(path)?;
    write_csv(file, view, headers)
}

/// A small slice of the view shaped for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The first `size` rows of `view`.
///
/// When both `name` and `url` columns exist their positions are swapped so
/// the name leads the table.
pub fn preview(view: &FilteredView<'_>, headers: &[String], size: PreviewSize) -> Preview {
    let mut order: Vec<usize> = (0..headers.len()).collect();

    let name = headers.iter().position(|h| h == "name");
    let url = headers.iter().position(|h| h == "url");
    if let (Some(n), Some(u)) = (name, url) {
        order.swap(n, u);
    }

    Preview {
        headers: order.iter().map(|&i| headers[i].clone()).collect(),
        rows: view
            .iter()
            .take(size.get())
            .map(|r| {
                order
                    .iter()
                    .map(|&i| r.fields.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect(),
    }
}

impl Preview {
    /// Writes the preview as CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
