//! Serializing a view back to the source's flat CSV layout.
//!
//! Output uses the source header verbatim, one row per record in view order. Nulls become
//! empty cells and parsed publish times are written so that loading the file again yields
//! the same years.

use crate::data::dates::format_publish_time;
use crate::data::{Column, Record, Schema};
use crate::error::{CordexError, Result};
use crate::filter::FilteredView;
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name used for every export.
pub const EXPORT_FILE_NAME: &str = "cord19_filtered.csv";

/// Content type of exported data.
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// Write `records` as CSV with `schema`'s header to `writer`.
pub fn write_to<'a, W: Write>(
    schema: &Schema,
    records: impl IntoIterator<Item = &'a Record>,
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer
        .write_record(schema.names())
        .map_err(|e| CordexError::export(format!("cannot write header: {e}")))?;

    let mut row: Vec<String> = Vec::with_capacity(schema.len());
    for record in records {
        row.clear();
        row.extend(schema.layout().iter().map(|column| cell(record, *column)));
        csv_writer
            .write_record(&row)
            .map_err(|e| CordexError::export(format!("cannot write record: {e}")))?;
    }

    csv_writer
        .flush()
        .map_err(|e| CordexError::export(format!("cannot flush output: {e}")))
}

/// Serialize a view to UTF-8 CSV bytes.
pub fn serialize(schema: &Schema, view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_to(schema, view.iter(), &mut buffer)?;
    Ok(buffer)
}

/// Write a view to [`EXPORT_FILE_NAME`] inside `dir`, replacing any previous export atomically.
pub fn export_to_dir(schema: &Schema, view: &FilteredView<'_>, dir: &Path) -> Result<PathBuf> {
    let target = dir.join(EXPORT_FILE_NAME);

    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        CordexError::file_error(format!("cannot create file in {}", dir.display()), e)
    })?;
    write_to(schema, view.iter(), staged.as_file_mut())?;
    staged
        .persist(&target)
        .map_err(|e| CordexError::file_error(format!("cannot write {}", target.display()), e.error))?;

    info!("exported {} records to {}", view.len(), target.display());
    Ok(target)
}

fn cell(record: &Record, column: Column) -> String {
    match column {
        Column::Title => record.title.clone().unwrap_or_default(),
        Column::Abstract => record.abstract_text.clone().unwrap_or_default(),
        Column::Journal => record.journal.clone().unwrap_or_default(),
        Column::PublishTime => record
            .publish_time
            .as_ref()
            .map(format_publish_time)
            .unwrap_or_default(),
        Column::Extra(slot) => record.extra.get(slot).cloned().unwrap_or_default(),
    }
}
