//! One-shot dataset loading.
//!
//! [`DataStore`] owns a source and a once-initialized slot for the parsed [`Dataset`]. The
//! first successful [`DataStore::load`] parses the source; every later call hands back the same
//! instance without touching the source again. A failed load leaves the slot empty.

use crate::data::dates::parse_publish_time;
use crate::data::source::{DataSource, FileSource};
use crate::data::{Column, Dataset, LoadStats, Record, Schema};
use crate::error::{CordexError, Result};
use log::{debug, info};
use once_cell::sync::OnceCell;
use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Instant;

/// Process-lifetime holder of the session dataset.
pub struct DataStore {
    source: Box<dyn DataSource>,
    dataset: OnceCell<Dataset>,
}

impl DataStore {
    pub fn new(source: impl DataSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            dataset: OnceCell::new(),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSource::new(path))
    }

    /// Load the dataset, parsing the source only on the first successful call.
    pub fn load(&self) -> Result<&Dataset> {
        self.dataset.get_or_try_init(|| {
            let started = Instant::now();
            let origin = self.source.describe();
            let bytes = self.source.open()?;
            let dataset = parse_dataset(&bytes, &origin)?;
            let stats = dataset.stats();
            info!(
                "loaded {} records from {} ({} unparseable dates) in {:?}",
                stats.rows,
                origin,
                stats.skipped_dates,
                started.elapsed()
            );
            Ok(dataset)
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Parse delimited bytes into a dataset.
///
/// Short rows are padded with nulls, surplus cells are dropped, invalid UTF-8 is decoded
/// lossily and unparseable dates are nulled. Only a missing header or a reader failure aborts.
pub(crate) fn parse_dataset(bytes: &[u8], origin: &str) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .byte_headers()
        .map_err(|e| CordexError::data_unavailable(origin, format!("unreadable header: {e}")))?
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect::<Vec<_>>();

    if headers.iter().all(|name| name.trim().is_empty()) {
        return Err(CordexError::data_unavailable(origin, "no header row"));
    }

    let schema = Schema::from_headers(&headers);
    let mut records = Vec::new();
    let mut stats = LoadStats::default();

    for (row, result) in reader.byte_records().enumerate() {
        let raw = result.map_err(|e| {
            CordexError::data_unavailable(origin, format!("failed to read row {}: {e}", row + 1))
        })?;

        let mut record = Record {
            extra: vec![String::new(); schema.extra_count()],
            ..Default::default()
        };

        for (idx, column) in schema.layout().iter().enumerate() {
            let cell = raw
                .get(idx)
                .map(String::from_utf8_lossy)
                .unwrap_or(Cow::Borrowed(""));

            match *column {
                Column::Title => record.title = non_empty(cell),
                Column::Abstract => record.abstract_text = non_empty(cell),
                Column::Journal => record.journal = non_empty(cell),
                Column::PublishTime => {
                    record.publish_time = parse_publish_time(&cell);
                    if record.publish_time.is_none() && !cell.trim().is_empty() {
                        stats.skipped_dates += 1;
                        debug!("row {}: skipped unparseable publish_time {:?}", row + 1, cell);
                    }
                }
                Column::Extra(slot) => record.extra[slot] = cell.into_owned(),
            }
        }

        records.push(record);
    }

    stats.rows = records.len();
    Ok(Dataset::with_stats(schema, records, stats))
}

fn non_empty(cell: Cow<'_, str>) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.into_owned())
    }
}
