//! Publication records and the immutable in-memory dataset.
//!
//! A [`Dataset`] is loaded once per session by a [`DataStore`] and never mutated afterwards.
//! Every filter or summary works on borrowed views of it.

pub mod dates;
pub mod source;
pub mod store;

use chrono::{Datelike, NaiveDateTime};
use std::collections::BTreeSet;

pub use source::{DataSource, FileSource, MemorySource, SourceBytes};
pub use store::DataStore;

/// Column names the dataset understands. Anything else is passed through as an extra column.
pub const TITLE_COLUMN: &str = "title";
pub const ABSTRACT_COLUMN: &str = "abstract";
pub const JOURNAL_COLUMN: &str = "journal";
pub const PUBLISH_TIME_COLUMN: &str = "publish_time";

/// One publication entry.
///
/// Empty source cells become `None`; they are never coerced to empty strings so containment
/// checks can treat them as non-matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub publish_time: Option<NaiveDateTime>,
    /// Raw values of the non-standard columns, in schema order
    pub extra: Vec<String>,
}

impl Record {
    /// Publication year, present iff `publish_time` parsed.
    pub fn year(&self) -> Option<i32> {
        self.publish_time.map(|time| time.year())
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn abstract_text(&self) -> Option<&str> {
        self.abstract_text.as_deref()
    }

    pub fn journal(&self) -> Option<&str> {
        self.journal.as_deref()
    }
}

/// Where a source column's values live on a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Abstract,
    Journal,
    PublishTime,
    /// Index into [`Record::extra`]
    Extra(usize),
}

/// Ordered source columns and how each maps onto a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    names: Vec<String>,
    layout: Vec<Column>,
    extra_count: usize,
}

impl Schema {
    /// Build a schema from header names.
    ///
    /// Names are trimmed and a leading byte-order mark is dropped. The first occurrence of a
    /// known name claims it; repeats are treated as extra columns.
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        let mut layout = Vec::new();
        let mut claimed = BTreeSet::new();
        let mut extra_count = 0;

        for (idx, raw) in headers.into_iter().enumerate() {
            let mut name = raw.as_ref();
            if idx == 0 {
                name = name.trim_start_matches('\u{feff}');
            }
            let name = name.trim().to_string();

            let known = match name.as_str() {
                TITLE_COLUMN => Some(Column::Title),
                ABSTRACT_COLUMN => Some(Column::Abstract),
                JOURNAL_COLUMN => Some(Column::Journal),
                PUBLISH_TIME_COLUMN => Some(Column::PublishTime),
                _ => None,
            };

            let column = match known {
                Some(column) if claimed.insert(name.clone()) => column,
                _ => {
                    extra_count += 1;
                    Column::Extra(extra_count - 1)
                }
            };

            names.push(name);
            layout.push(column);
        }

        Self {
            names,
            layout,
            extra_count,
        }
    }

    /// The four standard columns and nothing else.
    pub fn standard() -> Self {
        Self::from_headers([
            TITLE_COLUMN,
            ABSTRACT_COLUMN,
            JOURNAL_COLUMN,
            PUBLISH_TIME_COLUMN,
        ])
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn layout(&self) -> &[Column] {
        &self.layout
    }

    pub fn extra_count(&self) -> usize {
        self.extra_count
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether the source carried the given standard column
    pub fn has(&self, column: Column) -> bool {
        self.layout.contains(&column)
    }
}

/// Counters gathered while loading a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Data rows read (header excluded)
    pub rows: usize,
    /// Non-empty `publish_time` cells that failed to parse and were nulled
    pub skipped_dates: usize,
}

/// The complete, immutable record set for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
    stats: LoadStats,
}

impl Dataset {
    pub fn new(schema: Schema, records: Vec<Record>) -> Self {
        let stats = LoadStats {
            rows: records.len(),
            skipped_dates: 0,
        };
        Self {
            schema,
            records,
            stats,
        }
    }

    pub(crate) fn with_stats(schema: Schema, records: Vec<Record>, stats: LoadStats) -> Self {
        Self {
            schema,
            records,
            stats,
        }
    }

    /// Parse a dataset straight from delimited bytes, bypassing any caching.
    pub fn parse(bytes: &[u8]) -> crate::Result<Self> {
        store::parse_dataset(bytes, "<memory>")
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Observed minimum and maximum year, or `None` when no record has a year.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.records
            .iter()
            .filter_map(Record::year)
            .fold(None, |bounds, year| match bounds {
                None => Some((year, year)),
                Some((min, max)) => Some((min.min(year), max.max(year))),
            })
    }

    /// Distinct non-null journals, sorted alphabetically.
    pub fn journals(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(Record::journal)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dated(year: i32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(year, 6, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    #[test]
    fn year_follows_publish_time() {
        let mut record = Record {
            publish_time: dated(2020),
            ..Default::default()
        };
        assert_eq!(record.year(), Some(2020));

        record.publish_time = None;
        assert_eq!(record.year(), None);
    }

    #[test]
    fn schema_maps_known_and_extra_columns() {
        let schema = Schema::from_headers(["\u{feff}cord_uid", " title ", "journal", "url"]);

        assert_eq!(schema.names(), &["cord_uid", "title", "journal", "url"]);
        assert_eq!(
            schema.layout(),
            &[
                Column::Extra(0),
                Column::Title,
                Column::Journal,
                Column::Extra(1)
            ]
        );
        assert_eq!(schema.extra_count(), 2);
        assert!(schema.has(Column::Title));
        assert!(!schema.has(Column::PublishTime));
    }

    #[test]
    fn repeated_known_column_becomes_extra() {
        let schema = Schema::from_headers(["title", "title"]);
        assert_eq!(schema.layout(), &[Column::Title, Column::Extra(0)]);
    }

    #[test]
    fn year_bounds_and_journals() {
        let records = vec![
            Record {
                journal: Some("Science".into()),
                publish_time: dated(2021),
                ..Default::default()
            },
            Record {
                journal: Some("Nature".into()),
                publish_time: dated(2019),
                ..Default::default()
            },
            Record {
                journal: Some("Nature".into()),
                ..Default::default()
            },
            Record::default(),
        ];
        let dataset = Dataset::new(Schema::standard(), records);

        assert_eq!(dataset.year_bounds(), Some((2019, 2021)));
        assert_eq!(dataset.journals(), vec!["Nature", "Science"]);
        assert_eq!(dataset.stats().rows, 4);
    }

    #[test]
    fn year_bounds_absent_without_dates() {
        let dataset = Dataset::new(Schema::standard(), vec![Record::default()]);
        assert_eq!(dataset.year_bounds(), None);
    }
}
