//! Year and source summaries over a filtered view.

use crate::filter::FilteredView;
use std::collections::{BTreeMap, HashMap};

/// How many journals the sources chart shows.
pub const DEFAULT_TOP_SOURCES: usize = 10;

/// Record counts per publication year, keyed in ascending year order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearCounts {
    counts: BTreeMap<i32, usize>,
}

impl YearCounts {
    pub fn get(&self, year: i32) -> Option<usize> {
        self.counts.get(&year).copied()
    }

    /// `(year, count)` pairs, ascending by year
    pub fn iter(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.counts.iter().map(|(&year, &count)| (year, count))
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.counts.keys().copied()
    }

    /// Number of records that carried a year
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Top journals by record count, descending, ties in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCounts {
    entries: Vec<(String, usize)>,
}

impl SourceCounts {
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.entries
            .iter()
            .map(|(journal, count)| (journal.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count records per year. Records without a year are skipped.
pub fn year_counts(view: &FilteredView<'_>) -> YearCounts {
    let mut counts = BTreeMap::new();
    for year in view.iter().filter_map(|record| record.year()) {
        *counts.entry(year).or_insert(0) += 1;
    }
    YearCounts { counts }
}

/// The `k` most frequent journals. Records without a journal are skipped.
pub fn top_sources(view: &FilteredView<'_>, k: usize) -> SourceCounts {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut ordered: Vec<(&str, usize)> = Vec::new();

    for journal in view.iter().filter_map(|record| record.journal()) {
        match slots.get(journal) {
            Some(&slot) => ordered[slot].1 += 1,
            None => {
                slots.insert(journal, ordered.len());
                ordered.push((journal, 1));
            }
        }
    }

    // stable: equal counts keep first-seen order
    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    ordered.truncate(k);

    SourceCounts {
        entries: ordered
            .into_iter()
            .map(|(journal, count)| (journal.to_string(), count))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, Record, Schema};
    use crate::filter::FilteredView;
    use chrono::NaiveDate;

    fn record(journal: Option<&str>, year: Option<i32>) -> Record {
        Record {
            journal: journal.map(str::to_string),
            publish_time: year.and_then(|y| {
                NaiveDate::from_ymd_opt(y, 3, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
            }),
            ..Default::default()
        }
    }

    #[test]
    fn year_counts_skip_undated() {
        let data = Dataset::new(
            Schema::standard(),
            vec![
                record(None, Some(2021)),
                record(None, Some(2020)),
                record(None, None),
                record(None, Some(2021)),
            ],
        );
        let counts = year_counts(&FilteredView::all(&data));

        assert_eq!(counts.iter().collect::<Vec<_>>(), vec![(2020, 1), (2021, 2)]);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.get(1999), None);
    }

    #[test]
    fn top_sources_sorts_descending_with_stable_ties() {
        let data = Dataset::new(
            Schema::standard(),
            vec![
                record(Some("Lancet"), None),
                record(Some("Nature"), None),
                record(None, None),
                record(Some("Science"), None),
                record(Some("Nature"), None),
                record(Some("Science"), None),
                record(Some("BMJ"), None),
            ],
        );
        let sources = top_sources(&FilteredView::all(&data), DEFAULT_TOP_SOURCES);

        assert_eq!(
            sources.iter().collect::<Vec<_>>(),
            vec![("Nature", 2), ("Science", 2), ("Lancet", 1), ("BMJ", 1)]
        );
    }

    #[test]
    fn top_sources_truncates_to_k() {
        let records = (0..15)
            .map(|i| record(Some(&format!("J{i:02}")), None))
            .collect();
        let data = Dataset::new(Schema::standard(), records);
        let view = FilteredView::all(&data);

        assert_eq!(top_sources(&view, DEFAULT_TOP_SOURCES).len(), 10);
        assert_eq!(top_sources(&view, 3).entries()[2].0, "J02");
        assert!(top_sources(&view, 0).is_empty());
    }

    #[test]
    fn empty_view_yields_empty_summaries() {
        let data = Dataset::new(Schema::standard(), Vec::new());
        let view = FilteredView::all(&data);

        assert!(year_counts(&view).is_empty());
        assert!(top_sources(&view, DEFAULT_TOP_SOURCES).is_empty());
    }
}
