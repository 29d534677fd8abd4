//! Filter criteria and the engine that narrows a dataset.
//!
//! Three predicates are combined with AND: keyword containment in title or abstract, an
//! inclusive year range, and journal membership. An inactive predicate always passes, so the
//! default criteria select everything. Views keep the dataset's order.

use crate::data::{Dataset, Record};
use memchr::memmem::Finder;
use std::collections::BTreeSet;

/// Inclusive year bounds with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    /// Create a range, swapping reversed bounds.
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// Resolve optional user bounds against the dataset's observed bounds.
    ///
    /// No bounds given means no year filter. A single bound is completed from `observed`;
    /// without observed years the missing side stays open.
    pub fn from_bounds(
        from: Option<i32>,
        to: Option<i32>,
        observed: Option<(i32, i32)>,
    ) -> Option<Self> {
        match (from, to) {
            (None, None) => None,
            (Some(from), Some(to)) => Some(Self::new(from, to)),
            (Some(from), None) => Some(Self::new(
                from,
                observed.map_or(i32::MAX, |(_, max)| max.max(from)),
            )),
            (None, Some(to)) => Some(Self::new(
                observed.map_or(i32::MIN, |(min, _)| min.min(to)),
                to,
            )),
        }
    }
}

/// The current set of filter parameters. Empty keyword / no range / empty set are inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub keyword: String,
    pub year_range: Option<YearRange>,
    pub journals: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub fn with_year_range(mut self, year_range: Option<YearRange>) -> Self {
        self.year_range = year_range;
        self
    }

    pub fn with_journals<I, S>(mut self, journals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.journals = journals.into_iter().map(Into::into).collect();
        self
    }

    /// True when no predicate is active
    pub fn is_inactive(&self) -> bool {
        self.keyword.is_empty() && self.year_range.is_none() && self.journals.is_empty()
    }
}

/// Ordered subsequence of a dataset matching some criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record of the dataset.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            records: dataset.records().iter().collect(),
        }
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `n` records, or all of them when the view is shorter.
    pub fn head(&self, n: usize) -> &[&'a Record] {
        &self.records[..n.min(self.records.len())]
    }

    /// Filter this view further with the same rules as [`FilterEngine::apply`].
    pub fn refine(&self, criteria: &FilterCriteria) -> FilteredView<'a> {
        FilterEngine::select(self.iter(), criteria)
    }

    /// Copy the selected records out of the dataset.
    pub fn to_records(&self) -> Vec<Record> {
        self.iter().cloned().collect()
    }
}

/// Produces filtered views from a dataset.
pub struct FilterEngine;

impl FilterEngine {
    /// Select the records of `dataset` that satisfy every active predicate of `criteria`.
    pub fn apply<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
        Self::select(dataset.records().iter(), criteria)
    }

    fn select<'a>(
        records: impl Iterator<Item = &'a Record>,
        criteria: &FilterCriteria,
    ) -> FilteredView<'a> {
        let predicate = Predicate::compile(criteria);
        FilteredView {
            records: records.filter(|record| predicate.matches(record)).collect(),
        }
    }

    /// Check one record against the criteria.
    pub fn matches(record: &Record, criteria: &FilterCriteria) -> bool {
        Predicate::compile(criteria).matches(record)
    }
}

/// Criteria prepared for repeated evaluation.
struct Predicate<'c> {
    keyword: Option<KeywordMatcher>,
    year_range: Option<YearRange>,
    journals: Option<&'c BTreeSet<String>>,
}

impl<'c> Predicate<'c> {
    fn compile(criteria: &'c FilterCriteria) -> Self {
        Self {
            keyword: (!criteria.keyword.is_empty()).then(|| KeywordMatcher::new(&criteria.keyword)),
            year_range: criteria.year_range,
            journals: (!criteria.journals.is_empty()).then_some(&criteria.journals),
        }
    }

    fn matches(&self, record: &Record) -> bool {
        self.matches_keyword(record) && self.matches_year(record) && self.matches_journal(record)
    }

    fn matches_keyword(&self, record: &Record) -> bool {
        let Some(matcher) = &self.keyword else {
            return true;
        };
        record.title().is_some_and(|title| matcher.is_in(title))
            || record.abstract_text().is_some_and(|text| matcher.is_in(text))
    }

    fn matches_year(&self, record: &Record) -> bool {
        match self.year_range {
            None => true,
            Some(range) => record.year().is_some_and(|year| range.contains(year)),
        }
    }

    fn matches_journal(&self, record: &Record) -> bool {
        match self.journals {
            None => true,
            Some(set) => record.journal().is_some_and(|journal| set.contains(journal)),
        }
    }
}

/// Case-insensitive substring search over lower-cased text.
struct KeywordMatcher {
    finder: Finder<'static>,
}

impl KeywordMatcher {
    fn new(keyword: &str) -> Self {
        Self {
            finder: Finder::new(keyword.to_lowercase().as_bytes()).into_owned(),
        }
    }

    fn is_in(&self, haystack: &str) -> bool {
        if haystack.bytes().any(|b| b.is_ascii_uppercase()) || !haystack.is_ascii() {
            self.finder.find(haystack.to_lowercase().as_bytes()).is_some()
        } else {
            self.finder.find(haystack.as_bytes()).is_some()
        }
    }
}
