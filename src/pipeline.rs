//! The filter-and-aggregate pass run on every interaction.
//!
//! [`Snapshot::compute`] is a pure function of the dataset, the criteria and the settings.
//! Hosts call it whenever the criteria change and render from the result; nothing is cached
//! between calls.

use crate::aggregate::{top_sources, year_counts, SourceCounts, YearCounts};
use crate::config::Settings;
use crate::data::{Dataset, Record};
use crate::filter::{FilterCriteria, FilterEngine, FilteredView};
use crate::terms::{build_from_titles, TermFrequency};
use std::io::{self, Write};

/// A filtered view together with every summary derived from it.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub criteria: FilterCriteria,
    pub view: FilteredView<'a>,
    pub year_counts: YearCounts,
    pub top_sources: SourceCounts,
    pub terms: TermFrequency,
    preview_rows: usize,
}

impl<'a> Snapshot<'a> {
    pub fn compute(dataset: &'a Dataset, criteria: &FilterCriteria, settings: &Settings) -> Self {
        let view = FilterEngine::apply(dataset, criteria);
        let year_counts = year_counts(&view);
        let top_sources = top_sources(&view, settings.top_sources);
        let terms = build_from_titles(&view);

        Self {
            criteria: criteria.clone(),
            view,
            year_counts,
            top_sources,
            terms,
            preview_rows: settings.preview_rows,
        }
    }

    /// Leading records of the view for the preview table
    pub fn preview(&self) -> &[&'a Record] {
        self.view.head(self.preview_rows)
    }

    pub fn match_count(&self) -> usize {
        self.view.len()
    }

    /// "Showing 1,234 papers after applying filters."
    pub fn summary_line(&self) -> String {
        format!(
            "Showing {} papers after applying filters.",
            format_count(self.match_count())
        )
    }

    /// Plain-text report of every summary, for non-interactive use.
    pub fn write_report<W: Write>(&self, mut out: W, cloud_terms: usize) -> io::Result<()> {
        writeln!(out, "{}", self.summary_line())?;

        writeln!(out, "\nPublications by year:")?;
        if self.year_counts.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for (year, count) in self.year_counts.iter() {
            writeln!(out, "  {year}  {}", format_count(count))?;
        }

        writeln!(out, "\nTop journals:")?;
        if self.top_sources.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for (journal, count) in self.top_sources.iter() {
            writeln!(out, "  {:>8}  {journal}", format_count(count))?;
        }

        writeln!(out, "\nTop title terms:")?;
        let top = self.terms.top(cloud_terms);
        if top.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for (term, count) in top {
            writeln!(out, "  {:>8}  {term}", format_count(count))?;
        }
        Ok(())
    }
}

/// Format a count with thousands separators.
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Schema;
    use crate::filter::YearRange;

    fn sample() -> Dataset {
        Dataset::parse(
            b"title,abstract,journal,publish_time\n\
              Covid spread model,,Nature,2020-02-01\n\
              Vaccine trial,,Nature,2021-07-01\n\
              Unrelated,,Science,2020-10-10\n",
        )
        .unwrap()
    }

    #[test]
    fn computes_all_summaries_from_one_view() {
        let data = sample();
        let criteria = FilterCriteria::new().with_year_range(Some(YearRange::new(2020, 2020)));
        let snapshot = Snapshot::compute(&data, &criteria, &Settings::default());

        assert_eq!(snapshot.match_count(), 2);
        assert_eq!(snapshot.year_counts.iter().collect::<Vec<_>>(), vec![(2020, 2)]);
        assert_eq!(
            snapshot.top_sources.iter().collect::<Vec<_>>(),
            vec![("Nature", 1), ("Science", 1)]
        );
        assert_eq!(snapshot.terms.get("unrelated"), Some(1));
        assert_eq!(snapshot.summary_line(), "Showing 2 papers after applying filters.");
    }

    #[test]
    fn preview_is_capped_by_settings() {
        let data = sample();
        let settings = Settings {
            preview_rows: 1,
            ..Settings::default()
        };
        let snapshot = Snapshot::compute(&data, &FilterCriteria::new(), &settings);

        assert_eq!(snapshot.preview().len(), 1);
        assert_eq!(snapshot.preview()[0].title(), Some("Covid spread model"));
    }

    #[test]
    fn empty_dataset_gives_empty_snapshot() {
        let data = Dataset::new(Schema::standard(), Vec::new());
        let snapshot = Snapshot::compute(&data, &FilterCriteria::new(), &Settings::default());

        assert!(snapshot.view.is_empty());
        assert!(snapshot.year_counts.is_empty());
        assert!(snapshot.top_sources.is_empty());
        assert!(snapshot.terms.is_empty());
    }

    #[test]
    fn report_lists_every_summary() {
        let data = sample();
        let snapshot = Snapshot::compute(&data, &FilterCriteria::new(), &Settings::default());
        let mut out = Vec::new();
        snapshot.write_report(&mut out, 3).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Showing 3 papers after applying filters.\n"));
        assert!(text.contains("  2020  2\n"));
        assert!(text.contains("       2  Nature\n"));
        assert!(text.contains("Top title terms:"));
    }

    #[test]
    fn report_marks_empty_sections() {
        let data = sample();
        let criteria = FilterCriteria::new().with_keyword("nothing matches this");
        let snapshot = Snapshot::compute(&data, &criteria, &Settings::default());
        let mut out = Vec::new();
        snapshot.write_report(&mut out, 3).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("(none)").count(), 3);
    }

    #[test]
    fn counts_are_grouped_by_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
