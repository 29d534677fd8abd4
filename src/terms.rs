//! Term frequencies over view titles, for the word cloud.
//!
//! Every token is counted as-is: no stop-word list, no stemming, no minimum length.

use crate::filter::FilteredView;
use std::collections::HashMap;

/// Token weights for a view, or an explicit nothing-to-show marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermFrequency {
    /// The view had no usable title text
    Empty,
    /// Lower-cased token to occurrence count; never empty
    Weights(HashMap<String, usize>),
}

impl TermFrequency {
    pub fn is_empty(&self) -> bool {
        matches!(self, TermFrequency::Empty)
    }

    pub fn get(&self, term: &str) -> Option<usize> {
        match self {
            TermFrequency::Empty => None,
            TermFrequency::Weights(weights) => weights.get(term).copied(),
        }
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        match self {
            TermFrequency::Empty => 0,
            TermFrequency::Weights(weights) => weights.len(),
        }
    }

    /// The `n` heaviest terms, by count descending then term ascending.
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let TermFrequency::Weights(weights) = self else {
            return Vec::new();
        };

        let mut entries: Vec<(&str, usize)> = weights
            .iter()
            .map(|(term, count)| (term.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}

/// Split text on anything that is not alphanumeric and lower-case the pieces.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// Count title tokens across a view.
pub fn build_from_titles(view: &FilteredView<'_>) -> TermFrequency {
    let joined = view
        .iter()
        .filter_map(|record| record.title())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.trim().is_empty() {
        return TermFrequency::Empty;
    }

    let mut weights = HashMap::new();
    for token in tokenize(&joined) {
        *weights.entry(token).or_insert(0) += 1;
    }

    if weights.is_empty() {
        TermFrequency::Empty
    } else {
        TermFrequency::Weights(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, Record, Schema};

    fn titled(titles: &[Option<&str>]) -> Dataset {
        let records = titles
            .iter()
            .map(|title| Record {
                title: title.map(str::to_string),
                ..Default::default()
            })
            .collect();
        Dataset::new(Schema::standard(), records)
    }

    #[test]
    fn counts_tokens_case_insensitively() {
        let data = titled(&[Some("The COVID-19 model"), Some("the covid response"), None]);
        let terms = build_from_titles(&FilteredView::all(&data));

        assert_eq!(terms.get("the"), Some(2));
        assert_eq!(terms.get("covid"), Some(2));
        assert_eq!(terms.get("19"), Some(1));
        assert_eq!(terms.get("model"), Some(1));
        assert_eq!(terms.len(), 5);
    }

    #[test]
    fn blank_or_missing_titles_are_empty() {
        let data = titled(&[None, Some("   "), None]);
        assert_eq!(
            build_from_titles(&FilteredView::all(&data)),
            TermFrequency::Empty
        );

        let nothing = titled(&[]);
        assert!(build_from_titles(&FilteredView::all(&nothing)).is_empty());
    }

    #[test]
    fn punctuation_only_titles_are_empty() {
        let data = titled(&[Some("--- ?!"), Some("...")]);
        assert!(build_from_titles(&FilteredView::all(&data)).is_empty());
    }

    #[test]
    fn single_word_is_not_empty() {
        let data = titled(&[Some("a")]);
        let terms = build_from_titles(&FilteredView::all(&data));
        assert!(!terms.is_empty());
        assert_eq!(terms.top(10), vec![("a", 1)]);
    }

    #[test]
    fn top_orders_by_weight_then_term() {
        let data = titled(&[Some("beta alpha beta gamma alpha delta")]);
        let terms = build_from_titles(&FilteredView::all(&data));

        assert_eq!(
            terms.top(3),
            vec![("alpha", 2), ("beta", 2), ("delta", 1)]
        );
    }

    #[test]
    fn tokenize_splits_on_punctuation() {
        let tokens: Vec<String> = tokenize("SARS-CoV-2: a review, (2020)").collect();
        assert_eq!(tokens, vec!["sars", "cov", "2", "a", "review", "2020"]);
    }
}
