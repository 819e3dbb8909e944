//! # Client-side Search over Property Records
//!
//! The table fetches the full record set once and does every search step locally.
//!
//! ## Pipeline Quick Reference
//!
//! | Step                          | Input                    | Output                       |
//! |-------------------------------|--------------------------|------------------------------|
//! | `filter(records, query)`      | all records, raw query   | matching records + flag      |
//! | `build_suggestions(records)`  | filtered records         | lowercase token vocabulary   |
//! | `autocomplete(vocab, query)`  | vocabulary, raw query    | tokens containing the query  |
//! | `Pager::paginate(records)`    | filtered records         | one fixed-size page          |
//!
//! Suggestions are always rebuilt from the filtered records, so the vocabulary
//! narrows as the query narrows.
//!
//! ## Matching
//!
//! A record matches when any searchable field, lowercased, contains the trimmed
//! and lowercased query as a substring. Dates match in `YYYY-MM-DD` form. There is
//! no tokenizing, stemming or ranking on the query side.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::{Field, PropertyRecord};

pub mod pagination;

pub use pagination::{DEFAULT_PAGE_SIZE, Page, Pager};

/// Tokens need more than this many characters to become suggestions.
pub const SUGGESTION_MIN_EXCLUSIVE_LEN: usize = 2;

pub const NO_RESULTS_MESSAGE: &str = "No properties found. Please adjust your search.";

/// Fields whose words feed the suggestion vocabulary.
pub const SUGGESTION_FIELDS: &[Field] = &[Field::PropertyType, Field::Address, Field::CurrentOwnerName];

/// Fields the query is matched against.
pub const SEARCH_FIELDS: &[Field] = &[
    Field::PropertyType,
    Field::Address,
    Field::CurrentOwnerName,
    Field::ExtentInSqYds,
    Field::Boundary,
    Field::DocumentType,
    Field::DocumentNumber,
    Field::YearOfPurchase,
    Field::SellerName,
    Field::RegistrationDate,
    Field::RegistrarOffice,
];

/// Records kept by a query, plus the no-results signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub records: Vec<PropertyRecord>,
    pub no_results: bool,
}

impl SearchOutcome {
    /// Notice to show when nothing matched.
    pub fn message(&self) -> Option<&'static str> {
        self.no_results.then_some(NO_RESULTS_MESSAGE)
    }
}

/// Trims and lowercases a raw query.
#[inline]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Builds the suggestion vocabulary from the given records.
pub fn build_suggestions<'a, I>(records: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    let mut vocabulary = BTreeSet::new();
    for record in records {
        for field in SUGGESTION_FIELDS {
            let text = record.field_text(*field);
            for word in text.split_whitespace() {
                if word.chars().count() > SUGGESTION_MIN_EXCLUSIVE_LEN {
                    vocabulary.insert(word.to_lowercase());
                }
            }
        }
    }
    vocabulary
}

/// Whether the record matches an already-normalized, non-empty query.
pub fn matches(record: &PropertyRecord, normalized_query: &str) -> bool {
    SEARCH_FIELDS
        .iter()
        .any(|field| record.field_text(*field).to_lowercase().contains(normalized_query))
}

/// Keeps the records matching `query`. An empty query keeps everything.
pub fn filter(records: &[PropertyRecord], query: &str) -> SearchOutcome {
    let normalized = normalize_query(query);
    if normalized.is_empty() {
        return SearchOutcome {
            records: records.to_vec(),
            no_results: false,
        };
    }

    let kept: Vec<PropertyRecord> = records
        .iter()
        .filter(|record| matches(record, &normalized))
        .cloned()
        .collect();
    let no_results = kept.is_empty();
    SearchOutcome { records: kept, no_results }
}

/// Suggestions that contain the query, for the autocomplete list.
///
/// Nothing is offered while the query is empty.
pub fn autocomplete<'a>(suggestions: &'a BTreeSet<String>, query: &str) -> Vec<&'a str> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    suggestions
        .iter()
        .filter(|suggestion| suggestion.contains(&needle))
        .map(String::as_str)
        .collect()
}
