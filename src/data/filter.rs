use std::cmp::Ordering;
use std::collections::BTreeSet;

use icu_collator::{Collator, CollatorOptions};

use super::model::{ImageRecord, Selection, SortKey};

// ---------------------------------------------------------------------------
// Filter state: what the user has chosen in the filter bar
// ---------------------------------------------------------------------------

/// Transient search / filter / sort parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive substring matched against the name.
    pub search_term: String,
    pub category: Selection,
    /// Every selected tag must be present on a record (AND).
    pub tags: BTreeSet<String>,
    /// Compared against the decimal form of the record's year.
    pub year: Selection,
    pub sort_by: SortKey,
}

impl FilterState {
    /// Whether any filter would hide a record. Sort order is not a filter.
    pub fn is_filtering(&self) -> bool {
        !self.search_term.is_empty()
            || !self.category.is_all()
            || !self.tags.is_empty()
            || !self.year.is_all()
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn matches_search(record: &ImageRecord, needle_lower: &str) -> bool {
    needle_lower.is_empty() || record.name.to_lowercase().contains(needle_lower)
}

fn matches_tags(record: &ImageRecord, selected: &BTreeSet<String>) -> bool {
    selected.iter().all(|tag| record.has_tag(tag))
}

fn matches_year(record: &ImageRecord, year: &Selection) -> bool {
    year.is_all() || year.admits(&record.year.to_string())
}

fn matches_lowered(record: &ImageRecord, state: &FilterState, needle_lower: &str) -> bool {
    matches_search(record, needle_lower)
        && state.category.admits(&record.category)
        && matches_tags(record, &state.tags)
        && matches_year(record, &state.year)
}

/// A record passes when search, category, tags and year all pass.
pub fn matches(record: &ImageRecord, state: &FilterState) -> bool {
    matches_lowered(record, state, &state.search_term.to_lowercase())
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Locale-aware name ordering using the root collation (tertiary strength).
///
/// Accented letters sort with their base letter and lowercase comes before
/// uppercase on otherwise equal names.
pub struct NameOrder {
    collator: Option<Collator>,
}

impl NameOrder {
    pub fn new() -> Self {
        let collator = match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("Root collator unavailable, sorting by code point: {e}");
                None
            }
        };
        NameOrder { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(c) => c.compare(a, b),
            None => a.cmp(b),
        }
    }
}

impl Default for NameOrder {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off comparison with a fresh [`NameOrder`].
pub fn compare_names(a: &str, b: &str) -> Ordering {
    NameOrder::new().compare(a, b)
}

fn compare_records(
    a: &ImageRecord,
    b: &ImageRecord,
    sort_by: SortKey,
    names: &NameOrder,
) -> Ordering {
    match sort_by {
        SortKey::Name => names.compare(&a.name, &b.name),
        SortKey::Year => b.year.cmp(&a.year),
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Return indices of records passing all filters, in display order.
///
/// Ties keep dataset order (`sort_by` is stable).
pub fn filtered_indices(records: &[ImageRecord], state: &FilterState) -> Vec<usize> {
    let needle = state.search_term.to_lowercase();
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, rec)| matches_lowered(rec, state, &needle))
        .map(|(i, _)| i)
        .collect();

    let names = NameOrder::new();
    indices.sort_by(|&a, &b| compare_records(&records[a], &records[b], state.sort_by, &names));
    indices
}

/// Filter then sort, returning owned records.
pub fn filter_and_sort(records: &[ImageRecord], state: &FilterState) -> Vec<ImageRecord> {
    filtered_indices(records, state)
        .into_iter()
        .map(|i| records[i].clone())
        .collect()
}
