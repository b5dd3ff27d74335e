use std::collections::HashSet;

use super::model::ImageRecord;

// ---------------------------------------------------------------------------
// Facets: distinct values offered by the filter controls
// ---------------------------------------------------------------------------

/// Distinct categories, tags and years, each in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub years: Vec<i32>,
}

/// Push `value` unless it has been seen before.
fn push_distinct<T: Clone + Eq + std::hash::Hash>(
    seen: &mut HashSet<T>,
    out: &mut Vec<T>,
    value: &T,
) {
    if seen.insert(value.clone()) {
        out.push(value.clone());
    }
}

/// Derive the facet sets from the dataset. Category casing is kept as is.
pub fn extract_facets(records: &[ImageRecord]) -> Facets {
    let mut facets = Facets::default();
    let mut seen_categories = HashSet::new();
    let mut seen_tags = HashSet::new();
    let mut seen_years = HashSet::new();

    for rec in records {
        push_distinct(&mut seen_categories, &mut facets.categories, &rec.category);
        for tag in &rec.tags {
            push_distinct(&mut seen_tags, &mut facets.tags, tag);
        }
        push_distinct(&mut seen_years, &mut facets.years, &rec.year);
    }
    facets
}

// ---------------------------------------------------------------------------
// Optional memoisation
// ---------------------------------------------------------------------------

/// Caches [`extract_facets`] per dataset generation.
///
/// When disabled every call recomputes from the records.
#[derive(Debug, Default)]
pub struct FacetCache {
    enabled: bool,
    cached: Option<(u64, Facets)>,
}

impl FacetCache {
    pub fn new(enabled: bool) -> Self {
        FacetCache {
            enabled,
            cached: None,
        }
    }

    /// Facets for `records`, which must be the dataset identified by
    /// `generation`. A new generation discards the cached value.
    pub fn get(&mut self, generation: u64, records: &[ImageRecord]) -> Facets {
        if !self.enabled {
            return extract_facets(records);
        }
        match &self.cached {
            Some((g, facets)) if *g == generation => facets.clone(),
            _ => {
                let facets = extract_facets(records);
                self.cached = Some((generation, facets.clone()));
                facets
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::sample_records;

    #[test]
    fn sample_facets_in_first_occurrence_order() {
        let facets = extract_facets(&sample_records());
        assert_eq!(facets.categories, ["nature", "urban"]);
        assert_eq!(
            facets.tags,
            ["mountains", "landscape", "city", "night", "ocean", "sunset"]
        );
        assert_eq!(facets.years, [2023, 2024]);
    }

    #[test]
    fn casing_is_preserved_and_distinct() {
        let records = vec![
            ImageRecord::new(1, "a", "Nature", &["x", "y"], 2020),
            ImageRecord::new(2, "b", "nature", &["y", "x"], 2019),
            ImageRecord::new(3, "c", "Nature", &["z"], 2020),
        ];
        let facets = extract_facets(&records);
        assert_eq!(facets.categories, ["Nature", "nature"]);
        assert_eq!(facets.tags, ["x", "y", "z"]);
        assert_eq!(facets.years, [2020, 2019]);
    }

    #[test]
    fn empty_dataset_has_no_facets() {
        assert_eq!(extract_facets(&[]), Facets::default());
    }

    #[test]
    fn cache_follows_generation() {
        let first = sample_records();
        let second = vec![ImageRecord::new(9, "Desert", "arid", &["sand"], 1999)];

        let mut cache = FacetCache::new(true);
        assert_eq!(cache.get(0, &first), extract_facets(&first));
        assert_eq!(cache.get(1, &second).categories, ["arid"]);
        // Same generation: the cached value is returned as is.
        assert_eq!(cache.get(1, &first).categories, ["arid"]);
    }

    #[test]
    fn disabled_cache_always_recomputes() {
        let mut cache = FacetCache::new(false);
        let first = sample_records();
        let second = vec![ImageRecord::new(9, "Desert", "arid", &["sand"], 1999)];
        assert_eq!(cache.get(0, &first).years, [2023, 2024]);
        assert_eq!(cache.get(0, &second).years, [1999]);
    }
}
