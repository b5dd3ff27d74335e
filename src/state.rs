use std::path::PathBuf;

use crate::color::CategoryColors;
use crate::data::facets::{FacetCache, Facets};
use crate::data::filter::{FilterState, filtered_indices};
use crate::data::model::{ImageDataset, ImageRecord, Selection, SortKey};
use crate::data::sample::sample_dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every setter replaces one field and recomputes `visible_indices`.
pub struct AppState {
    /// Active catalog. Starts as the built-in sample.
    dataset: ImageDataset,

    /// Bumped on every dataset change; keys the facet cache.
    generation: u64,

    /// File the dataset came from, `None` for the sample.
    pub source: Option<PathBuf>,

    filters: FilterState,

    /// Indices into the dataset passing the current filters, display order.
    visible_indices: Vec<usize>,

    facet_cache: FacetCache,

    colors: CategoryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(sample_dataset(), FilterState::default(), false)
    }
}

impl AppState {
    pub fn new(dataset: ImageDataset, filters: FilterState, cache_facets: bool) -> Self {
        let mut state = Self {
            dataset: ImageDataset::default(),
            generation: 0,
            source: None,
            filters,
            visible_indices: Vec::new(),
            facet_cache: FacetCache::new(cache_facets),
            colors: CategoryColors::default(),
            status_message: None,
        };
        state.install(dataset);
        state
    }

    /// Swap in `dataset` and clear selections naming a value it does not
    /// contain, so no filter is left that the controls cannot show or undo.
    fn install(&mut self, dataset: ImageDataset) {
        self.dataset = dataset;
        self.generation += 1;

        let facets = self.facets();
        let stale_category = self
            .filters
            .category
            .value()
            .is_some_and(|cat| !facets.categories.iter().any(|c| c == cat));
        if stale_category {
            log::warn!("Category '{}' not in dataset, showing all", self.filters.category);
            self.filters.category = Selection::All;
        }
        let stale_year = self
            .filters
            .year
            .value()
            .is_some_and(|year| !facets.years.iter().any(|y| y.to_string() == year));
        if stale_year {
            log::warn!("Year '{}' not in dataset, showing all", self.filters.year);
            self.filters.year = Selection::All;
        }
        self.filters.tags.retain(|t| {
            let known = facets.tags.contains(t);
            if !known {
                log::warn!("Tag '{t}' not in dataset, dropping it");
            }
            known
        });

        self.colors = CategoryColors::new(&facets.categories);
        self.refilter();
    }

    pub fn dataset(&self) -> &ImageDataset {
        &self.dataset
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn colors(&self) -> &CategoryColors {
        &self.colors
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible_indices
    }

    /// Records passing the current filters, in display order.
    pub fn visible_records(&self) -> impl Iterator<Item = &ImageRecord> + '_ {
        let records = self.dataset.records();
        self.visible_indices.iter().map(move |&i| &records[i])
    }

    pub fn has_results(&self) -> bool {
        !self.visible_indices.is_empty()
    }

    /// Distinct categories, tags and years of the current dataset.
    pub fn facets(&mut self) -> Facets {
        self.facet_cache.get(self.generation, self.dataset.records())
    }

    /// Ingest a newly loaded dataset. Search text and sort order are kept.
    pub fn set_dataset(&mut self, dataset: ImageDataset, source: Option<PathBuf>) {
        self.source = source;
        self.status_message = None;
        self.install(dataset);
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(self.dataset.records(), &self.filters);
        log::debug!(
            "Refiltered: {} of {} images visible",
            self.visible_indices.len(),
            self.dataset.len()
        );
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filters.search_term = term.into();
        self.refilter();
    }

    pub fn set_category(&mut self, category: Selection) {
        self.filters.category = category;
        self.refilter();
    }

    /// Check or uncheck a single tag in the tag filter.
    pub fn set_tag_checked(&mut self, tag: &str, checked: bool) {
        if checked {
            self.filters.tags.insert(tag.to_string());
        } else {
            self.filters.tags.remove(tag);
        }
        self.refilter();
    }

    pub fn set_year(&mut self, year: Selection) {
        self.filters.year = year;
        self.refilter();
    }

    pub fn set_sort(&mut self, sort_by: SortKey) {
        self.filters.sort_by = sort_by;
        self.refilter();
    }

    /// Back to defaults: no search, all categories/years, no tags, by name.
    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible_names(state: &AppState) -> Vec<String> {
        state.visible_records().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn starts_with_full_sample_by_name() {
        let state = AppState::default();
        assert_eq!(
            visible_names(&state),
            ["City Night", "Mountain Landscape", "Ocean Sunset"]
        );
    }

    #[test]
    fn setters_recompute_results() {
        let mut state = AppState::default();

        state.set_search_term("zzz");
        assert!(!state.has_results());

        state.set_search_term("");
        state.set_category(Selection::only("nature"));
        assert_eq!(visible_names(&state), ["Mountain Landscape", "Ocean Sunset"]);

        state.set_tag_checked("ocean", true);
        assert_eq!(visible_names(&state), ["Ocean Sunset"]);

        state.set_tag_checked("ocean", false);
        state.set_category(Selection::All);
        state.set_sort(SortKey::Year);
        assert_eq!(
            visible_names(&state),
            ["City Night", "Mountain Landscape", "Ocean Sunset"]
        );

        state.set_year(Selection::only("2024"));
        assert_eq!(visible_names(&state), ["City Night"]);

        state.reset_filters();
        assert_eq!(state.filters(), &FilterState::default());
        assert_eq!(state.visible_indices().len(), 3);
    }

    #[test]
    fn new_dataset_prunes_stale_selections() {
        let mut state = AppState::default();
        state.set_category(Selection::only("urban"));
        state.set_tag_checked("city", true);
        state.set_year(Selection::only("2024"));
        state.set_search_term("forest");

        let ds = ImageDataset::from_records(vec![ImageRecord::new(
            5,
            "Forest Trail",
            "nature",
            &["trees"],
            2022,
        )])
        .unwrap();
        state.set_dataset(ds, Some(PathBuf::from("forest.json")));

        assert_eq!(state.filters().category, Selection::All);
        assert!(state.filters().tags.is_empty());
        assert_eq!(state.filters().year, Selection::All);
        assert_eq!(state.filters().search_term, "forest");
        assert_eq!(visible_names(&state), ["Forest Trail"]);
    }

    #[test]
    fn initial_selections_unknown_to_dataset_are_dropped() {
        let mut filters = FilterState::default();
        filters.tags.insert("city".into());
        filters.tags.insert("volcano".into());
        filters.category = Selection::only("space");
        filters.year = Selection::only("2024");

        let state = AppState::new(sample_dataset(), filters, false);
        assert_eq!(
            state.filters().tags.iter().collect::<Vec<_>>(),
            ["city"]
        );
        assert_eq!(state.filters().category, Selection::All);
        assert_eq!(state.filters().year, Selection::only("2024"));
        assert_eq!(visible_names(&state), ["City Night"]);
    }

    #[test]
    fn facets_track_dataset_with_cache_enabled() {
        let mut state = AppState::new(sample_dataset(), FilterState::default(), true);
        assert_eq!(state.facets().categories, ["nature", "urban"]);

        let ds = ImageDataset::from_records(vec![ImageRecord::new(
            1, "Dune", "desert", &["sand"], 2001,
        )])
        .unwrap();
        state.set_dataset(ds, None);
        assert_eq!(state.facets().categories, ["desert"]);
        assert_eq!(state.facets().years, [2001]);
    }
}
