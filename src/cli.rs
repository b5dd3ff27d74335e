use std::path::PathBuf;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::Parser;

use crate::data::filter::{FilterState, filter_and_sort};
use crate::data::loader::{load_file, to_record_batch};
use crate::data::model::{ImageDataset, Selection, SortKey};
use crate::data::sample::sample_dataset;
use crate::ui::grid::NO_RESULTS;

/// Browse an image catalog with search, category, tag and year filters.
#[derive(Debug, Parser)]
#[command(name = "image-grid", version, about)]
pub struct Args {
    /// Catalog to open (.json, .csv or .parquet). Defaults to the built-in sample.
    #[arg(long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Initial case-insensitive name search.
    #[arg(long, default_value = "")]
    pub search: String,

    /// Initial category, or "all".
    #[arg(long, default_value = Selection::ALL)]
    pub category: Selection,

    /// Required tag; repeat for several (all must match).
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Initial year, or "all".
    #[arg(long, default_value = Selection::ALL)]
    pub year: Selection,

    /// Result ordering.
    #[arg(long, value_enum, default_value_t = SortKey::Name)]
    pub sort: SortKey,

    /// Cache facet extraction per dataset instead of recomputing each frame.
    #[arg(long)]
    pub cache_facets: bool,

    /// Print the matching images as a table and exit without opening a window.
    #[arg(long)]
    pub print: bool,
}

impl Args {
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            search_term: self.search.clone(),
            category: self.category.clone(),
            tags: self.tags.iter().cloned().collect(),
            year: self.year.clone(),
            sort_by: self.sort,
        }
    }

    pub fn load_dataset(&self) -> Result<ImageDataset> {
        match &self.dataset {
            Some(path) => {
                let ds = load_file(path)
                    .with_context(|| format!("loading {}", path.display()))?;
                log::info!("Loaded {} images from {}", ds.len(), path.display());
                Ok(ds)
            }
            None => Ok(sample_dataset()),
        }
    }
}

/// Run the filter/sort pipeline and render the result as a text table.
pub fn format_results(dataset: &ImageDataset, filters: &FilterState) -> Result<String> {
    let results = filter_and_sort(dataset.records(), filters);
    if results.is_empty() {
        return Ok(NO_RESULTS.to_string());
    }
    let batch = to_record_batch(&results)?;
    let table = pretty_format_batches(&[batch]).context("formatting result table")?;
    Ok(table.to_string())
}
