//! Searchable, filterable, sortable grid of image records.
//!
//! The filter/sort pipeline lives in [`data::filter`] and the facet
//! extraction in [`data::facets`]; both are pure functions over a slice of
//! [`data::model::ImageRecord`]. [`state::AppState`] owns the transient
//! filter state and the egui front end in [`app`] and [`ui`] renders it.

pub mod app;
pub mod cli;
pub mod color;
pub mod data;
pub mod placeholder;
pub mod state;
pub mod ui;
