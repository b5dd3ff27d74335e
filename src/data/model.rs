use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ImageRecord – one card in the grid
// ---------------------------------------------------------------------------

/// A single image entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: i64,
    pub name: String,
    pub category: String,
    /// Ordered as written in the source, compared as a set.
    #[serde(default)]
    pub tags: Vec<String>,
    pub year: i32,
}

impl ImageRecord {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        category: impl Into<String>,
        tags: &[&str],
        year: i32,
    ) -> Self {
        ImageRecord {
            id,
            name: name.into(),
            category: category.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            year,
        }
    }

    /// Whether the record carries `tag` (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("duplicate image id {0}")]
    DuplicateId(i64),
    #[error("image {id} has an empty name")]
    EmptyName { id: i64 },
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("column '{column}' has unsupported type {found}")]
    ColumnType { column: String, found: String },
    #[error("image {id}: tag {tag:?} cannot be written as a CSV tag")]
    UnencodableTag { id: i64, tag: String },
}

// ---------------------------------------------------------------------------
// ImageDataset – the complete loaded catalog
// ---------------------------------------------------------------------------

/// Flat, ordered list of image records with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDataset {
    records: Vec<ImageRecord>,
}

impl ImageDataset {
    /// Validate and wrap a list of records. Order is kept as given.
    pub fn from_records(records: Vec<ImageRecord>) -> Result<Self, DatasetError> {
        let mut seen = HashSet::with_capacity(records.len());
        for rec in &records {
            if rec.name.trim().is_empty() {
                return Err(DatasetError::EmptyName { id: rec.id });
            }
            if !seen.insert(rec.id) {
                return Err(DatasetError::DuplicateId(rec.id));
            }
        }
        Ok(ImageDataset { records })
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Selection – "all" sentinel or a concrete value
// ---------------------------------------------------------------------------

/// Value of a single-choice selector. The literal `"all"` parses to
/// [`Selection::All`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub const ALL: &'static str = "all";

    pub fn only(value: impl Into<String>) -> Self {
        let value = value.into();
        if value == Self::ALL {
            Selection::All
        } else {
            Selection::Only(value)
        }
    }

    /// The concrete value, or `None` for the sentinel. `Only("all")` counts
    /// as the sentinel however it was built.
    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::Only(v) if v != Self::ALL => Some(v.as_str()),
            _ => None,
        }
    }

    /// `true` when the selector is unset or equal to `value`.
    pub fn admits(&self, value: &str) -> bool {
        self.value().map_or(true, |v| v == value)
    }

    pub fn is_all(&self) -> bool {
        self.value().is_none()
    }
}

impl FromStr for Selection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Selection::only(s))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "{}", Self::ALL),
            Selection::Only(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// SortKey
// ---------------------------------------------------------------------------

/// Result ordering: name ascending or year descending.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Year,
}

impl SortKey {
    pub const ALL: [SortKey; 2] = [SortKey::Name, SortKey::Year];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Year => "Year",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let recs = vec![
            ImageRecord::new(1, "A", "x", &[], 2020),
            ImageRecord::new(1, "B", "x", &[], 2021),
        ];
        assert_eq!(
            ImageDataset::from_records(recs),
            Err(DatasetError::DuplicateId(1))
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        let recs = vec![ImageRecord::new(7, "  ", "x", &[], 2020)];
        assert_eq!(
            ImageDataset::from_records(recs),
            Err(DatasetError::EmptyName { id: 7 })
        );
    }

    #[test]
    fn all_literal_parses_to_sentinel() {
        assert_eq!("all".parse::<Selection>().unwrap(), Selection::All);
        assert_eq!(
            "nature".parse::<Selection>().unwrap(),
            Selection::Only("nature".into())
        );
        assert_eq!(Selection::All.to_string(), "all");
    }

    #[test]
    fn selection_admits() {
        assert!(Selection::All.admits("anything"));
        assert!(Selection::only("urban").admits("urban"));
        assert!(!Selection::only("urban").admits("Urban"));
        assert!(Selection::Only("all".into()).admits("nature"));
        assert!(Selection::Only("all".into()).is_all());
    }
}
