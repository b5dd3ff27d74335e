/// Data layer: records, loading, facets and the filter/sort pipeline.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv        built-in sample
///        │                              │
///        ▼                              ▼
///   ┌──────────┐                  ┌──────────┐
///   │  loader   │                 │  sample   │
///   └──────────┘                  └──────────┘
///        └──────────────┬───────────────┘
///                       ▼
///               ┌──────────────┐
///               │ ImageDataset │  Vec<ImageRecord>, unique ids
///               └──────────────┘
///                 │          │
///                 ▼          ▼
///          ┌──────────┐  ┌──────────┐
///          │  facets   │  │  filter   │  predicates + stable sort → indices
///          └──────────┘  └──────────┘
/// ```

pub mod facets;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
