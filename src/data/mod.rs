/// Data layer: core types, loading, filtering, and chart aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet  (local path or http(s) URL)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → EmployeeTable (13 pruned columns)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ EmployeeTable │  Vec<EmployeeRecord>, category/bounds indices
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection predicates → filtered row indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  histograms / box summaries for the charts
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
pub mod stats;
