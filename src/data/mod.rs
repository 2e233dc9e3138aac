/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx workbook
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read sheet → PerformanceTable (or LoadError)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ PerformanceTable  │  Vec<Record>, per-column unique values
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  categorical sets + score range → visible indices
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │  aggregate   │  group means, summary stats
///   └─────────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
