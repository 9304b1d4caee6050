/// Data layer: core types, loading, selection, summaries, and export.
///
/// Architecture:
/// ```text
///  .parquet / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Catalog
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Catalog  │  named columns, N rows
///   └──────────┘
///        │
///        ├──► select   apply optional z / mass cuts → Catalog
///        ├──► summary  capability probe + statistics report
///        └──► export   delimited text (CSV)
/// ```

pub mod export;
pub mod loader;
pub mod model;
pub mod select;
pub mod summary;
