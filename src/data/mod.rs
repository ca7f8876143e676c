/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RecordStore
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ RecordStore   │  Vec<CustomerRecord>, category indices
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  gender/city/age predicates → filtered indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
