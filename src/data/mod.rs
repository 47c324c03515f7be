/// Data layer: core types, acquisition, loading, filtering and export.
///
/// Architecture:
/// ```text
///   URL ──► source ──► cache file          local .csv / .json / .parquet
///                          │                          │
///                          └────────────┬─────────────┘
///                                       ▼
///                                 ┌──────────┐
///                                 │  loader   │  parse file → Dataset
///                                 └──────────┘
///                                       │
///                                       ▼
///                                 ┌──────────┐
///                                 │  Dataset  │  Vec<Observation>, year bounds
///                                 └──────────┘
///                                       │
///                                       ▼
///                                 ┌──────────┐
///                                 │  filter   │  YearRange → Vec<&Observation>
///                                 └──────────┘
///                                       │
///                                       ▼
///                                 ┌──────────┐
///                                 │  export   │  subset → CSV bytes
///                                 └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod source;
