/// Data layer: core types and table reading.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (raw cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  columns in header order, Vec<Row>
///   └──────────┘
/// ```
pub mod loader;
pub mod model;
