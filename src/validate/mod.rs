//! Validation stages, run in this fixed order by the loader:
//!
//! ```text
//!   Dataset (raw cells)
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ structure  │  required columns present?
//!   └───────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │  coerce    │  declared-numeric columns → Float
//!   └───────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ constraints  │  per-column predicates, row-aware where needed
//!   └─────────────┘
//! ```

pub mod coerce;
pub mod constraints;
pub mod structure;

pub use coerce::coerce_numeric_columns;
pub use constraints::validate_constraints;
pub use structure::validate_structure;
