//! Static schema catalog: required columns, numeric declarations and
//! per-column constraints for each meta-analysis family.

pub mod predicates;
pub mod registry;

pub use predicates::{CellPredicate, Constraint, RowPredicate};
pub use registry::{AnalysisType, ColumnType, Schema, SchemaRegistry, StructureVariant};
