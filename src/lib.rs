//! Validation of meta-analysis study tables against per-family schemas, plus
//! the seam to the narrative report layer.

pub mod config;
pub mod data;
pub mod data_loader;
pub mod error;
pub mod report;
pub mod schema;
pub mod validate;

pub use config::{LoaderConfig, MetaSettings, Settings, SettingsError, ValidSettings};
pub use data::model::{CellValue, Dataset, Row};
pub use data_loader::DataLoader;
pub use error::ValidationError;
pub use schema::{AnalysisType, Schema, SchemaRegistry, StructureVariant};
