//! Station export ingestion.
//!
//! This crate provides:
//! - **csv_table**: delimited reading into header + raw rows
//! - **layout**: narrow vs. wide detection from column names
//! - **loader**: reshaping raw rows into [`station_model::Observation`]s

pub mod csv_table;
pub mod error;
pub mod layout;
pub mod loader;

pub use csv_table::{CsvTable, RawRow};
pub use error::{LoadError, Result};
pub use layout::{SourceLayout, WideColumn};
pub use loader::{LoadedSource, RecordLoader};
