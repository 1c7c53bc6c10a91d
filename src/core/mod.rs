//! Import engine

mod importer;

pub use importer::{ImportConfig, WorkbookImporter};
