mod catalog;
mod classification;
mod document;
mod extraction;

pub use catalog::{CatalogEntry, CatalogError, DocumentTypeCatalog};
pub use classification::{ClassificationMethod, ClassificationOutcome, ClassificationResult};
pub use document::{Document, FileFormat};
pub use extraction::{ExtractionResult, ExtractionSource, PageOutcome};
