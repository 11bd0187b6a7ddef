mod extractor;

pub mod extractors;

pub use extractor::{ExtractionError, TextExtractor};
