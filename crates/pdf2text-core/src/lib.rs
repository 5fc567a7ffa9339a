//! Core of pdf2text: a content-stream text scanner and the page aggregator
//! built on top of it. PDF container parsing lives behind the
//! [`document::DocumentAdapter`] trait.

pub mod aggregator;
pub mod document;
pub mod error;
pub mod extractor;
pub mod options;
pub mod resolve;
pub mod scanner;

pub use aggregator::{PageAggregator, ProgressReporter};
pub use document::{Document, DocumentAdapter, InMemoryDocument, Source};
pub use error::{ExtractError, Result};
pub use extractor::{Extractor, ExtractorBuilder};
pub use options::{ExtractOptions, ScanOptions};
pub use resolve::{PathResolver, RootResolver};
pub use scanner::{ContentScanner, LookbackWindow, ScanState};
