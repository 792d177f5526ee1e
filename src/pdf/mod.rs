pub mod document;
pub mod merge;
pub mod writer;

pub use document::PdfDocument;
