use lopdf::Document;
use std::path::Path;

use crate::error::ToolError;

pub struct PdfDocument {
    pub doc: Document,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ToolError> {
        let path = path.as_ref();
        let doc = Document::load(path).map_err(|e| ToolError::pdf(path, e))?;
        Ok(PdfDocument { doc })
    }

    pub fn into_inner(self) -> Document {
        self.doc
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<(), ToolError> {
        let path = path.as_ref();
        doc.save(path).map_err(|e| ToolError::io(path, e))?;
        Ok(())
    }
}
