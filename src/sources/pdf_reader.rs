// file: src/sources/pdf_reader.rs
// description: per-page pdf text extraction backed by pdf-extract
// reference: https://docs.rs/pdf-extract

use crate::error::{PipelineError, Result};
use crate::sources::PdfTextReader;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractReader;

impl PdfTextReader for PdfExtractReader {
    fn read_pages(&self, path: &Path) -> Result<Vec<String>> {
        pdf_extract::extract_text_by_pages(path)
            .map_err(|e| PipelineError::extract(path.display().to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_garbage_file_is_extract_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"this is not a pdf").unwrap();

        let err = PdfExtractReader.read_pages(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Extract { .. }));
    }
}
