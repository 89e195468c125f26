// file: src/utils/validation.rs
// description: input validation for queries, links and output locations
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_query(query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Err(PipelineError::Config(
                "Search query must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .ok_or_else(|| PipelineError::Validation(format!("Invalid URL format: {}", url)))?;

        if rest.is_empty() || rest.starts_with('/') || rest.contains(char::is_whitespace) {
            return Err(PipelineError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Creates the directory when missing; an existing non-directory is rejected.
    pub fn validate_output_dir(path: &Path) -> Result<()> {
        if path.exists() && !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Output path is not a directory: {}",
                path.display()
            )));
        }

        fs::create_dir_all(path).map_err(|e| PipelineError::file(path, e))
    }

    pub fn validate_input_file(path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(PipelineError::Validation(format!(
                "Input is not a readable file: {}",
                path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_query() {
        assert!(Validator::validate_query("cobalt strike beacon").is_ok());
        assert!(matches!(
            Validator::validate_query("   "),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://example.com").is_ok());
        assert!(Validator::validate_url("http://example.com/report.pdf").is_ok());
        assert!(Validator::validate_url("example.com").is_err());
        assert!(Validator::validate_url("ftp://example.com").is_err());
        assert!(Validator::validate_url("https://").is_err());
        assert!(Validator::validate_url("https://exa mple.com").is_err());
    }

    #[test]
    fn test_validate_output_dir_creates_missing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");

        Validator::validate_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_validate_output_dir_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        fs::write(&file, "x").unwrap();

        assert!(Validator::validate_output_dir(&file).is_err());
    }

    #[test]
    fn test_validate_input_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("corpus.txt");
        fs::write(&file, "1.2.3.4").unwrap();

        assert!(Validator::validate_input_file(&file).is_ok());
        assert!(Validator::validate_input_file(temp.path()).is_err());
    }
}
