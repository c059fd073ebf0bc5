use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::content::parsing_utils::split_front_matter;
use crate::error::{SourceError, ValidationError, ValidationKind};

/// A document file as read from the content directory.
pub struct SourceFile {
    /// Path relative to the content root, with `/` separators.
    pub source_path: String,
    pub file_path: PathBuf,
    pub raw_content: String,
    pub modified_at: Option<NaiveDateTime>,
}

impl SourceFile {
    pub fn from_file(root_dir: &Path, file_path: PathBuf) -> Result<SourceFile, SourceError> {
        let io_err = |source| SourceError::Io { path: file_path.clone(), source };

        let raw_content = fs::read_to_string(&file_path).map_err(io_err)?;
        let modified_at = fs::metadata(&file_path)
            .and_then(|m| m.modified())
            .ok()
            .map(|t| DateTime::<Utc>::from(t).naive_utc());

        let relative = file_path.strip_prefix(root_dir).unwrap_or(&file_path);
        let source_path = relative.iter()
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        Ok(SourceFile {
            source_path,
            file_path,
            raw_content,
            modified_at,
        })
    }

    pub fn into_raw_document(self) -> Result<RawDocument, ValidationError> {
        RawDocument::from_text(&self.source_path, &self.raw_content, self.modified_at)
    }
}

/// Input unit of the pipeline: metadata block and body, split but not interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub source_path: String,
    pub raw_metadata: Option<String>,
    pub raw_body: String,
    pub modified_at: Option<NaiveDateTime>,
}

impl RawDocument {
    pub fn from_text(source_path: &str, text: &str, modified_at: Option<NaiveDateTime>) -> Result<RawDocument, ValidationError> {
        let (metadata, body) = split_front_matter(text)
            .map_err(|e| ValidationError::new(source_path, ValidationKind::MalformedFrontMatter(e)))?;

        Ok(RawDocument {
            source_path: source_path.to_string(),
            raw_metadata: metadata.map(|m| m.to_string()),
            raw_body: body.to_string(),
            modified_at,
        })
    }
}
