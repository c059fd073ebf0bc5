use std::fs;
use std::path::{Path, PathBuf};

use spdlog::debug;

use crate::content::raw_document::SourceFile;
use crate::error::SourceError;

const DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Markdown documents under a content directory.
pub struct DocumentSource {
    pub root_dir: PathBuf,
}

impl DocumentSource {
    pub fn new(root_dir: &Path) -> Self {
        DocumentSource { root_dir: root_dir.to_path_buf() }
    }

    /// Every document path below the root, sorted so runs see the same order.
    pub fn retrieve_files(&self) -> Result<Vec<PathBuf>, SourceError> {
        if !self.root_dir.is_dir() {
            return Err(SourceError::MissingRoot(self.root_dir.clone()));
        }

        let mut files = vec![];
        Self::walk(&self.root_dir, &mut files)?;
        files.sort();
        Ok(files)
    }

    pub fn load(&self) -> Result<Vec<SourceFile>, SourceError> {
        let files = self.retrieve_files()?;
        debug!("Found {} documents under {}", files.len(), self.root_dir.display());

        files.into_iter()
            .map(|path| SourceFile::from_file(&self.root_dir, path))
            .collect()
    }

    fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), SourceError> {
        let io_err = |source| SourceError::Io { path: dir.to_path_buf(), source };

        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            // Hidden files and directories are drafts, editor state or VCS data
            if file_name.starts_with('.') {
                continue;
            }

            let file_type = entry.file_type().map_err(io_err)?;
            let path = entry.path();
            if file_type.is_dir() {
                Self::walk(&path, files)?;
            } else if file_type.is_file() && Self::is_document(&path) {
                files.push(path);
            }
        }
        Ok(())
    }

    fn is_document(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| DOCUMENT_EXTENSIONS.iter().any(|d| ext.eq_ignore_ascii_case(d)))
            .unwrap_or(false)
    }
}
