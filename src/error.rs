use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use thiserror::Error;

/// Why a single document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationKind {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("no date in front matter and no file modification time")]
    MissingDate,
    #[error("unable to parse date `{0}`")]
    InvalidDate(String),
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("malformed front matter: {0}")]
    MalformedFrontMatter(String),
    #[error("rendering failed: {0}")]
    Render(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {kind}")]
pub struct ValidationError {
    pub path: String,
    pub kind: ValidationKind,
}

impl ValidationError {
    pub fn new(path: &str, kind: ValidationKind) -> Self {
        ValidationError {
            path: path.to_string(),
            kind,
        }
    }
}

/// Every validation error found during one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn extend(&mut self, errors: Vec<ValidationError>) {
        self.errors.extend(errors);
    }

    /// Distinct source paths that were rejected, in report order.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = vec![];
        for err in self.errors.iter() {
            if !paths.contains(&err.path.as_str()) {
                paths.push(err.path.as_str());
            }
        }
        paths
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} validation error(s):", self.errors.len())?;
        for err in self.errors.iter() {
            writeln!(f, "  {}", err)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugCollision {
    pub slug: String,
    pub first: String,
    pub second: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionError {
    pub collisions: Vec<SlugCollision>,
}

impl Display for CollisionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate slugs:")?;
        for c in self.collisions.iter() {
            write!(f, " `{}` ({} and {})", c.slug, c.first, c.second)?;
        }
        Ok(())
    }
}

impl std::error::Error for CollisionError {}

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("site_url is not configured")]
    MissingSiteUrl,
    #[error("error writing feed xml: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("error writing feed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("content directory {0} does not exist")]
    MissingRoot(PathBuf),
}
