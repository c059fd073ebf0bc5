use thiserror::Error;

/// Output of the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Full rendered body, opaque to the pipeline.
    pub html: String,
    /// Plain text the excerpt, word count and reading time are derived from.
    pub excerpt_source: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RenderError(pub String);

pub trait ContentRenderer {
    fn render(&self, raw_body: &str) -> Result<Rendered, RenderError>;
}
