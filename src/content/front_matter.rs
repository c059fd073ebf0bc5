use std::collections::BTreeMap;

use serde_yaml::Value;

use crate::content::content_renderer::ContentRenderer;
use crate::content::raw_document::RawDocument;
use crate::content::{RenderedBody, Record, Template, Term, Thumbnail};
use crate::derive::{derive_slug, resolve_date};
use crate::error::{ValidationError, ValidationKind, ValidationReport};
use crate::text_utils::{time_to_read, truncate_excerpt};

pub const DEFAULT_EXCERPT_MAX_LENGTH: usize = 180;
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 265;

#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    pub excerpt_max_length: usize,
    pub words_per_minute: u32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeOptions {
            excerpt_max_length: DEFAULT_EXCERPT_MAX_LENGTH,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

/// Typed view of a front matter block. Fields the pipeline does not know end up in `extra`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<Term>,
    pub categories: Vec<Term>,
    pub template: Template,
    pub thumbnail: Option<Thumbnail>,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    pub extra: BTreeMap<String, Value>,
}

impl FrontMatter {
    /// Parses the metadata block. Field level problems are returned next to the
    /// partially filled front matter so they can be reported together with the
    /// other problems of the document.
    pub fn parse(raw: Option<&str>) -> Result<(FrontMatter, Vec<ValidationKind>), ValidationKind> {
        let mut front_matter = FrontMatter::default();
        let mut errors = vec![];

        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok((front_matter, errors)),
        };

        let mapping = match serde_yaml::from_str::<Value>(raw) {
            Ok(Value::Mapping(mapping)) => mapping,
            Ok(Value::Null) => return Ok((front_matter, errors)),
            Ok(_) => return Err(ValidationKind::MalformedFrontMatter("front matter must be a mapping".to_string())),
            Err(e) => return Err(ValidationKind::MalformedFrontMatter(e.to_string())),
        };

        let mut published_at = None;
        let mut category = vec![];

        for (key, value) in mapping {
            let key = match scalar_to_string(&key) {
                Some(key) => key,
                None => {
                    errors.push(ValidationKind::MalformedFrontMatter("keys must be scalars".to_string()));
                    continue;
                }
            };
            if value.is_null() {
                continue;
            }

            match key.as_str() {
                "title" => front_matter.title = scalar_field("title", &value, &mut errors),
                "slug" => front_matter.slug = scalar_field("slug", &value, &mut errors),
                "date" => front_matter.date = scalar_field("date", &value, &mut errors),
                "publishedAt" => published_at = scalar_field("publishedAt", &value, &mut errors),
                "tags" => front_matter.tags = term_field("tags", &value, &mut errors),
                "categories" => front_matter.categories = term_field("categories", &value, &mut errors),
                "category" => category = term_field("category", &value, &mut errors),
                "template" => {
                    if let Some(name) = scalar_field("template", &value, &mut errors) {
                        front_matter.template = Template::from_name(&name);
                    }
                }
                "thumbnail" => front_matter.thumbnail = scalar_field("thumbnail", &value, &mut errors).map(Thumbnail),
                "author" => front_matter.author = scalar_field("author", &value, &mut errors),
                "excerpt" => front_matter.excerpt = scalar_field("excerpt", &value, &mut errors),
                _ => {
                    front_matter.extra.insert(key, value);
                }
            }
        }

        if front_matter.date.is_none() {
            front_matter.date = published_at;
        }
        if !category.is_empty() {
            let mut categories = std::mem::take(&mut front_matter.categories);
            categories.extend(category);
            front_matter.categories = dedup_terms(categories);
        }

        Ok((front_matter, errors))
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_field(field: &'static str, value: &Value, errors: &mut Vec<ValidationKind>) -> Option<String> {
    match scalar_to_string(value) {
        Some(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        None => {
            errors.push(ValidationKind::InvalidField { field, reason: "expected a single value".to_string() });
            None
        }
    }
}

/// Accepts a single string or a list of strings.
fn term_field(field: &'static str, value: &Value, errors: &mut Vec<ValidationKind>) -> Vec<Term> {
    let values: Vec<String> = match value {
        Value::Sequence(items) => {
            let mut values = vec![];
            for item in items {
                if item.is_null() {
                    continue;
                }
                match scalar_to_string(item) {
                    Some(s) => values.push(s),
                    None => {
                        errors.push(ValidationKind::InvalidField { field, reason: "expected a list of strings".to_string() });
                        return vec![];
                    }
                }
            }
            values
        }
        other => match scalar_to_string(other) {
            Some(s) => vec![s],
            None => {
                errors.push(ValidationKind::InvalidField { field, reason: "expected a string or a list of strings".to_string() });
                return vec![];
            }
        },
    };

    dedup_terms(values.iter().map(|v| Term::new(v)).collect())
}

/// Drops empty terms and case-insensitive duplicates. The first spelling wins.
fn dedup_terms(terms: Vec<Term>) -> Vec<Term> {
    let mut res: Vec<Term> = Vec::with_capacity(terms.len());
    for term in terms {
        if term.key.is_empty() || res.iter().any(|t| t.key == term.key) {
            continue;
        }
        res.push(term);
    }
    res
}

/// Turns one raw document into a record, or every reason it cannot be one.
pub fn normalize(doc: &RawDocument, renderer: &dyn ContentRenderer, options: &NormalizeOptions) -> Result<Record, Vec<ValidationError>> {
    let path = doc.source_path.as_str();
    let to_error = |kind| ValidationError::new(path, kind);

    let (front_matter, field_errors) = FrontMatter::parse(doc.raw_metadata.as_deref())
        .map_err(|kind| vec![to_error(kind)])?;
    let mut errors: Vec<ValidationKind> = field_errors;

    let title = front_matter.title.clone();
    if title.is_none() {
        errors.push(ValidationKind::MissingField("title"));
    }

    let slug = derive_slug(front_matter.slug.as_deref(), path)
        .map_err(|kind| errors.push(kind))
        .ok();
    let date = resolve_date(front_matter.date.as_deref(), doc.modified_at)
        .map_err(|kind| errors.push(kind))
        .ok();
    let rendered = renderer.render(&doc.raw_body)
        .map_err(|e| errors.push(ValidationKind::Render(e.0)))
        .ok();

    let (Some(title), Some(slug), Some(date), Some(rendered)) = (title, slug, date, rendered) else {
        return Err(errors.into_iter().map(to_error).collect());
    };
    if !errors.is_empty() {
        return Err(errors.into_iter().map(to_error).collect());
    }

    let excerpt_source = front_matter.excerpt.as_deref().unwrap_or(rendered.excerpt_source.as_str());
    let excerpt = truncate_excerpt(excerpt_source, options.excerpt_max_length);

    Ok(Record {
        title,
        slug,
        date,
        tags: front_matter.tags,
        categories: front_matter.categories,
        excerpt,
        time_to_read: time_to_read(rendered.word_count, options.words_per_minute),
        thumbnail: front_matter.thumbnail,
        template: front_matter.template,
        body: RenderedBody(rendered.html),
        source_path: doc.source_path.clone(),
        author: front_matter.author,
        extra: front_matter.extra,
    })
}

/// Normalizes every document. Rejected documents are left out and their errors collected.
pub fn normalize_all(docs: &[RawDocument], renderer: &dyn ContentRenderer, options: &NormalizeOptions) -> (Vec<Record>, ValidationReport) {
    let mut records = Vec::with_capacity(docs.len());
    let mut report = ValidationReport::default();

    for doc in docs {
        match normalize(doc, renderer, options) {
            Ok(record) => records.push(record),
            Err(errors) => report.extend(errors),
        }
    }

    (records, report)
}
