use lazy_static::lazy_static;
use regex::Regex;

pub const BREAK_TAG: &str = "<!-- more -->";

const FRONT_MATTER_DELIMITER: &str = "---";

/// Splits a document into its YAML front matter block and body.
///
/// The block must open on the first non-blank line with `---` and close with
/// another `---` line. Documents without a block return `None` and the whole
/// text as body.
pub fn split_front_matter(raw: &str) -> Result<(Option<&str>, &str), String> {
    let text = raw.trim_start_matches('\u{feff}');
    let trimmed = text.trim_start_matches(['\n', '\r', ' ', '\t']);
    if !trimmed.starts_with(FRONT_MATTER_DELIMITER) {
        return Ok((None, text));
    }

    let first_line_end = trimmed.find('\n').unwrap_or(trimmed.len());
    if trimmed[..first_line_end].trim_end() != FRONT_MATTER_DELIMITER {
        return Ok((None, text));
    }

    let rest = &trimmed[(first_line_end + 1).min(trimmed.len())..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_DELIMITER {
            let metadata = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((Some(metadata), body));
        }
        offset += line.len();
    }

    Err("front matter block is not closed with `---`".to_string())
}

/// Part of the body before the `<!-- more -->` marker, if the marker is present.
pub fn preview_part(body: &str) -> Option<&str> {
    body.find(BREAK_TAG).map(|pos| &body[..pos])
}

/// Turns rendered HTML into whitespace-normalized plain text.
pub fn strip_tags(html: &str) -> String {
    lazy_static! {
        static ref BLOCK_TAG_REGEX: Regex = Regex::new(
            r"(?i)</?(p|h[1-6]|li|ul|ol|div|blockquote|pre|br|hr|table|tr|td|th)(\s[^>]*)?/?>"
        ).unwrap();
        static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    }

    let text = BLOCK_TAG_REGEX.replace_all(html, " ");
    let text = TAG_REGEX.replace_all(&text, "");
    let text = decode_entities(&text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
