use markdown::Options;

use crate::content::content_renderer::{ContentRenderer, RenderError, Rendered};
use crate::content::parsing_utils::{preview_part, strip_tags, BREAK_TAG};
use crate::text_utils::count_words;

/// GFM renderer used when no other renderer is plugged into the pipeline.
#[derive(Default)]
pub struct MarkdownRenderer {}

impl MarkdownRenderer {
    fn render_markdown(md_text: &str) -> Result<String, RenderError> {
        match markdown::to_html_with_options(md_text, &Options::gfm()) {
            Ok(x) => Ok(x),
            Err(e) => Err(RenderError(e.reason.clone())),
        }
    }
}

impl ContentRenderer for MarkdownRenderer {
    fn render(&self, raw_body: &str) -> Result<Rendered, RenderError> {
        // Only the break tag is cut. Other comments, including those in code, are left to the markdown parser
        let html = Self::render_markdown(&raw_body.replacen(BREAK_TAG, "", 1))?;
        let full_text = strip_tags(&html);
        let word_count = count_words(&full_text);

        // Authors can pick the excerpt with the break tag
        let excerpt_source = match preview_part(raw_body) {
            Some(preview) => strip_tags(&Self::render_markdown(preview)?),
            None => full_text,
        };

        Ok(Rendered {
            html,
            excerpt_source,
            word_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::POST_BODY_MD;

    use super::*;

    #[test]
    fn test_render_full_body() {
        let rendered = MarkdownRenderer::default().render(POST_BODY_MD).unwrap();
        assert!(rendered.html.starts_with("<p>How to be a great software engineer?</p>\n"));
        assert!(rendered.html.contains("<h2>Non technical</h2>"));
        assert!(rendered.html.contains("<strong>The earlier you find that, the better.</strong>"));
        assert!(!rendered.html.contains("more -->"));
    }

    #[test]
    fn test_excerpt_source_stops_at_break_tag() {
        let rendered = MarkdownRenderer::default().render(POST_BODY_MD).unwrap();
        assert!(rendered.excerpt_source.starts_with("How to be a great software engineer? Someone asked me"));
        assert!(rendered.excerpt_source.ends_with("non-technical and technical"));
        assert!(rendered.word_count > count_words(&rendered.excerpt_source));
    }

    #[test]
    fn test_excerpt_source_without_break_tag() {
        let rendered = MarkdownRenderer::default().render("Plain *emphasis* and `code`.").unwrap();
        assert_eq!(rendered.html, "<p>Plain <em>emphasis</em> and <code>code</code>.</p>");
        assert_eq!(rendered.excerpt_source, "Plain emphasis and code.");
        assert_eq!(rendered.word_count, 4);
    }

    #[test]
    fn test_empty_body() {
        let rendered = MarkdownRenderer::default().render("").unwrap();
        assert_eq!(rendered.html, "");
        assert_eq!(rendered.excerpt_source, "");
        assert_eq!(rendered.word_count, 0);
    }

    #[test]
    fn test_comment_opener_in_inline_code() {
        let rendered = MarkdownRenderer::default().render("Start a comment with `<!--` in HTML.").unwrap();
        assert_eq!(rendered.html, "<p>Start a comment with <code>&lt;!--</code> in HTML.</p>");
        assert_eq!(rendered.excerpt_source, "Start a comment with <!-- in HTML.");
    }

    #[test]
    fn test_comments_in_fenced_code_are_kept() {
        let rendered = MarkdownRenderer::default().render("```html\n<!-- keep me -->\n<p>x</p>\n```\n").unwrap();
        assert!(rendered.html.contains("&lt;!-- keep me --&gt;\n&lt;p&gt;x&lt;/p&gt;"));
    }
}
