use ammonia::clean_text;

use crate::entities::ContentRecord;

/// Produces the default presentation markup of a record.
#[cfg_attr(test, mockall::automock)]
pub trait Renderer: Send + Sync {
    fn render_default(&self, record: &ContentRecord) -> anyhow::Result<String>;
}

/// Default article template: heading, byline, body and tag list.
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TemplateRenderer {
    fn render_default(&self, record: &ContentRecord) -> anyhow::Result<String> {
        let mut html = String::with_capacity(record.body.len() + 256);
        html.push_str("<article>");
        html.push_str(&format!("<h2>{}</h2>", clean_text(&record.title)));
        if !record.author.is_empty() {
            html.push_str(&format!(
                r#"<div class="byline">{}</div>"#,
                clean_text(&record.author)
            ));
        }
        html.push_str(r#"<div class="body">"#);
        html.push_str(&record.body);
        html.push_str("</div>");
        if !record.tags.is_empty() {
            html.push_str(r#"<ul class="tags">"#);
            for tag in &record.tags {
                html.push_str(&format!("<li>{}</li>", clean_text(&tag.name)));
            }
            html.push_str("</ul>");
        }
        html.push_str("</article>");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::fixtures::{record, tag};

    #[test]
    fn test_renders_title_body_and_tags() {
        let mut rec = record("Structured <data>");
        rec.tags = vec![tag("seo")];
        let html = TemplateRenderer::new().render_default(&rec).unwrap();

        assert!(html.starts_with("<article>"));
        assert!(html.contains("Structured &lt;data&gt;"));
        assert!(html.contains("<strong>well structured</strong>"));
        assert!(html.contains("<li>seo</li>"));
    }

    #[test]
    fn test_omits_empty_byline() {
        let mut rec = record("No author");
        rec.author = String::new();
        let html = TemplateRenderer::new().render_default(&rec).unwrap();
        assert!(!html.contains("byline"));
    }
}
