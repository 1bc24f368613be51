use std::sync::LazyLock;

use ammonia::Builder;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

/// Plain text of a rendered markup string, whitespace collapsed.
pub fn extract_text(markup: &str) -> String {
    normalize_whitespace(&strip_markup(markup))
}

/// Elements whose boundaries separate words.
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "br",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

/// Drops every tag and returns the text nodes.
///
/// Ammonia runs first so the contents of `<script>` and `<style>` never reach
/// the text. Inline elements add nothing, so `S<b>E</b>O` stays one word;
/// block elements are padded with a space so adjacent blocks do not run
/// together.
pub fn strip_markup(markup: &str) -> String {
    let clean_html = Builder::default().clean(markup).to_string();
    let fragment = Html::parse_fragment(&clean_html);
    let mut text = String::with_capacity(clean_html.len());
    push_text(fragment.root_element(), &mut text);
    text
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK_ELEMENTS.contains(&el.name());
                if block {
                    out.push(' ');
                }
                push_text(child, out);
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Collapses runs of whitespace (newlines included) into single spaces and
/// trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}
