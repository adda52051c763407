//! Thin element-tree interface over `scraper`.
//!
//! html5ever recovers from almost anything, so "unparsable" here means input
//! with nothing to tokenize (blank) or input past the configured size limit.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::config::DEFAULT_MAX_MARKUP_BYTES;
use crate::error::ParseError;

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Result<Self, ParseError> {
        Self::parse_with_limit(markup, DEFAULT_MAX_MARKUP_BYTES)
    }

    pub fn parse_with_limit(markup: &str, limit: usize) -> Result<Self, ParseError> {
        if markup.len() > limit {
            return Err(ParseError::TooLarge {
                len: markup.len(),
                limit,
            });
        }
        if markup.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        let html = Html::parse_document(markup);
        if !html.errors.is_empty() {
            tracing::trace!(recovered = html.errors.len(), "html5ever recovered from markup errors");
        }
        Ok(Document { html })
    }

    pub fn root(&self) -> Element<'_> {
        Element(self.html.root_element())
    }

    /// The `<body>` element, falling back to the document root.
    pub fn body(&self) -> Element<'_> {
        self.select_first(&BODY).unwrap_or_else(|| self.root())
    }

    pub fn select_first(&self, selector: &Selector) -> Option<Element<'_>> {
        self.html.select(selector).next().map(Element)
    }

    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = Element<'a>> + 'a {
        self.html.select(selector).map(Element)
    }
}

#[derive(Clone, Copy)]
pub struct Element<'a>(ElementRef<'a>);

impl<'a> Element<'a> {
    /// Lower-cased tag name.
    pub fn tag(&self) -> String {
        self.0.value().name().to_ascii_lowercase()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Concatenated text of every descendant text node.
    pub fn text(&self) -> String {
        self.0.text().collect()
    }

    /// Serialized markup of the children, without the element's own tags.
    pub fn inner_markup(&self) -> String {
        self.0.inner_html()
    }

    pub fn children(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        self.0.children().filter_map(ElementRef::wrap).map(Element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_parse_error() {
        assert_eq!(Document::parse("  \n\t").err(), Some(ParseError::Empty));
    }

    #[test]
    fn oversized_is_parse_error() {
        let err = Document::parse_with_limit("<p>hello</p>", 4).err();
        assert_eq!(err, Some(ParseError::TooLarge { len: 12, limit: 4 }));
    }

    #[test]
    fn body_children_in_order() {
        let doc = Document::parse("<DIV><p>one</p><P class='x'>two</P></DIV>").unwrap();
        let body = doc.body();
        assert_eq!(body.tag(), "body");
        let div = body.children().next().unwrap();
        assert_eq!(div.tag(), "div");
        let tags: Vec<String> = div.children().map(|c| c.tag()).collect();
        assert_eq!(tags, vec!["p", "p"]);
        let second = div.children().nth(1).unwrap();
        assert_eq!(second.attr("class"), Some("x"));
        assert_eq!(second.text(), "two");
    }

    #[test]
    fn inner_markup_keeps_inline_tags() {
        let doc = Document::parse("<p>a <a href=\"/x\">b</a></p>").unwrap();
        let p = doc.body().children().next().unwrap();
        assert_eq!(p.inner_markup(), "a <a href=\"/x\">b</a>");
    }
}
