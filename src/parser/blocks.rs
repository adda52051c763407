use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::inline::{self, InlineSpan};
use crate::config::ReaderConfig;
use crate::dom::{Document, Element};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArticleBlock {
    Heading { text: String, level: u8 },
    Paragraph { raw_markup: String },
    Image { src: String, alt: Option<String> },
    Blockquote { text: String },
    Code { text: String },
    List { items: Vec<String> },
}

impl ArticleBlock {
    /// Inline spans for headings, paragraphs and blockquotes. Lists carry
    /// their spans per item, see [`ArticleBlock::item_spans`].
    pub fn spans(&self, base: Option<&Url>) -> Vec<InlineSpan> {
        match self {
            ArticleBlock::Heading { text, .. } => inline::tokenize_with_base(text, base),
            ArticleBlock::Paragraph { raw_markup } => inline::tokenize_with_base(raw_markup, base),
            ArticleBlock::Blockquote { text } => vec![InlineSpan::PlainText { text: text.clone() }],
            ArticleBlock::Image { .. } | ArticleBlock::Code { .. } | ArticleBlock::List { .. } => {
                Vec::new()
            }
        }
    }

    pub fn item_spans(&self, base: Option<&Url>) -> Vec<Vec<InlineSpan>> {
        match self {
            ArticleBlock::List { items } => items
                .iter()
                .map(|item| inline::tokenize_with_base(item, base))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Tags the classifier acts on; everything else is a transparent container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockTag {
    Heading(u8),
    Paragraph,
    Image,
    Blockquote,
    Code,
    List,
    Container,
}

impl BlockTag {
    fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "h1" => BlockTag::Heading(1),
            "h2" => BlockTag::Heading(2),
            "h3" => BlockTag::Heading(3),
            "h4" => BlockTag::Heading(4),
            "h5" => BlockTag::Heading(5),
            "h6" => BlockTag::Heading(6),
            "p" => BlockTag::Paragraph,
            "img" => BlockTag::Image,
            "blockquote" => BlockTag::Blockquote,
            "pre" | "code" => BlockTag::Code,
            "ul" | "ol" => BlockTag::List,
            _ => BlockTag::Container,
        }
    }
}

/// Classify a content fragment into blocks. Unparsable markup yields no blocks.
pub fn classify_fragment(markup: &str) -> Vec<ArticleBlock> {
    classify_fragment_with_config(markup, &ReaderConfig::default())
}

/// Classify with the configured depth cap and markup size limit.
pub fn classify_fragment_with_config(markup: &str, config: &ReaderConfig) -> Vec<ArticleBlock> {
    match Document::parse_with_limit(markup, config.max_markup_bytes) {
        Ok(doc) => classify_element(doc.body(), config.max_depth),
        Err(e) => {
            debug!("Content fragment not classified: {}", e);
            Vec::new()
        }
    }
}

pub fn classify_element(root: Element<'_>, max_depth: usize) -> Vec<ArticleBlock> {
    let mut blocks = Vec::new();
    walk(root, 0, max_depth, &mut blocks);
    debug!(blocks = blocks.len(), "Classified content fragment");
    blocks
}

fn walk(el: Element<'_>, depth: usize, max_depth: usize, blocks: &mut Vec<ArticleBlock>) {
    match BlockTag::from_name(&el.tag()) {
        BlockTag::Heading(level) => {
            let text = el.inner_markup().trim().to_string();
            if !text.is_empty() {
                blocks.push(ArticleBlock::Heading { text, level });
            }
        }
        BlockTag::Paragraph => {
            let raw_markup = el.inner_markup().trim().to_string();
            if !raw_markup.is_empty() {
                blocks.push(ArticleBlock::Paragraph { raw_markup });
            }
        }
        BlockTag::Image => {
            if let Some(src) = el.attr("src").filter(|s| !s.is_empty()) {
                blocks.push(ArticleBlock::Image {
                    src: src.to_string(),
                    alt: el.attr("alt").map(str::to_string),
                });
            }
        }
        BlockTag::Blockquote => {
            let text = el.text().trim().to_string();
            if !text.is_empty() {
                blocks.push(ArticleBlock::Blockquote { text });
            }
        }
        BlockTag::Code => {
            let text = el.text();
            if !text.is_empty() {
                blocks.push(ArticleBlock::Code { text });
            }
        }
        BlockTag::List => {
            let items: Vec<String> = el
                .children()
                .filter(|child| child.tag() == "li")
                .map(|li| li.inner_markup().trim().to_string())
                .filter(|item| !item.is_empty())
                .collect();
            if !items.is_empty() {
                blocks.push(ArticleBlock::List { items });
            }
        }
        BlockTag::Container => {
            if depth >= max_depth {
                warn!(depth, tag = %el.tag(), "Nesting too deep, skipping subtree");
                return;
            }
            for child in el.children() {
                walk(child, depth + 1, max_depth, blocks);
            }
        }
    }
}
