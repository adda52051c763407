use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ReaderConfig;
use crate::metadata::{self, SiteMetadata};
use crate::parser::blocks::{self, ArticleBlock};
use crate::parser::hero;

/// Output of the external main-content extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Cleaned content fragment.
    pub content: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    pub date_published: Option<DateTime<Utc>>,
}

/// A page ready for a reader view. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableDoc {
    extracted: ExtractedContent,
    content_html: String,
    show_hero_image: bool,
    metadata: SiteMetadata,
    published_date: Option<DateTime<Utc>>,
}

impl ReadableDoc {
    /// `None` when the extractor produced no content fragment.
    ///
    /// `show_hero_image` overrides the heuristic when given. `date` falls back
    /// to the extractor's published date.
    pub fn new(
        extracted: ExtractedContent,
        show_hero_image: Option<bool>,
        metadata: SiteMetadata,
        date: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        Self::with_config(extracted, show_hero_image, metadata, date, &ReaderConfig::default())
    }

    pub fn with_config(
        extracted: ExtractedContent,
        show_hero_image: Option<bool>,
        metadata: SiteMetadata,
        date: Option<DateTime<Utc>>,
        config: &ReaderConfig,
    ) -> Option<Self> {
        let content_html = extracted.content.clone()?;
        let show_hero_image =
            show_hero_image.unwrap_or_else(|| hero::should_show_hero(&content_html, config));
        let published_date = date.or(extracted.date_published);
        Some(ReadableDoc {
            extracted,
            content_html,
            show_hero_image,
            metadata,
            published_date,
        })
    }

    pub fn extracted(&self) -> &ExtractedContent {
        &self.extracted
    }

    pub fn content_html(&self) -> &str {
        &self.content_html
    }

    pub fn show_hero_image(&self) -> bool {
        self.show_hero_image
    }

    pub fn metadata(&self) -> &SiteMetadata {
        &self.metadata
    }

    pub fn published_date(&self) -> Option<DateTime<Utc>> {
        self.published_date
    }

    /// The extractor's title, else the page metadata title.
    pub fn title(&self) -> Option<&str> {
        self.extracted
            .title
            .as_deref()
            .or(self.metadata.title.as_deref())
    }

    pub fn author(&self) -> Option<&str> {
        self.extracted.author.as_deref()
    }

    pub fn url(&self) -> &Url {
        &self.metadata.url
    }

    /// Hero image to paint, if the heuristic (or override) allows one.
    pub fn hero_image(&self) -> Option<&Url> {
        if self.show_hero_image {
            self.metadata.hero_image.as_ref()
        } else {
            None
        }
    }

    pub fn host_without_www(&self) -> String {
        let host = self.url().host_str().unwrap_or("");
        host.strip_prefix("www.").unwrap_or(host).to_string()
    }

    /// Blocks of the content fragment, derived on every call.
    pub fn blocks(&self) -> Vec<ArticleBlock> {
        blocks::classify_fragment(&self.content_html)
    }

    pub fn blocks_with_config(&self, config: &ReaderConfig) -> Vec<ArticleBlock> {
        blocks::classify_fragment_with_config(&self.content_html, config)
    }

    /// Resolve an in-content reference (image src, link) against the page URL.
    pub fn resolve(&self, reference: &str) -> Option<Url> {
        metadata::resolve(self.url(), reference)
    }
}
